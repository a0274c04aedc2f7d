use serde::{Deserialize, Serialize};

/// Four 8-bit channels of a color.
///
/// The packed form used throughout the renderer is a `u32` with R in the
/// lowest byte, then G, then B, and A in the highest byte.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Rgba {
    pub const WHITE: Rgba = Rgba::opaque(255, 255, 255);

    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Color with a fully opaque alpha channel.
    pub const fn opaque(r: u8, g: u8, b: u8) -> Self {
        Self::new(r, g, b, 255)
    }

    pub const fn pack(self) -> u32 {
        pack_color(self.r, self.g, self.b, self.a)
    }

    pub const fn unpack(color: u32) -> Self {
        let [r, g, b, a] = unpack_color(color);
        Self { r, g, b, a }
    }
}

impl From<Rgba> for u32 {
    fn from(color: Rgba) -> Self {
        color.pack()
    }
}

impl From<u32> for Rgba {
    fn from(color: u32) -> Self {
        Rgba::unpack(color)
    }
}

/// Pack four channels into a single 32-bit color.
pub const fn pack_color(r: u8, g: u8, b: u8, a: u8) -> u32 {
    u32::from_le_bytes([r, g, b, a])
}

/// Split a packed color into `[r, g, b, a]`.
pub const fn unpack_color(color: u32) -> [u8; 4] {
    color.to_le_bytes()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn channel_layout() {
        let c = pack_color(0x11, 0x22, 0x33, 0x44);
        assert_eq!(c, 0x4433_2211);
        assert_eq!(c & 0xff, 0x11);
        assert_eq!(c >> 24, 0x44);
    }

    #[test]
    fn pack_unpack_round_trip() {
        for r in (0..=255u8).step_by(15) {
            for g in (0..=255u8).step_by(17) {
                for b in (0..=255u8).step_by(51) {
                    for a in [0u8, 1, 127, 128, 254, 255] {
                        assert_eq!(unpack_color(pack_color(r, g, b, a)), [r, g, b, a]);
                    }
                }
            }
        }
    }

    #[test]
    fn unpack_pack_round_trip_on_raw_values() {
        for raw in [0u32, 1, 0xff, 0xdead_beef, 0x8000_0000, u32::MAX] {
            let [r, g, b, a] = unpack_color(raw);
            assert_eq!(pack_color(r, g, b, a), raw);
        }
    }

    #[test]
    fn rgba_conversions() {
        let c = Rgba::opaque(10, 20, 30);
        let packed: u32 = c.into();
        assert_eq!(Rgba::from(packed), c);
        assert_eq!(Rgba::WHITE.pack(), 0xffff_ffff);
        assert_eq!(Rgba::opaque(0, 0, 0).pack(), 0xff00_0000);
    }
}
