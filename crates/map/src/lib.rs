//! Tile map: the immutable 2-D grid the renderer casts rays against.
//!
//! # Invariants
//! - A grid holds exactly `width * height` cells, checked at construction.
//! - Grids are never mutated after construction.
//! - Material ids are not checked against any atlas here; that happens at render time.

pub mod grid;

pub use grid::{Cell, CellCoord, DEMO_MAP, DEMO_MAP_SIZE, Grid, MapError};

pub fn crate_info() -> &'static str {
    "raymancer-map v0.1.0"
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn crate_loads() {
        assert!(crate_info().contains("map"));
    }
}
