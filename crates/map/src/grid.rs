use std::path::Path;

use glam::Vec2;

/// Built-in 16x16 map used when no other map is configured.
pub const DEMO_MAP: &str = concat!(
    "0000222222220000",
    "1              0",
    "1      11111   0",
    "1     0        0",
    "0     0  1110000",
    "0     3        0",
    "0   10000      0",
    "0   3   11100  0",
    "5   4   0      0",
    "5   4   1  00000",
    "0       1      0",
    "2       1      0",
    "0       0      0",
    "0 0000000      0",
    "0              0",
    "0002222222200000",
);

/// Width and height of [`DEMO_MAP`].
pub const DEMO_MAP_SIZE: (u32, u32) = (16, 16);

/// Errors from map construction.
#[derive(Debug, thiserror::Error)]
pub enum MapError {
    #[error("map dimensions must be positive, got {width}x{height}")]
    ZeroSized { width: u32, height: u32 },
    #[error("map literal has {actual} cells, expected {width}x{height} = {expected}")]
    LengthMismatch {
        width: u32,
        height: u32,
        expected: u64,
        actual: usize,
    },
    #[error("map row {row} has {actual} cells, expected {expected}")]
    RowWidthMismatch {
        row: usize,
        expected: usize,
        actual: usize,
    },
    #[error("invalid map character {ch:?} at cell ({x}, {y}); use ' ' or a digit")]
    InvalidCell { x: u32, y: u32, ch: char },
    #[error("map file {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

/// One grid cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Cell {
    Empty,
    /// A wall textured with the atlas entry at this index.
    Wall(u8),
}

impl Cell {
    fn parse(ch: char) -> Option<Self> {
        match ch {
            ' ' => Some(Cell::Empty),
            '0'..='9' => Some(Cell::Wall(ch as u8 - b'0')),
            _ => None,
        }
    }

    pub fn is_wall(self) -> bool {
        matches!(self, Cell::Wall(_))
    }

    pub fn material(self) -> Option<u8> {
        match self {
            Cell::Wall(id) => Some(id),
            Cell::Empty => None,
        }
    }
}

/// Integer cell coordinate, column `x` and row `y`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CellCoord {
    pub x: u32,
    pub y: u32,
}

impl CellCoord {
    pub fn new(x: u32, y: u32) -> Self {
        Self { x, y }
    }
}

/// Immutable tile map, row-major.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Grid {
    width: u32,
    height: u32,
    cells: Vec<Cell>,
}

impl Grid {
    /// Build a grid from a flat literal of `width * height` characters.
    ///
    /// `' '` is an empty cell and a decimal digit is a wall with that material id.
    pub fn from_literal(width: u32, height: u32, literal: &str) -> Result<Self, MapError> {
        if width == 0 || height == 0 {
            return Err(MapError::ZeroSized { width, height });
        }
        let count = literal.chars().count();
        let expected = u64::from(width) * u64::from(height);
        if count as u64 != expected {
            return Err(MapError::LengthMismatch {
                width,
                height,
                expected,
                actual: count,
            });
        }

        let mut cells = Vec::with_capacity(count);
        for (i, ch) in literal.chars().enumerate() {
            let x = i as u32 % width;
            let y = i as u32 / width;
            cells.push(Cell::parse(ch).ok_or(MapError::InvalidCell { x, y, ch })?);
        }

        tracing::debug!(width, height, "grid constructed");
        Ok(Self {
            width,
            height,
            cells,
        })
    }

    /// Build a grid from equal-width rows, top row first.
    pub fn from_rows<S: AsRef<str>>(rows: &[S]) -> Result<Self, MapError> {
        let expected = rows.first().map_or(0, |r| r.as_ref().chars().count());
        for (row, r) in rows.iter().enumerate() {
            let actual = r.as_ref().chars().count();
            if actual != expected {
                return Err(MapError::RowWidthMismatch {
                    row,
                    expected,
                    actual,
                });
            }
        }
        let literal: String = rows.iter().map(AsRef::as_ref).collect();
        Self::from_literal(expected as u32, rows.len() as u32, &literal)
    }

    /// Read a map from a text file, one row per line.
    ///
    /// A single trailing newline is allowed; every other line is a row.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, MapError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| MapError::Io {
            path: path.display().to_string(),
            source,
        })?;
        let rows: Vec<&str> = text.lines().collect();
        Self::from_rows(&rows)
    }

    /// The built-in 16x16 map.
    pub fn demo() -> Self {
        Self::from_literal(DEMO_MAP_SIZE.0, DEMO_MAP_SIZE.1, DEMO_MAP)
            .unwrap_or_else(|e| unreachable!("built-in map is valid: {e}"))
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Cell at integer coordinates, or `None` outside the grid.
    pub fn cell(&self, x: i64, y: i64) -> Option<Cell> {
        if x < 0 || y < 0 || x >= self.width as i64 || y >= self.height as i64 {
            return None;
        }
        Some(self.cells[x as usize + y as usize * self.width as usize])
    }

    /// Cell containing a map-space position, or `None` outside the grid.
    pub fn cell_at(&self, pos: Vec2) -> Option<Cell> {
        if !pos.is_finite() {
            return None;
        }
        self.cell(pos.x.floor() as i64, pos.y.floor() as i64)
    }

    /// All wall cells with their material ids, row-major.
    pub fn walls(&self) -> impl Iterator<Item = (CellCoord, u8)> + '_ {
        let width = self.width;
        self.cells.iter().enumerate().filter_map(move |(i, cell)| {
            cell.material()
                .map(|id| (CellCoord::new(i as u32 % width, i as u32 / width), id))
        })
    }

    /// Number of non-empty cells.
    pub fn wall_count(&self) -> usize {
        self.cells.iter().filter(|c| c.is_wall()).count()
    }

    /// Highest material id used by any wall.
    pub fn max_material(&self) -> Option<u8> {
        self.cells.iter().filter_map(|c| c.material()).max()
    }
}
