//! Tile pyramid coordinate types

use std::fmt;

/// Edge length in pixels of every tile served by the pyramid.
pub const TILE_SIZE: u32 = 512;

/// Deepest pyramid level whose scale factor still fits in a `u32`.
const MAX_LEVEL_SPAN: u8 = 31;

/// One side of the panorama cube.
///
/// The declaration order is the processing order: the first face that
/// assembles successfully sets the reference face size for projection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Face {
    /// Front
    Front,
    /// Back
    Back,
    /// Left
    Left,
    /// Right
    Right,
    /// Up (zenith)
    Up,
    /// Down (nadir)
    Down,
}

impl Face {
    /// All faces in processing order (f, b, l, r, u, d).
    pub const ALL: [Face; 6] = [
        Face::Front,
        Face::Back,
        Face::Left,
        Face::Right,
        Face::Up,
        Face::Down,
    ];

    /// The one-letter token used in tile URLs and cache paths.
    #[inline]
    pub fn token(&self) -> &'static str {
        match self {
            Face::Front => "f",
            Face::Back => "b",
            Face::Left => "l",
            Face::Right => "r",
            Face::Up => "u",
            Face::Down => "d",
        }
    }

    /// Parses a one-letter face token.
    pub fn from_token(token: &str) -> Result<Self, CoordError> {
        match token {
            "f" => Ok(Face::Front),
            "b" => Ok(Face::Back),
            "l" => Ok(Face::Left),
            "r" => Ok(Face::Right),
            "u" => Ok(Face::Up),
            "d" => Ok(Face::Down),
            other => Err(CoordError::InvalidFace(other.to_string())),
        }
    }

    /// Position of this face in [`Face::ALL`].
    #[inline]
    pub fn index(&self) -> usize {
        *self as usize
    }
}

impl fmt::Display for Face {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.token())
    }
}

/// Address of a single tile within one panorama's pyramid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TileCoord {
    /// Cube face the tile belongs to
    pub face: Face,
    /// Pyramid level, 0 being the coarsest
    pub level: u8,
    /// Column index within the level
    pub x: u32,
    /// Row index within the level
    pub y: u32,
}

impl TileCoord {
    /// Creates a tile coordinate.
    #[inline]
    pub fn new(face: Face, level: u8, x: u32, y: u32) -> Self {
        Self { face, level, x, y }
    }

    /// Returns the tile at `level` that covers this tile.
    ///
    /// `level` must not be finer than `self.level`; when it is, the
    /// coordinate is returned unchanged.
    #[inline]
    pub fn ancestor(&self, level: u8) -> TileCoord {
        let span = self.level.saturating_sub(level).min(MAX_LEVEL_SPAN);
        TileCoord {
            face: self.face,
            level: self.level.min(level),
            x: self.x >> span,
            y: self.y >> span,
        }
    }

    /// Returns the pixel square inside the ancestor tile at `level` that
    /// this tile occupies once the ancestor is shown at `TILE_SIZE`.
    pub fn region_in_ancestor(&self, level: u8) -> AncestorRegion {
        let scale = scale_between(self.level, level);
        let size = (TILE_SIZE / scale).max(1);
        AncestorRegion {
            ancestor: self.ancestor(level),
            scale,
            x: (self.x % scale) * size,
            y: (self.y % scale) * size,
            size,
        }
    }
}

impl fmt::Display for TileCoord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}/{}_{}", self.face, self.level, self.x, self.y)
    }
}

/// Scale factor between a fine level and a coarser one (`2^(fine - coarse)`).
#[inline]
pub fn scale_between(fine: u8, coarse: u8) -> u32 {
    1u32 << fine.saturating_sub(coarse).min(MAX_LEVEL_SPAN)
}

/// Crop window inside an ancestor tile.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AncestorRegion {
    /// The coarser tile holding the pixels
    pub ancestor: TileCoord,
    /// Ratio between the two levels
    pub scale: u32,
    /// Left edge of the crop, in ancestor pixels
    pub x: u32,
    /// Top edge of the crop, in ancestor pixels
    pub y: u32,
    /// Edge length of the square crop
    pub size: u32,
}

/// Highest column and row index found for one face at one level.
///
/// `-1` on either axis means no tile was found. The grid is assumed to be
/// rectangular: every cell in `0..=max_x` × `0..=max_y` is treated as present.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GridExtent {
    /// Highest column index, or -1
    pub max_x: i32,
    /// Highest row index, or -1
    pub max_y: i32,
}

impl GridExtent {
    /// An extent with no tiles.
    pub const EMPTY: GridExtent = GridExtent {
        max_x: -1,
        max_y: -1,
    };

    /// Creates an extent from the highest indices found.
    #[inline]
    pub fn new(max_x: i32, max_y: i32) -> Self {
        Self { max_x, max_y }
    }

    /// True when either axis has no tiles.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.max_x < 0 || self.max_y < 0
    }

    /// Number of columns (0 when empty).
    #[inline]
    pub fn columns(&self) -> u32 {
        if self.is_empty() {
            0
        } else {
            self.max_x as u32 + 1
        }
    }

    /// Number of rows (0 when empty).
    #[inline]
    pub fn rows(&self) -> u32 {
        if self.is_empty() {
            0
        } else {
            self.max_y as u32 + 1
        }
    }

    /// Pixel dimensions `(width, height)` of the composite face.
    #[inline]
    pub fn pixel_size(&self) -> (u32, u32) {
        (self.columns() * TILE_SIZE, self.rows() * TILE_SIZE)
    }

    /// Iterates every `(x, y)` cell of the grid, column by column.
    pub fn cells(&self) -> impl Iterator<Item = (u32, u32)> {
        let rows = self.rows();
        (0..self.columns()).flat_map(move |x| (0..rows).map(move |y| (x, y)))
    }
}

impl fmt::Display for GridExtent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.columns(), self.rows())
    }
}

/// Errors from parsing coordinate components.
#[derive(Debug, Clone, PartialEq)]
pub enum CoordError {
    /// Face token is not one of f, b, l, r, u, d
    InvalidFace(String),
}

impl fmt::Display for CoordError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CoordError::InvalidFace(token) => {
                write!(
                    f,
                    "Invalid face: '{}' (must be one of f, b, l, r, u, d)",
                    token
                )
            }
        }
    }
}

impl std::error::Error for CoordError {}
