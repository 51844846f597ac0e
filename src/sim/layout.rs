//! Brick layout construction
//!
//! Two build modes:
//! - `DefaultPattern`: the built-in pixel-art cat with a fixed palette
//! - `ImagePattern`: a square grid of optional colors produced by the
//!   image pixelizer, framed by an indestructible border with a gap at the
//!   bottom so the ball can always leave the enclosure
//!
//! After every rebuild the entities are rescaled from the brick size
//! (`EntitySizes::for_brick_size`).

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::state::{Brick, BrickKind};
use crate::color::Rgb;
use crate::consts::*;
use crate::error::{GameError, Result};
use crate::settings::Settings;

/// Supported grid dimensions for uploaded images
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "u32", into = "u32")]
pub struct GridSize(u32);

impl GridSize {
    pub const ALL: [GridSize; 4] = [GridSize(8), GridSize(16), GridSize(32), GridSize(64)];

    pub fn new(cells: u32) -> Result<Self> {
        match cells {
            8 | 16 | 32 | 64 => Ok(Self(cells)),
            other => Err(GameError::UnsupportedGridSize(other)),
        }
    }

    /// Cells per side
    #[inline]
    pub fn cells(self) -> usize {
        self.0 as usize
    }

    /// Default width of the bottom border gap
    pub fn bottom_gap(self) -> usize {
        match self.0 {
            64 => 4,
            32 => 2,
            _ => 1,
        }
    }

    /// Brick edge used to rescale entities when no image is loaded
    pub fn preset_brick_size(self) -> f32 {
        match self.0 {
            8 => 35.0,
            32 => 12.0,
            64 => 8.0,
            _ => PATTERN_BRICK_WIDTH,
        }
    }
}

impl Default for GridSize {
    fn default() -> Self {
        Self(16)
    }
}

impl TryFrom<u32> for GridSize {
    type Error = GameError;

    fn try_from(value: u32) -> Result<Self> {
        Self::new(value)
    }
}

impl std::str::FromStr for GridSize {
    type Err = GameError;

    fn from_str(s: &str) -> Result<Self> {
        let cells = s
            .trim()
            .parse::<u32>()
            .map_err(|e| GameError::InvalidSettings(format!("grid size {s:?}: {e}")))?;
        Self::new(cells)
    }
}

impl From<GridSize> for u32 {
    fn from(size: GridSize) -> Self {
        size.0
    }
}

fn opaque() -> u8 {
    255
}

/// One non-transparent pixel of an uploaded image
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PixelCell {
    pub color: Rgb,
    #[serde(default)]
    pub r: u8,
    #[serde(default)]
    pub g: u8,
    #[serde(default)]
    pub b: u8,
    #[serde(default = "opaque")]
    pub a: u8,
}

impl PixelCell {
    pub fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self {
            color: Rgb::new(r, g, b),
            r,
            g,
            b,
            a,
        }
    }
}

/// Square grid of optional cells, row-major (`rows[row][col]`)
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PixelGrid {
    pub rows: Vec<Vec<Option<PixelCell>>>,
}

impl PixelGrid {
    pub fn new(rows: Vec<Vec<Option<PixelCell>>>) -> Self {
        Self { rows }
    }

    /// An n x n grid with no cells set
    pub fn empty(n: usize) -> Self {
        Self::new(vec![vec![None; n]; n])
    }

    /// Cells per side (row count)
    #[inline]
    pub fn size(&self) -> usize {
        self.rows.len()
    }

    pub fn cell(&self, row: usize, col: usize) -> Option<&PixelCell> {
        self.rows.get(row).and_then(|r| r.get(col)).and_then(Option::as_ref)
    }

    /// Bottom-gap width for this grid's own dimension
    pub fn bottom_gap(&self) -> usize {
        u32::try_from(self.size())
            .ok()
            .and_then(|n| GridSize::new(n).ok())
            .map_or(1, GridSize::bottom_gap)
    }

    pub fn filled_cells(&self) -> usize {
        self.rows.iter().flatten().filter(|c| c.is_some()).count()
    }

    /// Check the grid is square and matches the requested dimension
    pub fn validate(&self, expected: GridSize) -> Result<()> {
        let n = self.size();
        if n == 0 {
            return Err(GameError::MalformedGrid("grid has no rows".into()));
        }
        if let Some((i, row)) = self.rows.iter().enumerate().find(|(_, r)| r.len() != n) {
            return Err(GameError::MalformedGrid(format!(
                "row {} has {} cells, expected {}",
                i,
                row.len(),
                n
            )));
        }
        if n != expected.cells() {
            return Err(GameError::MalformedGrid(format!(
                "grid is {n}x{n}, requested {0}x{0}",
                expected.cells()
            )));
        }
        Ok(())
    }
}

/// Where the current brick layout comes from
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub enum LayoutSource {
    #[default]
    DefaultPattern,
    ImagePattern(PixelGrid),
}

/// Handle for an outstanding image upload
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct UploadTicket {
    pub generation: u64,
    pub grid_size: GridSize,
}

/// What happened to a completed upload
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum UploadOutcome {
    /// The grid replaced the layout
    Applied { bricks: usize },
    /// A newer request superseded this one; the response was dropped
    Stale,
}

/// A freshly built set of bricks
#[derive(Debug, Clone)]
pub struct Layout {
    pub bricks: Vec<Brick>,
    /// Brick edge the entities get rescaled against
    pub brick_size: f32,
}

/// Ball, paddle and speed derived from the brick size
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EntitySizes {
    pub ball_radius: f32,
    pub ball_speed: f32,
    pub paddle_width: f32,
    pub paddle_height: f32,
}

impl EntitySizes {
    /// Configured sizes, before any rescale
    pub fn defaults(settings: &Settings) -> Self {
        Self {
            ball_radius: settings.ball_radius,
            ball_speed: settings.ball_speed,
            paddle_width: settings.paddle_width,
            paddle_height: settings.paddle_height,
        }
    }

    /// Scale ball and paddle with the brick size, keeping the perceived speed
    /// constant: bigger balls move proportionally faster (exponent 0.8).
    pub fn for_brick_size(brick_size: f32, settings: &Settings) -> Self {
        if !brick_size.is_finite() {
            log::warn!("Invalid brick size {brick_size}, restoring default sizes");
            return Self::defaults(settings);
        }

        let ball_radius = (brick_size * BALL_RADIUS_PER_BRICK).clamp(MIN_BALL_RADIUS, MAX_BALL_RADIUS);
        let paddle_width =
            (ball_radius * PADDLE_WIDTH_PER_RADIUS).clamp(MIN_PADDLE_WIDTH, MAX_PADDLE_WIDTH);
        let paddle_height =
            (ball_radius * PADDLE_HEIGHT_PER_RADIUS).clamp(MIN_PADDLE_HEIGHT, MAX_PADDLE_HEIGHT);

        let radius_ratio = ball_radius / settings.ball_radius;
        let factor = radius_ratio.powf(SPEED_EXPONENT);
        if !factor.is_finite() {
            log::warn!("Degenerate speed factor for radius ratio {radius_ratio}, restoring default sizes");
            return Self::defaults(settings);
        }
        let ball_speed = settings.ball_speed * factor.clamp(MIN_SPEED_FACTOR, MAX_SPEED_FACTOR);

        Self {
            ball_radius,
            ball_speed,
            paddle_width,
            paddle_height,
        }
    }
}

/// Pixel-art cat: 0 = empty, other values index `pattern_color`
const CAT_PATTERN: [[u8; 22]; 18] = [
    [0, 0, 0, 0, 0, 0, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 0, 0, 0, 0, 0, 0],
    [0, 0, 0, 0, 1, 1, 2, 2, 2, 2, 2, 2, 2, 2, 2, 2, 1, 1, 0, 0, 0, 0],
    [0, 0, 0, 1, 2, 2, 2, 3, 2, 3, 2, 2, 2, 3, 2, 3, 2, 2, 1, 0, 0, 0],
    [0, 0, 1, 2, 2, 2, 2, 2, 2, 2, 2, 2, 2, 2, 2, 2, 2, 2, 2, 1, 0, 0],
    [0, 1, 2, 2, 2, 3, 2, 2, 3, 2, 2, 2, 3, 2, 2, 3, 2, 2, 2, 2, 1, 0],
    [1, 4, 4, 4, 4, 4, 4, 4, 2, 2, 2, 2, 2, 4, 4, 4, 4, 4, 4, 4, 4, 1],
    [1, 4, 5, 5, 4, 6, 6, 4, 2, 7, 2, 2, 7, 4, 5, 5, 4, 6, 6, 4, 4, 1],
    [1, 4, 5, 5, 4, 6, 6, 4, 2, 2, 8, 8, 2, 4, 5, 5, 4, 6, 6, 4, 4, 1],
    [1, 4, 4, 4, 4, 4, 4, 4, 2, 2, 2, 2, 2, 4, 4, 4, 4, 4, 4, 4, 4, 1],
    [0, 1, 4, 4, 4, 4, 4, 4, 2, 2, 2, 2, 2, 4, 4, 4, 4, 4, 4, 4, 1, 0],
    [0, 0, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 0, 0],
    [0, 0, 0, 0, 1, 9, 9, 9, 9, 9, 9, 9, 9, 9, 9, 9, 9, 9, 1, 0, 0, 0],
    [0, 0, 0, 0, 1, 10, 10, 10, 10, 10, 10, 10, 10, 10, 10, 10, 10, 10, 1, 0, 0, 0],
    [0, 0, 0, 0, 1, 11, 11, 11, 11, 11, 11, 11, 11, 11, 11, 11, 11, 11, 1, 0, 0, 0],
    [0, 0, 0, 0, 1, 12, 12, 12, 12, 12, 12, 12, 12, 12, 12, 12, 12, 12, 1, 0, 0, 0],
    [0, 0, 0, 0, 1, 13, 13, 13, 13, 13, 13, 13, 13, 13, 13, 13, 13, 13, 1, 0, 0, 0],
    [0, 0, 0, 0, 1, 14, 14, 14, 14, 14, 14, 14, 14, 14, 14, 14, 14, 14, 1, 0, 0, 0],
    [0, 0, 0, 0, 0, 1, 1, 1, 1, 0, 0, 0, 1, 1, 1, 1, 1, 1, 1, 0, 0, 0],
];

/// Palette id of the outline; the only indestructible pattern brick
pub const OUTLINE_ID: u8 = 1;

/// Palette of the default pattern
pub fn pattern_color(id: u8) -> Rgb {
    match id {
        1 => Rgb::new(0x00, 0x00, 0x00), // outline
        2 => Rgb::new(0xff, 0xb6, 0xc1), // pastry
        3 => Rgb::new(0xff, 0x69, 0xb4), // sprinkles
        4 => Rgb::new(0x80, 0x80, 0x80), // fur
        5 => Rgb::new(0xff, 0xff, 0xff), // eye white
        6 => Rgb::new(0x00, 0x00, 0x00), // pupil
        7 => Rgb::new(0xff, 0x14, 0x93), // cheek
        8 => Rgb::new(0x8b, 0x45, 0x13), // mouth
        9 => Rgb::new(0xff, 0x00, 0x00),
        10 => Rgb::new(0xff, 0x8c, 0x00),
        11 => Rgb::new(0xff, 0xd7, 0x00),
        12 => Rgb::new(0x32, 0xcd, 0x32),
        13 => Rgb::new(0x00, 0xbf, 0xff),
        14 => Rgb::new(0x8a, 0x2b, 0xe2),
        _ => Rgb::WHITE,
    }
}

/// Build the default pixel-art layout, centered horizontally
pub fn default_pattern(canvas: Vec2) -> Layout {
    let step = Vec2::new(
        PATTERN_BRICK_WIDTH + PATTERN_BRICK_PADDING,
        PATTERN_BRICK_HEIGHT + PATTERN_BRICK_PADDING,
    );
    let size = Vec2::new(PATTERN_BRICK_WIDTH, PATTERN_BRICK_HEIGHT);
    let start = Vec2::new((canvas.x - CAT_PATTERN[0].len() as f32 * step.x) / 2.0, LAYOUT_TOP);

    let mut bricks = Vec::new();
    for (row, line) in CAT_PATTERN.iter().enumerate() {
        for (col, &id) in line.iter().enumerate() {
            if id == 0 {
                continue;
            }
            let pos = start + Vec2::new(col as f32, row as f32) * step;
            bricks.push(Brick::new(
                pos,
                size,
                pattern_color(id),
                BrickKind::Pattern(id),
                id == OUTLINE_ID,
            ));
        }
    }

    Layout {
        bricks,
        brick_size: PATTERN_BRICK_WIDTH,
    }
}

/// Columns of the bottom row left open, centered
pub fn bottom_gap_columns(n: usize, gap: usize) -> std::ops::Range<usize> {
    if gap == 0 || n == 0 {
        return 0..0;
    }
    let center = n / 2;
    let start = center.saturating_sub(gap / 2);
    let end = (start + gap).min(n);
    start..end
}

/// Build a layout from an uploaded pixel grid
///
/// The outer ring becomes indestructible border bricks (only where the
/// image has a pixel), except `gap` cells centered on the bottom row.
/// Interior pixels become destructible bricks in their own color.
pub fn from_pixels(grid: &PixelGrid, canvas: Vec2, gap: usize) -> Layout {
    let n = grid.size();
    if n == 0 {
        return Layout {
            bricks: Vec::new(),
            brick_size: PATTERN_BRICK_WIDTH,
        };
    }

    let cell = (canvas.x * LAYOUT_WIDTH_FRACTION / n as f32)
        .min(canvas.y * LAYOUT_HEIGHT_FRACTION / n as f32);
    let start = Vec2::new((canvas.x - n as f32 * cell) / 2.0, LAYOUT_TOP);
    let brick_extent = Vec2::splat((cell - BRICK_GAP).max(0.0));
    let gap_cols = bottom_gap_columns(n, gap);
    let cell_pos = |row: usize, col: usize| start + Vec2::new(col as f32, row as f32) * cell;

    let mut bricks = Vec::with_capacity(grid.filled_cells());

    // Border first so it draws underneath
    for row in 0..n {
        // Interior rows only touch the ring at their first and last column
        let step = if row == 0 || row == n - 1 { 1 } else { n - 1 };
        for col in (0..n).step_by(step) {
            if row == n - 1 && gap_cols.contains(&col) {
                continue;
            }
            if let Some(px) = grid.cell(row, col) {
                bricks.push(
                    Brick::new(cell_pos(row, col), brick_extent, Rgb::BORDER, BrickKind::Border, true)
                        .with_source_color(px.color),
                );
            }
        }
    }

    for row in 1..n.saturating_sub(1) {
        for col in 1..n.saturating_sub(1) {
            if let Some(px) = grid.cell(row, col) {
                bricks.push(
                    Brick::new(cell_pos(row, col), brick_extent, px.color, BrickKind::User, false)
                        .with_source_color(px.color),
                );
            }
        }
    }

    Layout {
        bricks,
        brick_size: cell,
    }
}
