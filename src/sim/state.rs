//! Game state and core simulation types
//!
//! The loop owns every entity collection exclusively; entities leave the game
//! by being dropped from their `Vec`.

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::Serialize;

use super::bounds::{Boundable, Bounds};
use super::layout::{
    self, EntitySizes, GridSize, Layout, LayoutSource, PixelGrid, UploadOutcome, UploadTicket,
};
use crate::color::Rgb;
use crate::consts::*;
use crate::error::Result;
use crate::settings::Settings;
use crate::{from_heading, heading};

/// Current phase of gameplay
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub enum GamePhase {
    /// Waiting for the first start command
    #[default]
    Stopped,
    /// Active gameplay
    Playing,
    /// Game is paused
    Paused,
    /// Every ball was lost
    GameOver,
    /// Every destructible brick was cleared
    GameWin,
}

impl GamePhase {
    /// Terminal until an explicit reset
    pub fn is_finished(self) -> bool {
        matches!(self, GamePhase::GameOver | GamePhase::GameWin)
    }
}

/// A ball, stored by its center
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Ball {
    pub pos: Vec2,
    pub vel: Vec2,
    pub radius: f32,
    /// Velocity magnitude
    pub speed: f32,
}

impl Ball {
    /// New ball heading up and to the right at 45°
    pub fn new(center: Vec2, radius: f32, speed: f32) -> Self {
        let mut ball = Self {
            pos: center,
            vel: Vec2::ZERO,
            radius,
            speed,
        };
        ball.launch(true);
        ball
    }

    /// Point the ball up at 45°, left or right
    pub fn launch(&mut self, rightward: bool) {
        let dir = Vec2::new(if rightward { 1.0 } else { -1.0 }, -1.0).normalize();
        self.vel = dir * self.speed;
    }

    /// Integrate one tick
    #[inline]
    pub fn advance(&mut self) {
        self.pos += self.vel;
    }

    #[inline]
    pub fn heading(&self) -> f32 {
        heading(self.vel)
    }

    /// Change speed, keeping the direction of travel
    pub fn set_speed(&mut self, speed: f32) {
        self.speed = speed;
        self.vel = match self.vel.try_normalize() {
            Some(dir) => dir * speed,
            None => Vec2::new(0.0, -speed),
        };
    }

    /// Same center, radius and speed with a new heading
    pub fn clone_with_heading(&self, angle: f32) -> Self {
        Self {
            vel: from_heading(angle, self.speed),
            ..self.clone()
        }
    }

    /// Fully below the bottom edge's inner line
    #[inline]
    pub fn is_out_of_bounds(&self, canvas_height: f32) -> bool {
        self.pos.y + self.radius > canvas_height
    }
}

impl Boundable for Ball {
    fn bounds(&self) -> Bounds {
        Bounds::from_circle(self.pos, self.radius)
    }
}

/// The player's paddle; `pos` is the top-left corner
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Paddle {
    pub pos: Vec2,
    pub size: Vec2,
    /// Keyboard/autopilot step per tick
    pub speed: f32,
}

impl Paddle {
    /// Horizontally centered, `bottom_offset` above the canvas bottom
    pub fn new(size: Vec2, canvas: Vec2, bottom_offset: f32, speed: f32) -> Self {
        Self {
            pos: Vec2::new((canvas.x - size.x) / 2.0, canvas.y - bottom_offset),
            size,
            speed,
        }
    }

    #[inline]
    pub fn center_x(&self) -> f32 {
        self.pos.x + self.size.x / 2.0
    }

    #[inline]
    pub fn top(&self) -> f32 {
        self.pos.y
    }

    /// Center the paddle on `x`, keeping it inside the canvas
    pub fn move_to(&mut self, x: f32, canvas_width: f32) {
        let max_x = (canvas_width - self.size.x).max(0.0);
        self.pos.x = (x - self.size.x / 2.0).clamp(0.0, max_x);
    }

    /// Resize around the current center
    pub fn resize(&mut self, size: Vec2, canvas_width: f32) {
        let center = self.center_x();
        self.size = size;
        self.move_to(center, canvas_width);
    }
}

impl Boundable for Paddle {
    fn bounds(&self) -> Bounds {
        Bounds::from_rect(self.pos, self.size)
    }
}

/// Where a brick came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum BrickKind {
    /// Default pattern palette id
    Pattern(u8),
    /// Frame around an uploaded image
    Border,
    /// Interior pixel of an uploaded image
    User,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Brick {
    pub pos: Vec2,
    pub size: Vec2,
    pub color: Rgb,
    pub kind: BrickKind,
    pub indestructible: bool,
    pub active: bool,
    /// Pixel color the brick was built from (uploaded layouts)
    pub source_color: Option<Rgb>,
}

impl Brick {
    pub fn new(pos: Vec2, size: Vec2, color: Rgb, kind: BrickKind, indestructible: bool) -> Self {
        Self {
            pos,
            size,
            color,
            kind,
            indestructible,
            active: true,
            source_color: None,
        }
    }

    pub fn with_source_color(mut self, color: Rgb) -> Self {
        self.source_color = Some(color);
        self
    }

    /// Deactivate the brick. Returns true only on the transition from
    /// active to inactive; indestructible bricks never change.
    pub fn destroy(&mut self) -> bool {
        if self.indestructible || !self.active {
            return false;
        }
        self.active = false;
        true
    }

    #[inline]
    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Part of the set that must be cleared to win
    #[inline]
    pub fn counts_for_win(&self) -> bool {
        !self.indestructible && self.kind != BrickKind::Border
    }

    #[inline]
    pub fn center(&self) -> Vec2 {
        self.pos + self.size / 2.0
    }
}

impl Boundable for Brick {
    fn bounds(&self) -> Bounds {
        Bounds::from_rect(self.pos, self.size)
    }
}

/// Power-up effect
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ItemKind {
    /// Every ball splits into three
    Multiplier,
}

/// A falling pickup, stored by its center
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Item {
    pub pos: Vec2,
    pub radius: f32,
    pub kind: ItemKind,
    pub color: Rgb,
    pub fall_speed: f32,
    /// Pulse intensity in 0..=1
    pub glow: f32,
    pub active: bool,
}

impl Item {
    pub fn new(center: Vec2, kind: ItemKind) -> Self {
        Self {
            pos: center,
            radius: ITEM_RADIUS,
            kind,
            color: Rgb::PICKUP,
            fall_speed: ITEM_FALL_SPEED,
            glow: 0.0,
            active: true,
        }
    }

    /// Fall one tick and update the pulse from the tick counter
    pub fn advance(&mut self, time_ticks: u64) {
        self.pos.y += self.fall_speed;
        let ms = time_ticks as f32 * FRAME_MS;
        self.glow = ((ms * 0.01).sin() + 1.0) * 0.5;
    }

    #[inline]
    pub fn is_out_of_bounds(&self, canvas_height: f32) -> bool {
        self.pos.y > canvas_height + self.radius
    }
}

impl Boundable for Item {
    fn bounds(&self) -> Bounds {
        Bounds::from_circle(self.pos, self.radius)
    }
}

/// Visual flavour of a particle burst
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ParticleKind {
    /// Destroyed brick, brick colored
    Debris,
    /// Hit on an indestructible brick
    Spark,
    /// Pickup collected
    Collect,
}

impl ParticleKind {
    /// Spread (full width, px/tick) and lifetime (ticks)
    pub fn profile(self) -> (f32, u32) {
        match self {
            ParticleKind::Debris => (BRICK_PARTICLE_SPREAD, BRICK_PARTICLE_LIFE),
            ParticleKind::Spark => (SPARK_PARTICLE_SPREAD, SPARK_PARTICLE_LIFE),
            ParticleKind::Collect => (COLLECT_PARTICLE_SPREAD, COLLECT_PARTICLE_LIFE),
        }
    }
}

/// Cosmetic particle
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Particle {
    pub pos: Vec2,
    pub vel: Vec2,
    pub life: u32,
    pub max_life: u32,
    pub color: Rgb,
    pub kind: ParticleKind,
}

impl Particle {
    pub fn new(pos: Vec2, vel: Vec2, life: u32, color: Rgb, kind: ParticleKind) -> Self {
        Self {
            pos,
            vel,
            life,
            max_life: life,
            color,
            kind,
        }
    }

    pub fn update(&mut self) {
        self.pos += self.vel;
        self.life = self.life.saturating_sub(1);
    }

    #[inline]
    pub fn is_alive(&self) -> bool {
        self.life > 0
    }

    /// Fades linearly over the particle's life
    pub fn alpha(&self) -> f32 {
        if self.max_life == 0 {
            return 0.0;
        }
        self.life as f32 / self.max_life as f32
    }
}

/// How entity sizes follow layout rebuilds
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub enum Sizing {
    /// Rescale from the built layout's brick edge
    FromLayout,
    /// Rescale from a fixed brick edge (grid preset)
    Preset(f32),
    /// Configured default sizes
    Defaults,
}

/// Result of changing the grid size
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GridChange {
    /// Default pattern rebuilt and entities rescaled
    Rescaled { brick_size: f32 },
    /// An image is loaded; the caller must re-run the pixelizer for this ticket
    ReuploadRequired(UploadTicket),
}

/// Complete game state
#[derive(Debug, Clone, Serialize)]
pub struct GameState {
    pub settings: Settings,
    pub canvas: Vec2,
    pub phase: GamePhase,
    pub paddle: Paddle,
    pub balls: Vec<Ball>,
    pub bricks: Vec<Brick>,
    pub items: Vec<Item>,
    pub particles: Vec<Particle>,
    pub layout: LayoutSource,
    pub grid_size: GridSize,
    pub sizing: Sizing,
    /// Current entity sizes after the latest rescale
    pub sizes: EntitySizes,
    /// Brick edge of the current layout
    pub brick_size: f32,
    /// Ticks simulated while playing
    pub time_ticks: u64,
    upload_generation: u64,
    #[serde(skip)]
    rng: Pcg32,
}

impl GameState {
    /// Build the default layout and serve a ball; the game waits in `Stopped`
    pub fn new(settings: Settings) -> Result<Self> {
        settings.validate()?;
        let canvas = Vec2::new(settings.canvas_width, settings.canvas_height);
        let sizes = EntitySizes::defaults(&settings);
        let paddle = Paddle::new(
            Vec2::new(sizes.paddle_width, sizes.paddle_height),
            canvas,
            settings.paddle_bottom_offset,
            settings.paddle_speed,
        );

        let mut state = Self {
            canvas,
            phase: GamePhase::Stopped,
            paddle,
            balls: Vec::new(),
            bricks: Vec::new(),
            items: Vec::new(),
            particles: Vec::new(),
            layout: LayoutSource::DefaultPattern,
            grid_size: settings.grid_size,
            sizing: Sizing::FromLayout,
            sizes,
            brick_size: PATTERN_BRICK_WIDTH,
            time_ticks: 0,
            upload_generation: 0,
            rng: Pcg32::seed_from_u64(settings.seed),
            settings,
        };
        state.rebuild_layout();
        state.reset_ball();
        Ok(state)
    }

    pub(crate) fn rng(&mut self) -> &mut Pcg32 {
        &mut self.rng
    }

    /// Rebuild the bricks from the current layout source and rescale entities
    pub fn rebuild_layout(&mut self) -> usize {
        let Layout { bricks, brick_size } = match &self.layout {
            LayoutSource::DefaultPattern => layout::default_pattern(self.canvas),
            LayoutSource::ImagePattern(grid) => {
                let gap = self.settings.bottom_gap.unwrap_or_else(|| grid.bottom_gap());
                layout::from_pixels(grid, self.canvas, gap)
            }
        };
        self.bricks = bricks;
        self.brick_size = brick_size;

        let sizes = match self.sizing {
            Sizing::FromLayout => EntitySizes::for_brick_size(brick_size, &self.settings),
            Sizing::Preset(edge) => EntitySizes::for_brick_size(edge, &self.settings),
            Sizing::Defaults => EntitySizes::defaults(&self.settings),
        };
        self.apply_sizes(sizes);

        log::info!(
            "Layout rebuilt: {} bricks ({} to clear), brick size {:.1}",
            self.bricks.len(),
            self.remaining_bricks(),
            brick_size
        );
        self.bricks.len()
    }

    /// Apply new entity sizes to the paddle and every ball in flight
    pub fn apply_sizes(&mut self, sizes: EntitySizes) {
        self.sizes = sizes;
        self.paddle
            .resize(Vec2::new(sizes.paddle_width, sizes.paddle_height), self.canvas.x);
        self.paddle.pos.y = self.canvas.y - self.settings.paddle_bottom_offset;
        for ball in &mut self.balls {
            ball.radius = sizes.ball_radius;
            ball.set_speed(sizes.ball_speed);
        }
        log::info!(
            "Entities rescaled: ball r={:.1} speed={:.2}, paddle {:.0}x{:.0}",
            sizes.ball_radius,
            sizes.ball_speed,
            sizes.paddle_width,
            sizes.paddle_height
        );
    }

    /// Replace all balls with one fresh ball above the paddle
    pub fn reset_ball(&mut self) {
        let center = Vec2::new(self.canvas.x / 2.0, self.canvas.y - BALL_SERVE_OFFSET);
        let rightward = self.rng.random_bool(0.5);
        let mut ball = Ball::new(center, self.sizes.ball_radius, self.sizes.ball_speed);
        ball.launch(rightward);
        self.balls = vec![ball];
    }

    /// Change the grid dimension used for layouts
    pub fn set_grid_size(&mut self, grid_size: GridSize) -> GridChange {
        self.grid_size = grid_size;
        if matches!(self.layout, LayoutSource::ImagePattern(_)) {
            // Previous layout stays in play until the new grid arrives
            return GridChange::ReuploadRequired(self.begin_upload(grid_size));
        }

        let brick_size = grid_size.preset_brick_size();
        self.sizing = Sizing::Preset(brick_size);
        self.rebuild_layout();
        self.reset_ball();
        log::info!(
            "Grid size {0}x{0} without image: preset brick size {1}",
            grid_size.cells(),
            brick_size
        );
        GridChange::Rescaled { brick_size }
    }

    /// Drop any uploaded image and go back to the default pattern at default sizes
    pub fn reset_to_default_pattern(&mut self) {
        // Responses to in-flight uploads are now stale
        self.upload_generation += 1;
        self.layout = LayoutSource::DefaultPattern;
        self.sizing = Sizing::Defaults;
        self.rebuild_layout();
    }

    /// Register an outgoing image-to-grid request
    pub fn begin_upload(&mut self, grid_size: GridSize) -> UploadTicket {
        self.upload_generation += 1;
        log::debug!(
            "Upload #{} requested at {1}x{1}",
            self.upload_generation,
            grid_size.cells()
        );
        UploadTicket {
            generation: self.upload_generation,
            grid_size,
        }
    }

    /// Apply the collaborator's answer to an upload
    ///
    /// Only the newest ticket is honoured; older responses are dropped. A
    /// failed or malformed response leaves the current layout untouched and
    /// is returned to the caller.
    pub fn complete_upload(
        &mut self,
        ticket: UploadTicket,
        response: Result<PixelGrid>,
    ) -> Result<UploadOutcome> {
        if ticket.generation != self.upload_generation {
            log::debug!(
                "Ignoring stale upload #{} (latest #{})",
                ticket.generation,
                self.upload_generation
            );
            return Ok(UploadOutcome::Stale);
        }

        let grid = response
            .and_then(|grid| grid.validate(ticket.grid_size).map(|_| grid))
            .inspect_err(|e| log::warn!("Upload #{} rejected, keeping layout: {}", ticket.generation, e))?;

        self.grid_size = ticket.grid_size;
        self.layout = LayoutSource::ImagePattern(grid);
        self.sizing = Sizing::FromLayout;
        let bricks = self.rebuild_layout();
        Ok(UploadOutcome::Applied { bricks })
    }

    /// Begin and complete an upload in one step (synchronous collaborators)
    pub fn load_pixel_grid(&mut self, grid_size: GridSize, grid: PixelGrid) -> Result<usize> {
        let ticket = self.begin_upload(grid_size);
        match self.complete_upload(ticket, Ok(grid))? {
            UploadOutcome::Applied { bricks } => Ok(bricks),
            UploadOutcome::Stale => Ok(0),
        }
    }

    /// Active bricks that still have to be cleared
    pub fn remaining_bricks(&self) -> usize {
        self.bricks
            .iter()
            .filter(|b| b.counts_for_win() && b.is_active())
            .count()
    }

    /// True when no destructible brick is left (vacuously for an empty set)
    pub fn is_cleared(&self) -> bool {
        self.remaining_bricks() == 0
    }

    /// Bottom edge of the lowest active brick
    pub fn lowest_brick_y(&self) -> Option<f32> {
        self.bricks
            .iter()
            .filter(|b| b.is_active())
            .map(|b| b.pos.y + b.size.y)
            .max_by(f32::total_cmp)
    }
}
