//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - One `tick` per frame, driven by an external scheduler
//! - Seeded RNG only
//! - Stable iteration order (collection order)
//! - No rendering or platform dependencies

pub mod bounds;
pub mod collision;
pub mod layout;
pub mod state;
pub mod tick;

#[cfg(test)]
mod property_tests;

pub use bounds::{Boundable, Bounds};
pub use collision::{Axis, BrickHit};
pub use layout::{EntitySizes, GridSize, LayoutSource, PixelCell, PixelGrid, UploadOutcome, UploadTicket};
pub use state::{
    Ball, Brick, BrickKind, GamePhase, GameState, GridChange, Item, ItemKind, Paddle, Particle,
    ParticleKind, Sizing,
};
pub use tick::{Command, TickEvents, TickInput, tick};
