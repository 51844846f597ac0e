//! Frame tessellation
//!
//! Turns a `GameState` snapshot into a triangle list plus a small HUD record.
//! Draw order: background, paddle, balls, bricks, items, particles.

use glam::Vec2;
use serde::Serialize;

use super::shapes::{self, circle, diagonal_rect, gradient_rect, radial_circle, rect, rect_outline};
use super::vertex::{Vertex, colors};
use crate::color::Rgb;
use crate::sim::{Brick, BrickKind, GamePhase, GameState, Item, Particle, ParticleKind};

/// Text overlay data the surface renders however it likes
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Hud {
    pub balls: usize,
    pub max_balls: usize,
    pub remaining_bricks: usize,
    pub phase: GamePhase,
    pub message: Option<&'static str>,
}

/// One renderable frame
#[derive(Debug, Clone)]
pub struct Frame {
    pub size: Vec2,
    pub vertices: Vec<Vertex>,
    pub hud: Hud,
}

fn phase_message(phase: GamePhase) -> Option<&'static str> {
    match phase {
        GamePhase::Stopped => Some("Click to start"),
        GamePhase::Paused => Some("Paused"),
        GamePhase::GameOver => Some("Game over - click to restart"),
        GamePhase::GameWin => Some("Cleared! Click to play again"),
        GamePhase::Playing => None,
    }
}

pub fn build_frame(state: &GameState) -> Frame {
    let mut vertices = Vec::with_capacity(state.bricks.len() * 30 + state.particles.len() * 12 + 256);

    vertices.extend(rect(Vec2::ZERO, state.canvas, colors::BACKGROUND));

    let paddle = &state.paddle;
    vertices.extend(gradient_rect(paddle.pos, paddle.size, colors::PADDLE_TOP, colors::PADDLE_BOTTOM));

    for ball in &state.balls {
        vertices.extend(radial_circle(
            ball.pos,
            ball.radius,
            colors::BALL_CORE,
            colors::BALL_RIM,
            shapes::segments_for(ball.radius),
        ));
    }

    for (index, brick) in state.bricks.iter().enumerate().filter(|(_, b)| b.is_active()) {
        brick_vertices(&mut vertices, brick, index, state.time_ticks);
    }

    for item in state.items.iter().filter(|i| i.active) {
        item_vertices(&mut vertices, item);
    }

    for particle in &state.particles {
        particle_vertices(&mut vertices, particle);
    }

    Frame {
        size: state.canvas,
        vertices,
        hud: Hud {
            balls: state.balls.len(),
            max_balls: state.settings.max_balls,
            remaining_bricks: state.remaining_bricks(),
            phase: state.phase,
            message: phase_message(state.phase),
        },
    }
}

/// Light strips on the top/left edges, dark strips on the bottom/right
fn bevel(out: &mut Vec<Vertex>, brick: &Brick, thickness: f32, intensity: f32) {
    let (pos, size) = (brick.pos, brick.size);
    let light = brick.color.lighten(intensity).to_rgba(1.0);
    let dark = brick.color.darken(intensity).to_rgba(1.0);

    out.extend(rect(pos, Vec2::new(size.x, thickness), light));
    out.extend(rect(pos, Vec2::new(thickness, size.y), light));
    out.extend(rect(Vec2::new(pos.x, pos.y + size.y - thickness), Vec2::new(size.x, thickness), dark));
    out.extend(rect(Vec2::new(pos.x + size.x - thickness, pos.y), Vec2::new(thickness, size.y), dark));
}

/// Two small squares near opposite corners
fn sparkle(out: &mut Vec<Vertex>, brick: &Brick, edge: f32, color: [f32; 4]) {
    let s = Vec2::splat(edge);
    out.extend(rect(brick.pos + s, s, color));
    out.extend(rect(brick.pos + brick.size - s * 2.0, s, color));
}

fn brick_vertices(out: &mut Vec<Vertex>, brick: &Brick, index: usize, time_ticks: u64) {
    let (pos, size) = (brick.pos, brick.size);

    if brick.indestructible {
        out.extend(diagonal_rect(
            pos,
            size,
            brick.color.lighten(0.4).to_rgba(1.0),
            brick.color.to_rgba(1.0),
            brick.color.darken(0.4).to_rgba(1.0),
        ));
    } else {
        out.extend(rect(pos, size, brick.color.to_rgba(1.0)));
    }

    match brick.kind {
        BrickKind::Border => {
            bevel(out, brick, (size.x * 0.15).floor().max(1.0), 0.6);
            sparkle(out, brick, (size.x * 0.2).floor().max(2.0), colors::BORDER_SPARKLE);
        }
        BrickKind::User => {
            let intensity = if brick.indestructible { 0.5 } else { 0.3 };
            bevel(out, brick, (size.x * 0.1).floor().max(1.0), intensity);
            if brick.indestructible {
                sparkle(out, brick, (size.x * 0.15).floor().max(2.0), colors::GOLD_SPARKLE);
            }
        }
        BrickKind::Pattern(id) => {
            // Black outline and pupils stay flat
            if id != 1 && id != 6 {
                bevel(out, brick, 2.0, 0.2);
            }
            match id {
                5 => out.extend(rect(pos + Vec2::new(size.x - 6.0, 2.0), Vec2::splat(3.0), colors::EYE_SHINE)),
                7 => out.extend(rect(pos + Vec2::splat(2.0), Vec2::splat(4.0), colors::CHEEK_SHINE)),
                3 => out.extend(rect(pos + Vec2::splat(1.0), Vec2::splat(3.0), colors::SPRINKLE_SHINE)),
                // Rainbow rows twinkle, about 30% lit at any time
                9..=14 if (index as u64 + time_ticks / 8) % 10 < 3 => {
                    out.extend(rect(pos + Vec2::splat(2.0), Vec2::splat(4.0), colors::RAINBOW_SPARKLE))
                }
                _ => {}
            }
        }
    }

    let (outline, width) = match (brick.kind, brick.indestructible) {
        (BrickKind::Border, _) => (colors::BORDER_OUTLINE, 2.0),
        (_, true) => (colors::GOLD_OUTLINE, 2.0),
        _ => (colors::OUTLINE, 1.0),
    };
    out.extend(rect_outline(pos, size, width, outline));
}

fn item_vertices(out: &mut Vec<Vertex>, item: &Item) {
    let [r, g, b] = colors::PICKUP_GLOW;
    let glow_alpha = 0.3 + item.glow * 0.4;
    out.extend(radial_circle(
        item.pos,
        item.radius * 2.0,
        [r, g, b, glow_alpha],
        [r, g, b, 0.0],
        shapes::segments_for(item.radius * 2.0),
    ));
    out.extend(circle(item.pos, item.radius, item.color.to_rgba(1.0), shapes::segments_for(item.radius)));
}

fn particle_vertices(out: &mut Vec<Vertex>, particle: &Particle) {
    let alpha = particle.alpha();
    let p = particle.pos;
    let flash = {
        let [r, g, b, _] = colors::FLASH;
        [r, g, b, alpha * 0.8]
    };

    match particle.kind {
        ParticleKind::Spark => {
            out.extend(rect(p - Vec2::ONE, Vec2::splat(5.0), Rgb::GOLD.to_rgba(alpha)));
            out.extend(rect(p, Vec2::splat(3.0), flash));
        }
        ParticleKind::Collect => {
            out.extend(rect(p - Vec2::splat(2.0), Vec2::splat(6.0), Rgb::PICKUP.to_rgba(alpha)));
            out.extend(rect(p - Vec2::ONE, Vec2::splat(4.0), flash));
        }
        ParticleKind::Debris => {
            out.extend(rect(p, Vec2::splat(3.0), particle.color.to_rgba(alpha)));
        }
    }
}
