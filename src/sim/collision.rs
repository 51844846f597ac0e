//! Collision detection and response
//!
//! Circle-vs-rectangle tests for balls, box overlap for pickups, plus the bounce rules for
//! walls, the paddle and bricks. The `detect_*` functions are the per-frame
//! dispatch the tick calls; they mutate the entities and report what
//! happened so the loop can spawn particles and items.

use glam::Vec2;

use super::bounds::{Boundable, Bounds};
use super::state::{Ball, Brick, Item, Paddle};
use crate::color::Rgb;
use crate::consts::PADDLE_MAX_ANGLE;

/// Axis a brick bounce reflected on
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    X,
    Y,
}

/// First brick a ball hit this frame
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BrickHit {
    pub index: usize,
    /// The hit took the brick from active to inactive
    pub destroyed: bool,
    pub indestructible: bool,
    pub center: Vec2,
    pub color: Rgb,
}

/// Closest point of the rectangle to the circle center within the radius
pub fn circle_intersects_rect(center: Vec2, radius: f32, rect: &Bounds) -> bool {
    let closest = rect.closest_point(center);
    center.distance_squared(closest) <= radius * radius
}

/// Permissive paddle test: the ball's bottom crossed the paddle's top and its
/// center is strictly between the paddle's edges
pub fn paddle_catches_ball(paddle: &Paddle, ball: &Ball) -> bool {
    let b = paddle.bounds();
    ball.pos.y + ball.radius > b.top && ball.pos.x > b.left && ball.pos.x < b.right
}

/// Reflect off the side and top walls. Only flips a component when the ball
/// is moving into the wall it overlaps.
pub fn bounce_walls(ball: &mut Ball, width: f32) -> bool {
    let mut bounced = false;
    if (ball.pos.x + ball.radius >= width && ball.vel.x > 0.0)
        || (ball.pos.x - ball.radius <= 0.0 && ball.vel.x < 0.0)
    {
        ball.vel.x = -ball.vel.x;
        bounced = true;
    }
    if ball.pos.y - ball.radius <= 0.0 && ball.vel.y < 0.0 {
        ball.vel.y = -ball.vel.y;
        bounced = true;
    }
    bounced
}

/// Send the ball back up at an angle set by where it hit the paddle: left
/// edge -60°, center straight up, right edge +60°. The ball is placed on top
/// of the paddle so the hit cannot re-trigger next frame.
pub fn bounce_off_paddle(ball: &mut Ball, paddle: &Paddle) {
    let hit_pos = ((ball.pos.x - paddle.pos.x) / paddle.size.x).clamp(0.0, 1.0);
    let angle = (hit_pos - 0.5) * 2.0 * PADDLE_MAX_ANGLE;
    ball.vel = Vec2::new(angle.sin() * ball.speed, -angle.cos() * ball.speed);
    ball.pos.y = paddle.top() - ball.radius;
}

/// Reflect on the axis of least overlap and push the ball out of the brick
pub fn bounce_off_brick(ball: &mut Ball, brick: &Bounds) -> Axis {
    let delta = ball.pos - brick.center();
    let overlap_x = ball.radius + brick.width() / 2.0 - delta.x.abs();
    let overlap_y = ball.radius + brick.height() / 2.0 - delta.y.abs();

    if overlap_x < overlap_y {
        ball.vel.x = -ball.vel.x;
        ball.pos.x = if delta.x > 0.0 {
            brick.right + ball.radius
        } else {
            brick.left - ball.radius
        };
        Axis::X
    } else {
        ball.vel.y = -ball.vel.y;
        ball.pos.y = if delta.y > 0.0 {
            brick.bottom + ball.radius
        } else {
            brick.top - ball.radius
        };
        Axis::Y
    }
}

#[inline]
pub fn detect_ball_wall(ball: &mut Ball, width: f32) -> bool {
    bounce_walls(ball, width)
}

pub fn detect_ball_paddle(ball: &mut Ball, paddle: &Paddle) -> bool {
    if !paddle_catches_ball(paddle, ball) {
        return false;
    }
    bounce_off_paddle(ball, paddle);
    true
}

/// Bounce off the first active brick the ball overlaps and try to destroy it.
/// Later bricks are not considered this frame.
pub fn detect_ball_bricks(ball: &mut Ball, bricks: &mut [Brick]) -> Option<BrickHit> {
    let (index, brick) = bricks
        .iter_mut()
        .enumerate()
        .find(|(_, b)| b.is_active() && circle_intersects_rect(ball.pos, ball.radius, &b.bounds()))?;

    bounce_off_brick(ball, &brick.bounds());
    let destroyed = brick.destroy();
    Some(BrickHit {
        index,
        destroyed,
        indestructible: brick.indestructible,
        center: brick.center(),
        color: brick.color,
    })
}

/// Pickup box overlaps the paddle (strict, touching edges do not count)
#[inline]
pub fn detect_item_paddle(item: &Item, paddle: &Paddle) -> bool {
    item.active && item.intersects(paddle)
}
