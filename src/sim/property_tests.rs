use std::f32::consts::PI;

use glam::Vec2;
use proptest::prelude::*;

use super::bounds::Bounds;
use super::collision::{bounce_off_brick, bounce_off_paddle, bounce_walls};
use super::layout::{EntitySizes, GridSize, PixelCell, PixelGrid};
use super::state::{Ball, Brick, BrickKind, GamePhase, GameState, Paddle};
use super::tick::{Command, TickInput, tick};
use crate::color::Rgb;
use crate::consts::*;
use crate::from_heading;
use crate::settings::Settings;

fn speed_ok(ball: &Ball) -> bool {
    (ball.vel.length() - ball.speed).abs() <= 1e-3 * ball.speed.max(1.0)
}

proptest! {
    #[test]
    fn bounces_preserve_speed(
        speed in 0.5f32..12.0,
        angle in -PI..PI,
        x in 0.0f32..600.0,
        y in 0.0f32..800.0,
        hit in -0.2f32..1.2,
    ) {
        let mut ball = Ball { pos: Vec2::new(x, y), vel: from_heading(angle, speed), radius: 4.0, speed };

        bounce_walls(&mut ball, 600.0);
        prop_assert!(speed_ok(&ball));

        let brick = Bounds::from_rect(Vec2::new(x - 5.0, y - 3.0), Vec2::new(20.0, 15.0));
        bounce_off_brick(&mut ball, &brick);
        prop_assert!(speed_ok(&ball));

        let paddle = Paddle { pos: Vec2::new(100.0, 700.0), size: Vec2::new(150.0, 16.0), speed: 8.0 };
        ball.pos.x = paddle.pos.x + hit * paddle.size.x;
        bounce_off_paddle(&mut ball, &paddle);
        prop_assert!(speed_ok(&ball));
        prop_assert!(ball.vel.y < 0.0);
    }

    #[test]
    fn destroy_is_idempotent(indestructible in any::<bool>(), calls in 1usize..6) {
        let mut brick = Brick::new(Vec2::ZERO, Vec2::splat(10.0), Rgb::WHITE, BrickKind::User, indestructible);
        let destroyed = (0..calls).filter(|_| brick.destroy()).count();
        prop_assert_eq!(destroyed, if indestructible { 0 } else { 1 });
        prop_assert_eq!(brick.is_active(), indestructible);
    }

    #[test]
    fn multiplication_never_exceeds_cap(max_balls in 1usize..40, pickups in 0usize..12) {
        let settings = Settings { max_balls, ..Settings::default() };
        let mut state = GameState::new(settings).unwrap();
        for _ in 0..pickups {
            state.multiply_balls();
            prop_assert!(state.balls.len() <= max_balls);
        }
        prop_assert!(state.balls.iter().all(speed_ok));
    }

    #[test]
    fn clearing_destructible_bricks_wins(
        cells in proptest::collection::vec(any::<bool>(), 64),
        ball_x in 10.0f32..590.0,
        ball_y in 10.0f32..600.0,
    ) {
        let rows: Vec<Vec<Option<PixelCell>>> = cells
            .chunks(8)
            .map(|row| row.iter().map(|&on| on.then(|| PixelCell::new(9, 99, 199, 255))).collect())
            .collect();
        let mut state = GameState::new(Settings::default()).unwrap();
        state.load_pixel_grid(GridSize::new(8).unwrap(), PixelGrid::new(rows)).unwrap();
        state.apply_command(Command::Start).unwrap();

        for brick in &mut state.bricks {
            brick.destroy();
        }
        state.balls[0].pos = Vec2::new(ball_x, ball_y);
        tick(&mut state, &TickInput::default());
        prop_assert_eq!(state.phase, GamePhase::GameWin);
    }

    #[test]
    fn rescale_stays_in_bounds(brick_size in -100.0f32..200.0) {
        let sizes = EntitySizes::for_brick_size(brick_size, &Settings::default());
        prop_assert!((MIN_BALL_RADIUS..=MAX_BALL_RADIUS).contains(&sizes.ball_radius));
        prop_assert!((MIN_PADDLE_WIDTH..=MAX_PADDLE_WIDTH).contains(&sizes.paddle_width));
        prop_assert!((MIN_PADDLE_HEIGHT..=MAX_PADDLE_HEIGHT).contains(&sizes.paddle_height));
        let factor = sizes.ball_speed / BALL_SPEED;
        prop_assert!(factor >= MIN_SPEED_FACTOR - 1e-5 && factor <= MAX_SPEED_FACTOR + 1e-5);
    }

    #[test]
    fn paddle_stays_on_canvas(targets in proptest::collection::vec(-1000.0f32..2000.0, 1..20)) {
        let mut state = GameState::new(Settings::default()).unwrap();
        state.apply_command(Command::Start).unwrap();
        for x in targets {
            tick(&mut state, &TickInput { target_x: Some(x), ..Default::default() });
            prop_assert!(state.paddle.pos.x >= 0.0);
            prop_assert!(state.paddle.pos.x + state.paddle.size.x <= state.canvas.x + 1e-3);
        }
    }
}
