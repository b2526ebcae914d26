//! Frame rendering
//!
//! Everything is drawn as filled rectangles onto a [`RenderSurface`] in
//! logical canvas coordinates: background, bricks, paddle, pills, balls.

pub mod draw_list;

pub use draw_list::{DrawCmd, DrawList};

use crate::consts::PILL_RADIUS;
use crate::platform::RenderSurface;
use crate::sim::{Brick, GameState};

pub const BACKGROUND_COLOR: u32 = 0x111111;
pub const PADDLE_COLOR: u32 = 0x00CCFF;
pub const BALL_COLOR: u32 = 0xEEEEEE;
pub const SPECIAL_BRICK_COLOR: u32 = 0xCC00CC;

/// Draw one frame of the current state
pub fn draw_frame<S: RenderSurface + ?Sized>(state: &GameState, surface: &mut S) {
    let height = state.config.height;
    surface.clear(BACKGROUND_COLOR);

    for brick in state.bricks.iter().filter(|b| b.is_live()) {
        surface.fill_rect(
            brick.pos.x,
            brick.pos.y,
            brick.size.x,
            brick.size.y,
            brick_color(brick),
        );
    }

    let paddle = &state.paddle;
    surface.fill_rect(
        paddle.x.floor(),
        paddle.top(height),
        paddle.width.floor(),
        paddle.height,
        PADDLE_COLOR,
    );

    for pill in &state.pills {
        surface.fill_rect(
            (pill.pos.x - PILL_RADIUS).floor(),
            (pill.pos.y - PILL_RADIUS).floor(),
            PILL_RADIUS * 2.0,
            PILL_RADIUS * 2.0,
            pill.kind.color(),
        );
    }

    for ball in &state.balls {
        surface.fill_rect(
            ball.left().floor(),
            ball.top().floor(),
            ball.radius * 2.0,
            ball.radius * 2.0,
            BALL_COLOR,
        );
    }
}

/// Special bricks override tier colors
pub fn brick_color(brick: &Brick) -> u32 {
    if brick.special {
        return SPECIAL_BRICK_COLOR;
    }
    match brick.status {
        3 => 0xD9534F,
        2 => 0xF0AD4E,
        _ => brick.base_color,
    }
}
