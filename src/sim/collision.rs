//! Collision detection and response for axis-aligned geometry
//!
//! Balls are treated as squares of side `2 * radius` for every overlap test.

use glam::Vec2;

use super::state::{Ball, Brick, Paddle};
use crate::consts::PADDLE_DEFLECTION;

/// Strict overlap of two axis-aligned boxes given as (min, max) corners
#[inline]
pub fn aabb_overlap(a_min: Vec2, a_max: Vec2, b_min: Vec2, b_max: Vec2) -> bool {
    a_max.x > b_min.x && a_min.x < b_max.x && a_max.y > b_min.y && a_min.y < b_max.y
}

/// Reflect off the left, right and top walls.
///
/// The position is clamped back inside so a fast ball cannot stick in a wall.
/// Returns true if any wall was hit.
pub fn reflect_off_walls(ball: &mut Ball, width: f32) -> bool {
    let mut hit = false;
    if ball.right() > width || ball.left() < 0.0 {
        ball.vel.x = -ball.vel.x;
        ball.pos.x = ball.pos.x.clamp(ball.radius, width - ball.radius);
        hit = true;
    }
    if ball.top() < 0.0 {
        ball.vel.y = -ball.vel.y;
        ball.pos.y = ball.radius;
        hit = true;
    }
    hit
}

/// Horizontal speed after a paddle hit: 0 at the center, `±1.5 × base` at the edges
#[inline]
pub fn paddle_deflection(impact_offset: f32, half_width: f32, base_speed_x: f32) -> f32 {
    let half_width = if half_width > 0.0 { half_width } else { 1.0 };
    (impact_offset / half_width) * base_speed_x * PADDLE_DEFLECTION
}

/// Bounce a descending ball off the paddle band.
///
/// Returns true when the ball was deflected.
pub fn bounce_off_paddle(ball: &mut Ball, paddle: &Paddle, canvas_height: f32) -> bool {
    let top = paddle.top(canvas_height);
    let bottom = paddle.bottom(canvas_height);

    let descending = ball.vel.y > 0.0;
    let in_band = ball.bottom() >= top && ball.top() < bottom;
    let overlaps = ball.right() > paddle.x && ball.left() < paddle.x + paddle.width;
    if !(descending && in_band && overlaps) {
        return false;
    }

    ball.vel.y = -ball.vel.y;
    ball.pos.y = top - ball.radius;
    let offset = ball.pos.x - paddle.center_x();
    ball.vel.x = paddle_deflection(offset, paddle.width / 2.0, ball.base_speed.x);
    true
}

/// Overlap test between a ball and a live brick
pub fn ball_hits_brick(ball: &Ball, brick: &Brick) -> bool {
    brick.is_live()
        && aabb_overlap(
            Vec2::new(ball.left(), ball.top()),
            Vec2::new(ball.right(), ball.bottom()),
            brick.pos,
            brick.pos + brick.size,
        )
}

/// Vertical reflection off a brick; the ball is moved just outside the edge it now heads away from
pub fn deflect_off_brick(ball: &mut Ball, brick: &Brick) {
    ball.vel.y = -ball.vel.y;
    if ball.vel.y < 0.0 {
        ball.pos.y = brick.pos.y - ball.radius - 1.0;
    } else {
        ball.pos.y = brick.pos.y + brick.size.y + ball.radius + 1.0;
    }
}
