use crate::{Ball, Config, Direction, Paddle, Side};
use hecs::World;

/// Move one paddle a single step.
///
/// Returns `false` and leaves the paddle untouched when the step would take
/// any part of it outside the playfield.
pub fn move_paddle(world: &mut World, config: &Config, side: Side, direction: Direction) -> bool {
    for (_entity, paddle) in world.query_mut::<&mut Paddle>() {
        if paddle.side != side {
            continue;
        }

        let next_y = paddle.y + direction.sign() * config.paddle_step;
        if !config.paddle_in_bounds(next_y) {
            return false;
        }
        paddle.y = next_y;
        return true;
    }
    false
}

/// Move ball based on velocity
pub fn move_ball(world: &mut World) {
    for (_entity, ball) in world.query_mut::<&mut Ball>() {
        ball.pos += ball.vel;
    }
}
