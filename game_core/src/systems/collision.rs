use crate::{Ball, Config, Events, Hits, Paddle, Side};
use hecs::World;

/// Check ball collisions with walls and paddles
pub fn check_collisions(world: &mut World, config: &Config, hits: &mut Hits, events: &mut Events) {
    // First, collect ball and paddle data without holding borrows
    let ball_data = {
        let mut ball_query = world.query::<&Ball>();
        ball_query
            .iter()
            .next()
            .map(|(_e, ball)| (ball.pos, ball.vel))
    };

    let (mut ball_pos, mut ball_vel) = match ball_data {
        Some(data) => data,
        None => return, // No ball in world
    };
    let radius = config.ball_radius;
    let mut changed = false;

    // Top/bottom walls: send the ball back into the playfield
    if ball_pos.y + radius >= config.height {
        ball_vel.y = -ball_vel.y.abs();
        ball_pos.y = config.height - radius;
        events.wall_hit = true;
        changed = true;
    } else if ball_pos.y - radius <= 0.0 {
        ball_vel.y = ball_vel.y.abs();
        ball_pos.y = radius;
        events.wall_hit = true;
        changed = true;
    }

    // Only the paddle the ball is travelling towards can return it
    let side = if ball_vel.x < 0.0 {
        Side::Left
    } else {
        Side::Right
    };
    let paddle = world
        .query::<&Paddle>()
        .iter()
        .map(|(_e, p)| *p)
        .find(|p| p.side == side);

    if let Some(paddle) = paddle {
        let paddle_x = config.paddle_x(side);
        let half_height = config.paddle_height / 2.0;

        let in_span = ball_pos.y >= paddle.y && ball_pos.y <= paddle.y + config.paddle_height;
        let touching = ball_pos.x - radius <= paddle_x + config.paddle_width
            && ball_pos.x + radius >= paddle_x;

        if in_span && touching {
            ball_vel.x = -ball_vel.x;

            // Contact offset from the paddle middle steers the return:
            // the edges give full speed vertically, the middle sends it flat
            let middle_y = paddle.y + half_height;
            let reduction = half_height / config.ball_max_speed;
            ball_vel.y = -(middle_y - ball_pos.y) / reduction;

            // Push ball out of paddle
            ball_pos.x = match side {
                Side::Left => paddle_x + config.paddle_width + radius,
                Side::Right => paddle_x - radius,
            };

            hits.increment(side);
            events.paddle_hit = Some(side);
            changed = true;
        }
    }

    if changed {
        for (_entity, ball) in world.query_mut::<&mut Ball>() {
            ball.pos = ball_pos;
            ball.vel = ball_vel;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{create_ball, create_paddle, Ball, Config, Events};
    use glam::Vec2;

    fn setup_world() -> (World, Config, Hits, Events) {
        (World::new(), Config::new(), Hits::new(), Events::new())
    }

    fn ball(world: &World) -> Ball {
        world.query::<&Ball>().iter().next().map(|(_e, b)| *b).unwrap()
    }

    #[test]
    fn test_ball_bounces_off_top_wall() {
        let (mut world, config, mut hits, mut events) = setup_world();
        let ball_vel = Vec2::new(4.0, -3.0); // Moving up
        create_ball(&mut world, Vec2::new(350.0, config.ball_radius - 1.0), ball_vel);

        check_collisions(&mut world, &config, &mut hits, &mut events);

        let ball = ball(&world);
        assert!(ball.vel.y > 0.0, "Ball should bounce down after hitting top wall");
        assert_eq!(ball.vel.x, ball_vel.x, "X velocity should be unchanged");
        assert!(ball.pos.y >= config.ball_radius, "Ball should be pushed out of wall");
        assert!(events.wall_hit);
        assert_eq!(hits, Hits::default());
    }

    #[test]
    fn test_ball_bounces_off_bottom_wall() {
        let (mut world, config, mut hits, mut events) = setup_world();
        let ball_vel = Vec2::new(4.0, 3.0); // Moving down
        create_ball(
            &mut world,
            Vec2::new(350.0, config.height - config.ball_radius + 1.0),
            ball_vel,
        );

        check_collisions(&mut world, &config, &mut hits, &mut events);

        let ball = ball(&world);
        assert!(ball.vel.y < 0.0, "Ball should bounce up after hitting bottom wall");
        assert_eq!(ball.vel.x, ball_vel.x);
        assert!(ball.pos.y <= config.height - config.ball_radius);
        assert!(events.wall_hit);
    }

    #[test]
    fn test_ball_collides_with_left_paddle() {
        let (mut world, config, mut hits, mut events) = setup_world();
        let paddle_x = config.paddle_x(Side::Left);
        create_paddle(&mut world, Side::Left, 200.0);
        create_paddle(&mut world, Side::Right, 200.0);

        let ball_pos = Vec2::new(paddle_x + config.paddle_width + config.ball_radius - 1.0, 250.0);
        create_ball(&mut world, ball_pos, Vec2::new(-5.0, 0.0));

        check_collisions(&mut world, &config, &mut hits, &mut events);

        let ball = ball(&world);
        assert!(ball.vel.x > 0.0, "Ball should bounce right after hitting left paddle");
        assert!(ball.pos.x > paddle_x + config.paddle_width, "Ball should be pushed out of paddle");
        assert_eq!(hits.left, 1);
        assert_eq!(hits.right, 0, "Opposite counter untouched");
        assert_eq!(events.paddle_hit, Some(Side::Left));
    }

    #[test]
    fn test_ball_collides_with_right_paddle() {
        let (mut world, config, mut hits, mut events) = setup_world();
        let paddle_x = config.paddle_x(Side::Right);
        create_paddle(&mut world, Side::Left, 200.0);
        create_paddle(&mut world, Side::Right, 200.0);

        let ball_pos = Vec2::new(paddle_x - config.ball_radius + 1.0, 250.0);
        create_ball(&mut world, ball_pos, Vec2::new(5.0, 0.0));

        check_collisions(&mut world, &config, &mut hits, &mut events);

        let ball = ball(&world);
        assert!(ball.vel.x < 0.0, "Ball should bounce left after hitting right paddle");
        assert!(ball.pos.x < paddle_x);
        assert_eq!(hits.right, 1);
        assert_eq!(hits.left, 0);
        assert_eq!(events.paddle_hit, Some(Side::Right));
    }

    #[test]
    fn test_ball_trajectory_affected_by_hit_position() {
        let (mut world, config, mut hits, mut events) = setup_world();
        let paddle_x = config.paddle_x(Side::Left);
        let contact_x = paddle_x + config.paddle_width + config.ball_radius - 1.0;
        create_paddle(&mut world, Side::Left, 200.0);

        // Top edge of the paddle
        create_ball(&mut world, Vec2::new(contact_x, 200.0), Vec2::new(-5.0, 0.0));
        check_collisions(&mut world, &config, &mut hits, &mut events);
        let top = ball(&world);
        assert!(top.vel.y < 0.0, "Ball should deflect upward when hitting top of paddle");
        assert!((top.vel.y + config.ball_max_speed).abs() < 1e-4, "Edge gives full vertical speed");

        // Bottom edge
        world.clear();
        events.clear();
        create_paddle(&mut world, Side::Left, 200.0);
        create_ball(&mut world, Vec2::new(contact_x, 300.0), Vec2::new(-5.0, 0.0));
        check_collisions(&mut world, &config, &mut hits, &mut events);
        let bottom = ball(&world);
        assert!(bottom.vel.y > 0.0, "Ball should deflect downward when hitting bottom of paddle");

        // Middle
        world.clear();
        create_paddle(&mut world, Side::Left, 200.0);
        create_ball(&mut world, Vec2::new(contact_x, 250.0), Vec2::new(-5.0, 3.0));
        check_collisions(&mut world, &config, &mut hits, &mut events);
        assert_eq!(ball(&world).vel.y, 0.0, "Middle of the paddle returns the ball flat");
    }

    #[test]
    fn test_ball_does_not_bounce_when_moving_away_from_paddle() {
        let (mut world, config, mut hits, mut events) = setup_world();
        let paddle_x = config.paddle_x(Side::Left);
        create_paddle(&mut world, Side::Left, 200.0);

        let ball_pos = Vec2::new(paddle_x + config.paddle_width + config.ball_radius - 1.0, 250.0);
        let ball_vel = Vec2::new(5.0, 0.0); // Moving right, away from left paddle
        create_ball(&mut world, ball_pos, ball_vel);

        check_collisions(&mut world, &config, &mut hits, &mut events);

        assert_eq!(ball(&world).vel, ball_vel, "Ball should not bounce when moving away");
        assert_eq!(events.paddle_hit, None);
        assert_eq!(hits, Hits::default());
    }

    #[test]
    fn test_ball_outside_paddle_span_passes() {
        let (mut world, config, mut hits, mut events) = setup_world();
        let paddle_x = config.paddle_x(Side::Left);
        create_paddle(&mut world, Side::Left, 0.0);

        let ball_pos = Vec2::new(paddle_x + config.paddle_width, 250.0);
        create_ball(&mut world, ball_pos, Vec2::new(-5.0, 0.0));

        check_collisions(&mut world, &config, &mut hits, &mut events);

        assert!(ball(&world).vel.x < 0.0);
        assert_eq!(hits.left, 0);
    }

    #[test]
    fn test_no_collision_when_no_ball() {
        let (mut world, config, mut hits, mut events) = setup_world();
        create_paddle(&mut world, Side::Left, 200.0);

        check_collisions(&mut world, &config, &mut hits, &mut events);

        assert_eq!(events, Events::default());
    }
}
