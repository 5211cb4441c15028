pub mod components;
pub mod config;
pub mod params;
pub mod render;
pub mod resources;
pub mod systems;

pub use components::*;
pub use config::*;
pub use params::*;
pub use render::{Color, Frame, Shape};
pub use resources::*;

use glam::Vec2;
use hecs::World;
use systems::*;

/// Score and rally counters at the end of a tick
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Outcome {
    pub left_score: u32,
    pub right_score: u32,
    pub left_hits: u32,
    pub right_hits: u32,
}

/// Run one deterministic physics tick.
///
/// Returns the rally counters as they stood before goal handling, so the tick
/// that ends a point still reports the rally that led to it.
pub fn step(
    world: &mut World,
    config: &Config,
    score: &mut Score,
    hits: &mut Hits,
    events: &mut Events,
    rng: &mut GameRng,
) -> Hits {
    // Clear events at start of tick
    events.clear();

    // 1. Move ball
    move_ball(world);

    // 2. Check collisions (ball vs walls, paddles)
    check_collisions(world, config, hits, events);
    let rally = *hits;

    // 3. Check scoring (ball exited playfield)
    check_scoring(world, config, score, hits, events, rng);

    rally
}

/// Helper to create a paddle entity
pub fn create_paddle(world: &mut World, side: Side, y: f32) -> hecs::Entity {
    world.spawn((Paddle::new(side, y),))
}

/// Helper to create the ball entity
pub fn create_ball(world: &mut World, pos: Vec2, vel: Vec2) -> hecs::Entity {
    world.spawn((Ball::new(pos, vel),))
}

/// A two-paddle match: the world plus its score, rally counters and RNG
pub struct Simulation {
    world: World,
    config: Config,
    score: Score,
    hits: Hits,
    events: Events,
    rng: GameRng,
}

impl Simulation {
    /// Centred paddles and a random serve from the centre
    pub fn new(config: Config, seed: u64) -> Self {
        let mut rng = GameRng::new(seed);
        let mut ball = Ball::new(config.center(), Vec2::ZERO);
        ball.reset(&config, &mut rng);
        Self::build(config, rng, ball)
    }

    /// Centred paddles and a ball placed explicitly; `seed` only drives later serves
    pub fn with_ball(config: Config, seed: u64, pos: Vec2, vel: Vec2) -> Self {
        Self::build(config, GameRng::new(seed), Ball::new(pos, vel))
    }

    fn build(config: Config, rng: GameRng, ball: Ball) -> Self {
        let mut world = World::new();
        let start_y = config.paddle_start_y();
        create_paddle(&mut world, Side::Left, start_y);
        create_paddle(&mut world, Side::Right, start_y);
        create_ball(&mut world, ball.pos, ball.vel);

        Self {
            world,
            config,
            score: Score::new(),
            hits: Hits::new(),
            events: Events::new(),
            rng,
        }
    }

    /// Move a paddle one step; `false` (and no movement) if that would leave the playfield
    pub fn move_paddle(&mut self, side: Side, direction: Direction) -> bool {
        move_paddle(&mut self.world, &self.config, side, direction)
    }

    /// Place a paddle directly, clamped to the playfield
    pub fn place_paddle(&mut self, side: Side, y: f32) {
        let y = y.clamp(0.0, self.config.paddle_max_y());
        for (_entity, paddle) in self.world.query_mut::<&mut Paddle>() {
            if paddle.side == side {
                paddle.y = y;
            }
        }
    }

    /// Advance one tick and report the outcome so far
    pub fn tick(&mut self) -> Outcome {
        let rally = step(
            &mut self.world,
            &self.config,
            &mut self.score,
            &mut self.hits,
            &mut self.events,
            &mut self.rng,
        );

        Outcome {
            left_score: self.score.left,
            right_score: self.score.right,
            left_hits: rally.left,
            right_hits: rally.right,
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn score(&self) -> Score {
        self.score
    }

    /// Rally counters of the rally in progress
    pub fn hits(&self) -> Hits {
        self.hits
    }

    /// Events of the last tick
    pub fn events(&self) -> &Events {
        &self.events
    }

    pub fn paddle(&self, side: Side) -> Paddle {
        self.world
            .query::<&Paddle>()
            .iter()
            .map(|(_e, p)| *p)
            .find(|p| p.side == side)
            .unwrap_or_else(|| Paddle::new(side, self.config.paddle_start_y()))
    }

    pub fn paddle_x(&self, side: Side) -> f32 {
        self.config.paddle_x(side)
    }

    pub fn ball(&self) -> Ball {
        self.world
            .query::<&Ball>()
            .iter()
            .next()
            .map(|(_e, b)| *b)
            .unwrap_or_else(|| Ball::new(self.config.center(), Vec2::ZERO))
    }

    /// Describe the current state for a display surface; never changes the simulation
    pub fn render(&self, draw_score: bool, draw_hits: bool) -> Frame {
        let config = &self.config;
        let mut frame = Frame::new(config.width, config.height, Color::BLACK);

        if draw_score {
            frame.push(Shape::Text {
                x: config.width / 4.0,
                y: 20.0,
                size: render::SCORE_TEXT_SIZE,
                content: self.score.left.to_string(),
                color: Color::WHITE,
            });
            frame.push(Shape::Text {
                x: config.width * 3.0 / 4.0,
                y: 20.0,
                size: render::SCORE_TEXT_SIZE,
                content: self.score.right.to_string(),
                color: Color::WHITE,
            });
        }

        if draw_hits {
            frame.push(Shape::Text {
                x: config.width / 2.0,
                y: 10.0,
                size: render::HITS_TEXT_SIZE,
                content: self.hits.total().to_string(),
                color: Color::RED,
            });
        }

        render::centre_line(&mut frame);

        for side in Side::BOTH {
            frame.push(Shape::Rect {
                x: config.paddle_x(side),
                y: self.paddle(side).y,
                w: config.paddle_width,
                h: config.paddle_height,
                color: Color::WHITE,
            });
        }

        let ball = self.ball();
        frame.push(Shape::Circle {
            x: ball.pos.x,
            y: ball.pos.y,
            radius: config.ball_radius,
            color: Color::WHITE,
        });

        frame
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_simulation_is_centred() {
        let sim = Simulation::new(Config::new(), 3);
        assert_eq!(sim.paddle(Side::Left).y, 200.0);
        assert_eq!(sim.paddle(Side::Right).y, 200.0);
        assert_eq!(sim.ball().pos, sim.config().center());
        assert!(sim.ball().vel.length() > 0.0);
        assert_eq!(sim.score(), Score::default());
        assert_eq!(sim.hits(), Hits::default());
    }

    #[test]
    fn test_place_paddle_clamps() {
        let mut sim = Simulation::new(Config::new(), 3);
        sim.place_paddle(Side::Right, -40.0);
        assert_eq!(sim.paddle(Side::Right).y, 0.0);
        sim.place_paddle(Side::Left, 10_000.0);
        assert_eq!(sim.paddle(Side::Left).y, sim.config().paddle_max_y());
    }

    #[test]
    fn test_goal_tick_reports_rally_then_resets() {
        let config = Config::new();
        // Ball about to cross the right goal line
        let mut sim =
            Simulation::with_ball(config.clone(), 1, Vec2::new(698.0, 40.0), Vec2::new(5.0, 0.0));
        sim.hits.left = 3;
        sim.hits.right = 2;

        let outcome = sim.tick();

        assert_eq!(outcome.left_score, 1);
        assert_eq!(outcome.right_score, 0);
        assert_eq!((outcome.left_hits, outcome.right_hits), (3, 2));
        assert_eq!(sim.hits(), Hits::default(), "Next rally starts from zero");
        assert_eq!(sim.events().scored, Some(Side::Left));
    }

    #[test]
    fn test_render_does_not_mutate() {
        let mut sim = Simulation::new(Config::new(), 11);
        for _ in 0..30 {
            sim.tick();
        }
        let ball = sim.ball();
        let score = sim.score();
        let hits = sim.hits();
        let paddles = (sim.paddle(Side::Left), sim.paddle(Side::Right));

        let _ = sim.render(true, true);
        let _ = sim.render(false, false);

        assert_eq!(sim.ball(), ball);
        assert_eq!(sim.score(), score);
        assert_eq!(sim.hits(), hits);
        assert_eq!((sim.paddle(Side::Left), sim.paddle(Side::Right)), paddles);
    }

    #[test]
    fn test_render_flags_select_texts() {
        let sim = Simulation::new(Config::new(), 11);

        let plain = sim.render(false, false);
        assert_eq!(plain.texts().count(), 0);

        let scored = sim.render(true, false);
        assert_eq!(scored.texts().collect::<Vec<_>>(), vec!["0", "0"]);

        let both = sim.render(true, true);
        assert_eq!(both.texts().count(), 3);
        assert!(both
            .shapes
            .iter()
            .any(|s| matches!(s, Shape::Text { color, .. } if *color == Color::RED)));
    }
}
