use glam::Vec2;
use rand::Rng;

use crate::{Config, GameRng};

/// Which end of the playfield a paddle defends
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Side {
    Left,
    Right,
}

impl Side {
    pub const BOTH: [Side; 2] = [Side::Left, Side::Right];
}

/// Paddle movement request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Up,
    Down,
}

impl Direction {
    /// Sign applied to Y (screen coordinates, Y grows downwards)
    pub fn sign(self) -> f32 {
        match self {
            Direction::Up => -1.0,
            Direction::Down => 1.0,
        }
    }
}

/// Paddle component
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Paddle {
    pub side: Side,
    pub y: f32, // top edge, kept within the playfield
}

impl Paddle {
    pub fn new(side: Side, y: f32) -> Self {
        Self { side, y }
    }
}

/// Ball component
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ball {
    pub pos: Vec2,
    pub vel: Vec2,
}

impl Ball {
    pub fn new(pos: Vec2, vel: Vec2) -> Self {
        Self { pos, vel }
    }

    /// Put the ball back in the centre with a random serve
    pub fn reset(&mut self, config: &Config, rng: &mut GameRng) {
        self.pos = config.center();
        self.vel = serve_velocity(config, rng);
    }
}

/// Random serve: a non-zero whole-degree angle off the horizontal, random side
pub fn serve_velocity(config: &Config, rng: &mut GameRng) -> Vec2 {
    let limit = config.serve_angle_deg.max(1);
    let mut degrees = 0;
    while degrees == 0 {
        degrees = rng.0.gen_range(-limit..limit);
    }
    let angle = (degrees as f32).to_radians();
    let towards = if rng.0.gen_bool(0.5) { 1.0 } else { -1.0 };

    Vec2::new(
        towards * (angle.cos() * config.ball_max_speed).abs(),
        angle.sin() * config.ball_max_speed,
    )
}
