use crate::components::Side;
use crate::params::Params;
use glam::Vec2;

/// Playfield geometry and physics constants
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub width: f32,
    pub height: f32,
    pub paddle_width: f32,
    pub paddle_height: f32,
    pub paddle_step: f32,
    pub paddle_margin: f32,
    pub ball_radius: f32,
    pub ball_max_speed: f32,
    pub serve_angle_deg: i32,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            width: Params::WIDTH,
            height: Params::HEIGHT,
            paddle_width: Params::PADDLE_WIDTH,
            paddle_height: Params::PADDLE_HEIGHT,
            paddle_step: Params::PADDLE_STEP,
            paddle_margin: Params::PADDLE_MARGIN,
            ball_radius: Params::BALL_RADIUS,
            ball_max_speed: Params::BALL_MAX_SPEED,
            serve_angle_deg: Params::SERVE_ANGLE_DEG,
        }
    }
}

impl Config {
    pub fn new() -> Self {
        Self::default()
    }

    /// X of the paddle's left edge
    pub fn paddle_x(&self, side: Side) -> f32 {
        match side {
            Side::Left => self.paddle_margin,
            Side::Right => self.width - self.paddle_margin - self.paddle_width,
        }
    }

    /// Paddle Y (top edge) that centres it vertically
    pub fn paddle_start_y(&self) -> f32 {
        (self.height - self.paddle_height) / 2.0
    }

    /// Largest legal paddle Y (top edge)
    pub fn paddle_max_y(&self) -> f32 {
        self.height - self.paddle_height
    }

    /// Whether a paddle whose top edge sits at `y` lies fully inside the playfield
    pub fn paddle_in_bounds(&self, y: f32) -> bool {
        y >= 0.0 && y <= self.paddle_max_y()
    }

    /// Ball serve position
    pub fn center(&self) -> Vec2 {
        Vec2::new(self.width / 2.0, self.height / 2.0)
    }
}
