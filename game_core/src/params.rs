/// Game tuning parameters for Pong
#[derive(Debug, Clone, Copy)]
pub struct Params;

impl Params {
    // Playfield (pixels)
    pub const WIDTH: f32 = 700.0;
    pub const HEIGHT: f32 = 500.0;

    // Paddle
    pub const PADDLE_WIDTH: f32 = 20.0;
    pub const PADDLE_HEIGHT: f32 = 100.0;
    pub const PADDLE_STEP: f32 = 4.0; // pixels per move request
    pub const PADDLE_MARGIN: f32 = 10.0; // gap between paddle and goal edge

    // Ball
    pub const BALL_RADIUS: f32 = 7.0;
    pub const BALL_MAX_SPEED: f32 = 5.0; // pixels per tick

    // Serve angle is a whole number of degrees in [-SERVE_ANGLE_DEG, SERVE_ANGLE_DEG), never 0
    pub const SERVE_ANGLE_DEG: i32 = 30;
}
