/// What a controller can do with its paddle in one tick
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    None,
    MoveUp,
    MoveDown,
}

impl Action {
    /// Map an output index to an action: 0 = none, 1 = up, anything else = down
    pub fn from_index(index: usize) -> Self {
        match index {
            0 => Action::None,
            1 => Action::MoveUp,
            _ => Action::MoveDown,
        }
    }

    /// Pick the action with the highest output; the first maximum wins ties
    pub fn from_outputs(outputs: &[f32; 3]) -> Self {
        let mut best = 0;
        for (index, value) in outputs.iter().enumerate().skip(1) {
            if *value > outputs[best] {
                best = index;
            }
        }
        Self::from_index(best)
    }
}

/// What a controller sees each tick, from its own side of the table
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Observation {
    pub paddle_y: f32,
    pub ball_y: f32,
    /// Absolute horizontal distance between own paddle and ball
    pub ball_distance: f32,
}

impl Observation {
    pub fn new(paddle_y: f32, ball_y: f32, ball_distance: f32) -> Self {
        Self {
            paddle_y,
            ball_y,
            ball_distance: ball_distance.abs(),
        }
    }

    /// Network input vector
    pub fn to_inputs(&self) -> [f32; 3] {
        [self.paddle_y, self.ball_y, self.ball_distance]
    }
}
