use crate::action::{Action, Observation};

/// Anything that maps the 3 observation inputs to 3 action scores
pub trait DecisionFn {
    fn activate(&self, inputs: &[f32; 3]) -> [f32; 3];
}

impl<F> DecisionFn for F
where
    F: Fn(&[f32; 3]) -> [f32; 3],
{
    fn activate(&self, inputs: &[f32; 3]) -> [f32; 3] {
        self(inputs)
    }
}

/// Turns a decision function into paddle actions
pub struct Controller<'a, D: ?Sized> {
    decision: &'a D,
}

impl<'a, D: DecisionFn + ?Sized> Controller<'a, D> {
    pub fn new(decision: &'a D) -> Self {
        Self { decision }
    }

    /// One activation, highest score wins
    pub fn decide(&self, observation: &Observation) -> Action {
        let outputs = self.decision.activate(&observation.to_inputs());
        Action::from_outputs(&outputs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    fn fixed(outputs: [f32; 3]) -> impl Fn(&[f32; 3]) -> [f32; 3] {
        move |_| outputs
    }

    #[test]
    fn test_decide_maps_outputs() {
        let obs = Observation::new(0.0, 0.0, 0.0);

        let up = fixed([0.1, 0.9, 0.2]);
        assert_eq!(Controller::new(&up).decide(&obs), Action::MoveUp);

        let tie = fixed([0.5, 0.5, 0.1]);
        assert_eq!(Controller::new(&tie).decide(&obs), Action::None);

        let down = fixed([0.1, 0.2, 0.9]);
        assert_eq!(Controller::new(&down).decide(&obs), Action::MoveDown);
    }

    #[test]
    fn test_decide_passes_observation_and_activates_once() {
        let calls = Cell::new(0);
        let seen = Cell::new([0.0f32; 3]);
        let probe = |inputs: &[f32; 3]| {
            calls.set(calls.get() + 1);
            seen.set(*inputs);
            [0.0, 0.0, 1.0]
        };

        let action = Controller::new(&probe).decide(&Observation::new(120.0, 80.0, 310.0));

        assert_eq!(action, Action::MoveDown);
        assert_eq!(calls.get(), 1);
        assert_eq!(seen.get(), [120.0, 80.0, 310.0]);
    }
}
