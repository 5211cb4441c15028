//! Human against a trained brain.
//!
//! The human holds the left paddle, the brain the right one. Points do not end
//! the session; only a quit signal does.

use brain::{Controller, DecisionFn};
use game_core::{Direction, Frame, Outcome, Side, Simulation};

use crate::events::{Signal, TickInput};
use crate::trial::{apply, observe};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionStatus {
    Running(Outcome),
    Ended,
}

pub struct PlaySession<D> {
    sim: Simulation,
    ai: D,
    ticks: u64,
    ended: bool,
}

impl<D: DecisionFn> PlaySession<D> {
    pub const HUMAN: Side = Side::Left;
    pub const AI: Side = Side::Right;

    pub fn new(sim: Simulation, ai: D) -> Self {
        Self {
            sim,
            ai,
            ticks: 0,
            ended: false,
        }
    }

    /// One tick: human keys, then the brain, then physics
    pub fn step(&mut self, input: TickInput) -> SessionStatus {
        if self.ended {
            return SessionStatus::Ended;
        }
        if input.signal == Signal::Quit {
            let score = self.sim.score();
            log::info!(
                "session ended after {} ticks at {}-{}",
                self.ticks,
                score.left,
                score.right
            );
            self.ended = true;
            return SessionStatus::Ended;
        }

        if input.keys.up {
            self.sim.move_paddle(Self::HUMAN, Direction::Up);
        }
        if input.keys.down {
            self.sim.move_paddle(Self::HUMAN, Direction::Down);
        }

        let action = Controller::new(&self.ai).decide(&observe(&self.sim, Self::AI));
        apply(&mut self.sim, Self::AI, action);

        let outcome = self.sim.tick();
        self.ticks += 1;
        if let Some(side) = self.sim.events().scored {
            log::info!(
                "{:?} scores: {}-{}",
                side,
                outcome.left_score,
                outcome.right_score
            );
        }
        SessionStatus::Running(outcome)
    }

    /// Display list with scores, and the rally counter if asked for
    pub fn frame(&self, draw_hits: bool) -> Frame {
        self.sim.render(true, draw_hits)
    }

    pub fn simulation(&self) -> &Simulation {
        &self.sim
    }

    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    pub fn is_ended(&self) -> bool {
        self.ended
    }
}
