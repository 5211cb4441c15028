//! Fitness trials: one game between two brains, stopped at the first terminal
//! condition.

use brain::{Action, Controller, DecisionFn, Observation};
use game_core::{Direction, Outcome, Side, Simulation};

use crate::config::TrialConfig;
use crate::events::{EventSource, Signal};
use crate::ledger::{FitnessLedger, GenomeId};

/// Trial states
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrialState {
    Running,
    LeftScored,
    RightScored,
    /// The left paddle exceeded the rally cap
    RallyCap,
    TickLimit,
    Aborted,
}

/// Things that can happen to a running trial
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrialEvent {
    Goal(Side),
    RallyCapped,
    OutOfTicks,
    Quit,
}

impl TrialState {
    pub fn is_terminal(self) -> bool {
        self != TrialState::Running
    }

    /// Next state for an event, if the transition is valid
    pub fn next(self, event: TrialEvent) -> Option<TrialState> {
        match (self, event) {
            (TrialState::Running, TrialEvent::Goal(Side::Left)) => Some(TrialState::LeftScored),
            (TrialState::Running, TrialEvent::Goal(Side::Right)) => Some(TrialState::RightScored),
            (TrialState::Running, TrialEvent::RallyCapped) => Some(TrialState::RallyCap),
            (TrialState::Running, TrialEvent::OutOfTicks) => Some(TrialState::TickLimit),
            (TrialState::Running, TrialEvent::Quit) => Some(TrialState::Aborted),

            // Terminal states are final
            _ => None,
        }
    }
}

/// When a trial stops
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TrialRules {
    pub rally_cap: u32,
    pub tick_limit: u64,
}

impl Default for TrialRules {
    fn default() -> Self {
        Self::from(&TrialConfig::default())
    }
}

impl From<&TrialConfig> for TrialRules {
    fn from(config: &TrialConfig) -> Self {
        Self {
            rally_cap: config.rally_cap,
            tick_limit: config.tick_limit,
        }
    }
}

impl TrialRules {
    /// Terminal event after a tick, if any; the first matching check wins
    pub fn judge(&self, outcome: &Outcome, ticks: u64) -> Option<TrialEvent> {
        if outcome.left_score >= 1 {
            Some(TrialEvent::Goal(Side::Left))
        } else if outcome.right_score >= 1 {
            Some(TrialEvent::Goal(Side::Right))
        } else if outcome.left_hits > self.rally_cap {
            Some(TrialEvent::RallyCapped)
        } else if ticks >= self.tick_limit {
            Some(TrialEvent::OutOfTicks)
        } else {
            None
        }
    }
}

/// What a paddle on `side` sees right now
pub fn observe(sim: &Simulation, side: Side) -> Observation {
    let ball = sim.ball();
    Observation::new(
        sim.paddle(side).y,
        ball.pos.y,
        (sim.paddle_x(side) - ball.pos.x).abs(),
    )
}

/// Carry out an action; `true` if the paddle moved
pub fn apply(sim: &mut Simulation, side: Side, action: Action) -> bool {
    match action {
        Action::None => false,
        Action::MoveUp => sim.move_paddle(side, Direction::Up),
        Action::MoveDown => sim.move_paddle(side, Direction::Down),
    }
}

/// How a trial ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrialEnd {
    Finished {
        state: TrialState,
        outcome: Outcome,
        ticks: u64,
    },
    /// Stopped by the host; contributes nothing
    Aborted { ticks: u64 },
}

impl TrialEnd {
    pub fn ticks(&self) -> u64 {
        match self {
            TrialEnd::Finished { ticks, .. } | TrialEnd::Aborted { ticks } => *ticks,
        }
    }
}

/// One game in progress
pub struct Trial {
    sim: Simulation,
    rules: TrialRules,
    state: TrialState,
    outcome: Outcome,
    ticks: u64,
}

impl Trial {
    pub fn new(sim: Simulation, rules: TrialRules) -> Self {
        Self {
            sim,
            rules,
            state: TrialState::Running,
            outcome: Outcome::default(),
            ticks: 0,
        }
    }

    pub fn simulation(&self) -> &Simulation {
        &self.sim
    }

    pub fn state(&self) -> TrialState {
        self.state
    }

    pub fn outcome(&self) -> Outcome {
        self.outcome
    }

    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    /// Advance one tick: both brains decide from the same state, then physics runs
    pub fn step<L, R>(
        &mut self,
        left: &Controller<'_, L>,
        right: &Controller<'_, R>,
        signal: Signal,
    ) -> TrialState
    where
        L: DecisionFn + ?Sized,
        R: DecisionFn + ?Sized,
    {
        if self.state.is_terminal() {
            return self.state;
        }
        if signal == Signal::Quit {
            self.transition(TrialEvent::Quit);
            return self.state;
        }

        let left_action = left.decide(&observe(&self.sim, Side::Left));
        let right_action = right.decide(&observe(&self.sim, Side::Right));
        apply(&mut self.sim, Side::Left, left_action);
        apply(&mut self.sim, Side::Right, right_action);

        self.outcome = self.sim.tick();
        self.ticks += 1;

        if let Some(event) = self.rules.judge(&self.outcome, self.ticks) {
            if event == TrialEvent::OutOfTicks {
                log::warn!(
                    "trial hit the tick limit ({}) with {}/{} hits",
                    self.rules.tick_limit,
                    self.outcome.left_hits,
                    self.outcome.right_hits
                );
            }
            self.transition(event);
        }
        self.state
    }

    fn transition(&mut self, event: TrialEvent) {
        if let Some(next) = self.state.next(event) {
            log::trace!("trial {:?} -> {:?} after {} ticks", self.state, next, self.ticks);
            self.state = next;
        }
    }

    /// Result so far; `None` while the trial is still running
    pub fn end(&self) -> Option<TrialEnd> {
        match self.state {
            TrialState::Running => None,
            TrialState::Aborted => Some(TrialEnd::Aborted { ticks: self.ticks }),
            state => Some(TrialEnd::Finished {
                state,
                outcome: self.outcome,
                ticks: self.ticks,
            }),
        }
    }

    /// Play until a terminal state, polling the host once per tick
    pub fn run<L, R, E>(
        &mut self,
        left: &Controller<'_, L>,
        right: &Controller<'_, R>,
        events: &mut E,
    ) -> TrialEnd
    where
        L: DecisionFn + ?Sized,
        R: DecisionFn + ?Sized,
        E: EventSource + ?Sized,
    {
        loop {
            self.step(left, right, events.poll());
            if let Some(end) = self.end() {
                return end;
            }
        }
    }
}

/// Add a finished trial's rally hits to both genomes' totals
pub fn credit(ledger: &mut FitnessLedger, left: GenomeId, right: GenomeId, outcome: &Outcome) {
    ledger.credit(left, outcome.left_hits as f32);
    ledger.credit(right, outcome.right_hits as f32);
}

/// Play `left` against `right` and credit the ledger; an aborted trial leaves it untouched
pub fn evaluate_pair<L, R, E>(
    ledger: &mut FitnessLedger,
    left: (GenomeId, &L),
    right: (GenomeId, &R),
    sim: Simulation,
    rules: TrialRules,
    events: &mut E,
) -> TrialEnd
where
    L: DecisionFn + ?Sized,
    R: DecisionFn + ?Sized,
    E: EventSource + ?Sized,
{
    let mut trial = Trial::new(sim, rules);
    let end = trial.run(&Controller::new(left.1), &Controller::new(right.1), events);
    if let TrialEnd::Finished { outcome, .. } = &end {
        credit(ledger, left.0, right.0, outcome);
    }
    end
}
