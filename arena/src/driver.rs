//! Generation-level orchestration.
//!
//! Every unordered pair of genomes plays exactly one trial per generation.
//! Pairs are enumerated outer-major: the earlier genome (by population order)
//! always plays the left paddle.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::time::{Duration, Instant};

use brain::{Controller, DecisionFn};
use game_core::{Config as GameConfig, Simulation};

use crate::error::ArenaError;
use crate::events::{EventSource, Signal};
use crate::ledger::{FitnessLedger, GenomeId};
use crate::population::{GenerationReport, Population};
use crate::trial::{credit, Trial, TrialEnd, TrialRules};

/// One scheduled trial, as indices into the population
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pairing {
    pub outer: usize,
    pub inner: usize,
    /// First pairing of this outer genome; its total starts over here
    pub resets_outer: bool,
}

/// All pairs `(i, j)` with `i < j`, outer index first
#[derive(Debug, Clone)]
pub struct PairSchedule {
    len: usize,
    outer: usize,
    inner: usize,
}

impl PairSchedule {
    pub fn new(len: usize) -> Self {
        Self {
            len,
            outer: 0,
            inner: 1,
        }
    }

    /// Number of pairings for a population of `len`
    pub fn total(len: usize) -> usize {
        len * len.saturating_sub(1) / 2
    }
}

impl Iterator for PairSchedule {
    type Item = Pairing;

    fn next(&mut self) -> Option<Pairing> {
        if self.inner >= self.len {
            return None;
        }
        let pairing = Pairing {
            outer: self.outer,
            inner: self.inner,
            resets_outer: self.inner == self.outer + 1,
        };
        self.inner += 1;
        if self.inner >= self.len {
            self.outer += 1;
            self.inner = self.outer + 1;
        }
        Some(pairing)
    }
}

/// Result of advancing a generation by one tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Progress {
    /// A trial ticked and is still running
    Ticked,
    /// A trial ticked and reached a terminal state
    TrialDone { pairing: Pairing, end: TrialEnd },
    /// Every pairing has been played
    Complete,
    /// The host asked to stop; nothing more will be credited
    Aborted,
}

/// Evaluation of one generation, advanced a tick at a time
pub struct GenerationRun<B> {
    ids: Vec<GenomeId>,
    brains: Vec<B>,
    schedule: PairSchedule,
    ledger: FitnessLedger,
    active: Option<(Pairing, Trial)>,
    game: GameConfig,
    rules: TrialRules,
    seeds: StdRng,
    trials: usize,
    ticks: u64,
    aborted: bool,
}

impl<B: DecisionFn> GenerationRun<B> {
    /// `brains[i]` plays for genome `ids[i]`
    pub fn new(
        ids: Vec<GenomeId>,
        brains: Vec<B>,
        game: GameConfig,
        rules: TrialRules,
        seed: u64,
    ) -> Result<Self, ArenaError> {
        if ids.len() != brains.len() {
            return Err(ArenaError::BrainCount {
                genomes: ids.len(),
                brains: brains.len(),
            });
        }
        let schedule = PairSchedule::new(ids.len());
        Ok(Self {
            ids,
            brains,
            schedule,
            ledger: FitnessLedger::new(),
            active: None,
            game,
            rules,
            seeds: StdRng::seed_from_u64(seed),
            trials: 0,
            ticks: 0,
            aborted: false,
        })
    }

    fn start_next(&mut self) -> bool {
        let Some(pairing) = self.schedule.next() else {
            return false;
        };
        if pairing.resets_outer {
            self.ledger.reset(self.ids[pairing.outer]);
        }
        self.ledger.ensure(self.ids[pairing.inner]);

        let sim = Simulation::new(self.game.clone(), self.seeds.gen());
        self.active = Some((pairing, Trial::new(sim, self.rules)));
        true
    }

    /// Run one tick of the current trial, starting the next one if needed
    pub fn advance(&mut self, signal: Signal) -> Progress {
        if self.aborted {
            return Progress::Aborted;
        }
        if self.active.is_none() && !self.start_next() {
            return Progress::Complete;
        }
        let Some((pairing, trial)) = self.active.as_mut() else {
            return Progress::Complete;
        };

        let left = Controller::new(&self.brains[pairing.outer]);
        let right = Controller::new(&self.brains[pairing.inner]);
        trial.step(&left, &right, signal);

        let Some(end) = trial.end() else {
            return Progress::Ticked;
        };
        let pairing = *pairing;
        self.active = None;
        self.ticks += end.ticks();

        match end {
            TrialEnd::Aborted { .. } => {
                log::debug!(
                    "trial {} vs {} aborted",
                    self.ids[pairing.outer],
                    self.ids[pairing.inner]
                );
                self.aborted = true;
                Progress::Aborted
            }
            TrialEnd::Finished {
                state,
                outcome,
                ticks,
            } => {
                log::debug!(
                    "trial {} vs {}: {:?} after {} ticks, hits {}/{}",
                    self.ids[pairing.outer],
                    self.ids[pairing.inner],
                    state,
                    ticks,
                    outcome.left_hits,
                    outcome.right_hits
                );
                credit(
                    &mut self.ledger,
                    self.ids[pairing.outer],
                    self.ids[pairing.inner],
                    &outcome,
                );
                self.trials += 1;
                Progress::TrialDone { pairing, end }
            }
        }
    }

    /// Play every remaining pairing; `false` if the host stopped the run
    pub fn run<E: EventSource + ?Sized>(&mut self, events: &mut E) -> bool {
        loop {
            match self.advance(events.poll()) {
                Progress::Complete => return true,
                Progress::Aborted => return false,
                Progress::Ticked | Progress::TrialDone { .. } => {}
            }
        }
    }

    /// The simulation currently being played, for display
    pub fn current_simulation(&self) -> Option<&Simulation> {
        self.active.as_ref().map(|(_, trial)| trial.simulation())
    }

    pub fn ledger(&self) -> &FitnessLedger {
        &self.ledger
    }

    pub fn trials(&self) -> usize {
        self.trials
    }

    pub fn ticks(&self) -> u64 {
        self.ticks
    }
}

/// Observer of a training run
pub trait Reporter<P: Population> {
    fn start_generation(&mut self, _generation: usize) {}

    fn end_generation(&mut self, population: &P, report: &GenerationReport)
        -> Result<(), ArenaError>;

    fn end_run(&mut self, _population: &P) -> Result<(), ArenaError> {
        Ok(())
    }
}

/// How a training run stopped
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunStatus {
    Completed { generations: usize },
    /// Stopped by the host in the middle of `generation`
    Interrupted { generation: usize },
}

/// Serve seed of one generation, mixed from the run seed
pub fn generation_seed(seed: u64, generation: usize) -> u64 {
    seed ^ (generation as u64).wrapping_mul(0x9E37_79B9_7F4A_7C15)
}

/// Runs generations of a population and feeds reporters
pub struct Driver<P: Population> {
    population: P,
    rules: TrialRules,
    seed: u64,
    reporters: Vec<Box<dyn Reporter<P>>>,
}

impl<P: Population> Driver<P> {
    pub fn new(population: P, rules: TrialRules, seed: u64) -> Self {
        Self {
            population,
            rules,
            seed,
            reporters: Vec::new(),
        }
    }

    pub fn add_reporter(&mut self, reporter: Box<dyn Reporter<P>>) {
        self.reporters.push(reporter);
    }

    pub fn population(&self) -> &P {
        &self.population
    }

    /// Build the brains of the current generation and schedule its trials
    pub fn begin_generation(&mut self) -> Result<GenerationRun<P::Brain>, ArenaError> {
        let generation = self.population.generation();
        let genomes = self.population.genomes();
        if genomes.is_empty() {
            return Err(ArenaError::EmptyPopulation);
        }

        let mut ids = Vec::with_capacity(genomes.len());
        let mut brains = Vec::with_capacity(genomes.len());
        for (id, genome) in genomes {
            ids.push(*id);
            brains.push(self.population.brain(genome)?);
        }

        for reporter in &mut self.reporters {
            reporter.start_generation(generation);
        }
        log::debug!(
            "generation {}: {} trials scheduled",
            generation,
            PairSchedule::total(ids.len())
        );

        GenerationRun::new(
            ids,
            brains,
            GameConfig::new(),
            self.rules,
            generation_seed(self.seed, generation),
        )
    }

    /// Breed the next generation from a completed run and notify reporters
    pub fn finish_generation(
        &mut self,
        run: GenerationRun<P::Brain>,
        elapsed: Duration,
    ) -> Result<GenerationReport, ArenaError> {
        let mut report = self.population.advance(run.ledger())?;
        report.trials = run.trials();
        report.ticks = run.ticks();
        report.elapsed_secs = elapsed.as_secs_f64();

        for reporter in &mut self.reporters {
            reporter.end_generation(&self.population, &report)?;
        }
        Ok(report)
    }

    /// Tell reporters the run is over
    pub fn end_run(&mut self) -> Result<(), ArenaError> {
        for reporter in &mut self.reporters {
            reporter.end_run(&self.population)?;
        }
        Ok(())
    }

    /// Evaluate and evolve `generations` generations
    pub fn run<E: EventSource + ?Sized>(
        &mut self,
        generations: usize,
        events: &mut E,
    ) -> Result<RunStatus, ArenaError> {
        check_generations(generations)?;
        for _ in 0..generations {
            let started = Instant::now();
            let mut run = self.begin_generation()?;
            if !run.run(events) {
                let generation = self.population.generation();
                log::warn!("training interrupted during generation {}", generation);
                return Ok(RunStatus::Interrupted { generation });
            }
            self.finish_generation(run, started.elapsed())?;
        }

        self.end_run()?;
        Ok(RunStatus::Completed { generations })
    }
}

/// A run must evaluate at least one generation to have a champion
pub fn check_generations(generations: usize) -> Result<(), ArenaError> {
    if generations == 0 {
        return Err(ArenaError::InvalidConfig(
            "evolution.generations must be at least 1".to_string(),
        ));
    }
    Ok(())
}
