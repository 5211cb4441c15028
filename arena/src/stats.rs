use std::fs::File;
use std::io::BufWriter;
use std::path::{Path, PathBuf};

use crate::driver::Reporter;
use crate::error::ArenaError;
use crate::population::{GenerationReport, Population};

/// Logs a one-line summary per generation
#[derive(Debug, Default)]
pub struct LogReporter;

impl<P: Population> Reporter<P> for LogReporter {
    fn start_generation(&mut self, generation: usize) {
        log::info!("****** Running generation {} ******", generation);
    }

    fn end_generation(&mut self, _population: &P, report: &GenerationReport) -> Result<(), ArenaError> {
        log::info!(
            "generation {}: best {:.1} (genome {}), mean {:.2}, stdev {:.2}, {} species, {} trials / {} ticks in {:.2}s",
            report.generation,
            report.best_fitness,
            report.best_id,
            report.mean_fitness,
            report.stdev_fitness,
            report.species,
            report.trials,
            report.ticks,
            report.elapsed_secs
        );
        Ok(())
    }

    fn end_run(&mut self, population: &P) -> Result<(), ArenaError> {
        match population.champion() {
            Some(champion) => log::info!(
                "best genome: {} from generation {} with fitness {:.1}",
                champion.id,
                champion.generation,
                champion.fitness
            ),
            None => log::warn!("training finished without evaluating any genome"),
        }
        Ok(())
    }
}

/// Keeps every generation report and writes them out as JSON when the run ends
#[derive(Debug)]
pub struct Statistics {
    history: Vec<GenerationReport>,
    export: PathBuf,
}

impl Statistics {
    pub fn with_export<P: Into<PathBuf>>(path: P) -> Self {
        Self {
            history: Vec::new(),
            export: path.into(),
        }
    }

    pub fn history(&self) -> &[GenerationReport] {
        &self.history
    }

    pub fn best_fitness(&self) -> Vec<f32> {
        self.history.iter().map(|r| r.best_fitness).collect()
    }

    pub fn mean_fitness(&self) -> Vec<f32> {
        self.history.iter().map(|r| r.mean_fitness).collect()
    }

    pub fn save_json<P: AsRef<Path>>(&self, path: P) -> Result<(), ArenaError> {
        let path = path.as_ref();
        let writer = BufWriter::new(File::create(path)?);
        serde_json::to_writer_pretty(writer, &self.history)?;
        log::info!("wrote statistics for {} generations to {}", self.history.len(), path.display());
        Ok(())
    }
}

impl<P: Population> Reporter<P> for Statistics {
    fn end_generation(&mut self, _population: &P, report: &GenerationReport) -> Result<(), ArenaError> {
        self.history.push(report.clone());
        Ok(())
    }

    fn end_run(&mut self, _population: &P) -> Result<(), ArenaError> {
        self.save_json(&self.export)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::population::Neat;

    fn report(generation: usize, best: f32, mean: f32) -> GenerationReport {
        GenerationReport {
            generation,
            population_size: 4,
            species: 1,
            best_id: generation as u64,
            best_fitness: best,
            mean_fitness: mean,
            stdev_fitness: 0.0,
            unevaluated: 0,
            trials: 6,
            ticks: 1000,
            elapsed_secs: 0.5,
        }
    }

    #[test]
    fn test_statistics_export() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("stats.json");
        let mut config = Config::default();
        config.evolution.population_size = 2;
        let population = Neat::new(config).unwrap();

        let mut stats = Statistics::with_export(&path);
        stats.end_generation(&population, &report(0, 3.0, 1.0)).unwrap();
        stats.end_generation(&population, &report(1, 5.0, 2.5)).unwrap();
        Reporter::<Neat>::end_run(&mut stats, &population).unwrap();

        assert_eq!(stats.best_fitness(), vec![3.0, 5.0]);
        assert_eq!(stats.mean_fitness(), vec![1.0, 2.5]);

        let text = std::fs::read_to_string(&path).unwrap();
        let parsed: Vec<GenerationReport> = serde_json::from_str(&text).unwrap();
        assert_eq!(parsed, stats.history());
    }
}
