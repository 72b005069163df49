//! Per-generation score statistics and the best individuals seen so far.

use crate::scaling::mean_dev;
use crate::{DistanceKind, Direction, Gene, Individual, ScoreColumn};

/// Score summary of one generation.
#[derive(Clone, Debug, PartialEq, Default)]
pub struct GenerationScores {
    pub generation: usize,
    pub mean: f64,
    pub maximum: f64,
    pub minimum: f64,
    pub deviation: f64,
    /// Mean pairwise genome distance, when diversity is recorded.
    pub diversity: Option<f64>,
}

impl GenerationScores {
    pub fn column(&self, column: ScoreColumn) -> Option<f64> {
        match column {
            ScoreColumn::Mean => Some(self.mean),
            ScoreColumn::Maximum => Some(self.maximum),
            ScoreColumn::Minimum => Some(self.minimum),
            ScoreColumn::Deviation => Some(self.deviation),
            ScoreColumn::Diversity => self.diversity,
        }
    }
}

/// Running statistics of one GA run.
#[derive(Clone, Debug)]
pub struct Statistics<T> {
    direction: Direction,
    keep: usize,
    generation: usize,
    evaluations: usize,
    current: GenerationScores,
    best_per_generation: Vec<f64>,
    best: Vec<Individual<T>>,
}

impl<T: Gene> Statistics<T> {
    /// Statistics retaining the `keep` best distinct genomes.
    pub fn new(direction: Direction, keep: usize) -> Self {
        Self {
            direction,
            keep: keep.max(1),
            generation: 0,
            evaluations: 0,
            current: GenerationScores::default(),
            best_per_generation: Vec::new(),
            best: Vec::new(),
        }
    }

    /// Generations completed; 0 right after initialisation.
    #[inline]
    pub fn generation(&self) -> usize {
        self.generation
    }

    /// Objective calls so far.
    #[inline]
    pub fn evaluations(&self) -> usize {
        self.evaluations
    }

    pub fn current(&self) -> &GenerationScores {
        &self.current
    }

    pub fn direction(&self) -> Direction {
        self.direction
    }

    /// Best score of each recorded generation, oldest first.
    pub fn best_history(&self) -> &[f64] {
        &self.best_per_generation
    }

    /// The best individual ever evaluated.
    pub fn best_individual(&self) -> Option<&Individual<T>> {
        self.best.first()
    }

    /// Up to `keep` best distinct individuals, best first.
    pub fn best_individuals(&self) -> &[Individual<T>] {
        &self.best
    }

    /// Ratio of the best score `window` generations ago to the current best,
    /// oriented so it never exceeds 1.  `None` until enough generations
    /// exist or when the scores have opposite signs.
    pub fn convergence(&self, window: usize) -> Option<f64> {
        let n = self.best_per_generation.len();
        if n <= window {
            return None;
        }
        ratio(self.best_per_generation[n - 1 - window], self.best_per_generation[n - 1])
    }

    /// Ratio of the current mean to the current best, at most 1.
    pub fn population_convergence(&self) -> Option<f64> {
        let best = match self.direction {
            Direction::Maximize => self.current.maximum,
            Direction::Minimize => self.current.minimum,
        };
        ratio(self.current.mean, best)
    }

    pub(crate) fn add_evaluations(&mut self, n: usize) {
        self.evaluations += n;
    }

    /// Record the population of `generation`.
    pub(crate) fn record(
        &mut self,
        generation: usize,
        members: &[&Individual<T>],
        diversity: Option<f64>,
    ) {
        self.generation = generation;
        let scores: Vec<f64> = members.iter().map(|m| m.score).collect();
        let (mean, deviation) = mean_dev(&scores);
        let maximum = scores.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        let minimum = scores.iter().copied().fold(f64::INFINITY, f64::min);
        self.current = GenerationScores {
            generation,
            mean,
            maximum: if scores.is_empty() { 0.0 } else { maximum },
            minimum: if scores.is_empty() { 0.0 } else { minimum },
            deviation,
            diversity,
        };
        self.best_per_generation.push(match self.direction {
            Direction::Maximize => self.current.maximum,
            Direction::Minimize => self.current.minimum,
        });

        for m in members.iter().filter(|m| m.is_evaluated()) {
            if self.best.iter().any(|b| b.genes == m.genes) {
                continue;
            }
            let worst_kept = self.best.last().map(|b| b.score);
            let full = self.best.len() >= self.keep;
            if full && worst_kept.is_some_and(|w| !self.direction.better(m.score, w)) {
                continue;
            }
            self.best.push((*m).clone());
            self.direction.sort_best_first(&mut self.best);
            self.best.truncate(self.keep);
        }
    }
}

/// `min / max` of two same-signed values; 1 when equal.
fn ratio(a: f64, b: f64) -> Option<f64> {
    if a == b {
        return Some(1.0);
    }
    if a.signum() != b.signum() || a == 0.0 || b == 0.0 {
        return None;
    }
    let (lo, hi) = if a.abs() < b.abs() { (a.abs(), b.abs()) } else { (b.abs(), a.abs()) };
    Some(lo / hi)
}

/// Mean pairwise distance over `members`; 0 for fewer than two.
pub fn diversity<T: Gene>(members: &[&Individual<T>], distance: DistanceKind) -> f64 {
    let n = members.len();
    if n < 2 {
        return 0.0;
    }
    let mut total = 0.0;
    for i in 0..n {
        for j in (i + 1)..n {
            total += distance.distance(&members[i].genes, &members[j].genes);
        }
    }
    total / (n * (n - 1) / 2) as f64
}
