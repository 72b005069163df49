//! Genes, individuals, optimisation direction, and genome distances.

use std::fmt::Debug;
use std::hash::Hash;

use rustc_hash::FxHashMap;

use crate::{GaError, GaResult};

// ── Gene ──────────────────────────────────────────────────────────────────────

/// Anything that can sit in a genome slot.
///
/// Route genes are `RouteId`s, depart-time genes are `i64` seconds.
pub trait Gene: Copy + Eq + Hash + Debug + Send + Sync + 'static {}

impl<T: Copy + Eq + Hash + Debug + Send + Sync + 'static> Gene for T {}

// ── Individual ────────────────────────────────────────────────────────────────

/// One member of a population.
///
/// `score` is the raw objective value; `fitness` is the scaled value the
/// selection schemes draw on.
#[derive(Clone, Debug, PartialEq)]
pub struct Individual<T> {
    pub genes: Vec<T>,
    pub score: f64,
    pub fitness: f64,
    evaluated: bool,
}

impl<T: Gene> Individual<T> {
    pub fn new(genes: Vec<T>) -> Self {
        Self { genes, score: 0.0, fitness: 0.0, evaluated: false }
    }

    /// An already scored individual.
    pub fn scored(genes: Vec<T>, score: f64) -> Self {
        Self { genes, score, fitness: score, evaluated: true }
    }

    #[inline]
    pub fn is_evaluated(&self) -> bool {
        self.evaluated
    }

    pub fn set_score(&mut self, score: f64) {
        self.score = score;
        self.evaluated = true;
    }

    pub fn len(&self) -> usize {
        self.genes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.genes.is_empty()
    }
}

// ── Direction ─────────────────────────────────────────────────────────────────

/// Whether higher or lower scores are better (`mini-maxi-scaling`).
#[derive(Copy, Clone, PartialEq, Eq, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Direction {
    #[default]
    Maximize,
    Minimize,
}

impl Direction {
    /// `1` maximises, `-1` minimises.
    pub fn from_mini_maxi(value: i32) -> GaResult<Self> {
        match value {
            1 => Ok(Direction::Maximize),
            -1 => Ok(Direction::Minimize),
            other => Err(GaError::Config(format!(
                "mini-maxi-scaling must be 1 or -1, got {other}"
            ))),
        }
    }

    /// `true` if score `a` is strictly better than `b`.
    #[inline]
    pub fn better(self, a: f64, b: f64) -> bool {
        match self {
            Direction::Maximize => a > b,
            Direction::Minimize => a < b,
        }
    }

    /// Index of the best-scoring individual (first on ties).
    pub fn best_index<T>(self, members: &[Individual<T>]) -> Option<usize> {
        let mut best: Option<usize> = None;
        for (i, m) in members.iter().enumerate() {
            match best {
                Some(b) if !self.better(m.score, members[b].score) => {}
                _ => best = Some(i),
            }
        }
        best
    }

    /// Index of the worst-scoring individual (first on ties).
    pub fn worst_index<T>(self, members: &[Individual<T>]) -> Option<usize> {
        let mut worst: Option<usize> = None;
        for (i, m) in members.iter().enumerate() {
            match worst {
                Some(w) if !self.better(members[w].score, m.score) => {}
                _ => worst = Some(i),
            }
        }
        worst
    }

    /// Order individuals best first.
    pub fn sort_best_first<T>(self, members: &mut [Individual<T>]) {
        match self {
            Direction::Maximize => members.sort_by(|a, b| b.score.total_cmp(&a.score)),
            Direction::Minimize => members.sort_by(|a, b| a.score.total_cmp(&b.score)),
        }
    }
}

// ── Distance ──────────────────────────────────────────────────────────────────

/// Genome distance in `[0, 1]` used by sharing scaling, crowding
/// replacement, and the diversity statistic.
#[derive(Copy, Clone, PartialEq, Eq, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum DistanceKind {
    /// Order-independent: the share of genes in `a` left unmatched after
    /// pairing each with an equal, not yet matched gene of `b`.
    #[default]
    Multiset,
    /// Share of positions whose genes differ.
    Positional,
}

impl DistanceKind {
    pub fn distance<T: Gene>(self, a: &[T], b: &[T]) -> f64 {
        if a.is_empty() {
            return 0.0;
        }
        let differing = match self {
            DistanceKind::Multiset => {
                let mut pool: FxHashMap<T, usize> = FxHashMap::default();
                for &g in b {
                    *pool.entry(g).or_insert(0) += 1;
                }
                a.iter()
                    .filter(|g| match pool.get_mut(*g) {
                        Some(n) if *n > 0 => {
                            *n -= 1;
                            false
                        }
                        _ => true,
                    })
                    .count()
            }
            DistanceKind::Positional => a
                .iter()
                .enumerate()
                .filter(|&(i, g)| b.get(i) != Some(g))
                .count(),
        };
        differing as f64 / a.len() as f64
    }
}
