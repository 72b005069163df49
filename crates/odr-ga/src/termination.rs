//! Termination tests and Incremental-GA replacement.
//!
//! Both are consulted once per generation (termination) or once per child
//! (replacement) by the engine.

use odr_core::SimRng;

use crate::{DistanceKind, Direction, Gene, Individual, Statistics};

// ── Termination ───────────────────────────────────────────────────────────────

#[derive(Copy, Clone, PartialEq, Debug)]
pub enum Termination {
    UponGeneration { generations: usize },
    /// Stop once the best score of `window` generations ago is within
    /// `ratio` of the current best.  Never runs past `generations`.
    UponConvergence { generations: usize, window: usize, ratio: f64 },
    /// Stop once the population mean is within `ratio` of its best.  Never
    /// runs past `generations`.
    UponPopConvergence { generations: usize, ratio: f64 },
}

impl Termination {
    pub fn done<T: Gene>(&self, stats: &Statistics<T>) -> bool {
        match *self {
            Termination::UponGeneration { generations } => stats.generation() >= generations,
            Termination::UponConvergence { generations, window, ratio } => {
                stats.generation() >= generations
                    || stats.convergence(window).is_some_and(|c| c >= ratio)
            }
            Termination::UponPopConvergence { generations, ratio } => {
                stats.generation() >= generations
                    || stats.population_convergence().is_some_and(|c| c >= ratio)
            }
        }
    }
}

// ── Replacement ───────────────────────────────────────────────────────────────

#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub enum Replacement {
    Random,
    Best,
    Worst,
    /// The loser of a two-member tournament.
    Custom,
    /// The member closest to the child.
    Crowding { distance: DistanceKind },
    /// The worse of the child's parents.
    Parent,
}

impl Replacement {
    /// Index of the member `child` replaces.  `members` must not be empty.
    ///
    /// `replaced` holds the slots earlier siblings took in the same step;
    /// a second child of the same parents replaces the other parent.
    pub fn victim<T: Gene>(
        &self,
        members: &[Individual<T>],
        child: &[T],
        parents: (usize, usize),
        replaced: &[usize],
        direction: Direction,
        rng: &mut SimRng,
    ) -> usize {
        match *self {
            Replacement::Random => rng.index(members.len()),
            Replacement::Best => direction.best_index(members).unwrap_or(0),
            Replacement::Worst => direction.worst_index(members).unwrap_or(0),
            Replacement::Custom => {
                let a = rng.index(members.len());
                let b = rng.index(members.len());
                if direction.better(members[a].score, members[b].score) { b } else { a }
            }
            Replacement::Crowding { distance } => members
                .iter()
                .enumerate()
                .map(|(i, m)| (i, distance.distance(child, &m.genes)))
                .min_by(|x, y| x.1.total_cmp(&y.1))
                .map(|(i, _)| i)
                .unwrap_or(0),
            Replacement::Parent => {
                let (a, b) = parents;
                let (worse, other) =
                    if direction.better(members[a].score, members[b].score) { (b, a) } else { (a, b) };
                if replaced.contains(&worse) { other } else { worse }
            }
        }
    }
}
