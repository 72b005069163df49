//! The `GeneticAlgorithm` struct and its generation loop.

use std::sync::Arc;

use odr_core::{Logger, SimRng};

use crate::stats::diversity;
use crate::{
    DistanceKind, GaError, GaKind, GaObserver, GaParams, GaResult, Gene, GenomeShape, Individual,
    Objective, Statistics, Strategies,
};

// ── Population ────────────────────────────────────────────────────────────────

/// One (sub-)population with its own RNG.
///
/// Non-deme engines evolve a single population; the Deme engine evolves
/// `number-of-populations` of them side by side.
pub struct Population<T> {
    pub members: Vec<Individual<T>>,
    rng: SimRng,
}

impl<T: Gene> Population<T> {
    pub(crate) fn new(rng: SimRng) -> Self {
        Self { members: Vec::new(), rng }
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }
}

/// A child and the indices of the parents it was bred from.
struct Child<T> {
    individual: Individual<T>,
    parents: (usize, usize),
}

// ── Breeder ───────────────────────────────────────────────────────────────────

/// Read-only state shared by every population step.
///
/// Holds only shared references, so one `Breeder` serves all demes even
/// when they are stepped on several threads.
struct Breeder<'a, T> {
    params: &'a GaParams,
    shape: &'a GenomeShape<T>,
    strategies: &'a Strategies,
    objective: &'a dyn Objective<T>,
}

impl<T: Gene> Breeder<'_, T> {
    fn evaluate(&self, members: &mut [Individual<T>]) -> usize {
        let mut calls = 0;
        for m in members.iter_mut().filter(|m| !m.is_evaluated()) {
            m.set_score(self.objective.score(&m.genes));
            calls += 1;
        }
        calls
    }

    fn scale(&self, pop: &mut Population<T>) {
        self.strategies.scaling.evaluate(&mut pop.members, self.params.direction);
    }

    /// `count` children: select pairs, cross with the crossover
    /// probability, mutate.  A child identical to its parent inherits the
    /// parent's score.
    fn breed(&self, members: &[Individual<T>], count: usize, rng: &mut SimRng) -> Vec<Child<T>> {
        let picks = self.strategies.selection.select(members, count.div_ceil(2) * 2, rng);
        let mut children = Vec::with_capacity(count);

        for pair in picks.chunks_exact(2) {
            let (ia, ib) = (pair[0], pair[1]);
            let (pa, pb) = (&members[ia], &members[ib]);
            let (ga, gb) = if rng.gen_bool(self.params.crossover_probability) {
                self.strategies.crossover.cross(&pa.genes, &pb.genes, self.shape, rng)
            } else {
                (pa.genes.clone(), pb.genes.clone())
            };

            for (mut genes, parent) in [(ga, pa), (gb, pb)] {
                if children.len() == count {
                    break;
                }
                self.strategies.mutation.mutate(
                    &mut genes,
                    self.shape,
                    self.params.mutation_probability,
                    rng,
                );
                let individual = if genes == parent.genes {
                    parent.clone()
                } else {
                    Individual::new(genes)
                };
                children.push(Child { individual, parents: (ia, ib) });
            }
        }
        children
    }

    fn initialize(&self, pop: &mut Population<T>) -> usize {
        let size = self.params.population_size;
        pop.members = (0..size)
            .map(|_| Individual::new(self.strategies.initializer.initialize(self.shape, &mut pop.rng)))
            .collect();
        let calls = self.evaluate(&mut pop.members);
        self.scale(pop);
        calls
    }

    /// Non-overlapping generation, optionally keeping the previous best.
    fn simple_step(&self, pop: &mut Population<T>) -> usize {
        let n = pop.members.len();
        let mut next: Vec<Individual<T>> = self
            .breed(&pop.members, n, &mut pop.rng)
            .into_iter()
            .map(|c| c.individual)
            .collect();
        let calls = self.evaluate(&mut next);

        let dir = self.params.direction;
        if self.params.elitism {
            if let (Some(old), Some(new), Some(worst)) =
                (dir.best_index(&pop.members), dir.best_index(&next), dir.worst_index(&next))
            {
                if dir.better(pop.members[old].score, next[new].score) {
                    next[worst] = pop.members[old].clone();
                }
            }
        }

        pop.members = next;
        self.scale(pop);
        calls
    }

    /// Overlapping generation: children join, the worst leave.
    fn steady_state_step(&self, pop: &mut Population<T>) -> usize {
        let n = pop.members.len();
        let count = self.params.replacement_count(n);
        let mut children: Vec<Individual<T>> = self
            .breed(&pop.members, count, &mut pop.rng)
            .into_iter()
            .map(|c| c.individual)
            .collect();
        let calls = self.evaluate(&mut children);

        pop.members.extend(children);
        self.params.direction.sort_best_first(&mut pop.members);
        pop.members.truncate(n);
        self.scale(pop);
        calls
    }

    /// One or two children, each replacing a member chosen by the
    /// replacement scheme.
    fn incremental_step(&self, pop: &mut Population<T>) -> usize {
        let mut children = self.breed(&pop.members, self.params.offspring, &mut pop.rng);
        let mut calls = 0;
        for child in &mut children {
            calls += self.evaluate(std::slice::from_mut(&mut child.individual));
        }

        let mut replaced = Vec::with_capacity(children.len());
        for child in children {
            let victim = self.strategies.replacement.victim(
                &pop.members,
                &child.individual.genes,
                child.parents,
                &replaced,
                self.params.direction,
                &mut pop.rng,
            );
            pop.members[victim] = child.individual;
            replaced.push(victim);
        }
        self.scale(pop);
        calls
    }
}

// ── GeneticAlgorithm ──────────────────────────────────────────────────────────

/// A configured GA run over one genome shape and objective.
///
/// Create via [`GaBuilder`][crate::GaBuilder].
pub struct GeneticAlgorithm<'o, T> {
    pub(crate) params: GaParams,
    pub(crate) shape: GenomeShape<T>,
    pub(crate) objective: &'o dyn Objective<T>,
    pub(crate) strategies: Strategies,
    pub(crate) distance: DistanceKind,
    pub(crate) demes: Vec<Population<T>>,
    pub(crate) stats: Statistics<T>,
    pub(crate) logger: Arc<dyn Logger>,
    pub(crate) initialized: bool,
}

impl<'o, T: Gene> GeneticAlgorithm<'o, T> {
    // ── Public API ────────────────────────────────────────────────────────

    /// Evolve until the termination test holds and return the best
    /// individual ever evaluated.
    pub fn run<O: GaObserver<T> + ?Sized>(&mut self, observer: &mut O) -> GaResult<Individual<T>> {
        if !self.initialized {
            self.initialize();
        }
        observer.on_start(&self.stats);

        while !self.done() {
            self.step();
            observer.on_generation(&self.stats);
        }
        observer.on_finish(&self.stats);

        let best = self.stats.best_individual().cloned().ok_or(GaError::NoSolution)?;
        self.logger.info(&format!(
            "Evolution finished after {} generations and {} evaluations; best score {:.4}",
            self.stats.generation(),
            self.stats.evaluations(),
            best.score
        ));
        Ok(best)
    }

    /// Create and evaluate the initial population(s).  Generation 0.
    pub fn initialize(&mut self) {
        let breeder = Breeder {
            params: &self.params,
            shape: &self.shape,
            strategies: &self.strategies,
            objective: self.objective,
        };
        let calls: usize = self.demes.iter_mut().map(|d| breeder.initialize(d)).sum();
        self.initialized = true;
        self.record(0, calls);
        self.logger.info(&format!(
            "Initial population of {} genomes with {} genes",
            self.demes.iter().map(Population::len).sum::<usize>(),
            self.shape.len()
        ));
    }

    /// Advance one generation, initialising first if needed.
    pub fn step(&mut self) {
        if !self.initialized {
            self.initialize();
        }
        let breeder = Breeder {
            params: &self.params,
            shape: &self.shape,
            strategies: &self.strategies,
            objective: self.objective,
        };

        let calls: usize = match self.params.kind {
            GaKind::Simple => self.demes.iter_mut().map(|d| breeder.simple_step(d)).sum(),
            GaKind::SteadyState => self.demes.iter_mut().map(|d| breeder.steady_state_step(d)).sum(),
            GaKind::Incremental => self.demes.iter_mut().map(|d| breeder.incremental_step(d)).sum(),
            GaKind::Deme => {
                #[cfg(not(feature = "parallel"))]
                let calls: usize = self.demes.iter_mut().map(|d| breeder.steady_state_step(d)).sum();

                #[cfg(feature = "parallel")]
                let calls: usize = {
                    use rayon::prelude::*;
                    self.demes.par_iter_mut().map(|d| breeder.steady_state_step(d)).sum()
                };

                migrate(&mut self.demes, &self.params);
                for d in &mut self.demes {
                    breeder.scale(d);
                }
                calls
            }
        };

        let generation = self.stats.generation() + 1;
        self.record(generation, calls);
    }

    /// `true` once the termination strategy is satisfied.
    pub fn done(&self) -> bool {
        self.initialized && self.strategies.termination.done(&self.stats)
    }

    pub fn statistics(&self) -> &Statistics<T> {
        &self.stats
    }

    /// The best individual evaluated so far.
    pub fn best(&self) -> Option<&Individual<T>> {
        self.stats.best_individual()
    }

    pub fn populations(&self) -> &[Population<T>] {
        &self.demes
    }

    pub fn params(&self) -> &GaParams {
        &self.params
    }

    pub fn shape(&self) -> &GenomeShape<T> {
        &self.shape
    }

    pub fn strategies(&self) -> &Strategies {
        &self.strategies
    }

    // ── Internals ─────────────────────────────────────────────────────────

    fn record(&mut self, generation: usize, calls: usize) {
        let members: Vec<&Individual<T>> = self.demes.iter().flat_map(|d| d.members.iter()).collect();
        let div = self.params.record_diversity.then(|| diversity(&members, self.distance));
        self.stats.add_evaluations(calls);
        self.stats.record(generation, &members, div);

        let s = self.stats.current();
        self.logger.debug(&format!(
            "Generation {generation}: max {:.4} mean {:.4} min {:.4}",
            s.maximum, s.mean, s.minimum
        ));
    }
}

/// Ring migration: each deme's best emigrants replace the worst members of
/// the next deme.
fn migrate<T: Gene>(demes: &mut [Population<T>], params: &GaParams) {
    let k = demes.len();
    if k < 2 {
        return;
    }
    let dir = params.direction;
    let emigrants: Vec<Vec<Individual<T>>> = demes
        .iter()
        .map(|d| {
            let mut ranked = d.members.clone();
            dir.sort_best_first(&mut ranked);
            ranked.truncate(params.migration_count(d.members.len()));
            ranked
        })
        .collect();

    for (i, group) in emigrants.into_iter().enumerate() {
        let target = &mut demes[(i + 1) % k];
        for e in group {
            if let Some(w) = dir.worst_index(&target.members) {
                target.members[w] = e;
            }
        }
    }
}
