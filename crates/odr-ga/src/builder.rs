//! Fluent builder for constructing a [`GeneticAlgorithm`].

use std::sync::Arc;

use odr_core::{Logger, NoopLogger, SimRng};

use crate::engine::Population;
use crate::{
    DistanceKind, GaError, GaKind, GaParams, GaResult, Gene, GeneticAlgorithm, GenomeShape,
    Objective, Statistics, StrategyFactory,
};

/// Fluent builder for [`GeneticAlgorithm`].
///
/// # Optional inputs (have defaults)
///
/// | Method         | Default                                   |
/// |----------------|-------------------------------------------|
/// | `.distance(d)` | `DistanceKind::Multiset`                  |
/// | `.rng(r)`      | `SimRng::from_optional_seed(params.seed)` |
/// | `.logger(l)`   | `NoopLogger`                              |
///
/// # Example
///
/// ```rust,ignore
/// let mut ga = GaBuilder::new(shape, &scorer, params)
///     .distance(DistanceKind::Positional)
///     .logger(logger.clone())
///     .build()?;
/// let best = ga.run(&mut NoopObserver)?;
/// ```
pub struct GaBuilder<'o, T> {
    shape: GenomeShape<T>,
    objective: &'o dyn Objective<T>,
    params: GaParams,
    distance: DistanceKind,
    rng: Option<SimRng>,
    logger: Option<Arc<dyn Logger>>,
}

impl<'o, T: Gene> GaBuilder<'o, T> {
    pub fn new(shape: GenomeShape<T>, objective: &'o dyn Objective<T>, params: GaParams) -> Self {
        Self {
            shape,
            objective,
            params,
            distance: DistanceKind::Multiset,
            rng: None,
            logger: None,
        }
    }

    /// Genome distance for sharing, crowding, and diversity.
    pub fn distance(mut self, distance: DistanceKind) -> Self {
        self.distance = distance;
        self
    }

    /// Root RNG; deme RNGs are derived from it.
    pub fn rng(mut self, rng: SimRng) -> Self {
        self.rng = Some(rng);
        self
    }

    pub fn logger(mut self, logger: Arc<dyn Logger>) -> Self {
        self.logger = Some(logger);
        self
    }

    /// Validate parameters, build the strategies, and return a GA ready to
    /// run.
    pub fn build(self) -> GaResult<GeneticAlgorithm<'o, T>> {
        self.params.validate()?;
        if self.shape.is_empty() {
            return Err(GaError::EmptyGenome);
        }

        let logger: Arc<dyn Logger> = self.logger.unwrap_or_else(|| Arc::new(NoopLogger));
        let strategies = StrategyFactory::new(&self.params, self.distance).build(logger.as_ref());

        let mut root = self.rng.unwrap_or_else(|| SimRng::from_optional_seed(self.params.seed));
        let deme_count = match self.params.kind {
            GaKind::Deme => self.params.populations,
            _ => 1,
        };
        let demes = (0..deme_count)
            .map(|i| Population::new(root.child(i as u64)))
            .collect();

        Ok(GeneticAlgorithm {
            stats: Statistics::new(self.params.direction, self.params.number_of_best),
            params: self.params,
            shape: self.shape,
            objective: self.objective,
            strategies,
            distance: self.distance,
            demes,
            logger,
            initialized: false,
        })
    }
}
