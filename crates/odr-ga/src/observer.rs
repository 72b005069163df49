//! GA observer trait for progress reporting and score files.

use crate::Statistics;

/// Callbacks invoked by [`GeneticAlgorithm::run`][crate::GeneticAlgorithm::run].
///
/// All methods have default no-op implementations so implementors only need
/// to override what they care about.
pub trait GaObserver<T> {
    /// Called once after the initial population has been evaluated.
    fn on_start(&mut self, _stats: &Statistics<T>) {}

    /// Called after every completed generation.
    fn on_generation(&mut self, _stats: &Statistics<T>) {}

    /// Called once when the termination test is satisfied.
    fn on_finish(&mut self, _stats: &Statistics<T>) {}
}

/// A [`GaObserver`] that does nothing.
pub struct NoopObserver;

impl<T> GaObserver<T> for NoopObserver {}
