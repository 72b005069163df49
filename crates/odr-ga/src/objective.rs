//! The objective-function seam between the engine and the scorers.

/// Scores one genome.
///
/// Implementations are pure functions of the genes and their own read-only
/// context, so the same objective may be called from several deme threads
/// at once.  Closures `Fn(&[T]) -> f64 + Sync` are objectives too.
pub trait Objective<T>: Sync {
    fn score(&self, genes: &[T]) -> f64;
}

impl<T, F> Objective<T> for F
where
    F: Fn(&[T]) -> f64 + Sync,
{
    fn score(&self, genes: &[T]) -> f64 {
        self(genes)
    }
}
