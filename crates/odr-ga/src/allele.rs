//! Allele sets and the genome shape built from them.

use odr_core::SimRng;

use crate::{GaError, GaResult, Gene};

/// The mutually exclusive values one gene may take.  Never empty.
#[derive(Clone, Debug, PartialEq)]
pub struct AlleleSet<T> {
    alleles: Vec<T>,
}

impl<T: Gene> AlleleSet<T> {
    /// Build a set from `alleles`, dropping repeats while keeping the first
    /// occurrence order.  `gene` is only used in the error.
    pub fn new(alleles: Vec<T>, gene: usize) -> GaResult<Self> {
        let mut unique: Vec<T> = Vec::with_capacity(alleles.len());
        for a in alleles {
            if !unique.contains(&a) {
                unique.push(a);
            }
        }
        if unique.is_empty() {
            return Err(GaError::EmptyAlleleSet { gene });
        }
        Ok(Self { alleles: unique })
    }

    pub fn single(allele: T) -> Self {
        Self { alleles: vec![allele] }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.alleles.len()
    }

    /// Always `false`; kept for API symmetry with `len`.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.alleles.is_empty()
    }

    #[inline]
    pub fn get(&self, i: usize) -> T {
        self.alleles[i % self.alleles.len()]
    }

    #[inline]
    pub fn contains(&self, allele: &T) -> bool {
        self.alleles.contains(allele)
    }

    pub fn as_slice(&self) -> &[T] {
        &self.alleles
    }

    /// A uniformly drawn allele.
    #[inline]
    pub fn random(&self, rng: &mut SimRng) -> T {
        self.alleles[rng.index(self.alleles.len())]
    }
}

impl AlleleSet<i64> {
    /// `lower, lower + step, …` up to and including `upper`.
    ///
    /// `lower > upper` or a non-positive step yields `{lower}`.
    pub fn stepped(lower: i64, upper: i64, step: i64) -> Self {
        if step <= 0 || lower >= upper {
            return Self::single(lower);
        }
        let alleles = (0..)
            .map(|k| lower + k * step)
            .take_while(|&t| t <= upper)
            .collect();
        Self { alleles }
    }
}

// ── GenomeShape ───────────────────────────────────────────────────────────────

/// One allele set per gene position; fixes the genome length.
#[derive(Clone, Debug, PartialEq, Default)]
pub struct GenomeShape<T> {
    sets: Vec<AlleleSet<T>>,
}

impl<T: Gene> GenomeShape<T> {
    pub fn new(sets: Vec<AlleleSet<T>>) -> Self {
        Self { sets }
    }

    pub fn push(&mut self, set: AlleleSet<T>) {
        self.sets.push(set);
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.sets.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.sets.is_empty()
    }

    #[inline]
    pub fn set(&self, gene: usize) -> &AlleleSet<T> {
        &self.sets[gene]
    }

    pub fn iter(&self) -> impl Iterator<Item = &AlleleSet<T>> + '_ {
        self.sets.iter()
    }

    /// `true` if `genes` has the right length and every gene is one of its
    /// position's alleles.
    pub fn permits(&self, genes: &[T]) -> bool {
        genes.len() == self.sets.len()
            && genes.iter().zip(&self.sets).all(|(g, s)| s.contains(g))
    }

    /// Replace every gene its position does not allow with `fallback`'s gene
    /// at the same position.
    pub fn repair(&self, genes: &mut [T], fallback: &[T]) {
        for (i, g) in genes.iter_mut().enumerate() {
            if !self.sets[i].contains(g) {
                *g = fallback[i];
            }
        }
    }
}
