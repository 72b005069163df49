//! Crossover operators.
//!
//! Every operator produces two children of the parents' length.  The
//! position-preserving operators (one-point, two-point, even-odd, uniform,
//! cycle) only ever place `a[i]` or `b[i]` at position `i`, so children stay
//! within the allele sets.  Order and partial-match crossover move genes
//! between positions; a moved gene its new position does not allow is
//! replaced by the first parent's gene there.

use rustc_hash::FxHashMap;

use odr_core::SimRng;

use crate::{GenomeShape, Gene};

#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub enum Crossover {
    OnePoint,
    TwoPoint,
    EvenOdd,
    Uniform,
    Cycle,
    Order,
    PartialMatch,
}

impl Crossover {
    pub fn cross<T: Gene>(
        &self,
        a: &[T],
        b: &[T],
        shape: &GenomeShape<T>,
        rng: &mut SimRng,
    ) -> (Vec<T>, Vec<T>) {
        let n = a.len().min(b.len());
        if n < 2 {
            return (a.to_vec(), b.to_vec());
        }

        match self {
            Crossover::OnePoint => {
                let cut = rng.gen_range(1..n);
                (splice(a, b, cut, n), splice(b, a, cut, n))
            }
            Crossover::TwoPoint => {
                let (lo, hi) = segment(n, rng);
                (splice(a, b, lo, hi), splice(b, a, lo, hi))
            }
            Crossover::EvenOdd => {
                let pick = |x: &[T], y: &[T]| -> Vec<T> {
                    (0..n).map(|i| if i % 2 == 0 { x[i] } else { y[i] }).collect()
                };
                (pick(a, b), pick(b, a))
            }
            Crossover::Uniform => {
                let mut c1 = a.to_vec();
                let mut c2 = b.to_vec();
                for i in 0..n {
                    if rng.gen_bool(0.5) {
                        c1[i] = b[i];
                        c2[i] = a[i];
                    }
                }
                (c1, c2)
            }
            Crossover::Cycle => (cycle_child(a, b), cycle_child(b, a)),
            Crossover::Order => {
                let (lo, hi) = segment(n, rng);
                let mut c1 = order_child(a, b, lo, hi);
                let mut c2 = order_child(b, a, lo, hi);
                shape.repair(&mut c1, a);
                shape.repair(&mut c2, b);
                (c1, c2)
            }
            Crossover::PartialMatch => {
                let (lo, hi) = segment(n, rng);
                let mut c1 = partial_match_child(a, b, lo, hi);
                let mut c2 = partial_match_child(b, a, lo, hi);
                shape.repair(&mut c1, a);
                shape.repair(&mut c2, b);
                (c1, c2)
            }
        }
    }
}

/// Sorted `[lo, hi)` with `lo < hi`.
fn segment(n: usize, rng: &mut SimRng) -> (usize, usize) {
    let p = rng.index(n);
    let q = rng.index(n);
    let (lo, hi) = if p <= q { (p, q) } else { (q, p) };
    (lo, (hi + 1).min(n))
}

/// `x` with `x[lo..hi]` taken from `y`.
fn splice<T: Gene>(x: &[T], y: &[T], lo: usize, hi: usize) -> Vec<T> {
    let mut child = x.to_vec();
    child[lo..hi].copy_from_slice(&y[lo..hi]);
    child
}

/// Positions on the cycle through 0 keep `x`'s gene, the rest take `y`'s.
fn cycle_child<T: Gene>(x: &[T], y: &[T]) -> Vec<T> {
    let n = x.len();
    let mut child = y.to_vec();
    let mut on_cycle = vec![false; n];
    let mut i = 0;
    while !on_cycle[i] {
        on_cycle[i] = true;
        child[i] = x[i];
        match (0..n).find(|&j| !on_cycle[j] && x[j] == y[i]) {
            Some(j) => i = j,
            None => break,
        }
    }
    child
}

/// Keep `x[lo..hi]`, fill the other positions from `hi` onward with `y`'s
/// genes in `y`'s order, skipping one copy of each gene the kept segment
/// already holds.
fn order_child<T: Gene>(x: &[T], y: &[T], lo: usize, hi: usize) -> Vec<T> {
    let n = x.len();
    let mut child = x.to_vec();
    let mut kept: FxHashMap<T, usize> = FxHashMap::default();
    for &g in &x[lo..hi] {
        *kept.entry(g).or_insert(0) += 1;
    }

    let mut slots = (hi..n).chain(0..lo);
    for k in 0..n {
        let g = y[(hi + k) % n];
        if let Some(c) = kept.get_mut(&g) {
            if *c > 0 {
                *c -= 1;
                continue;
            }
        }
        match slots.next() {
            Some(pos) => child[pos] = g,
            None => break,
        }
    }
    child
}

/// Take `y[lo..hi]`; outside the segment map each of `x`'s genes through
/// the segment's `y → x` correspondence until it no longer collides.
fn partial_match_child<T: Gene>(x: &[T], y: &[T], lo: usize, hi: usize) -> Vec<T> {
    let n = x.len();
    let mut child = x.to_vec();
    child[lo..hi].copy_from_slice(&y[lo..hi]);

    for i in (0..lo).chain(hi..n) {
        let mut g = x[i];
        let mut hops = 0;
        while let Some(p) = (lo..hi).find(|&p| y[p] == g) {
            g = x[p];
            hops += 1;
            if hops > hi - lo {
                break;
            }
        }
        child[i] = g;
    }
    child
}
