//! Parent selection on scaled fitness.

use odr_core::SimRng;

use crate::Individual;

#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub enum Selection {
    /// Roulette over linear rank weights (best gets `n`, worst `1`).
    Rank,
    /// Probability proportional to fitness.
    Roulette,
    /// Two roulette draws; the fitter one wins.
    Tournament,
    Uniform,
    /// Integer parts of the expected copy counts are granted outright, the
    /// fractional parts by coin flip.
    StochasticRemainder,
    /// Integer parts granted outright, remaining slots go to the largest
    /// fractional parts.
    Deterministic,
}

impl Selection {
    /// Indices of `n` parents drawn from `members`.
    pub fn select<T>(&self, members: &[Individual<T>], n: usize, rng: &mut SimRng) -> Vec<usize> {
        if members.is_empty() {
            return Vec::new();
        }
        let fitness: Vec<f64> = members.iter().map(|m| m.fitness).collect();

        match self {
            Selection::Rank => {
                let mut order: Vec<usize> = (0..members.len()).collect();
                order.sort_by(|&a, &b| fitness[a].total_cmp(&fitness[b]));
                let mut weights = vec![0.0; members.len()];
                for (rank, &i) in order.iter().enumerate() {
                    weights[i] = (rank + 1) as f64;
                }
                (0..n).map(|_| roulette(&weights, rng)).collect()
            }
            Selection::Roulette => (0..n).map(|_| roulette(&fitness, rng)).collect(),
            Selection::Tournament => (0..n)
                .map(|_| {
                    let a = roulette(&fitness, rng);
                    let b = roulette(&fitness, rng);
                    if fitness[b] > fitness[a] { b } else { a }
                })
                .collect(),
            Selection::Uniform => (0..n).map(|_| rng.index(members.len())).collect(),
            Selection::StochasticRemainder | Selection::Deterministic => {
                let choices = sampling_choices(&fitness, *self == Selection::Deterministic, rng);
                (0..n).map(|_| choices[rng.index(choices.len())]).collect()
            }
        }
    }
}

/// Spin a wheel weighted by `weights`; uniform when no weight is positive.
fn roulette(weights: &[f64], rng: &mut SimRng) -> usize {
    let total: f64 = weights.iter().filter(|w| w.is_finite() && **w > 0.0).sum();
    if !(total > 0.0) {
        return rng.index(weights.len());
    }
    let mut cut = rng.gen_range(0.0..total);
    for (i, &w) in weights.iter().enumerate() {
        if !(w.is_finite() && w > 0.0) {
            continue;
        }
        if cut < w {
            return i;
        }
        cut -= w;
    }
    weights.iter().rposition(|w| w.is_finite() && *w > 0.0).unwrap_or(0)
}

/// Pool of `len` parent indices for the two remainder schemes.
fn sampling_choices(fitness: &[f64], deterministic: bool, rng: &mut SimRng) -> Vec<usize> {
    let n = fitness.len();
    let total: f64 = fitness.iter().sum();
    if !(total > 0.0) || !total.is_finite() {
        return (0..n).collect();
    }
    let mean = total / n as f64;
    let expected: Vec<f64> = fitness.iter().map(|f| f / mean).collect();

    let mut choices = Vec::with_capacity(n);
    for (i, e) in expected.iter().enumerate() {
        for _ in 0..(e.floor() as usize) {
            if choices.len() < n {
                choices.push(i);
            }
        }
    }
    let fraction = |i: usize| expected[i] - expected[i].floor();

    if deterministic {
        let mut order: Vec<usize> = (0..n).collect();
        order.sort_by(|&a, &b| fraction(b).total_cmp(&fraction(a)));
        let mut k = 0;
        while choices.len() < n {
            choices.push(order[k % n]);
            k += 1;
        }
    } else {
        let mut attempts = 0;
        while choices.len() < n && attempts < 100 * n {
            let i = rng.index(n);
            if rng.gen_bool(fraction(i)) {
                choices.push(i);
            }
            attempts += 1;
        }
        while choices.len() < n {
            choices.push(rng.index(n));
        }
    }
    choices
}
