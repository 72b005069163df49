//! Fitness scaling: raw scores → selection fitness.
//!
//! Scores are first oriented so that larger is better (a minimised score
//! `s` becomes `max + min − s`), then transformed.  Fitness is never
//! negative.

use crate::{DistanceKind, Direction, Gene, Individual};

#[derive(Copy, Clone, PartialEq, Debug)]
pub enum Scaling {
    None,
    /// Scale so the best gets `multiplier` × the mean, clamping at zero.
    Linear { multiplier: f64 },
    /// `f = s − (mean − multiplier · σ)`, clamped at zero.
    SigmaTruncation { multiplier: f64 },
    /// `f = s^factor`.
    PowerLaw { factor: i32 },
    /// Divide by the niche count `Σ 1 − (d / cutoff)^alpha` over members
    /// closer than `cutoff`.
    Sharing { cutoff: f64, alpha: f64, distance: DistanceKind },
}

impl Scaling {
    pub fn evaluate<T: Gene>(&self, members: &mut [Individual<T>], direction: Direction) {
        if members.is_empty() {
            return;
        }
        let raw = oriented(members, direction);

        let fitness: Vec<f64> = match *self {
            Scaling::None => raw,
            Scaling::Linear { multiplier } => linear(&raw, multiplier),
            Scaling::SigmaTruncation { multiplier } => {
                let (mean, dev) = mean_dev(&raw);
                raw.iter().map(|s| s - (mean - multiplier * dev)).collect()
            }
            Scaling::PowerLaw { factor } => raw.iter().map(|s| s.powi(factor)).collect(),
            Scaling::Sharing { cutoff, alpha, distance } => raw
                .iter()
                .enumerate()
                .map(|(i, s)| {
                    let niche: f64 = members
                        .iter()
                        .map(|m| distance.distance(&members[i].genes, &m.genes))
                        .filter(|&d| d < cutoff)
                        .map(|d| 1.0 - (d / cutoff).powf(alpha))
                        .sum();
                    if niche > 0.0 { s / niche } else { *s }
                })
                .collect(),
        };

        for (m, f) in members.iter_mut().zip(fitness) {
            m.fitness = if f.is_finite() { f.max(0.0) } else { 0.0 };
        }
    }
}

fn oriented<T>(members: &[Individual<T>], direction: Direction) -> Vec<f64> {
    match direction {
        Direction::Maximize => members.iter().map(|m| m.score).collect(),
        Direction::Minimize => {
            let max = members.iter().map(|m| m.score).fold(f64::NEG_INFINITY, f64::max);
            let min = members.iter().map(|m| m.score).fold(f64::INFINITY, f64::min);
            members.iter().map(|m| max + min - m.score).collect()
        }
    }
}

pub(crate) fn mean_dev(values: &[f64]) -> (f64, f64) {
    if values.is_empty() {
        return (0.0, 0.0);
    }
    let n = values.len() as f64;
    let mean = values.iter().sum::<f64>() / n;
    let var = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / n;
    (mean, var.sqrt())
}

fn linear(raw: &[f64], multiplier: f64) -> Vec<f64> {
    let max = raw.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let min = raw.iter().copied().fold(f64::INFINITY, f64::min);
    let (mean, _) = mean_dev(raw);

    let (a, b) = if min > (multiplier * mean - max) / (multiplier - 1.0) {
        let delta = max - mean;
        if delta > 0.0 {
            ((multiplier - 1.0) * mean / delta, mean * (max - multiplier * mean) / delta)
        } else {
            (1.0, 0.0)
        }
    } else {
        let delta = mean - min;
        if delta > 0.0 {
            (mean / delta, -min * mean / delta)
        } else {
            (1.0, 0.0)
        }
    };
    raw.iter().map(|s| a * s + b).collect()
}
