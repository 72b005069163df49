//! Genome initialisers and mutators.

use odr_core::SimRng;

use crate::{GenomeShape, Gene};

#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub enum Initializer {
    /// Every gene drawn uniformly from its allele set.
    Uniform,
    /// Gene `i` takes allele `i mod |set|`, spreading consecutive genes of
    /// one set across all its alleles.
    Ordered,
}

impl Initializer {
    pub fn initialize<T: Gene>(&self, shape: &GenomeShape<T>, rng: &mut SimRng) -> Vec<T> {
        match self {
            Initializer::Uniform => shape.iter().map(|s| s.random(rng)).collect(),
            Initializer::Ordered => shape.iter().enumerate().map(|(i, s)| s.get(i)).collect(),
        }
    }
}

#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub enum Mutation {
    /// Redraw the gene from its allele set.
    Flip,
    /// Exchange the gene with a random other position when both allele sets
    /// allow it.
    Swap,
}

impl Mutation {
    /// Mutate each gene with probability `p`; returns the number of genes
    /// that changed.
    pub fn mutate<T: Gene>(
        &self,
        genes: &mut [T],
        shape: &GenomeShape<T>,
        p: f64,
        rng: &mut SimRng,
    ) -> usize {
        if p <= 0.0 || genes.is_empty() {
            return 0;
        }
        let mut changed = 0;
        for i in 0..genes.len() {
            if !rng.gen_bool(p) {
                continue;
            }
            match self {
                Mutation::Flip => {
                    let g = shape.set(i).random(rng);
                    if g != genes[i] {
                        genes[i] = g;
                        changed += 1;
                    }
                }
                Mutation::Swap => {
                    let j = rng.index(genes.len());
                    if genes[i] != genes[j]
                        && shape.set(i).contains(&genes[j])
                        && shape.set(j).contains(&genes[i])
                    {
                        genes.swap(i, j);
                        changed += 2;
                    }
                }
            }
        }
        changed
    }
}
