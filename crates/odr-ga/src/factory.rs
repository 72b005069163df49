//! Builds concrete strategies from parsed [`GaParams`].

use odr_core::Logger;

use crate::{
    Crossover, CrossoverScheme, DistanceKind, GaKind, GaParams, Initializer, InitializerScheme,
    Mutation, MutatorScheme, Replacement, ReplacementScheme, Scaling, ScalingScheme, Selection,
    SelectionScheme, Termination, TerminationScheme,
};

/// One strategy per family, ready for an engine.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Strategies {
    pub initializer: Initializer,
    pub mutation: Mutation,
    pub crossover: Crossover,
    pub scaling: Scaling,
    pub selection: Selection,
    pub termination: Termination,
    pub replacement: Replacement,
}

/// Maps config enums (plus their numeric parameters) to strategies.
///
/// `distance` is the genome distance of the phase: multiset for route
/// genomes, positional for depart-time genomes.
pub struct StrategyFactory<'a> {
    params: &'a GaParams,
    distance: DistanceKind,
}

impl<'a> StrategyFactory<'a> {
    pub fn new(params: &'a GaParams, distance: DistanceKind) -> Self {
        Self { params, distance }
    }

    pub fn initializer(&self) -> Initializer {
        match self.params.initializer {
            InitializerScheme::Uniform => Initializer::Uniform,
            InitializerScheme::Ordered => Initializer::Ordered,
        }
    }

    pub fn mutation(&self) -> Mutation {
        match self.params.mutator {
            MutatorScheme::Flip => Mutation::Flip,
            MutatorScheme::Swap => Mutation::Swap,
        }
    }

    pub fn crossover(&self) -> Crossover {
        match self.params.crossover {
            CrossoverScheme::Cycle => Crossover::Cycle,
            CrossoverScheme::EvenOdd => Crossover::EvenOdd,
            CrossoverScheme::OnePoint => Crossover::OnePoint,
            CrossoverScheme::Order => Crossover::Order,
            CrossoverScheme::PartialMatch => Crossover::PartialMatch,
            CrossoverScheme::TwoPoint => Crossover::TwoPoint,
            CrossoverScheme::Uniform => Crossover::Uniform,
        }
    }

    pub fn scaling(&self) -> Scaling {
        let p = self.params;
        match p.scaling {
            ScalingScheme::NoScaling => Scaling::None,
            ScalingScheme::Linear => Scaling::Linear { multiplier: p.linear_multiplier },
            ScalingScheme::SigmaTruncation => {
                Scaling::SigmaTruncation { multiplier: p.sigma_multiplier }
            }
            ScalingScheme::PowerLaw => Scaling::PowerLaw { factor: p.power_factor },
            ScalingScheme::Sharing => Scaling::Sharing {
                cutoff: p.sharing_cutoff,
                alpha: p.sharing_alpha,
                distance: self.distance,
            },
        }
    }

    pub fn selection(&self) -> Selection {
        match self.params.selection {
            SelectionScheme::Rank => Selection::Rank,
            SelectionScheme::Roulette => Selection::Roulette,
            SelectionScheme::Tournament => Selection::Tournament,
            SelectionScheme::Uniform => Selection::Uniform,
            SelectionScheme::StochasticRemainder => Selection::StochasticRemainder,
            SelectionScheme::Deterministic => Selection::Deterministic,
        }
    }

    pub fn termination(&self) -> Termination {
        let p = self.params;
        match p.termination {
            TerminationScheme::UponGeneration => {
                Termination::UponGeneration { generations: p.generations }
            }
            TerminationScheme::UponConvergence => Termination::UponConvergence {
                generations: p.generations,
                window: p.convergence_generations,
                ratio: p.convergence_percentage,
            },
            TerminationScheme::UponPopConvergence => Termination::UponPopConvergence {
                generations: p.generations,
                ratio: p.convergence_percentage,
            },
        }
    }

    pub fn replacement(&self) -> Replacement {
        match self.params.replacement {
            ReplacementScheme::Random => Replacement::Random,
            ReplacementScheme::Best => Replacement::Best,
            ReplacementScheme::Worst => Replacement::Worst,
            ReplacementScheme::Custom => Replacement::Custom,
            ReplacementScheme::Crowding => Replacement::Crowding { distance: self.distance },
            ReplacementScheme::Parent => Replacement::Parent,
        }
    }

    /// All families at once, logging each choice.
    pub fn build(&self, logger: &dyn Logger) -> Strategies {
        let p = self.params;
        logger.info(&format!(">> Genetic algorithm [{}]", p.kind));
        logger.info(&format!(">> Initializer [{}]", p.initializer));
        logger.info(&format!(">> Mutator [{}]", p.mutator));
        logger.info(&format!(">> Crossover [{}]", p.crossover));
        logger.info(&format!(">> Scaling scheme [{}]", p.scaling));
        logger.info(&format!(">> Selection scheme [{}]", p.selection));
        logger.info(&format!(">> Termination function [{}]", p.termination));
        if p.kind == GaKind::Incremental {
            logger.info(&format!(">> Replacement scheme [{}]", p.replacement));
        } else if p.replacement != ReplacementScheme::Random {
            logger.warning("Replacement scheme can't be applied to a non-Incremental GA.");
        }

        Strategies {
            initializer: self.initializer(),
            mutation: self.mutation(),
            crossover: self.crossover(),
            scaling: self.scaling(),
            selection: self.selection(),
            termination: self.termination(),
            replacement: self.replacement(),
        }
    }
}
