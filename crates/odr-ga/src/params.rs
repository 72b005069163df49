//! GA parameters and the scheme names they are parsed from.
//!
//! Every strategy family has a config enum parsed once with `FromStr`.
//! Unknown names are [`GaError::UnknownScheme`]; the only lenient parse is
//! [`CrossoverScheme::parse_or_one_point`].

use std::fmt;
use std::str::FromStr;

use odr_core::Logger;

use crate::{Direction, GaError, GaResult};

/// Declares a config enum whose variants parse from one or more names.
/// The first name of each variant is its canonical spelling.
macro_rules! scheme {
    (
        $(#[$meta:meta])*
        $name:ident, $family:literal {
            $( $variant:ident => $canon:literal $(| $alias:literal)* ),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Copy, Clone, PartialEq, Eq, Hash, Debug)]
        #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
        pub enum $name {
            $($variant),+
        }

        impl $name {
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            pub fn name(self) -> &'static str {
                match self {
                    $($name::$variant => $canon),+
                }
            }
        }

        impl FromStr for $name {
            type Err = GaError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s.trim() {
                    $($canon $(| $alias)* => Ok($name::$variant),)+
                    other => Err(GaError::UnknownScheme {
                        family: $family,
                        name: other.to_owned(),
                    }),
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.name())
            }
        }
    };
}

scheme! {
    /// Which engine drives the generations.
    GaKind, "genetic algorithm" {
        Simple => "Simple",
        SteadyState => "SteadyState",
        Incremental => "Incremental",
        Deme => "Deme",
    }
}

scheme! {
    ScalingScheme, "scaling scheme" {
        NoScaling => "NoScaling",
        Linear => "Linear",
        SigmaTruncation => "SigmaTruncation",
        PowerLaw => "PowerLaw",
        Sharing => "Sharing",
    }
}

scheme! {
    SelectionScheme, "selection scheme" {
        Rank => "Rank",
        Roulette => "Roulette",
        Tournament => "Tournament",
        Uniform => "Uniform",
        StochasticRemainder => "SRS" | "StochasticRemainder",
        Deterministic => "DS" | "Deterministic",
    }
}

scheme! {
    CrossoverScheme, "crossover" {
        Cycle => "Cycle",
        EvenOdd => "EvenOdd",
        OnePoint => "OnePoint",
        Order => "Order",
        PartialMatch => "PartialMatch",
        TwoPoint => "TwoPoint",
        Uniform => "Uniform",
    }
}

scheme! {
    MutatorScheme, "mutator" {
        Flip => "Flip",
        Swap => "Swap",
    }
}

scheme! {
    InitializerScheme, "initializer" {
        Uniform => "Uniform",
        Ordered => "Ordered",
    }
}

scheme! {
    TerminationScheme, "termination function" {
        UponGeneration => "UponGeneration",
        UponConvergence => "UponConvergence",
        UponPopConvergence => "UponPopConvergence",
    }
}

scheme! {
    /// Which member an Incremental GA child replaces.
    ReplacementScheme, "replacement scheme" {
        Random => "Random",
        Best => "Best",
        Worst => "Worst",
        Custom => "Custom",
        Crowding => "Crowding",
        Parent => "Parent",
    }
}

impl CrossoverScheme {
    /// Parse `name`, falling back to one-point crossover with a warning when
    /// the name is unknown.
    pub fn parse_or_one_point(name: &str, logger: &dyn Logger) -> Self {
        match name.parse() {
            Ok(scheme) => scheme,
            Err(_) => {
                logger.warning(&format!(
                    "Unknown crossover [{}]; using OnePoint crossover",
                    name.trim()
                ));
                CrossoverScheme::OnePoint
            }
        }
    }
}

// ── Score columns ─────────────────────────────────────────────────────────────

/// One statistic a score file can report per generation.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ScoreColumn {
    Mean,
    Maximum,
    Minimum,
    Deviation,
    Diversity,
}

impl ScoreColumn {
    pub const ALL: [ScoreColumn; 5] = [
        ScoreColumn::Mean,
        ScoreColumn::Maximum,
        ScoreColumn::Minimum,
        ScoreColumn::Deviation,
        ScoreColumn::Diversity,
    ];

    pub fn name(self) -> &'static str {
        match self {
            ScoreColumn::Mean => "mean",
            ScoreColumn::Maximum => "maximum",
            ScoreColumn::Minimum => "minimum",
            ScoreColumn::Deviation => "deviation",
            ScoreColumn::Diversity => "diversity",
        }
    }
}

/// The `select-scores` option: a `|`-separated list of columns, or
/// `All` / `None`.  A `GAStatistics::` prefix on each token is accepted.
#[derive(Clone, PartialEq, Eq, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ScoreSelection(Vec<ScoreColumn>);

impl ScoreSelection {
    pub fn new(columns: Vec<ScoreColumn>) -> Self {
        let mut ordered: Vec<ScoreColumn> = ScoreColumn::ALL.to_vec();
        ordered.retain(|c| columns.contains(c));
        Self(ordered)
    }

    pub fn all() -> Self {
        Self(ScoreColumn::ALL.to_vec())
    }

    pub fn none() -> Self {
        Self(Vec::new())
    }

    /// Selected columns in canonical order.
    pub fn columns(&self) -> &[ScoreColumn] {
        &self.0
    }

    pub fn contains(&self, column: ScoreColumn) -> bool {
        self.0.contains(&column)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl Default for ScoreSelection {
    fn default() -> Self {
        Self(vec![ScoreColumn::Maximum])
    }
}

impl FromStr for ScoreSelection {
    type Err = GaError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut columns = Vec::new();
        for token in s.split('|').map(str::trim).filter(|t| !t.is_empty()) {
            let token = token.strip_prefix("GAStatistics::").unwrap_or(token);
            let column = match token {
                "None" | "NoScores" => return Ok(Self::none()),
                "All" | "AllScores" => return Ok(Self::all()),
                "Mean" => ScoreColumn::Mean,
                "Maximum" => ScoreColumn::Maximum,
                "Minimum" => ScoreColumn::Minimum,
                "Deviation" => ScoreColumn::Deviation,
                "Diversity" => ScoreColumn::Diversity,
                other => {
                    return Err(GaError::UnknownScheme {
                        family: "score selection",
                        name: other.to_owned(),
                    })
                }
            };
            columns.push(column);
        }
        Ok(Self::new(columns))
    }
}

// ── GaParams ──────────────────────────────────────────────────────────────────

/// Every knob of one GA run.
///
/// `Default` gives the documented option defaults.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GaParams {
    pub kind: GaKind,
    pub seed: Option<u64>,
    pub generations: usize,
    pub population_size: usize,
    /// Deme only.
    pub populations: usize,
    pub convergence_percentage: f64,
    pub convergence_generations: usize,
    pub crossover_probability: f64,
    /// Per gene.
    pub mutation_probability: f64,
    pub replacement_percentage: f64,
    /// Used when `replacement_percentage` is 0.
    pub replacement_number: usize,
    pub direction: Direction,
    pub number_of_best: usize,
    pub elitism: bool,
    /// Incremental only, 1 or 2.
    pub offspring: usize,
    pub record_diversity: bool,
    pub migration_percentage: f64,
    /// Used when `migration_percentage` is 0.
    pub migration_number: usize,
    pub initializer: InitializerScheme,
    pub mutator: MutatorScheme,
    pub crossover: CrossoverScheme,
    pub scaling: ScalingScheme,
    pub linear_multiplier: f64,
    pub sigma_multiplier: f64,
    pub power_factor: i32,
    pub sharing_cutoff: f64,
    pub sharing_alpha: f64,
    pub selection: SelectionScheme,
    pub termination: TerminationScheme,
    pub replacement: ReplacementScheme,
}

impl Default for GaParams {
    fn default() -> Self {
        Self {
            kind: GaKind::Simple,
            seed: None,
            generations: 250,
            population_size: 30,
            populations: 10,
            convergence_percentage: 0.99,
            convergence_generations: 20,
            crossover_probability: 0.9,
            mutation_probability: 0.01,
            replacement_percentage: 0.25,
            replacement_number: 5,
            direction: Direction::Maximize,
            number_of_best: 1,
            elitism: true,
            offspring: 2,
            record_diversity: false,
            migration_percentage: 0.1,
            migration_number: 5,
            initializer: InitializerScheme::Uniform,
            mutator: MutatorScheme::Flip,
            crossover: CrossoverScheme::OnePoint,
            scaling: ScalingScheme::Linear,
            linear_multiplier: 1.2,
            sigma_multiplier: 2.0,
            power_factor: 1,
            sharing_cutoff: 1.0,
            sharing_alpha: 1.0,
            selection: SelectionScheme::Roulette,
            termination: TerminationScheme::UponGeneration,
            replacement: ReplacementScheme::Random,
        }
    }
}

fn probability(name: &str, p: f64) -> GaResult<()> {
    if (0.0..=1.0).contains(&p) {
        Ok(())
    } else {
        Err(GaError::Config(format!("{name} must lie in [0, 1], got {p}")))
    }
}

impl GaParams {
    pub fn validate(&self) -> GaResult<()> {
        if self.population_size < 2 {
            return Err(GaError::Config(format!(
                "population-size must be at least 2, got {}",
                self.population_size
            )));
        }
        if self.kind == GaKind::Deme && self.populations == 0 {
            return Err(GaError::Config("number-of-populations must be at least 1".into()));
        }
        probability("crossover-probability", self.crossover_probability)?;
        probability("mutation-probability", self.mutation_probability)?;
        probability("replacement-percentage", self.replacement_percentage)?;
        probability("migration-percentage", self.migration_percentage)?;
        if !(self.convergence_percentage > 0.0 && self.convergence_percentage <= 1.0) {
            return Err(GaError::Config(format!(
                "convergence-percentage must lie in (0, 1], got {}",
                self.convergence_percentage
            )));
        }
        if self.convergence_generations == 0 {
            return Err(GaError::Config("convergence-generations must be at least 1".into()));
        }
        if !(1..=2).contains(&self.offspring) {
            return Err(GaError::Config(format!(
                "number-of-offspring must be 1 or 2, got {}",
                self.offspring
            )));
        }
        if self.replacement_percentage == 0.0 && self.replacement_number == 0 {
            return Err(GaError::Config(
                "replacement-percentage and replacement-number are both 0".into(),
            ));
        }
        if self.number_of_best == 0 {
            return Err(GaError::Config("number-of-best must be at least 1".into()));
        }
        if self.scaling == ScalingScheme::Linear && self.linear_multiplier <= 1.0 {
            return Err(GaError::Config(format!(
                "linear-scaling-multiplier must be greater than 1, got {}",
                self.linear_multiplier
            )));
        }
        if self.scaling == ScalingScheme::SigmaTruncation && self.sigma_multiplier < 0.0 {
            return Err(GaError::Config(format!(
                "sigma-truncation-multiplier must not be negative, got {}",
                self.sigma_multiplier
            )));
        }
        if self.scaling == ScalingScheme::Sharing && self.sharing_cutoff <= 0.0 {
            return Err(GaError::Config(format!(
                "sharing-cutoff must be positive, got {}",
                self.sharing_cutoff
            )));
        }
        Ok(())
    }

    /// Children per steady-state generation.
    pub fn replacement_count(&self, population: usize) -> usize {
        let n = if self.replacement_percentage > 0.0 {
            ((self.replacement_percentage * population as f64).round() as usize).max(1)
        } else {
            self.replacement_number
        };
        n.clamp(1, population)
    }

    /// Emigrants per deme and generation.
    pub fn migration_count(&self, population: usize) -> usize {
        let n = if self.migration_percentage > 0.0 {
            ((self.migration_percentage * population as f64).round() as usize).max(1)
        } else {
            self.migration_number
        };
        n.min(population)
    }
}
