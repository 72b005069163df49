//! Command-line options and their mapping onto `DisaggregationConfig`.

use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;

use odr_core::Logger;
use odr_driver::DisaggregationConfig;
use odr_ga::{
    CrossoverScheme, Direction, GaKind, GaParams, InitializerScheme, MutatorScheme,
    ReplacementScheme, ScalingScheme, ScoreSelection, SelectionScheme, TerminationScheme,
};

/// Disaggregate an OD matrix into vehicle routes and depart times that
/// reproduce observed detector flows.
#[derive(Parser, Debug)]
#[command(name = "odr", version)]
pub struct Args {
    // ── inputs ────────────────────────────────────────────────────────────
    /// Network CSV: edge_id,from_node,to_node,length_m,speed_mps[,internal]
    #[arg(long)]
    pub net: PathBuf,
    /// Detector CSV: detector_id,lane_id,pos[,type]
    #[arg(long)]
    pub detectors: PathBuf,
    /// District CSV: district,group,edge,role
    #[arg(long)]
    pub districts: PathBuf,
    /// OD matrix in V-format
    #[arg(long)]
    pub od_matrix: PathBuf,
    /// Detector flow file (`;`-separated)
    #[arg(long)]
    pub flows: PathBuf,

    /// Raise logging to debug
    #[arg(short, long)]
    pub verbose: bool,

    // ── time ──────────────────────────────────────────────────────────────
    #[arg(long, default_value_t = 0)]
    pub begin: i64,
    #[arg(long, default_value_t = 86_400)]
    pub end: i64,
    #[arg(long, default_value_t = 60)]
    pub time_step: i64,
    #[arg(long, default_value_t = 0)]
    pub time_offset: i64,
    #[arg(long, default_value_t = 60)]
    pub time_factor: i64,

    // ── routes ────────────────────────────────────────────────────────────
    #[arg(short = 'k', long)]
    pub k_shortest_routes: usize,
    #[arg(long)]
    pub k_shortest_selected: Option<usize>,
    #[arg(long)]
    pub strict_sources: bool,
    #[arg(long)]
    pub keep_turnarounds: bool,

    // ── phases ────────────────────────────────────────────────────────────
    #[arg(long, default_value_t = 0.7)]
    pub dynamic_trigger: f64,
    #[arg(long, default_value = "Simple")]
    pub genetic_algorithm: GaKind,
    #[arg(long)]
    pub ga_seed: Option<u64>,
    #[arg(long, default_value_t = 250)]
    pub number_of_generations: usize,
    #[arg(long, default_value_t = 30)]
    pub population_size: usize,
    #[arg(long, default_value_t = 10)]
    pub number_of_populations: usize,
    #[arg(long, default_value_t = 0.99)]
    pub convergence_percentage: f64,
    #[arg(long, default_value_t = 20)]
    pub convergence_generations: usize,
    #[arg(long, default_value_t = 0.9)]
    pub crossover_probability: f64,
    #[arg(long, default_value_t = 0.01)]
    pub mutation_probability: f64,
    #[arg(long, default_value_t = 0.25)]
    pub replacement_percentage: f64,
    #[arg(long, default_value_t = 5)]
    pub replacement_number: usize,
    /// 1 maximizes, -1 minimizes
    #[arg(long, default_value_t = 1, allow_hyphen_values = true)]
    pub mini_maxi_scaling: i32,
    #[arg(long, default_value_t = 1)]
    pub number_of_best: usize,
    #[arg(long, default_value_t = true, action = clap::ArgAction::Set)]
    pub elitism: bool,
    #[arg(long, default_value_t = 2)]
    pub number_of_offspring: usize,
    #[arg(long)]
    pub record_diversity: bool,
    #[arg(long, default_value_t = 0.1)]
    pub migration_percentage: f64,
    #[arg(long, default_value_t = 5)]
    pub migration_number: usize,
    #[arg(long, default_value = "Uniform")]
    pub genome_initializer: InitializerScheme,
    #[arg(long, default_value = "Flip")]
    pub genome_mutator: MutatorScheme,
    /// Unknown names fall back to OnePoint with a warning
    #[arg(long, default_value = "OnePoint")]
    pub genome_crossover: String,
    #[arg(long, default_value = "Linear")]
    pub scaling_scheme: ScalingScheme,
    #[arg(long, default_value_t = 1.2)]
    pub linear_scaling_multiplier: f64,
    #[arg(long, default_value_t = 2.0)]
    pub sigma_truncation_multiplier: f64,
    #[arg(long, default_value_t = 1)]
    pub power_scaling_factor: i32,
    #[arg(long, default_value_t = 1.0)]
    pub sharing_cutoff: f64,
    #[arg(long, default_value_t = 1.0)]
    pub sharing_alpha: f64,
    #[arg(long, default_value = "Roulette")]
    pub selection_scheme: SelectionScheme,
    #[arg(long, default_value = "UponGeneration")]
    pub termination_function: TerminationScheme,
    #[arg(long, default_value = "Random")]
    pub replacement_scheme: ReplacementScheme,

    // ── output ────────────────────────────────────────────────────────────
    #[arg(long, default_value_t = 1)]
    pub score_freq: usize,
    #[arg(long, default_value_t = 0)]
    pub flush_freq: usize,
    #[arg(long, default_value = "gar_stats.dat")]
    pub score_file: PathBuf,
    /// `|`-separated: Mean, Maximum, Minimum, Deviation, Diversity; or All / None
    #[arg(long, default_value = "Maximum")]
    pub select_scores: ScoreSelection,
    #[arg(long)]
    pub output_dir: Option<PathBuf>,

    // ── simulator ─────────────────────────────────────────────────────────
    #[arg(long, default_value = "sumo")]
    pub simulator: PathBuf,
    /// Network file in the simulator's format; required for the dynamic phase
    #[arg(long)]
    pub sim_net_file: Option<PathBuf>,
    #[arg(long, default_value = "routes.rou.xml")]
    pub route_file: PathBuf,
    #[arg(long, default_value_t = 300)]
    pub time_to_teleport: i64,
    #[arg(long, default_value_t = 10)]
    pub meas_freq: i64,
    /// Seconds
    #[arg(long, default_value_t = 600)]
    pub simulation_timeout: u64,
    #[arg(long)]
    pub workspace_dir: Option<PathBuf>,
}

impl Args {
    pub fn config(&self, logger: &dyn Logger) -> anyhow::Result<DisaggregationConfig> {
        let defaults = DisaggregationConfig::default();
        let ga = GaParams {
            kind: self.genetic_algorithm,
            seed: self.ga_seed,
            generations: self.number_of_generations,
            population_size: self.population_size,
            populations: self.number_of_populations,
            convergence_percentage: self.convergence_percentage,
            convergence_generations: self.convergence_generations,
            crossover_probability: self.crossover_probability,
            mutation_probability: self.mutation_probability,
            replacement_percentage: self.replacement_percentage,
            replacement_number: self.replacement_number,
            direction: Direction::from_mini_maxi(self.mini_maxi_scaling)?,
            number_of_best: self.number_of_best,
            elitism: self.elitism,
            offspring: self.number_of_offspring,
            record_diversity: self.record_diversity,
            migration_percentage: self.migration_percentage,
            migration_number: self.migration_number,
            initializer: self.genome_initializer,
            mutator: self.genome_mutator,
            crossover: CrossoverScheme::parse_or_one_point(&self.genome_crossover, logger),
            scaling: self.scaling_scheme,
            linear_multiplier: self.linear_scaling_multiplier,
            sigma_multiplier: self.sigma_truncation_multiplier,
            power_factor: self.power_scaling_factor,
            sharing_cutoff: self.sharing_cutoff,
            sharing_alpha: self.sharing_alpha,
            selection: self.selection_scheme,
            termination: self.termination_function,
            replacement: self.replacement_scheme,
        };

        Ok(DisaggregationConfig {
            begin: self.begin,
            end: self.end,
            time_step: self.time_step,
            time_offset: self.time_offset,
            time_factor: self.time_factor,
            k_shortest_routes: self.k_shortest_routes,
            k_shortest_selected: self.k_shortest_selected,
            strict_sources: self.strict_sources,
            keep_turnarounds: self.keep_turnarounds,
            dynamic_trigger: self.dynamic_trigger,
            ga,
            score_freq: self.score_freq,
            flush_freq: self.flush_freq,
            score_file: Some(self.score_file.clone()),
            select_scores: self.select_scores.clone(),
            output_dir: self.output_dir.clone(),
            simulator: self.simulator.clone(),
            simulator_args: Vec::new(),
            net_file: self.sim_net_file.clone(),
            route_file: self.route_file.clone(),
            time_to_teleport: self.time_to_teleport,
            meas_freq: self.meas_freq,
            simulation_timeout: Duration::from_secs(self.simulation_timeout),
            workspace_dir: self.workspace_dir.clone().unwrap_or(defaults.workspace_dir),
        })
    }
}
