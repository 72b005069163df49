//! Every option of a disaggregation run.

use std::path::PathBuf;
use std::time::Duration;

use odr_bridge::BridgeConfig;
use odr_core::{Seconds, TimeGrid};
use odr_detector::{FlowFileOptions, TypeOptions};
use odr_ga::{GaParams, ScoreSelection};
use odr_routes::CatalogOptions;

use crate::{DriverError, DriverResult};

/// Options of one run.  `Default` gives the documented defaults except
/// `k_shortest_routes`, which has none and must be set.
///
/// Call [`validate`](Self::validate) before any work; the driver does so in
/// [`DisaggregationDriver::new`][crate::DisaggregationDriver::new].
#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default, rename_all = "kebab-case"))]
pub struct DisaggregationConfig {
    // ── time ──────────────────────────────────────────────────────────────
    pub begin: Seconds,
    pub end: Seconds,
    pub time_step: Seconds,
    /// Flow-file time = `Time × time_factor − time_offset`.
    pub time_offset: Seconds,
    pub time_factor: Seconds,

    // ── routes ────────────────────────────────────────────────────────────
    /// 0 means unset.
    pub k_shortest_routes: usize,
    pub k_shortest_selected: Option<usize>,
    pub strict_sources: bool,
    pub keep_turnarounds: bool,

    // ── phases ────────────────────────────────────────────────────────────
    /// Fraction of the maximum score the static solution must reach for
    /// the dynamic phase to run.
    pub dynamic_trigger: f64,
    pub ga: GaParams,

    // ── score files and output ────────────────────────────────────────────
    pub score_freq: usize,
    pub flush_freq: usize,
    /// Per-phase score files get a `static_` / `dyn_` prefix.  `None`
    /// writes none.
    pub score_file: Option<PathBuf>,
    pub select_scores: ScoreSelection,
    /// Route summary and best solutions are written here when set.
    pub output_dir: Option<PathBuf>,

    // ── simulator ─────────────────────────────────────────────────────────
    pub simulator: PathBuf,
    pub simulator_args: Vec<String>,
    /// Network file in the simulator's own format.
    pub net_file: Option<PathBuf>,
    /// Written with the candidate routes before the dynamic phase.
    pub route_file: PathBuf,
    pub time_to_teleport: Seconds,
    pub meas_freq: Seconds,
    pub simulation_timeout: Duration,
    pub workspace_dir: PathBuf,
}

impl Default for DisaggregationConfig {
    fn default() -> Self {
        let bridge = BridgeConfig::default();
        let flows = FlowFileOptions::default();
        Self {
            begin: 0,
            end: 86_400,
            time_step: 60,
            time_offset: flows.time_offset,
            time_factor: flows.time_factor,
            k_shortest_routes: 0,
            k_shortest_selected: None,
            strict_sources: false,
            keep_turnarounds: false,
            dynamic_trigger: 0.7,
            ga: GaParams::default(),
            score_freq: 1,
            flush_freq: 0,
            score_file: Some(PathBuf::from("gar_stats.dat")),
            select_scores: ScoreSelection::default(),
            output_dir: None,
            simulator: bridge.simulator,
            simulator_args: bridge.simulator_args,
            net_file: None,
            route_file: PathBuf::from("routes.rou.xml"),
            time_to_teleport: bridge.time_to_teleport,
            meas_freq: bridge.meas_freq,
            simulation_timeout: bridge.timeout,
            workspace_dir: bridge.workspace_dir,
        }
    }
}

impl DisaggregationConfig {
    /// Report the first configuration error, if any.
    pub fn validate(&self) -> DriverResult<()> {
        self.grid()?;
        if self.k_shortest_routes == 0 {
            return Err(DriverError::Config(
                "k-shortest-routes is required and must be at least 1".into(),
            ));
        }
        if self.k_shortest_selected == Some(0) {
            return Err(DriverError::Config("k-shortest-selected must be at least 1".into()));
        }
        self.catalog_options().validate()?;
        if !(0.0..=1.0).contains(&self.dynamic_trigger) {
            return Err(DriverError::Config(format!(
                "dynamic-trigger must lie in [0, 1], got {}",
                self.dynamic_trigger
            )));
        }
        if self.time_factor <= 0 {
            return Err(DriverError::Config(format!(
                "time-factor must be positive, got {}",
                self.time_factor
            )));
        }
        if self.meas_freq <= 0 {
            return Err(DriverError::Config(format!(
                "meas-freq must be positive, got {}",
                self.meas_freq
            )));
        }
        if self.simulation_timeout.is_zero() {
            return Err(DriverError::Config("simulation-timeout must be positive".into()));
        }
        self.ga.validate()?;
        Ok(())
    }

    pub fn grid(&self) -> DriverResult<TimeGrid> {
        Ok(TimeGrid::new(self.begin, self.end, self.time_step)?)
    }

    pub fn catalog_options(&self) -> CatalogOptions {
        CatalogOptions { k: self.k_shortest_routes, k_selected: self.k_shortest_selected }
    }

    pub fn type_options(&self) -> TypeOptions {
        TypeOptions { strict_sources: self.strict_sources, keep_turnarounds: self.keep_turnarounds }
    }

    pub fn flow_file_options(&self) -> FlowFileOptions {
        FlowFileOptions { time_offset: self.time_offset, time_factor: self.time_factor }
    }

    /// Simulator invocation settings.  Fails without a simulator network.
    pub fn bridge_config(&self) -> DriverResult<BridgeConfig> {
        let net_file = self
            .net_file
            .clone()
            .ok_or_else(|| DriverError::Config("the dynamic phase needs a simulator net-file".into()))?;
        Ok(BridgeConfig {
            simulator: self.simulator.clone(),
            simulator_args: self.simulator_args.clone(),
            net_file,
            route_file: self.route_file.clone(),
            time_to_teleport: self.time_to_teleport,
            meas_freq: self.meas_freq,
            timeout: self.simulation_timeout,
            workspace_dir: self.workspace_dir.clone(),
        })
    }

    /// Minimum static score that triggers the dynamic phase.
    pub fn trigger_score(&self) -> f64 {
        self.dynamic_trigger * 100.0
    }
}
