use std::path::PathBuf;
use std::time::Duration;

use odr_core::Seconds;

/// How to invoke the simulator.
///
/// The command line is
///
/// ```text
/// <simulator> <simulator_args…> --net-file <net_file>
///     --additional-files <loops>,<route_file>,<emitters>
///     --begin <begin> --time-to-teleport <time_to_teleport>
/// ```
#[derive(Clone, Debug)]
pub struct BridgeConfig {
    pub simulator: PathBuf,
    /// Placed before the generated arguments.
    pub simulator_args: Vec<String>,
    pub net_file: PathBuf,
    /// Candidate routes, written once before the dynamic phase.
    pub route_file: PathBuf,
    pub time_to_teleport: Seconds,
    /// Induction-loop aggregation period in seconds.
    pub meas_freq: Seconds,
    /// Wall-clock limit of one simulator run.
    pub timeout: Duration,
    /// Parent of the per-evaluation directories.
    pub workspace_dir: PathBuf,
}

impl Default for BridgeConfig {
    fn default() -> Self {
        Self {
            simulator: PathBuf::from("sumo"),
            simulator_args: Vec::new(),
            net_file: PathBuf::new(),
            route_file: PathBuf::new(),
            time_to_teleport: 300,
            meas_freq: 10,
            timeout: Duration::from_secs(600),
            workspace_dir: std::env::temp_dir(),
        }
    }
}
