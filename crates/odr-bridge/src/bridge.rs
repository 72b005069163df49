//! `SimulationBridge`: the [`FlowSimulator`] backed by an external process.

use std::process::Command;

use odr_detector::DetectorFlowStore;
use odr_fitness::{Departure, FlowSimulator, Scenario, SimulationFailed};

use crate::{
    parse_measurements, run_with_timeout, write_emitter_file, write_loop_file, BridgeConfig,
    BridgeResult, DepartProfile, EvalWorkspace, LoopMap,
};

/// Runs one simulator process per evaluation.
///
/// The loop map and the depart profile of every catalog route are computed
/// once in [`new`](Self::new); an evaluation only writes its own workspace.
pub struct SimulationBridge<'a> {
    scenario: Scenario<'a>,
    config: BridgeConfig,
    loops: LoopMap,
    /// Indexed by `RouteId`.
    profiles: Vec<DepartProfile>,
}

impl<'a> SimulationBridge<'a> {
    pub fn new(scenario: Scenario<'a>, config: BridgeConfig) -> BridgeResult<Self> {
        let loops = LoopMap::new(scenario.detectors, scenario.logger);
        let profiles = scenario
            .catalog
            .routes()
            .map(|(id, _)| DepartProfile::for_route(&scenario, id))
            .collect::<Result<Vec<_>, _>>()?;
        std::fs::create_dir_all(&config.workspace_dir)?;
        scenario.logger.info(&format!(
            "Simulation bridge: {} induction loops, {} routes, simulator [{}]",
            loops.len(),
            profiles.len(),
            config.simulator.display()
        ));
        Ok(Self { scenario, config, loops, profiles })
    }

    pub fn config(&self) -> &BridgeConfig {
        &self.config
    }

    pub fn loops(&self) -> &LoopMap {
        &self.loops
    }

    pub fn profiles(&self) -> &[DepartProfile] {
        &self.profiles
    }

    /// The simulator command for `ws`.
    pub fn command(&self, ws: &EvalWorkspace) -> Command {
        let c = &self.config;
        let additional = format!(
            "{},{},{}",
            ws.loops().display(),
            c.route_file.display(),
            ws.emitters().display()
        );
        let mut cmd = Command::new(&c.simulator);
        cmd.args(&c.simulator_args)
            .arg("--net-file")
            .arg(&c.net_file)
            .arg("--additional-files")
            .arg(additional)
            .arg("--begin")
            .arg(self.scenario.goal.grid().begin.to_string())
            .arg("--time-to-teleport")
            .arg(c.time_to_teleport.to_string());
        cmd
    }

    /// Write, run, read back.  The workspace is removed on return.
    ///
    /// Simulated series of detectors without observations are dropped, so
    /// only observed detectors are compared.
    pub fn run(&self, departures: &[Departure]) -> BridgeResult<DetectorFlowStore> {
        let ws = EvalWorkspace::create(&self.config.workspace_dir)?;
        let logger = self.scenario.logger;
        logger.debug(&format!(
            "Evaluation {}: {} vehicles in [{}]",
            ws.id(),
            departures.len(),
            ws.dir().display()
        ));

        write_loop_file(&ws.loops(), &self.loops, self.config.meas_freq, &ws.measurements())?;
        write_emitter_file(&ws.emitters(), departures, self.scenario.catalog, &self.profiles)?;
        run_with_timeout(&mut self.command(&ws), &ws.console(), self.config.timeout)?;

        let goal = self.scenario.goal;
        let mut simulated = parse_measurements(&ws.measurements(), &self.loops, goal.grid(), logger)?;
        for det in simulated.detectors() {
            if !goal.knows(det) {
                simulated.remove(det);
            }
        }
        Ok(simulated)
    }
}

impl FlowSimulator for SimulationBridge<'_> {
    fn simulate(&self, departures: &[Departure]) -> Result<DetectorFlowStore, SimulationFailed> {
        self.run(departures).map_err(SimulationFailed::from)
    }
}
