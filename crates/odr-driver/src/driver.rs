//! The `DisaggregationDriver` state machine.

use std::path::Path;
use std::sync::Arc;

use odr_bridge::SimulationBridge;
use odr_core::{Logger, RouteId, Seconds, SimRng};
use odr_detector::{DetectorFlowStore, DetectorRegistry};
use odr_fitness::{AlleleBuilder, DynamicScorer, FlowSimulator, Scenario, StaticLayout, StaticScorer};
use odr_ga::{DistanceKind, GaBuilder, Gene, GenomeShape, Individual, NoopObserver};
use odr_network::RoadNetwork;
use odr_output::{
    write_dynamic_solution, write_route_csv, write_route_file, write_static_solution,
    CsvScoreWriter, OutputError, Phase, ScoreFileObserver,
};
use odr_routes::{DistrictRegistry, OdMatrix, RouteCatalog};

use crate::{DisaggregationConfig, DriverError, DriverResult};

// ── State ─────────────────────────────────────────────────────────────────────

/// Where a driver is in its run.
///
/// ```text
/// Idle → StaticBuilt → StaticEvolved → TriggerCheck ─┬→ DynamicBuilt → DynamicEvolved → Done
///                                                    └→ Done   (static score below trigger)
/// ```
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub enum DriverState {
    Idle,
    StaticBuilt,
    StaticEvolved,
    TriggerCheck,
    DynamicBuilt,
    DynamicEvolved,
    Done,
}

// ── Inputs ────────────────────────────────────────────────────────────────────

/// The collaborator-built inputs, all read-only for the whole run.
#[derive(Copy, Clone)]
pub struct Inputs<'a> {
    pub network: &'a RoadNetwork,
    pub detectors: &'a DetectorRegistry,
    pub districts: &'a DistrictRegistry,
    pub od: &'a OdMatrix,
    /// Observed flows.
    pub flows: &'a DetectorFlowStore,
}

impl Inputs<'_> {
    /// Fail on the first empty input.
    pub fn check(&self) -> DriverResult<()> {
        if self.network.edge_count() == 0 {
            return Err(DriverError::Missing("the road network has no edges"));
        }
        if self.detectors.is_empty() {
            return Err(DriverError::Missing("no detectors are defined"));
        }
        if self.districts.is_empty() {
            return Err(DriverError::Missing("no districts are defined"));
        }
        if self.od.total_trips() == 0 {
            return Err(DriverError::Missing("the OD matrix holds no vehicles"));
        }
        if self.flows.is_empty() {
            return Err(DriverError::Missing("no detector flows are loaded"));
        }
        Ok(())
    }
}

// ── Simulator source ──────────────────────────────────────────────────────────

/// Creates the flow simulator of the dynamic phase once the static phase
/// has fixed the scenario.
pub trait SimulatorFactory {
    fn simulator<'s>(&self, scenario: Scenario<'s>) -> DriverResult<Box<dyn FlowSimulator + 's>>;
}

/// Runs the external simulator through a [`SimulationBridge`].
///
/// Writes the candidate routes to the configured route file first, since
/// every simulator run reads them.
pub struct BridgeFactory<'c> {
    config: &'c DisaggregationConfig,
}

impl<'c> BridgeFactory<'c> {
    pub fn new(config: &'c DisaggregationConfig) -> Self {
        Self { config }
    }
}

impl SimulatorFactory for BridgeFactory<'_> {
    fn simulator<'s>(&self, scenario: Scenario<'s>) -> DriverResult<Box<dyn FlowSimulator + 's>> {
        let bridge = self.config.bridge_config()?;
        write_route_file(&bridge.route_file, scenario.catalog, scenario.network)?;
        scenario.logger.info(&format!(
            "Wrote {} routes to [{}]",
            scenario.catalog.len(),
            bridge.route_file.display()
        ));
        Ok(Box::new(SimulationBridge::new(scenario, bridge)?))
    }
}

// ── Driver ────────────────────────────────────────────────────────────────────

/// Best genomes of a finished run.
#[derive(Clone, Debug)]
pub struct Solutions {
    pub static_solution: Individual<RouteId>,
    /// `None` when the static score stayed below the trigger.
    pub dynamic_solution: Option<Individual<Seconds>>,
}

/// Drives the static route-choice GA, the trigger check, and the dynamic
/// depart-time GA.
///
/// The phases can be stepped one by one or run at once with
/// [`run`](Self::run).  Calling a step out of order is a
/// [`DriverError::State`].
pub struct DisaggregationDriver<'a> {
    config: DisaggregationConfig,
    inputs: Inputs<'a>,
    logger: Arc<dyn Logger>,
    rng: SimRng,
    state: DriverState,

    catalog: RouteCatalog,
    layout: StaticLayout,
    static_solution: Option<Individual<RouteId>>,
    dynamic_shape: GenomeShape<Seconds>,
    dynamic_solution: Option<Individual<Seconds>>,
}

impl<'a> DisaggregationDriver<'a> {
    /// Validate `config` and check that every input is present.
    pub fn new(
        config: DisaggregationConfig,
        inputs: Inputs<'a>,
        logger: Arc<dyn Logger>,
    ) -> DriverResult<Self> {
        config.validate()?;
        inputs.check()?;
        let rng = SimRng::from_optional_seed(config.ga.seed);
        Ok(Self {
            config,
            inputs,
            logger,
            rng,
            state: DriverState::Idle,
            catalog: RouteCatalog::new(),
            layout: StaticLayout::default(),
            static_solution: None,
            dynamic_shape: GenomeShape::default(),
            dynamic_solution: None,
        })
    }

    pub fn state(&self) -> DriverState {
        self.state
    }

    pub fn config(&self) -> &DisaggregationConfig {
        &self.config
    }

    pub fn catalog(&self) -> &RouteCatalog {
        &self.catalog
    }

    pub fn static_layout(&self) -> &StaticLayout {
        &self.layout
    }

    pub fn static_solution(&self) -> Option<&Individual<RouteId>> {
        self.static_solution.as_ref()
    }

    pub fn dynamic_shape(&self) -> &GenomeShape<Seconds> {
        &self.dynamic_shape
    }

    pub fn dynamic_solution(&self) -> Option<&Individual<Seconds>> {
        self.dynamic_solution.as_ref()
    }

    /// Run every remaining phase.
    pub fn run(&mut self, simulators: &dyn SimulatorFactory) -> DriverResult<Solutions> {
        if self.state == DriverState::Idle {
            self.build_static()?;
        }
        if self.state == DriverState::StaticBuilt {
            self.evolve_static()?;
        }
        if self.state == DriverState::StaticEvolved {
            self.trigger_check()?;
        }
        if self.state == DriverState::TriggerCheck {
            self.build_dynamic()?;
        }
        if self.state == DriverState::DynamicBuilt {
            self.evolve_dynamic(simulators)?;
        }
        if self.state == DriverState::DynamicEvolved {
            self.state = DriverState::Done;
        }

        let static_solution = self
            .static_solution
            .clone()
            .ok_or(DriverError::Missing("no static solution"))?;
        Ok(Solutions { static_solution, dynamic_solution: self.dynamic_solution.clone() })
    }

    // ── Static phase ──────────────────────────────────────────────────────

    /// Build the route catalog and the static genome shape.
    pub fn build_static(&mut self) -> DriverResult<()> {
        self.expect(DriverState::Idle)?;
        let Inputs { network, detectors, districts, od, .. } = self.inputs;

        let mut rng = self.rng.child(0);
        self.catalog = RouteCatalog::build(
            network,
            detectors,
            districts,
            self.config.catalog_options(),
            &mut rng,
            self.logger.as_ref(),
        )?;
        if self.catalog.is_empty() {
            return Err(DriverError::Missing("no candidate routes connect the districts"));
        }

        let layout = AlleleBuilder::new(self.scenario()).static_layout(od)?;
        if layout.shape.is_empty() {
            return Err(DriverError::Missing("no OD demand can be routed"));
        }
        if !layout.unrouted.is_empty() {
            self.logger.warning(&format!(
                "{} of {} vehicles have no route and are not disaggregated",
                layout.unrouted_trips(),
                od.total_trips()
            ));
        }
        self.layout = layout;

        if let Some(dir) = &self.config.output_dir {
            std::fs::create_dir_all(dir).map_err(OutputError::from)?;
            write_route_csv(&dir.join("routes.csv"), &self.catalog, network)?;
        }
        self.state = DriverState::StaticBuilt;
        Ok(())
    }

    /// Evolve route choices against the analytic edge-count objective.
    pub fn evolve_static(&mut self) -> DriverResult<()> {
        self.expect(DriverState::StaticBuilt)?;
        self.logger.info("Start static disaggregation");

        let rng = self.rng.child(1);
        let best = {
            let scorer = StaticScorer::new(self.scenario());
            let ga = GaBuilder::new(self.layout.shape.clone(), &scorer, self.config.ga.clone())
                .distance(DistanceKind::Multiset)
                .rng(rng)
                .logger(self.logger.clone());
            evolve(ga, &self.config, Phase::Static)?
        };
        self.logger.info(&format!("Static solution score {:.4}", best.score));

        if let Some(dir) = &self.config.output_dir {
            write_static_solution(&dir.join("static_solution.csv"), &best.genes, &self.catalog)?;
        }
        self.static_solution = Some(best);
        self.state = DriverState::StaticEvolved;
        Ok(())
    }

    // ── Trigger ───────────────────────────────────────────────────────────

    /// `true` if the static score reaches `dynamic_trigger × 100`; otherwise
    /// the run is done.
    pub fn trigger_check(&mut self) -> DriverResult<bool> {
        self.expect(DriverState::StaticEvolved)?;
        let score = self.static_score()?;
        let needed = self.config.trigger_score();
        let go = score >= needed;
        if go {
            self.logger.info(&format!(
                "Static score {score:.4} reaches {needed:.4}; start dynamic disaggregation"
            ));
            self.state = DriverState::TriggerCheck;
        } else {
            self.logger.info(&format!(
                "Static score {score:.4} is below {needed:.4}; skip dynamic disaggregation"
            ));
            self.state = DriverState::Done;
        }
        Ok(go)
    }

    // ── Dynamic phase ─────────────────────────────────────────────────────

    /// Depart-time allele sets for the static solution.
    pub fn build_dynamic(&mut self) -> DriverResult<()> {
        self.expect(DriverState::TriggerCheck)?;
        let solution = self
            .static_solution
            .as_ref()
            .ok_or(DriverError::Missing("no static solution"))?;
        let builder = AlleleBuilder::new(self.scenario());
        builder.check_solution(&solution.genes, self.layout.shape.len())?;
        let shape = builder.dynamic_shape(&solution.genes)?;
        self.dynamic_shape = shape;
        self.state = DriverState::DynamicBuilt;
        Ok(())
    }

    /// Evolve depart times against simulated detector flows.
    pub fn evolve_dynamic(&mut self, simulators: &dyn SimulatorFactory) -> DriverResult<()> {
        self.expect(DriverState::DynamicBuilt)?;
        let routes = self
            .static_solution
            .as_ref()
            .map(|s| s.genes.clone())
            .ok_or(DriverError::Missing("no static solution"))?;
        self.logger.info("Start dynamic disaggregation");

        let rng = self.rng.child(2);
        let best = {
            let scenario = self.scenario();
            let simulator = simulators.simulator(scenario)?;
            let scorer = DynamicScorer::new(scenario, routes.clone(), simulator.as_ref())?;
            let ga = GaBuilder::new(self.dynamic_shape.clone(), &scorer, self.config.ga.clone())
                .distance(DistanceKind::Positional)
                .rng(rng)
                .logger(self.logger.clone());
            evolve(ga, &self.config, Phase::Dynamic)?
        };
        self.logger.info(&format!("Dynamic solution score {:.4}", best.score));

        if let Some(dir) = &self.config.output_dir {
            write_dynamic_solution(&dir.join("dyn_solution.csv"), &routes, &best.genes, &self.catalog)?;
        }
        self.dynamic_solution = Some(best);
        self.state = DriverState::DynamicEvolved;
        Ok(())
    }

    // ── Helpers ───────────────────────────────────────────────────────────

    fn expect(&self, expected: DriverState) -> DriverResult<()> {
        if self.state == expected {
            Ok(())
        } else {
            Err(DriverError::State { expected, actual: self.state })
        }
    }

    fn static_score(&self) -> DriverResult<f64> {
        self.static_solution
            .as_ref()
            .map(|s| s.score)
            .ok_or(DriverError::Missing("no static solution"))
    }

    fn scenario(&self) -> Scenario<'_> {
        Scenario {
            network: self.inputs.network,
            detectors: self.inputs.detectors,
            districts: self.inputs.districts,
            catalog: &self.catalog,
            goal: self.inputs.flows,
            logger: self.logger.as_ref(),
        }
    }
}

/// Build and run one GA, writing its score file when one is configured.
fn evolve<T: Gene>(
    ga: GaBuilder<'_, T>,
    config: &DisaggregationConfig,
    phase: Phase,
) -> DriverResult<Individual<T>> {
    let mut ga = ga.build()?;
    let Some(score_file) = &config.score_file else {
        return Ok(ga.run(&mut NoopObserver)?);
    };

    let path = phase.score_path(score_file);
    create_parent(&path)?;
    let writer = CsvScoreWriter::new(&path, config.select_scores.clone())?;
    let mut observer = ScoreFileObserver::new(writer, config.score_freq, config.flush_freq);
    let best = ga.run(&mut observer)?;
    if let Some(e) = observer.take_error() {
        return Err(e.into());
    }
    Ok(best)
}

fn create_parent(path: &Path) -> DriverResult<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(OutputError::from)?;
    }
    Ok(())
}
