//! Unit tests for odr-driver.

#[cfg(test)]
mod helpers {
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    use odr_core::{DetectorId, MemoryLogger, TimeGrid};
    use odr_detector::{DetectorFlowStore, DetectorRegistry, DetectorType, FlowRecord};
    use odr_fitness::{Departure, FlowSimulator, Scenario, SimulationFailed};
    use odr_ga::GaParams;
    use odr_network::{RoadNetwork, RoadNetworkBuilder};
    use odr_routes::{DistrictRegistry, EdgeRole, OdMatrix};

    use crate::{DisaggregationConfig, DisaggregationDriver, DriverResult, Inputs, SimulatorFactory};

    /// Ten one-minute slots.
    pub fn grid() -> TimeGrid {
        TimeGrid::new(0, 600, 60).unwrap()
    }

    /// Two districts joined by `e_ab` (A→B) and `e_ba` (B→A), each edge
    /// with a source detector `*_in` and a sink detector `*_out`, and
    /// 10 vehicles each way.
    pub struct Fixture {
        pub network: RoadNetwork,
        pub detectors: DetectorRegistry,
        pub districts: DistrictRegistry,
        pub od: OdMatrix,
        pub flows: DetectorFlowStore,
    }

    impl Fixture {
        pub fn new() -> Self {
            Self::typed(DetectorType::Source, DetectorType::Sink)
        }

        pub fn typed(inbound: DetectorType, outbound: DetectorType) -> Self {
            let mut b = RoadNetworkBuilder::new();
            b.add_edge("e_ab", "A", "B", 100.0, 10.0, false).unwrap();
            b.add_edge("e_ba", "B", "A", 100.0, 10.0, false).unwrap();
            let network = b.build();

            let ab = network.edge_by_name("e_ab").unwrap();
            let ba = network.edge_by_name("e_ba").unwrap();
            let mut districts = DistrictRegistry::new();
            let a = districts.add_district("A", None).unwrap();
            let z = districts.add_district("B", None).unwrap();
            districts.add_edge(a, ab, EdgeRole::Source, "e_ab").unwrap();
            districts.add_edge(a, ba, EdgeRole::Sink, "e_ba").unwrap();
            districts.add_edge(z, ba, EdgeRole::Source, "e_ba").unwrap();
            districts.add_edge(z, ab, EdgeRole::Sink, "e_ab").unwrap();

            let mut detectors = DetectorRegistry::new();
            detectors.add(&network, "ab_in", "e_ab_0", 10.0, inbound).unwrap();
            detectors.add(&network, "ab_out", "e_ab_0", 90.0, outbound).unwrap();
            detectors.add(&network, "ba_in", "e_ba_0", 10.0, inbound).unwrap();
            detectors.add(&network, "ba_out", "e_ba_0", 90.0, outbound).unwrap();

            let od = OdMatrix::new(
                vec!["A".into(), "B".into()],
                vec![vec![0.0, 10.0], vec![10.0, 0.0]],
                1.0,
            )
            .unwrap();

            Self { network, detectors, districts, od, flows: DetectorFlowStore::new(grid()) }
        }

        pub fn det(&self, name: &str) -> DetectorId {
            self.detectors.by_name(name).unwrap()
        }

        /// `cars` in slot `slot` of `name`.
        pub fn observe(&mut self, name: &str, slot: usize, cars: f64) {
            let det = self.det(name);
            let t = self.flows.grid().slot_start(slot);
            self.flows.add(det, t, FlowRecord::cars(cars, 50.0)).unwrap();
        }

        /// Both inbound detectors see `cars` in slot 0.
        pub fn with_inbound(mut self, cars: f64) -> Self {
            self.observe("ab_in", 0, cars);
            self.observe("ba_in", 0, cars);
            self
        }

        pub fn inputs(&self) -> Inputs<'_> {
            Inputs {
                network: &self.network,
                detectors: &self.detectors,
                districts: &self.districts,
                od: &self.od,
                flows: &self.flows,
            }
        }

        pub fn driver(&self, config: DisaggregationConfig) -> (DisaggregationDriver<'_>, Arc<MemoryLogger>) {
            let logger = Arc::new(MemoryLogger::new());
            let driver = DisaggregationDriver::new(config, self.inputs(), logger.clone()).unwrap();
            (driver, logger)
        }
    }

    /// k = 1, a tiny seeded GA, no files.
    pub fn config(trigger: f64) -> DisaggregationConfig {
        DisaggregationConfig {
            begin: 0,
            end: 600,
            time_step: 60,
            k_shortest_routes: 1,
            dynamic_trigger: trigger,
            score_file: None,
            ga: GaParams { seed: Some(11), generations: 1, population_size: 4, ..GaParams::default() },
            ..DisaggregationConfig::default()
        }
    }

    /// Counts one car at each departure's origin detector, in its depart
    /// slot, and reports an empty series for every other observed detector.
    pub struct OriginCounter<'s> {
        scenario: Scenario<'s>,
    }

    impl FlowSimulator for OriginCounter<'_> {
        fn simulate(&self, departures: &[Departure]) -> Result<DetectorFlowStore, SimulationFailed> {
            let goal = self.scenario.goal;
            let mut store = DetectorFlowStore::new(goal.grid());
            for det in goal.detectors() {
                store.set_series(det, Vec::new());
            }
            for d in departures {
                let (_, det) = self
                    .scenario
                    .origin_detector(d.route)
                    .map_err(|e| SimulationFailed::new(e.to_string()))?;
                store
                    .add(det, d.depart, FlowRecord::cars(1.0, 50.0))
                    .map_err(|e| SimulationFailed::new(e.to_string()))?;
            }
            Ok(store)
        }
    }

    #[derive(Default)]
    pub struct CountingFactory {
        pub created: AtomicUsize,
    }

    impl CountingFactory {
        pub fn created(&self) -> usize {
            self.created.load(Ordering::SeqCst)
        }
    }

    impl SimulatorFactory for CountingFactory {
        fn simulator<'s>(&self, scenario: Scenario<'s>) -> DriverResult<Box<dyn FlowSimulator + 's>> {
            self.created.fetch_add(1, Ordering::SeqCst);
            Ok(Box::new(OriginCounter { scenario }))
        }
    }

    /// Observed excess on each edge that makes the static score `score`.
    pub fn excess_for(score: f64) -> f64 {
        100.0 / score - 1.0
    }
}

#[cfg(test)]
mod config {
    use std::time::Duration;

    use super::helpers::config;
    use crate::{DisaggregationConfig, DriverError};

    #[test]
    fn defaults_match_documented_options() {
        let c = DisaggregationConfig::default();
        assert_eq!((c.begin, c.end, c.time_step), (0, 86_400, 60));
        assert_eq!((c.time_offset, c.time_factor), (0, 60));
        assert_eq!((c.time_to_teleport, c.meas_freq), (300, 10));
        assert_eq!(c.dynamic_trigger, 0.7);
        assert_eq!((c.score_freq, c.flush_freq), (1, 0));
        assert_eq!(c.score_file.as_deref(), Some(std::path::Path::new("gar_stats.dat")));
        assert_eq!(c.simulation_timeout, Duration::from_secs(600));
        assert_eq!(c.ga.generations, 250);
        assert_eq!(c.ga.population_size, 30);
    }

    #[test]
    fn k_is_required() {
        let err = DisaggregationConfig::default().validate().unwrap_err();
        assert!(matches!(err, DriverError::Config(_)), "{err}");
        assert!(err.to_string().contains("k-shortest-routes"));
        config(0.5).validate().unwrap();
    }

    #[test]
    fn selected_must_not_exceed_k() {
        let c = DisaggregationConfig { k_shortest_routes: 2, k_shortest_selected: Some(3), ..config(0.5) };
        assert!(matches!(c.validate(), Err(DriverError::Route(_))));
        let c = DisaggregationConfig { k_shortest_selected: Some(0), ..config(0.5) };
        assert!(matches!(c.validate(), Err(DriverError::Config(_))));
    }

    #[test]
    fn trigger_must_be_a_fraction() {
        assert!(config(1.5).validate().is_err());
        assert!(config(-0.1).validate().is_err());
        config(0.0).validate().unwrap();
        config(1.0).validate().unwrap();
    }

    #[test]
    fn bad_grid_and_ga_params_are_rejected() {
        let c = DisaggregationConfig { end: 0, ..config(0.5) };
        assert!(matches!(c.validate(), Err(DriverError::Core(_))));

        let mut c = config(0.5);
        c.ga.population_size = 1;
        assert!(matches!(c.validate(), Err(DriverError::Ga(_))));
    }

    #[test]
    fn bridge_config_needs_net_file() {
        let c = config(0.5);
        assert!(matches!(c.bridge_config(), Err(DriverError::Config(_))));

        let c = DisaggregationConfig { net_file: Some("net.xml".into()), time_to_teleport: 42, ..c };
        let b = c.bridge_config().unwrap();
        assert_eq!(b.net_file, std::path::Path::new("net.xml"));
        assert_eq!(b.time_to_teleport, 42);
        assert_eq!(b.route_file, std::path::Path::new("routes.rou.xml"));
    }

    #[test]
    fn trigger_score_is_a_percentage() {
        assert_eq!(config(0.9).trigger_score(), 90.0);
    }
}

#[cfg(test)]
mod preconditions {
    use std::sync::Arc;

    use odr_core::NoopLogger;
    use odr_detector::DetectorType;

    use super::helpers::{config, CountingFactory, Fixture};
    use crate::{DisaggregationDriver, DriverError, DriverState, Inputs};

    #[test]
    fn missing_flows_fail_before_any_work() {
        let fx = Fixture::new();
        let err = DisaggregationDriver::new(config(0.5), fx.inputs(), Arc::new(NoopLogger))
            .err()
            .unwrap();
        assert!(matches!(err, DriverError::Missing(_)), "{err}");
        assert!(err.to_string().contains("flows"));
    }

    #[test]
    fn empty_network_is_rejected() {
        let fx = Fixture::new().with_inbound(10.0);
        let empty = odr_network::RoadNetwork::empty();
        let inputs = Inputs { network: &empty, ..fx.inputs() };
        let err = DisaggregationDriver::new(config(0.5), inputs, Arc::new(NoopLogger)).err().unwrap();
        assert!(matches!(err, DriverError::Missing(_)));
    }

    #[test]
    fn invalid_config_is_rejected() {
        let fx = Fixture::new().with_inbound(10.0);
        let err = DisaggregationDriver::new(config(2.0), fx.inputs(), Arc::new(NoopLogger))
            .err()
            .unwrap();
        assert!(matches!(err, DriverError::Config(_)));
    }

    #[test]
    fn no_candidate_routes_is_fatal() {
        let fx = Fixture::typed(DetectorType::Between, DetectorType::Between).with_inbound(10.0);
        let (mut driver, _) = fx.driver(config(0.5));
        let err = driver.run(&CountingFactory::default()).unwrap_err();
        assert!(matches!(err, DriverError::Missing(_)), "{err}");
        assert!(driver.static_solution().is_none());
        assert_eq!(driver.state(), DriverState::Idle);
    }

    #[test]
    fn steps_out_of_order_are_rejected() {
        let fx = Fixture::new().with_inbound(10.0);
        let (mut driver, _) = fx.driver(config(0.5));
        let err = driver.evolve_static().unwrap_err();
        assert!(matches!(
            err,
            DriverError::State { expected: DriverState::StaticBuilt, actual: DriverState::Idle }
        ));
        driver.build_static().unwrap();
        assert!(driver.build_static().is_err());
        assert!(driver.build_dynamic().is_err());
    }
}

#[cfg(test)]
mod static_phase {
    use super::helpers::{config, Fixture};
    use crate::DriverState;

    #[test]
    fn genome_has_one_gene_per_vehicle() {
        let fx = Fixture::new().with_inbound(10.0);
        let (mut driver, _) = fx.driver(config(0.5));
        driver.build_static().unwrap();
        assert_eq!(driver.state(), DriverState::StaticBuilt);

        assert_eq!(driver.catalog().len(), 2);
        let shape = &driver.static_layout().shape;
        assert_eq!(shape.len(), 20);
        assert!(shape.iter().all(|set| set.len() == 1));
        assert!(driver.static_layout().unrouted.is_empty());
    }

    #[test]
    fn matching_flows_score_100() {
        let fx = Fixture::new().with_inbound(10.0);
        let (mut driver, _) = fx.driver(config(0.5));
        driver.build_static().unwrap();
        driver.evolve_static().unwrap();
        assert_eq!(driver.state(), DriverState::StaticEvolved);

        let best = driver.static_solution().unwrap();
        assert_eq!(best.genes.len(), 20);
        assert_eq!(best.score, 100.0);
    }

    #[test]
    fn mismatched_flows_score_below_100() {
        let fx = Fixture::new().with_inbound(9.0);
        let (mut driver, _) = fx.driver(config(0.5));
        driver.build_static().unwrap();
        driver.evolve_static().unwrap();
        // RMSE 1 on both edges.
        assert_eq!(driver.static_solution().unwrap().score, 50.0);
    }

    #[test]
    fn each_direction_takes_its_own_route() {
        let fx = Fixture::new().with_inbound(10.0);
        let (mut driver, _) = fx.driver(config(0.5));
        driver.build_static().unwrap();
        driver.evolve_static().unwrap();

        let catalog = driver.catalog();
        let genes = &driver.static_solution().unwrap().genes;
        let names: Vec<&str> = genes.iter().map(|&r| catalog.route(r).name.as_str()).collect();
        assert!(names[..10].iter().all(|&n| n == "e_ab_to_e_ab"));
        assert!(names[10..].iter().all(|&n| n == "e_ba_to_e_ba"));
    }
}

#[cfg(test)]
mod trigger {
    use odr_core::LogLevel;

    use super::helpers::{config, excess_for, CountingFactory, Fixture};
    use crate::DriverState;

    #[test]
    fn score_85_skips_dynamic_phase() {
        let fx = Fixture::new().with_inbound(10.0 + excess_for(85.0));
        let (mut driver, logger) = fx.driver(config(0.9));
        let factory = CountingFactory::default();
        let solutions = driver.run(&factory).unwrap();

        assert!((solutions.static_solution.score - 85.0).abs() < 1e-9);
        assert!(solutions.dynamic_solution.is_none());
        assert_eq!(driver.state(), DriverState::Done);
        assert_eq!(factory.created(), 0);
        assert!(logger.contains(LogLevel::Info, "skip dynamic"));
    }

    #[test]
    fn score_95_runs_dynamic_phase() {
        let fx = Fixture::new().with_inbound(10.0 + excess_for(95.0));
        let (mut driver, logger) = fx.driver(config(0.9));
        let factory = CountingFactory::default();
        let solutions = driver.run(&factory).unwrap();

        assert!((solutions.static_solution.score - 95.0).abs() < 1e-9);
        assert!(solutions.dynamic_solution.is_some());
        assert_eq!(driver.state(), DriverState::Done);
        assert_eq!(factory.created(), 1);
        assert!(logger.contains(LogLevel::Info, "start dynamic"));
    }

    #[test]
    fn trigger_check_reports_decision() {
        let fx = Fixture::new().with_inbound(10.0);
        let (mut driver, _) = fx.driver(config(1.0));
        driver.build_static().unwrap();
        driver.evolve_static().unwrap();
        assert!(driver.trigger_check().unwrap());
        assert_eq!(driver.state(), DriverState::TriggerCheck);
    }
}

#[cfg(test)]
mod dynamic_phase {
    use super::helpers::{config, CountingFactory, Fixture};
    use crate::DriverState;

    #[test]
    fn departs_stay_inside_observed_window() {
        let mut fx = Fixture::new();
        fx.observe("ab_in", 2, 4.0);
        fx.observe("ab_in", 4, 6.0);
        fx.observe("ba_in", 1, 10.0);
        let (mut driver, _) = fx.driver(config(0.5));
        driver.build_static().unwrap();
        driver.evolve_static().unwrap();
        assert!(driver.trigger_check().unwrap());
        driver.build_dynamic().unwrap();
        assert_eq!(driver.state(), DriverState::DynamicBuilt);

        let shape = driver.dynamic_shape().clone();
        assert_eq!(shape.len(), 20);
        // e_ab vehicles: slots 2..=4 plus one step; e_ba: slot 1 plus one step.
        assert_eq!(shape.set(0).as_slice(), &[120, 180, 240, 300]);
        assert_eq!(shape.set(19).as_slice(), &[60, 120]);

        driver.evolve_dynamic(&CountingFactory::default()).unwrap();
        assert_eq!(driver.state(), DriverState::DynamicEvolved);
        let best = driver.dynamic_solution().unwrap();
        assert_eq!(best.genes.len(), 20);
        for (i, depart) in best.genes.iter().enumerate() {
            assert!(shape.set(i).contains(depart), "gene {i}: {depart}");
        }
        assert!(best.score > 0.0 && best.score <= 100.0);
    }
}

#[cfg(test)]
mod output_files {
    use super::helpers::{config, CountingFactory, Fixture};
    use crate::DisaggregationConfig;

    #[test]
    fn run_writes_scores_routes_and_solutions() {
        let dir = tempfile::tempdir().expect("create temp dir");
        let out = dir.path().join("out");
        let fx = Fixture::new().with_inbound(10.0);
        let c = DisaggregationConfig {
            score_file: Some(dir.path().join("scores").join("gar_stats.dat")),
            output_dir: Some(out.clone()),
            ..config(0.5)
        };
        let (mut driver, _) = fx.driver(c);
        driver.run(&CountingFactory::default()).unwrap();

        let scores = dir.path().join("scores");
        assert!(scores.join("static_gar_stats.dat").exists());
        assert!(scores.join("dyn_gar_stats.dat").exists());
        assert!(out.join("routes.csv").exists());

        let text = std::fs::read_to_string(out.join("static_solution.csv")).unwrap();
        assert_eq!(text.lines().next(), Some("gene,route"));
        assert_eq!(text.lines().count(), 21);

        let text = std::fs::read_to_string(out.join("dyn_solution.csv")).unwrap();
        assert_eq!(text.lines().next(), Some("gene,route,depart"));
        assert!(text.lines().nth(1).unwrap().starts_with("0,e_ab_to_e_ab,"));

        // generation 0 and 1
        let text = std::fs::read_to_string(scores.join("static_gar_stats.dat")).unwrap();
        assert_eq!(text.lines().count(), 3);
    }
}
