//! odr: route and depart-time disaggregation of an OD matrix.
//!
//! Loads the network, detectors, districts, OD matrix and observed flows,
//! types any untyped detector from the network topology, then runs the
//! static route-choice GA and, when its score clears the trigger, the
//! dynamic depart-time GA against the external simulator.
//!
//! ```text
//! odr --net net.csv --detectors dets.csv --districts districts.csv \
//!     --od-matrix od.fma --flows flows.csv -k 3 --sim-net-file net.net.xml
//! ```
//!
//! Logging goes through `tracing`; `RUST_LOG` overrides the level, `-v`
//! raises the default to debug.

mod args;

use std::sync::Arc;
use std::time::Instant;

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::EnvFilter;

use odr_core::{Logger, TracingLogger};
use odr_detector::{compute_types, load_detectors_csv, load_flows_csv, DetectorFlowStore};
use odr_driver::{BridgeFactory, DisaggregationDriver, Inputs};
use odr_network::load_network_csv;
use odr_routes::{load_districts_csv, load_od_matrix};

use args::Args;

fn main() -> Result<()> {
    let args = Args::parse();

    let default_level = if args.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .init();

    let logger: Arc<dyn Logger> = Arc::new(TracingLogger);
    let config = args.config(logger.as_ref())?;
    config.validate()?;

    // ── Inputs ────────────────────────────────────────────────────────────
    let t0 = Instant::now();
    let network = load_network_csv(&args.net)
        .with_context(|| format!("loading network {}", args.net.display()))?;
    logger.info(&format!(
        "Network: {} nodes, {} edges",
        network.node_count(),
        network.edge_count()
    ));

    let mut detectors = load_detectors_csv(&args.detectors, &network)
        .with_context(|| format!("loading detectors {}", args.detectors.display()))?;
    if !detectors.has_complete_types() {
        let counts = compute_types(&mut detectors, &network, config.type_options(), logger.as_ref());
        logger.info(&format!(
            "Detector types: {} sources, {} sinks, {} between, {} discarded",
            counts.sources, counts.sinks, counts.between, counts.discarded
        ));
    }

    let districts = load_districts_csv(&args.districts, &network)
        .with_context(|| format!("loading districts {}", args.districts.display()))?;
    let od = load_od_matrix(&args.od_matrix)
        .with_context(|| format!("loading OD matrix {}", args.od_matrix.display()))?;
    logger.info(&format!(
        "OD matrix: {} districts, {} vehicles",
        od.size(),
        od.total_trips()
    ));

    let mut flows = DetectorFlowStore::new(config.grid()?);
    let rows = load_flows_csv(
        &args.flows,
        &detectors,
        config.flow_file_options(),
        &mut flows,
        logger.as_ref(),
    )
    .with_context(|| format!("loading flows {}", args.flows.display()))?;
    logger.info(&format!(
        "Loaded {rows} flow rows for {} detectors in {:.2?}",
        flows.len(),
        t0.elapsed()
    ));

    // ── Run ───────────────────────────────────────────────────────────────
    let inputs = Inputs {
        network: &network,
        detectors: &detectors,
        districts: &districts,
        od: &od,
        flows: &flows,
    };
    let factory_config = config.clone();
    let factory = BridgeFactory::new(&factory_config);
    let mut driver = DisaggregationDriver::new(config, inputs, logger.clone())?;

    let t1 = Instant::now();
    let solutions = driver.run(&factory)?;

    println!("Static score:  {:.4}", solutions.static_solution.score);
    match &solutions.dynamic_solution {
        Some(best) => println!("Dynamic score: {:.4}", best.score),
        None => println!("Dynamic phase skipped"),
    }
    println!("Routes: {}", driver.catalog().len());
    println!("Elapsed: {:.2?}", t1.elapsed());
    Ok(())
}
