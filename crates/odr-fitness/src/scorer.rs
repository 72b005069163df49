//! Flow-matching objectives.
//!
//! | Scorer           | Compares                                               |
//! |------------------|--------------------------------------------------------|
//! | `StaticScorer`   | routes per edge vs. summed detector totals per edge    |
//! | `DynamicScorer`  | simulated vs. observed car counts per detector and slot |
//!
//! Both are pure functions of the genome and a borrowed [`Scenario`].

use odr_core::{EdgeId, RouteId, Seconds};
use odr_detector::DetectorFlowStore;
use odr_ga::Objective;

use crate::{Departure, FitnessError, FitnessResult, FlowSimulator, Scenario};

/// `100 / (1 + sqrt(sum_sq / n))`; 0 when nothing was compared.
pub fn rmse_score(sum_sq: f64, n: usize) -> f64 {
    if n == 0 {
        return 0.0;
    }
    let rmse = (sum_sq / n as f64).sqrt();
    100.0 / (1.0 + rmse)
}

// ── StaticScorer ──────────────────────────────────────────────────────────────

/// Scores a route genome by edge usage.
///
/// The goal count of an edge is the flow total of every detector on it;
/// internal edges are never compared.
pub struct StaticScorer<'a> {
    scenario: Scenario<'a>,
    /// Goal count per edge, indexed by `EdgeId`.
    goal: Vec<f64>,
    compared: usize,
}

impl<'a> StaticScorer<'a> {
    pub fn new(scenario: Scenario<'a>) -> Self {
        let net = scenario.network;
        let mut goal = vec![0.0; net.edge_count()];
        for edge in net.regular_edges() {
            goal[edge.index()] = scenario.goal.sum_over(scenario.detectors.on_edge(edge));
        }
        let compared = net.regular_edges().count();
        Self { scenario, goal, compared }
    }

    /// Selected routes crossing each edge, indexed by `EdgeId`.
    ///
    /// Genes that name no catalog route are skipped.
    pub fn edge_counts(&self, genes: &[RouteId]) -> Vec<f64> {
        let mut counts = vec![0.0; self.goal.len()];
        for desc in genes.iter().filter_map(|&r| self.scenario.catalog.get(r)) {
            for edge in &desc.edges {
                counts[edge.index()] += 1.0;
            }
        }
        counts
    }

    pub fn goal_count(&self, edge: EdgeId) -> f64 {
        self.goal[edge.index()]
    }
}

impl Objective<RouteId> for StaticScorer<'_> {
    fn score(&self, genes: &[RouteId]) -> f64 {
        let counts = self.edge_counts(genes);
        let sum_sq: f64 = self
            .scenario
            .network
            .regular_edges()
            .map(|e| (counts[e.index()] - self.goal[e.index()]).powi(2))
            .sum();
        rmse_score(sum_sq, self.compared)
    }
}

// ── DynamicScorer ─────────────────────────────────────────────────────────────

/// Scores a depart-time genome by simulating it.
///
/// Gene `i` is the depart time of `routes[i]`, the static solution.  A
/// failed simulation, or any detector whose simulated series length differs
/// from the goal's, scores 0.
pub struct DynamicScorer<'a> {
    scenario: Scenario<'a>,
    routes: Vec<RouteId>,
    simulator: &'a dyn FlowSimulator,
}

impl<'a> DynamicScorer<'a> {
    pub fn new(
        scenario: Scenario<'a>,
        routes: Vec<RouteId>,
        simulator: &'a dyn FlowSimulator,
    ) -> FitnessResult<Self> {
        if let Some(&r) = routes.iter().find(|&&r| scenario.catalog.get(r).is_none()) {
            return Err(FitnessError::UnknownRoute(r));
        }
        Ok(Self { scenario, routes, simulator })
    }

    pub fn routes(&self) -> &[RouteId] {
        &self.routes
    }

    pub fn departures(&self, genes: &[Seconds]) -> Vec<Departure> {
        self.routes
            .iter()
            .zip(genes)
            .map(|(&route, &depart)| Departure { route, depart })
            .collect()
    }

    /// RMSE score of `simulated` against the goal over car counts.
    pub fn compare(&self, simulated: &DetectorFlowStore) -> f64 {
        let goal = self.scenario.goal;
        let mut sum_sq = 0.0;
        let mut n = 0;
        for det in self.scenario.detectors.ids() {
            let want = goal.flows(det);
            let got = simulated.flows(det);
            if want.len() != got.len() {
                self.scenario.logger.debug(&format!(
                    "Detector [{}]: {} simulated intervals, {} observed; scoring 0",
                    self.scenario.detectors.get(det).name,
                    got.len(),
                    want.len()
                ));
                return 0.0;
            }
            for (w, g) in want.iter().zip(got) {
                sum_sq += (g.q_pkw - w.q_pkw).powi(2);
                n += 1;
            }
        }
        rmse_score(sum_sq, n)
    }
}

impl Objective<Seconds> for DynamicScorer<'_> {
    fn score(&self, genes: &[Seconds]) -> f64 {
        match self.simulator.simulate(&self.departures(genes)) {
            Ok(simulated) => self.compare(&simulated),
            Err(e) => {
                self.scenario.logger.debug(&format!("{e}; scoring 0"));
                0.0
            }
        }
    }
}
