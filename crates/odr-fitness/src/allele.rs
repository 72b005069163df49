//! Genome shapes for the two phases.
//!
//! # Static phase
//!
//! One gene per disaggregated vehicle.  Every vehicle of OD cell `(i, j)`
//! shares the same allele set: the catalog routes of every trip that starts
//! on a source edge of district `i` and ends on a sink edge of district `j`.
//! Cells are visited row by row, so the genes of a cell are contiguous.
//!
//! # Dynamic phase
//!
//! One gene per static-solution gene, holding a depart time.  The window is
//! read off the route's origin detector:
//!
//! ```text
//! lower = start of the first slot with cars or trucks
//! upper = start of the last such slot + step
//! alleles = lower, lower + step, …, upper
//! ```
//!
//! A detector that never saw traffic gives the one-element set `{begin}`.

use odr_core::{RouteId, Seconds};
use odr_ga::{AlleleSet, GenomeShape};
use odr_routes::OdMatrix;

use crate::{FitnessError, FitnessResult, Scenario};

/// A non-empty OD cell no catalog route serves.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct UnroutedCell {
    pub origin: String,
    pub destination: String,
    pub trips: usize,
}

/// The static genome shape and the demand it could not place.
#[derive(Clone, Debug, Default)]
pub struct StaticLayout {
    pub shape: GenomeShape<RouteId>,
    pub unrouted: Vec<UnroutedCell>,
}

impl StaticLayout {
    /// Vehicles left out of the genome.
    pub fn unrouted_trips(&self) -> usize {
        self.unrouted.iter().map(|c| c.trips).sum()
    }
}

pub struct AlleleBuilder<'a> {
    scenario: Scenario<'a>,
}

impl<'a> AlleleBuilder<'a> {
    pub fn new(scenario: Scenario<'a>) -> Self {
        Self { scenario }
    }

    /// Route allele sets for every vehicle of `od`.
    ///
    /// Fails when `od` names a district the registry does not know.  A cell
    /// without feasible routes is reported in
    /// [`StaticLayout::unrouted`] and logged as a warning.
    pub fn static_layout(&self, od: &OdMatrix) -> FitnessResult<StaticLayout> {
        let Scenario { districts, catalog, logger, .. } = self.scenario;
        let ids = od
            .districts
            .iter()
            .map(|name| districts.require(name))
            .collect::<Result<Vec<_>, _>>()?;

        let mut layout = StaticLayout::default();
        for (i, j, trips) in od.nonzero_cells() {
            let origin = districts.district(ids[i]);
            let destination = districts.district(ids[j]);
            let routes: Vec<RouteId> = catalog
                .trips()
                .iter()
                .filter(|t| origin.has_source(t.origin) && destination.has_sink(t.destination))
                .flat_map(|t| t.routes.iter().copied())
                .collect();

            if routes.is_empty() {
                logger.warning(&format!(
                    "No route from district [{}] to district [{}]; {trips} vehicles are left out",
                    origin.name, destination.name
                ));
                layout.unrouted.push(UnroutedCell {
                    origin: origin.name.clone(),
                    destination: destination.name.clone(),
                    trips,
                });
                continue;
            }

            let set = AlleleSet::new(routes, layout.shape.len())?;
            logger.debug(&format!(
                "[{}] -> [{}]: {trips} genes over {} routes",
                origin.name,
                destination.name,
                set.len()
            ));
            for _ in 0..trips {
                layout.shape.push(set.clone());
            }
        }

        logger.info(&format!(
            "Static genome: {} genes for {} vehicles",
            layout.shape.len(),
            od.total_trips()
        ));
        Ok(layout)
    }

    /// Depart-time allele sets, one per gene of `solution`.
    pub fn dynamic_shape(&self, solution: &[RouteId]) -> FitnessResult<GenomeShape<Seconds>> {
        let step = self.scenario.goal.grid().step;
        let mut shape = GenomeShape::default();
        for &route in solution {
            let (lower, upper) = self.depart_window(route)?;
            shape.push(AlleleSet::stepped(lower, upper, step));
        }
        self.scenario
            .logger
            .info(&format!("Dynamic genome: {} genes", shape.len()));
        Ok(shape)
    }

    /// `(lower, upper)` depart bounds for `route`, both on the grid.
    ///
    /// `(begin, begin)` when the origin detector saw no traffic.
    pub fn depart_window(&self, route: RouteId) -> FitnessResult<(Seconds, Seconds)> {
        let (_, det) = self.scenario.origin_detector(route)?;
        let grid = self.scenario.goal.grid();
        let flows = self.scenario.goal.flows(det);

        let first = flows.iter().position(|r| r.has_traffic());
        let last = flows.iter().rposition(|r| r.has_traffic());
        let window = match (first, last) {
            (Some(f), Some(l)) => (grid.slot_start(f), grid.slot_start(l) + grid.step),
            _ => (grid.begin, grid.begin),
        };
        self.scenario.logger.debug(&format!(
            "Depart window of [{}]: [{}, {}]",
            self.scenario.catalog.route(route).name,
            window.0,
            window.1
        ));
        Ok(window)
    }

    /// Check that `solution` can seed the dynamic phase.
    pub fn check_solution(&self, solution: &[RouteId], expected: usize) -> FitnessResult<()> {
        if solution.len() != expected {
            return Err(FitnessError::SolutionLength { routes: solution.len(), expected });
        }
        match solution.iter().find(|&&r| self.scenario.catalog.get(r).is_none()) {
            Some(&r) => Err(FitnessError::UnknownRoute(r)),
            None => Ok(()),
        }
    }
}
