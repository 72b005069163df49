//! Origin/destination matrix.

use odr_core::Seconds;

use crate::{RouteError, RouteResult};

/// Upper bound on the trips of one matrix; every trip becomes one gene.
pub const MAX_TRIPS: usize = u32::MAX as usize;

/// Square matrix of vehicle counts between named districts.
///
/// Cell `(i, j)` counts vehicles from district `districts[i]` to
/// `districts[j]` during `[from_time, to_time)`.  The number of trips the
/// disaggregation produces for a cell is `round(cell * factor)`.
#[derive(Clone, Debug, PartialEq)]
pub struct OdMatrix {
    pub districts: Vec<String>,
    /// Row-major, `districts.len()²` entries.
    cells: Vec<f64>,
    /// `round(cell * factor)`, same layout as `cells`.
    trips: Vec<usize>,
    total_trips: usize,
    factor: f64,
    pub vehicle_type: String,
    pub use_vehicle_type: bool,
    pub from_time: Seconds,
    pub to_time: Seconds,
}

impl OdMatrix {
    /// Build a matrix from its rows.  The row count and every row length
    /// must equal the number of district names.
    pub fn new(districts: Vec<String>, rows: Vec<Vec<f64>>, factor: f64) -> RouteResult<Self> {
        let n = districts.len();
        if rows.len() != n {
            return Err(RouteError::Dimension { what: "matrix rows", declared: n, found: rows.len() });
        }
        let mut cells = Vec::with_capacity(n * n);
        for row in rows {
            if row.len() != n {
                return Err(RouteError::Dimension { what: "matrix columns", declared: n, found: row.len() });
            }
            cells.extend(row);
        }
        if !factor.is_finite() || factor < 0.0 {
            return Err(RouteError::Config(format!("OD factor {factor} must be finite and non-negative")));
        }

        let mut trips = Vec::with_capacity(cells.len());
        let mut total_trips: usize = 0;
        for (k, &value) in cells.iter().enumerate() {
            let scaled = (value * factor).round().max(0.0);
            if !scaled.is_finite() || scaled > MAX_TRIPS as f64 {
                return Err(RouteError::BadCell { row: k / n, col: k % n, value });
            }
            let count = scaled as usize;
            total_trips = total_trips
                .checked_add(count)
                .filter(|&t| t <= MAX_TRIPS)
                .ok_or(RouteError::TooManyTrips { max: MAX_TRIPS })?;
            trips.push(count);
        }

        Ok(Self {
            districts,
            cells,
            trips,
            total_trips,
            factor,
            vehicle_type: String::new(),
            use_vehicle_type: false,
            from_time: 0,
            to_time: 0,
        })
    }

    pub fn with_vehicle_type(mut self, vehicle_type: &str, use_vehicle_type: bool) -> Self {
        self.vehicle_type = vehicle_type.to_owned();
        self.use_vehicle_type = use_vehicle_type;
        self
    }

    pub fn with_window(mut self, from_time: Seconds, to_time: Seconds) -> Self {
        self.from_time = from_time;
        self.to_time = to_time;
        self
    }

    pub fn factor(&self) -> f64 {
        self.factor
    }

    /// Number of districts.
    #[inline]
    pub fn size(&self) -> usize {
        self.districts.len()
    }

    #[inline]
    pub fn cell(&self, i: usize, j: usize) -> f64 {
        self.cells[i * self.size() + j]
    }

    /// Disaggregated trip count of cell `(i, j)`.
    #[inline]
    pub fn trips(&self, i: usize, j: usize) -> usize {
        self.trips[i * self.size() + j]
    }

    /// Sum of [`trips`](Self::trips) over all cells.
    #[inline]
    pub fn total_trips(&self) -> usize {
        self.total_trips
    }

    /// `(i, j, trips)` for every cell with a non-zero trip count, row-major.
    pub fn nonzero_cells(&self) -> impl Iterator<Item = (usize, usize, usize)> + '_ {
        let n = self.size();
        (0..n)
            .flat_map(move |i| (0..n).map(move |j| (i, j)))
            .map(|(i, j)| (i, j, self.trips(i, j)))
            .filter(|&(_, _, t)| t > 0)
    }
}
