pub mod builder;
pub mod distance;
pub mod node;
pub mod problem;
pub mod solution;
pub mod sync;

#[cfg(feature = "wasm")]
pub mod wasm;

pub use builder::{build_cost_matrix, build_coverage_matrix, BuildError, CostTable, CoverageTable};
pub use distance::{DistanceMetric, Point};
pub use node::*;
pub use problem::{
    solve_location_problem, Formulation, LocateError, LocationProblem, MclpProblem, PMedianProblem,
};
pub use solution::{DemandAssignment, Solution, Statistics};
pub use sync::sync_facility_demands;
