mod assignment;
mod combinations;
mod error;
mod matrix;
mod objective;
mod search;
mod solution;

pub use assignment::{assign_covering, assign_nearest};
pub use combinations::{binomial, combinations, Combinations};
pub use error::SolveError;
pub use matrix::{CostMatrix, CoverageMatrix, Matrix};
pub use objective::{CostWeighting, CoverageMeasure, CoveredDemand, MedianCost, Objective};
pub use search::Solver;
pub use solution::{Assignment, Selection, Service};
