//! Turns facility and demand nodes into solver matrices
//!
//! Rows always follow a fixed demand order and columns a fixed facility
//! order; the tables returned here keep both orders as node ids so solver
//! indices can be mapped back.

use locus_solver::{CostMatrix, CoverageMatrix, Matrix};
use log::{debug, warn};
use thiserror::Error;

use crate::distance::DistanceMetric;
use crate::node::{CostedFacility, DemandCost, NodeId, SitedDemand, SitedFacility};

#[derive(Error, Debug, Clone, PartialEq)]
pub enum BuildError {
    #[error("No facility candidates")]
    NoFacilities,
    #[error("No demand points")]
    NoDemands,
    #[error("Every facility has a non-finite demand cost")]
    AllFacilitiesExcluded,
    #[error("Facility {facility} lists {found} demands, expected {expected}")]
    RaggedDemandLists {
        facility: NodeId,
        expected: usize,
        found: usize,
    },
    #[error("Facility {facility} lists demand {demand} more than once")]
    DuplicateDemand { facility: NodeId, demand: NodeId },
    #[error("Facility {facility} lists a different set of demands than facility {reference}")]
    MismatchedDemands { facility: NodeId, reference: NodeId },
    #[error("Facility {facility} has a negative cost {cost} for demand {demand}")]
    NegativeCost {
        facility: NodeId,
        demand: NodeId,
        cost: f64,
    },
    #[error("Demand {0} appears in facility cost lists but has no demand weight")]
    MissingDemandWeight(NodeId),
    #[error("Coverage radius must be a finite number >= 0, got {0}")]
    InvalidRadius(f64),
}

impl BuildError {
    /// Missing input rather than malformed input; callers show nothing
    pub fn is_structural(&self) -> bool {
        matches!(
            self,
            BuildError::NoFacilities | BuildError::NoDemands | BuildError::AllFacilitiesExcluded
        )
    }
}

/// Cost matrix with the node ids behind its rows and columns
#[derive(Debug, Clone, PartialEq)]
pub struct CostTable {
    pub matrix: CostMatrix,
    /// Column index to facility id
    pub facility_ids: Vec<NodeId>,
    /// Row index to demand id, ascending
    pub demand_ids: Vec<NodeId>,
    /// Facilities left out because of a non-finite cost
    pub excluded: Vec<NodeId>,
}

/// Coverage matrix with the node ids behind its rows and columns
#[derive(Debug, Clone, PartialEq)]
pub struct CoverageTable {
    pub matrix: CoverageMatrix,
    pub facility_ids: Vec<NodeId>,
    pub demand_ids: Vec<NodeId>,
}

/// Build the p-median cost matrix from each facility's demand costs
///
/// Facilities with a non-finite cost are dropped and a negative cost is an
/// error. The remaining facilities must list exactly the same demand ids; each list is sorted by demand id
/// (on a copy) so that row `i` is the `i`-th smallest demand id.
pub fn build_cost_matrix(facilities: &[CostedFacility]) -> Result<CostTable, BuildError> {
    if facilities.is_empty() {
        return Err(BuildError::NoFacilities);
    }

    let mut excluded = Vec::new();
    let mut columns: Vec<(NodeId, Vec<DemandCost>)> = Vec::with_capacity(facilities.len());
    for facility in facilities {
        if facility.demands.iter().all(|d| d.cost.is_finite()) {
            let mut demands = facility.demands.clone();
            demands.sort_by_key(|d| d.demand);
            columns.push((facility.info.id, demands));
        } else {
            warn!(
                "Excluding facility {} ({}): non-finite demand cost",
                facility.info.id, facility.info.label
            );
            excluded.push(facility.info.id);
        }
    }

    let Some((reference_id, reference)) = columns.first() else {
        return Err(BuildError::AllFacilitiesExcluded);
    };
    let n_demands = reference.len();

    for (id, demands) in &columns {
        if demands.len() != n_demands {
            return Err(BuildError::RaggedDemandLists {
                facility: *id,
                expected: n_demands,
                found: demands.len(),
            });
        }
    }

    if n_demands == 0 {
        return Err(BuildError::NoDemands);
    }

    for (id, demands) in &columns {
        if let Some(d) = demands.iter().find(|d| d.cost < 0.0) {
            return Err(BuildError::NegativeCost {
                facility: *id,
                demand: d.demand,
                cost: d.cost,
            });
        }
        if let Some(pair) = demands.windows(2).find(|w| w[0].demand == w[1].demand) {
            return Err(BuildError::DuplicateDemand {
                facility: *id,
                demand: pair[0].demand,
            });
        }
        if demands.iter().zip(reference).any(|(a, b)| a.demand != b.demand) {
            return Err(BuildError::MismatchedDemands {
                facility: *id,
                reference: *reference_id,
            });
        }
    }

    let demand_ids: Vec<NodeId> = reference.iter().map(|d| d.demand).collect();
    let matrix = Matrix::from_fn(n_demands, columns.len(), |r, c| columns[c].1[r].cost);
    let facility_ids = columns.iter().map(|(id, _)| *id).collect();

    debug!(
        "Built {}x{} cost matrix ({} facilities excluded)",
        matrix.rows(),
        matrix.cols(),
        excluded.len()
    );

    Ok(CostTable {
        matrix,
        facility_ids,
        demand_ids,
        excluded,
    })
}

/// Build the MCLP coverage matrix for a service radius
///
/// A cell is covered when both nodes have a position and their distance is
/// at most `radius`. Rows follow the order of `demands`.
pub fn build_coverage_matrix(
    facilities: &[SitedFacility],
    demands: &[SitedDemand],
    radius: f64,
    metric: DistanceMetric,
) -> Result<CoverageTable, BuildError> {
    if facilities.is_empty() {
        return Err(BuildError::NoFacilities);
    }
    if demands.is_empty() {
        return Err(BuildError::NoDemands);
    }
    if !radius.is_finite() || radius < 0.0 {
        return Err(BuildError::InvalidRadius(radius));
    }

    let matrix = Matrix::from_fn(demands.len(), facilities.len(), |r, c| {
        match (demands[r].position, facilities[c].position) {
            (Some(d), Some(f)) => metric.between(d, f) <= radius,
            _ => false,
        }
    });

    debug!(
        "Built {}x{} coverage matrix for radius {}",
        matrix.rows(),
        matrix.cols(),
        radius
    );

    Ok(CoverageTable {
        matrix,
        facility_ids: facilities.iter().map(|f| f.info.id).collect(),
        demand_ids: demands.iter().map(|d| d.info.id).collect(),
    })
}
