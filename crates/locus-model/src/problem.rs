//! Location problems in terms of nodes, and the single solve entry point

use locus_solver::{
    assign_covering, assign_nearest, Assignment, CostWeighting, CoverageMeasure, SolveError, Solver,
};
use log::{info, warn};
use std::collections::HashMap;
use thiserror::Error;

use crate::builder::{build_cost_matrix, build_coverage_matrix, BuildError, CostTable, CoverageTable};
use crate::distance::DistanceMetric;
use crate::node::{CostedDemand, CostedFacility, Node, NodeId, SitedDemand, SitedFacility};
use crate::solution::{DemandAssignment, Solution, Statistics};

#[derive(Error, Debug, Clone, PartialEq)]
pub enum LocateError {
    #[error(transparent)]
    Build(#[from] BuildError),
    #[error(transparent)]
    Solve(#[from] SolveError),
}

#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Formulation {
    PMedian,
    Mclp,
}

/// Open `p` facilities minimizing the total cost to each demand's nearest one
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, PartialEq)]
pub struct PMedianProblem {
    pub facilities: Vec<CostedFacility>,
    /// Demand points supplying weights; uniform weights when empty
    #[cfg_attr(feature = "serde", serde(default))]
    pub demands: Vec<CostedDemand>,
    pub p: usize,
    #[cfg_attr(feature = "serde", serde(default))]
    pub weighting: CostWeighting,
}

/// Open `p` facilities maximizing the demand within `radius` of one of them
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, PartialEq)]
pub struct MclpProblem {
    pub facilities: Vec<SitedFacility>,
    pub demands: Vec<SitedDemand>,
    pub radius: f64,
    pub p: usize,
    #[cfg_attr(feature = "serde", serde(default))]
    pub metric: DistanceMetric,
    #[cfg_attr(feature = "serde", serde(default))]
    pub measure: CoverageMeasure,
}

#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(tag = "formulation", rename_all = "snake_case"))]
#[derive(Debug, Clone, PartialEq)]
pub enum LocationProblem {
    PMedian(PMedianProblem),
    Mclp(MclpProblem),
}

/// Solve a location problem
///
/// `Ok(None)` means there is nothing to solve (no facilities, no demands, or
/// every facility excluded for bad costs). Inconsistent input is an error.
pub fn solve_location_problem(problem: &LocationProblem) -> Result<Option<Solution>, LocateError> {
    problem.solve()
}

impl LocationProblem {
    /// Collect the node variants a formulation consumes, ignoring the rest
    pub fn from_nodes(formulation: Formulation, nodes: &[Node], p: usize, radius: f64) -> Self {
        match formulation {
            Formulation::PMedian => LocationProblem::PMedian(PMedianProblem {
                facilities: nodes
                    .iter()
                    .filter_map(|n| match n {
                        Node::CostedFacility(f) => Some(f.clone()),
                        _ => None,
                    })
                    .collect(),
                demands: nodes
                    .iter()
                    .filter_map(|n| match n {
                        Node::CostedDemand(d) => Some(d.clone()),
                        _ => None,
                    })
                    .collect(),
                p,
                weighting: CostWeighting::default(),
            }),
            Formulation::Mclp => LocationProblem::Mclp(MclpProblem {
                facilities: nodes
                    .iter()
                    .filter_map(|n| match n {
                        Node::SitedFacility(f) => Some(f.clone()),
                        _ => None,
                    })
                    .collect(),
                demands: nodes
                    .iter()
                    .filter_map(|n| match n {
                        Node::SitedDemand(d) => Some(d.clone()),
                        _ => None,
                    })
                    .collect(),
                radius,
                p,
                metric: DistanceMetric::default(),
                measure: CoverageMeasure::default(),
            }),
        }
    }

    pub fn formulation(&self) -> Formulation {
        match self {
            LocationProblem::PMedian(_) => Formulation::PMedian,
            LocationProblem::Mclp(_) => Formulation::Mclp,
        }
    }

    pub fn p(&self) -> usize {
        match self {
            LocationProblem::PMedian(pm) => pm.p,
            LocationProblem::Mclp(mc) => mc.p,
        }
    }

    pub fn solve(&self) -> Result<Option<Solution>, LocateError> {
        match self {
            LocationProblem::PMedian(pm) => pm.solve(),
            LocationProblem::Mclp(mc) => mc.solve(),
        }
    }
}

impl PMedianProblem {
    pub fn cost_table(&self) -> Result<CostTable, BuildError> {
        build_cost_matrix(&self.facilities)
    }

    /// Demand weights in row order, looked up by the demand id of each row
    ///
    /// Uniform weights when no demand points are given. Otherwise the demand
    /// points must name exactly the demands the facilities list.
    pub fn weights(&self, table: &CostTable) -> Result<Vec<f64>, LocateError> {
        let rows = table.matrix.rows();
        if self.demands.is_empty() {
            return Ok(vec![1.0; rows]);
        }
        if self.demands.len() != rows {
            return Err(SolveError::WeightCountMismatch {
                expected: rows,
                found: self.demands.len(),
            }
            .into());
        }

        let by_id: HashMap<NodeId, f64> = self.demands.iter().map(|d| (d.info.id, d.weight)).collect();
        table
            .demand_ids
            .iter()
            .map(|id| {
                by_id
                    .get(id)
                    .copied()
                    .ok_or(LocateError::Build(BuildError::MissingDemandWeight(*id)))
            })
            .collect()
    }

    pub fn solve(&self) -> Result<Option<Solution>, LocateError> {
        let Some(table) = nothing_to_solve(self.cost_table())? else {
            return Ok(None);
        };
        let weights = self.weights(&table)?;

        let selection = Solver::new()
            .with_cost_weighting(self.weighting)
            .solve_p_median(&table.matrix, &weights, self.p)?;
        let assignments = assign_nearest(&table.matrix, &selection.facilities);

        let (mut weighted_cost, mut assigned_weight) = (0.0, 0.0);
        for (a, &w) in assignments.iter().zip(&weights) {
            if let Some(cost) = a.service.cost() {
                weighted_cost += w * cost;
                assigned_weight += w;
            }
        }
        let mean_cost = if assigned_weight > 0.0 {
            weighted_cost / assigned_weight
        } else {
            0.0
        };

        info!(
            "p-median: opened {:?} with total cost {}",
            selection.facilities, selection.objective
        );

        Ok(Some(Solution {
            formulation: Formulation::PMedian,
            objective: selection.objective,
            facilities: to_ids(&selection.facilities, &table.facility_ids),
            assignments: to_demand_assignments(&assignments, &table.demand_ids, &table.facility_ids),
            evaluated: selection.evaluated,
            statistics: Statistics::Median {
                total_weight: weights.iter().sum(),
                mean_cost,
            },
        }))
    }
}

impl MclpProblem {
    pub fn coverage_table(&self) -> Result<CoverageTable, BuildError> {
        build_coverage_matrix(&self.facilities, &self.demands, self.radius, self.metric)
    }

    pub fn solve(&self) -> Result<Option<Solution>, LocateError> {
        let Some(table) = nothing_to_solve(self.coverage_table())? else {
            return Ok(None);
        };
        let weights: Vec<f64> = self.demands.iter().map(|d| d.weight).collect();

        let selection = Solver::new()
            .with_coverage_measure(self.measure)
            .solve_mclp(&table.matrix, &weights, self.p)?;
        let assignments = assign_covering(&table.matrix, &selection.facilities);

        let covered = assignments.iter().filter(|a| a.service.is_assigned()).count();
        let covered_weight: f64 = assignments
            .iter()
            .zip(&weights)
            .filter(|(a, _)| a.service.is_assigned())
            .map(|(_, &w)| w)
            .sum();
        let total_weight: f64 = weights.iter().sum();
        let coverage_pct = if total_weight > 0.0 {
            covered_weight / total_weight * 100.0
        } else {
            0.0
        };

        info!(
            "MCLP: opened {:?} covering {} of {} demands",
            selection.facilities,
            covered,
            assignments.len()
        );

        Ok(Some(Solution {
            formulation: Formulation::Mclp,
            objective: selection.objective,
            facilities: to_ids(&selection.facilities, &table.facility_ids),
            assignments: to_demand_assignments(&assignments, &table.demand_ids, &table.facility_ids),
            evaluated: selection.evaluated,
            statistics: Statistics::Coverage {
                covered,
                uncovered: assignments.len() - covered,
                total_weight,
                coverage_pct,
            },
        }))
    }
}

/// Structural build failures become "no solution"; everything else is an error
fn nothing_to_solve<T>(built: Result<T, BuildError>) -> Result<Option<T>, LocateError> {
    match built {
        Ok(table) => Ok(Some(table)),
        Err(e) if e.is_structural() => {
            warn!("Nothing to solve: {}", e);
            Ok(None)
        }
        Err(e) => Err(e.into()),
    }
}

fn to_ids(columns: &[usize], facility_ids: &[NodeId]) -> Vec<NodeId> {
    columns.iter().map(|&c| facility_ids[c]).collect()
}

fn to_demand_assignments(
    assignments: &[Assignment],
    demand_ids: &[NodeId],
    facility_ids: &[NodeId],
) -> Vec<DemandAssignment> {
    assignments
        .iter()
        .map(|a| DemandAssignment {
            demand: demand_ids[a.demand],
            facility: a.facility.map(|c| facility_ids[c]),
            service: a.service,
        })
        .collect()
}
