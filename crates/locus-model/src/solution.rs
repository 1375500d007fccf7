use locus_solver::Service;

use crate::node::NodeId;
use crate::problem::Formulation;

/// A complete solved location problem, in node ids
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, PartialEq)]
pub struct Solution {
    pub formulation: Formulation,
    /// Total cost (p-median) or covered demand (MCLP) of the chosen facilities
    pub objective: f64,
    /// Chosen facility ids, in candidate order
    pub facilities: Vec<NodeId>,
    /// One entry per demand, in row order
    pub assignments: Vec<DemandAssignment>,
    /// Number of facility subsets scored
    pub evaluated: u64,
    pub statistics: Statistics,
}

#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DemandAssignment {
    pub demand: NodeId,
    /// `None` when no chosen facility serves the demand
    pub facility: Option<NodeId>,
    pub service: Service,
}

#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(tag = "kind", rename_all = "snake_case"))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Statistics {
    Median {
        total_weight: f64,
        /// Weighted mean of realized costs over assigned demands
        mean_cost: f64,
    },
    Coverage {
        covered: usize,
        uncovered: usize,
        total_weight: f64,
        /// Share of total weight that is covered, in percent
        coverage_pct: f64,
    },
}

impl Solution {
    /// Demands served by each chosen facility, in chosen-facility order
    pub fn groups(&self) -> Vec<(NodeId, Vec<NodeId>)> {
        self.facilities
            .iter()
            .map(|&facility| {
                let served = self
                    .assignments
                    .iter()
                    .filter(|a| a.facility == Some(facility))
                    .map(|a| a.demand)
                    .collect();
                (facility, served)
            })
            .collect()
    }

    /// Demands no chosen facility serves
    pub fn unassigned(&self) -> Vec<NodeId> {
        self.assignments
            .iter()
            .filter(|a| a.facility.is_none())
            .map(|a| a.demand)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn solution() -> Solution {
        Solution {
            formulation: Formulation::Mclp,
            objective: 7.0,
            facilities: vec![4, 9],
            assignments: vec![
                DemandAssignment { demand: 1, facility: Some(9), service: Service::Covered },
                DemandAssignment { demand: 2, facility: None, service: Service::Unassigned },
                DemandAssignment { demand: 3, facility: Some(4), service: Service::Covered },
                DemandAssignment { demand: 5, facility: Some(9), service: Service::Covered },
            ],
            evaluated: 3,
            statistics: Statistics::Coverage {
                covered: 3,
                uncovered: 1,
                total_weight: 10.0,
                coverage_pct: 70.0,
            },
        }
    }

    #[test]
    fn test_groups() {
        assert_eq!(solution().groups(), vec![(4, vec![3]), (9, vec![1, 5])]);
    }

    #[test]
    fn test_unassigned() {
        assert_eq!(solution().unassigned(), vec![2]);
    }
}
