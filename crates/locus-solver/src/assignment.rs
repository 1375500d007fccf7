use crate::matrix::{CostMatrix, CoverageMatrix};
use crate::solution::{Assignment, Service};

/// Assign every demand row to its cheapest facility among `facilities`
///
/// Columns are scanned in the given order and the first minimum wins. With
/// no facilities every row is unassigned.
pub fn assign_nearest(costs: &CostMatrix, facilities: &[usize]) -> Vec<Assignment> {
    costs
        .iter_rows()
        .enumerate()
        .map(|(demand, row)| {
            let mut best: Option<(usize, f64)> = None;
            for &f in facilities {
                if best.is_none_or(|(_, cost)| row[f] < cost) {
                    best = Some((f, row[f]));
                }
            }
            match best {
                Some((f, cost)) => Assignment {
                    demand,
                    facility: Some(f),
                    service: Service::Cost(cost),
                },
                None => Assignment {
                    demand,
                    facility: None,
                    service: Service::Unassigned,
                },
            }
        })
        .collect()
}

/// Assign every demand row to the first facility in `facilities` covering it
pub fn assign_covering(coverage: &CoverageMatrix, facilities: &[usize]) -> Vec<Assignment> {
    coverage
        .iter_rows()
        .enumerate()
        .map(|(demand, row)| match facilities.iter().find(|&&f| row[f]) {
            Some(&f) => Assignment {
                demand,
                facility: Some(f),
                service: Service::Covered,
            },
            None => Assignment {
                demand,
                facility: None,
                service: Service::Unassigned,
            },
        })
        .collect()
}
