use std::collections::HashSet;

use log::debug;

use crate::node::{CostedDemand, CostedFacility, DemandCost, NodeId};

/// Bring every facility's demand list in line with the current demands
///
/// Missing demands are appended with the demand's weight as the initial
/// cost, and entries for demands that no longer exist are dropped. Returns
/// `None` when nothing changes or when either list is empty.
pub fn sync_facility_demands(
    facilities: &[CostedFacility],
    demands: &[CostedDemand],
) -> Option<Vec<CostedFacility>> {
    if facilities.is_empty() || demands.is_empty() {
        return None;
    }

    let current: HashSet<NodeId> = demands.iter().map(|d| d.info.id).collect();
    let mut changed = false;

    let synced = facilities
        .iter()
        .map(|facility| {
            let listed: HashSet<NodeId> = facility.demands.iter().map(|d| d.demand).collect();

            let mut entries: Vec<DemandCost> = facility
                .demands
                .iter()
                .filter(|d| current.contains(&d.demand))
                .copied()
                .collect();
            let removed = facility.demands.len() - entries.len();

            let before = entries.len();
            entries.extend(
                demands
                    .iter()
                    .filter(|d| !listed.contains(&d.info.id))
                    .map(|d| DemandCost {
                        demand: d.info.id,
                        cost: d.weight,
                    }),
            );
            let added = entries.len() - before;

            if added > 0 || removed > 0 {
                debug!(
                    "Facility {}: {} demands added, {} removed",
                    facility.info.id, added, removed
                );
                changed = true;
            }

            CostedFacility {
                info: facility.info.clone(),
                demands: entries,
            }
        })
        .collect();

    changed.then_some(synced)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::build_cost_matrix;
    use crate::node::NodeInfo;

    fn demand(id: NodeId, weight: f64) -> CostedDemand {
        CostedDemand {
            info: NodeInfo::new(id, format!("D{}", id)),
            weight,
        }
    }

    fn facility(id: NodeId, costs: &[(NodeId, f64)]) -> CostedFacility {
        CostedFacility {
            info: NodeInfo::new(id, format!("F{}", id)),
            demands: costs
                .iter()
                .map(|&(demand, cost)| DemandCost { demand, cost })
                .collect(),
        }
    }

    #[test]
    fn test_adds_missing_demands() {
        let facilities = vec![facility(1, &[(1, 4.0)]), facility(2, &[])];
        let demands = vec![demand(1, 1.0), demand(2, 3.0)];

        let synced = sync_facility_demands(&facilities, &demands).unwrap();
        assert_eq!(
            synced[0].demands,
            vec![DemandCost { demand: 1, cost: 4.0 }, DemandCost { demand: 2, cost: 3.0 }]
        );
        assert_eq!(synced[1].demands.len(), 2);

        // The synced lists satisfy the builder's shape checks
        let table = build_cost_matrix(&synced).unwrap();
        assert_eq!(table.demand_ids, vec![1, 2]);
    }

    #[test]
    fn test_drops_removed_demands() {
        let facilities = vec![facility(1, &[(1, 4.0), (9, 2.0)])];
        let demands = vec![demand(1, 1.0)];

        let synced = sync_facility_demands(&facilities, &demands).unwrap();
        assert_eq!(synced[0].demands, vec![DemandCost { demand: 1, cost: 4.0 }]);
    }

    #[test]
    fn test_no_change() {
        let facilities = vec![facility(1, &[(2, 4.0), (1, 5.0)])];
        let demands = vec![demand(1, 1.0), demand(2, 3.0)];
        assert!(sync_facility_demands(&facilities, &demands).is_none());

        assert!(sync_facility_demands(&[], &demands).is_none());
        assert!(sync_facility_demands(&facilities, &[]).is_none());
    }
}
