/// Best facility subset found by an exhaustive search
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, PartialEq)]
pub struct Selection {
    /// Chosen facility columns, ascending
    pub facilities: Vec<usize>,
    /// Objective value of the chosen subset
    pub objective: f64,
    /// Number of subsets scored
    pub evaluated: u64,
}

/// How a demand is served by the chosen facilities
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(tag = "kind", content = "value", rename_all = "snake_case"))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Service {
    /// Matrix cost of the assigned facility (p-median)
    Cost(f64),
    /// Within range of the assigned facility (MCLP)
    Covered,
    /// No chosen facility serves this demand
    Unassigned,
}

impl Service {
    pub fn is_assigned(&self) -> bool {
        !matches!(self, Service::Unassigned)
    }

    pub fn cost(&self) -> Option<f64> {
        match self {
            Service::Cost(c) => Some(*c),
            _ => None,
        }
    }
}

/// Assignment of one demand row
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Assignment {
    /// Demand row
    pub demand: usize,
    /// Facility column, `None` when unassigned
    pub facility: Option<usize>,
    pub service: Service,
}
