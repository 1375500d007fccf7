use crate::distance::Point;

pub type NodeId = u32;

/// Identity shared by every node kind
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, PartialEq)]
pub struct NodeInfo {
    pub id: NodeId,
    pub label: String,
    /// Whether the node has been placed on the canvas or map
    #[cfg_attr(feature = "serde", serde(default))]
    pub placed: bool,
}

impl NodeInfo {
    pub fn new(id: NodeId, label: impl Into<String>) -> Self {
        Self {
            id,
            label: label.into(),
            placed: false,
        }
    }

    pub fn placed(mut self) -> Self {
        self.placed = true;
        self
    }
}

/// Cost of serving one demand from the owning facility
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DemandCost {
    pub demand: NodeId,
    pub cost: f64,
}

/// Facility candidate with its own cost to every demand (p-median)
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, PartialEq)]
pub struct CostedFacility {
    pub info: NodeInfo,
    #[cfg_attr(feature = "serde", serde(default))]
    pub demands: Vec<DemandCost>,
}

/// Facility candidate with an optional position (MCLP)
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, PartialEq)]
pub struct SitedFacility {
    pub info: NodeInfo,
    #[cfg_attr(feature = "serde", serde(default))]
    pub position: Option<Point>,
}

/// Demand point without a position (p-median)
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, PartialEq)]
pub struct CostedDemand {
    pub info: NodeInfo,
    pub weight: f64,
}

/// Demand point with an optional position and a weight (MCLP)
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, PartialEq)]
pub struct SitedDemand {
    pub info: NodeInfo,
    #[cfg_attr(feature = "serde", serde(default))]
    pub position: Option<Point>,
    pub weight: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    Facility,
    Demand,
}

/// Any node the user can place
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(tag = "kind", rename_all = "snake_case"))]
#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    CostedFacility(CostedFacility),
    SitedFacility(SitedFacility),
    CostedDemand(CostedDemand),
    SitedDemand(SitedDemand),
}

impl Node {
    pub fn info(&self) -> &NodeInfo {
        match self {
            Node::CostedFacility(n) => &n.info,
            Node::SitedFacility(n) => &n.info,
            Node::CostedDemand(n) => &n.info,
            Node::SitedDemand(n) => &n.info,
        }
    }

    pub fn id(&self) -> NodeId {
        self.info().id
    }

    pub fn role(&self) -> Role {
        match self {
            Node::CostedFacility(_) | Node::SitedFacility(_) => Role::Facility,
            Node::CostedDemand(_) | Node::SitedDemand(_) => Role::Demand,
        }
    }
}

impl From<CostedFacility> for Node {
    fn from(n: CostedFacility) -> Self {
        Node::CostedFacility(n)
    }
}

impl From<SitedFacility> for Node {
    fn from(n: SitedFacility) -> Self {
        Node::SitedFacility(n)
    }
}

impl From<CostedDemand> for Node {
    fn from(n: CostedDemand) -> Self {
        Node::CostedDemand(n)
    }
}

impl From<SitedDemand> for Node {
    fn from(n: SitedDemand) -> Self {
        Node::SitedDemand(n)
    }
}
