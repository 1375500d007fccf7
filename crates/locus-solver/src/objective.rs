use crate::matrix::{CostMatrix, CoverageMatrix};

/// How the p-median objective treats demand weights
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CostWeighting {
    /// Sum of raw per-demand minimum costs
    #[default]
    Unweighted,
    /// Each demand's minimum cost is multiplied by its weight
    DemandWeighted,
}

/// What the MCLP objective counts for a covered demand
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CoverageMeasure {
    /// Sum of the weights of covered demands
    #[default]
    Weight,
    /// Number of covered demands
    Count,
}

/// Scores a candidate facility subset
pub trait Objective {
    /// Objective value of the subset (column indices)
    fn score(&self, subset: &[usize]) -> f64;

    /// Whether `candidate` strictly beats `incumbent`
    fn improves(&self, candidate: f64, incumbent: f64) -> bool;
}

/// Summed minimum assignment cost, minimized
#[derive(Debug, Clone, Copy)]
pub struct MedianCost<'a> {
    costs: &'a CostMatrix,
    weights: &'a [f64],
    weighting: CostWeighting,
}

impl<'a> MedianCost<'a> {
    pub fn new(costs: &'a CostMatrix, weights: &'a [f64], weighting: CostWeighting) -> Self {
        Self { costs, weights, weighting }
    }
}

impl Objective for MedianCost<'_> {
    fn score(&self, subset: &[usize]) -> f64 {
        // With no open facility every row contributes nothing
        if subset.is_empty() {
            return 0.0;
        }

        self.costs
            .iter_rows()
            .zip(self.weights)
            .map(|(row, &weight)| {
                let nearest = subset
                    .iter()
                    .map(|&f| row[f])
                    .fold(f64::INFINITY, f64::min);
                match self.weighting {
                    CostWeighting::Unweighted => nearest,
                    CostWeighting::DemandWeighted => nearest * weight,
                }
            })
            .sum()
    }

    fn improves(&self, candidate: f64, incumbent: f64) -> bool {
        candidate < incumbent
    }
}

/// Demand covered by at least one open facility, maximized
#[derive(Debug, Clone, Copy)]
pub struct CoveredDemand<'a> {
    coverage: &'a CoverageMatrix,
    weights: &'a [f64],
    measure: CoverageMeasure,
}

impl<'a> CoveredDemand<'a> {
    pub fn new(coverage: &'a CoverageMatrix, weights: &'a [f64], measure: CoverageMeasure) -> Self {
        Self { coverage, weights, measure }
    }
}

impl Objective for CoveredDemand<'_> {
    fn score(&self, subset: &[usize]) -> f64 {
        self.coverage
            .iter_rows()
            .zip(self.weights)
            .filter(|(row, _)| subset.iter().any(|&f| row[f]))
            .map(|(_, &weight)| match self.measure {
                CoverageMeasure::Weight => weight,
                CoverageMeasure::Count => 1.0,
            })
            .sum()
    }

    fn improves(&self, candidate: f64, incumbent: f64) -> bool {
        candidate > incumbent
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn costs() -> CostMatrix {
        CostMatrix::from_rows(vec![vec![1.0, 4.0], vec![3.0, 2.0]]).unwrap()
    }

    #[test]
    fn test_median_cost_unweighted() {
        let costs = costs();
        let weights = [10.0, 1.0];
        let obj = MedianCost::new(&costs, &weights, CostWeighting::Unweighted);

        assert_eq!(obj.score(&[0]), 4.0);
        assert_eq!(obj.score(&[1]), 6.0);
        assert_eq!(obj.score(&[0, 1]), 3.0);
        assert_eq!(obj.score(&[]), 0.0);
    }

    #[test]
    fn test_median_cost_weighted() {
        let costs = costs();
        let weights = [10.0, 1.0];
        let obj = MedianCost::new(&costs, &weights, CostWeighting::DemandWeighted);

        // 1*10 + 3*1 and 4*10 + 2*1
        assert_eq!(obj.score(&[0]), 13.0);
        assert_eq!(obj.score(&[1]), 42.0);
    }

    #[test]
    fn test_covered_demand() {
        let coverage = CoverageMatrix::from_rows(vec![
            vec![true, false],
            vec![false, true],
            vec![true, true],
        ])
        .unwrap();
        let weights = [5.0, 3.0, 2.0];

        let by_weight = CoveredDemand::new(&coverage, &weights, CoverageMeasure::Weight);
        assert_eq!(by_weight.score(&[0]), 7.0);
        assert_eq!(by_weight.score(&[1]), 5.0);
        assert_eq!(by_weight.score(&[0, 1]), 10.0);
        assert_eq!(by_weight.score(&[]), 0.0);

        let by_count = CoveredDemand::new(&coverage, &weights, CoverageMeasure::Count);
        assert_eq!(by_count.score(&[0]), 2.0);
        assert_eq!(by_count.score(&[0, 1]), 3.0);
    }

    #[test]
    fn test_improves_is_strict() {
        let costs = costs();
        let weights = [1.0, 1.0];
        let median = MedianCost::new(&costs, &weights, CostWeighting::Unweighted);
        assert!(median.improves(3.0, 4.0));
        assert!(!median.improves(4.0, 4.0));

        let coverage = CoverageMatrix::from_rows(vec![vec![true]]).unwrap();
        let covered = CoveredDemand::new(&coverage, &weights[..1], CoverageMeasure::Weight);
        assert!(covered.improves(5.0, 4.0));
        assert!(!covered.improves(4.0, 4.0));
    }
}
