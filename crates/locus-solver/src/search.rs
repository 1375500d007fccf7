use log::{debug, warn};

use crate::combinations::combinations;
use crate::error::SolveError;
use crate::matrix::{CostMatrix, CoverageMatrix, Matrix};
use crate::objective::{CostWeighting, CoverageMeasure, CoveredDemand, MedianCost, Objective};
use crate::solution::Selection;

/// Exhaustive solver for the p-median and maximum covering problems
///
/// Every size-`p` facility subset is scored, so the result is the global
/// optimum. The search is `O(C(n, p) * m * p)` for `n` facilities and `m`
/// demands and blocks the caller until it finishes; instances beyond roughly
/// 20 candidates with `p > 5` take a long time.
#[derive(Debug, Clone)]
pub struct Solver {
    cost_weighting: CostWeighting,
    coverage_measure: CoverageMeasure,
    /// Subset count above which a warning is logged before searching
    warn_threshold: u64,
}

impl Default for Solver {
    fn default() -> Self {
        Self {
            cost_weighting: CostWeighting::default(),
            coverage_measure: CoverageMeasure::default(),
            warn_threshold: 1_000_000,
        }
    }
}

impl Solver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_cost_weighting(mut self, weighting: CostWeighting) -> Self {
        self.cost_weighting = weighting;
        self
    }

    pub fn with_coverage_measure(mut self, measure: CoverageMeasure) -> Self {
        self.coverage_measure = measure;
        self
    }

    pub fn with_warn_threshold(mut self, subsets: u64) -> Self {
        self.warn_threshold = subsets;
        self
    }

    /// Choose `p` facilities minimizing the summed nearest-facility cost
    ///
    /// `weights` holds one entry per demand row. Under the default
    /// [`CostWeighting::Unweighted`] they are only checked, not applied.
    pub fn solve_p_median(
        &self,
        costs: &CostMatrix,
        weights: &[f64],
        p: usize,
    ) -> Result<Selection, SolveError> {
        validate(costs, weights)?;
        for (row, values) in costs.iter_rows().enumerate() {
            if let Some(col) = values.iter().position(|c| !c.is_finite()) {
                return Err(SolveError::NonFiniteCost { row, col });
            }
        }

        let objective = MedianCost::new(costs, weights, self.cost_weighting);
        Ok(self.search(&objective, costs.cols(), p))
    }

    /// Choose `p` facilities maximizing the covered demand
    pub fn solve_mclp(
        &self,
        coverage: &CoverageMatrix,
        weights: &[f64],
        p: usize,
    ) -> Result<Selection, SolveError> {
        validate(coverage, weights)?;

        let objective = CoveredDemand::new(coverage, weights, self.coverage_measure);
        Ok(self.search(&objective, coverage.cols(), p))
    }

    /// Score every size-`p` subset of `0..n_facilities`, keeping the first best
    fn search<O: Objective>(&self, objective: &O, n_facilities: usize, p: usize) -> Selection {
        if p > n_facilities {
            debug!("Clamping p = {} to the {} available facilities", p, n_facilities);
        }
        let p = p.min(n_facilities);

        let columns: Vec<usize> = (0..n_facilities).collect();
        let subsets = combinations(&columns, p);

        match subsets.total() {
            Some(total) if total <= self.warn_threshold => {
                debug!("Scoring {} subsets of size {} from {} facilities", total, p, n_facilities);
            }
            Some(total) => {
                warn!(
                    "Scoring {} subsets of size {} from {} facilities; this will block for a while",
                    total, p, n_facilities
                );
            }
            None => {
                warn!(
                    "Subset count C({}, {}) overflows u64; this search will not finish in practice",
                    n_facilities, p
                );
            }
        }

        let mut best: Option<(Vec<usize>, f64)> = None;
        let mut evaluated = 0u64;

        for subset in subsets {
            let score = objective.score(&subset);
            evaluated += 1;

            if best.as_ref().is_none_or(|(_, incumbent)| objective.improves(score, *incumbent)) {
                best = Some((subset, score));
            }
        }

        let (facilities, score) = best.unwrap_or_default();
        debug!("Best subset {:?} with objective {}", facilities, score);

        Selection {
            facilities,
            objective: score,
            evaluated,
        }
    }
}

fn validate<T: Copy>(matrix: &Matrix<T>, weights: &[f64]) -> Result<(), SolveError> {
    if matrix.is_empty() {
        return Err(SolveError::EmptyMatrix);
    }
    if weights.len() != matrix.rows() {
        return Err(SolveError::WeightCountMismatch {
            expected: matrix.rows(),
            found: weights.len(),
        });
    }
    if let Some(row) = weights.iter().position(|w| !w.is_finite()) {
        return Err(SolveError::NonFiniteWeight(row));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Deterministic pseudo-random values in [0, 10)
    fn values(seed: u64, count: usize) -> Vec<f64> {
        let mut state = seed;
        (0..count)
            .map(|_| {
                state = state.wrapping_mul(6364136223846793005).wrapping_add(1442695040888963407);
                ((state >> 33) % 1000) as f64 / 100.0
            })
            .collect()
    }

    fn random_costs(seed: u64, rows: usize, cols: usize) -> CostMatrix {
        let v = values(seed, rows * cols);
        Matrix::from_fn(rows, cols, |r, c| v[r * cols + c])
    }

    fn random_coverage(seed: u64, rows: usize, cols: usize) -> CoverageMatrix {
        let v = values(seed, rows * cols);
        Matrix::from_fn(rows, cols, |r, c| v[r * cols + c] < 3.0)
    }

    #[test]
    fn test_p_median_example() {
        // Facility 0 costs 1 + 3 = 4, facility 1 costs 4 + 2 = 6
        let costs = CostMatrix::from_rows(vec![vec![1.0, 4.0], vec![3.0, 2.0]]).unwrap();
        let selection = Solver::new().solve_p_median(&costs, &[1.0, 1.0], 1).unwrap();

        assert_eq!(selection.facilities, vec![0]);
        assert_eq!(selection.objective, 4.0);
        assert_eq!(selection.evaluated, 2);
    }

    #[test]
    fn test_mclp_example() {
        // Facility 0 covers weight 5 + 2, facility 1 covers 3 + 2
        let coverage = CoverageMatrix::from_rows(vec![
            vec![true, false],
            vec![false, true],
            vec![true, true],
        ])
        .unwrap();
        let selection = Solver::new().solve_mclp(&coverage, &[5.0, 3.0, 2.0], 1).unwrap();

        assert_eq!(selection.facilities, vec![0]);
        assert_eq!(selection.objective, 7.0);
    }

    #[test]
    fn test_ties_keep_first_subset() {
        let costs = CostMatrix::from_rows(vec![vec![1.0, 1.0, 1.0]]).unwrap();
        let selection = Solver::new().solve_p_median(&costs, &[1.0], 2).unwrap();
        assert_eq!(selection.facilities, vec![0, 1]);

        let coverage = CoverageMatrix::from_rows(vec![vec![false, true, true]]).unwrap();
        let selection = Solver::new().solve_mclp(&coverage, &[1.0], 1).unwrap();
        assert_eq!(selection.facilities, vec![1]);
    }

    #[test]
    fn test_p_median_optimal_against_every_subset() {
        for seed in 0..5 {
            let costs = random_costs(seed, 7, 6);
            let weights = vec![1.0; 7];
            let solver = Solver::new();

            for p in 1..=6 {
                let selection = solver.solve_p_median(&costs, &weights, p).unwrap();
                let objective = MedianCost::new(&costs, &weights, CostWeighting::Unweighted);
                let columns: Vec<usize> = (0..6).collect();
                for subset in combinations(&columns, p) {
                    assert!(
                        selection.objective <= objective.score(&subset),
                        "seed {} p {}: {:?} beats chosen {:?}",
                        seed,
                        p,
                        subset,
                        selection.facilities
                    );
                }
                assert_eq!(selection.objective, objective.score(&selection.facilities));
            }
        }
    }

    #[test]
    fn test_mclp_optimal_against_every_subset() {
        for seed in 0..5 {
            let coverage = random_coverage(seed + 100, 9, 6);
            let weights = values(seed + 200, 9);
            let solver = Solver::new();

            for p in 1..=6 {
                let selection = solver.solve_mclp(&coverage, &weights, p).unwrap();
                let objective = CoveredDemand::new(&coverage, &weights, CoverageMeasure::Weight);
                let columns: Vec<usize> = (0..6).collect();
                for subset in combinations(&columns, p) {
                    assert!(selection.objective >= objective.score(&subset));
                }
            }
        }
    }

    #[test]
    fn test_monotone_in_p() {
        let costs = random_costs(7, 8, 6);
        let coverage = random_coverage(8, 8, 6);
        let weights = values(9, 8);
        let solver = Solver::new();

        let mut last_cost = f64::INFINITY;
        let mut last_covered = f64::NEG_INFINITY;
        for p in 1..=6 {
            let cost = solver.solve_p_median(&costs, &weights, p).unwrap().objective;
            let covered = solver.solve_mclp(&coverage, &weights, p).unwrap().objective;
            assert!(cost <= last_cost, "p = {}: {} > {}", p, cost, last_cost);
            assert!(covered >= last_covered, "p = {}: {} < {}", p, covered, last_covered);
            last_cost = cost;
            last_covered = covered;
        }
    }

    #[test]
    fn test_deterministic() {
        let costs = random_costs(11, 6, 5);
        let weights = vec![1.0; 6];
        let solver = Solver::new();
        let first = solver.solve_p_median(&costs, &weights, 3).unwrap();
        let second = solver.solve_p_median(&costs, &weights, 3).unwrap();
        assert_eq!(first, second);
        assert_eq!(first.objective.to_bits(), second.objective.to_bits());
    }

    #[test]
    fn test_p_zero_and_p_above_candidates() {
        let costs = CostMatrix::from_rows(vec![vec![1.0, 4.0], vec![3.0, 2.0]]).unwrap();
        let solver = Solver::new();

        let none = solver.solve_p_median(&costs, &[1.0, 1.0], 0).unwrap();
        assert!(none.facilities.is_empty());
        assert_eq!(none.objective, 0.0);
        assert_eq!(none.evaluated, 1);

        let all = solver.solve_p_median(&costs, &[1.0, 1.0], 5).unwrap();
        assert_eq!(all.facilities, vec![0, 1]);
        assert_eq!(all.objective, 3.0);
    }

    #[test]
    fn test_weighting_options() {
        // Unweighted prefers facility 0 (4 vs 6); weighting demand 1 heavily flips it
        let costs = CostMatrix::from_rows(vec![vec![1.0, 4.0], vec![3.0, 2.0]]).unwrap();
        let weights = [1.0, 10.0];

        let plain = Solver::new().solve_p_median(&costs, &weights, 1).unwrap();
        assert_eq!(plain.facilities, vec![0]);

        let weighted = Solver::new()
            .with_cost_weighting(CostWeighting::DemandWeighted)
            .solve_p_median(&costs, &weights, 1)
            .unwrap();
        assert_eq!(weighted.facilities, vec![1]);
        assert_eq!(weighted.objective, 24.0);

        // Facility 0 covers one heavy demand, facility 1 covers two light ones
        let coverage = CoverageMatrix::from_rows(vec![
            vec![true, false],
            vec![false, true],
            vec![false, true],
        ])
        .unwrap();
        let weights = [10.0, 1.0, 1.0];
        let by_weight = Solver::new().solve_mclp(&coverage, &weights, 1).unwrap();
        assert_eq!(by_weight.facilities, vec![0]);

        let by_count = Solver::new()
            .with_coverage_measure(CoverageMeasure::Count)
            .solve_mclp(&coverage, &weights, 1)
            .unwrap();
        assert_eq!(by_count.facilities, vec![1]);
        assert_eq!(by_count.objective, 2.0);
    }

    #[test]
    fn test_validation() {
        let costs = CostMatrix::from_rows(vec![vec![1.0, 4.0], vec![3.0, 2.0]]).unwrap();
        let solver = Solver::new();

        assert_eq!(
            solver.solve_p_median(&costs, &[1.0], 1),
            Err(SolveError::WeightCountMismatch { expected: 2, found: 1 })
        );
        assert_eq!(
            solver.solve_p_median(&costs, &[1.0, f64::NAN], 1),
            Err(SolveError::NonFiniteWeight(1))
        );
        assert_eq!(
            solver.solve_p_median(&CostMatrix::from_rows(Vec::new()).unwrap(), &[], 1),
            Err(SolveError::EmptyMatrix)
        );

        let broken = CostMatrix::from_rows(vec![vec![1.0, f64::INFINITY]]).unwrap();
        assert_eq!(
            solver.solve_p_median(&broken, &[1.0], 1),
            Err(SolveError::NonFiniteCost { row: 0, col: 1 })
        );
    }
}
