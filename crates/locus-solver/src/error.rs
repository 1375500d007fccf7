use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum SolveError {
    #[error("Matrix has no rows or no columns")]
    EmptyMatrix,
    #[error("Row {row} has {found} entries, expected {expected}")]
    RaggedRows { row: usize, expected: usize, found: usize },
    #[error("Expected {expected} demand weights, got {found}")]
    WeightCountMismatch { expected: usize, found: usize },
    #[error("Weight of demand row {0} is not a finite number")]
    NonFiniteWeight(usize),
    #[error("Cost at row {row}, column {col} is not a finite number")]
    NonFiniteCost { row: usize, col: usize },
}
