#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KnapsackError {
    AllocationFailed {
        cells: usize,
    },
    CapacityOutOfRange {
        capacity: i64,
    },
    Interrupted {
        rows_filled: usize,
    },
    NegativeCapacity {
        capacity: i64,
    },
    NegativeValue {
        item: usize,
        value: i64,
    },
    NegativeWeight {
        item: usize,
        weight: i64,
    },
    ShapeMismatch {
        num_values: usize,
        num_weights: usize,
    },
    TableTooLarge {
        rows: usize,
        columns: usize,
        max_cells: u64,
    },
    ValueOutOfRange {
        item: usize,
        value: i64,
    },
    WeightOutOfRange {
        item: usize,
        weight: i64,
    },
}

impl KnapsackError {
    /// True for errors caused by the shape or range of the caller's input.
    pub fn is_invalid_input(&self) -> bool {
        matches!(
            self,
            KnapsackError::CapacityOutOfRange { .. }
                | KnapsackError::NegativeCapacity { .. }
                | KnapsackError::NegativeValue { .. }
                | KnapsackError::NegativeWeight { .. }
                | KnapsackError::ShapeMismatch { .. }
                | KnapsackError::ValueOutOfRange { .. }
                | KnapsackError::WeightOutOfRange { .. }
        )
    }

    /// True when the table could not be built within the memory limits.
    pub fn is_resource_exhausted(&self) -> bool {
        matches!(
            self,
            KnapsackError::AllocationFailed { .. } | KnapsackError::TableTooLarge { .. }
        )
    }
}

impl std::fmt::Display for KnapsackError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            KnapsackError::AllocationFailed { cells } => {
                write!(f, "Failed to allocate a table of '{}' cells", cells)
            }
            KnapsackError::CapacityOutOfRange { capacity } => write!(
                f,
                "Capacity '{}' is out of range. Must be at most '{}'",
                capacity,
                u32::MAX
            ),
            KnapsackError::Interrupted { rows_filled } => {
                write!(f, "Solve interrupted after '{}' rows", rows_filled)
            }
            KnapsackError::NegativeCapacity { capacity } => {
                write!(f, "Capacity '{}' is negative", capacity)
            }
            KnapsackError::NegativeValue { item, value } => {
                write!(f, "Item '{}' has negative value '{}'", item, value)
            }
            KnapsackError::NegativeWeight { item, weight } => {
                write!(f, "Item '{}' has negative weight '{}'", item, weight)
            }
            KnapsackError::ShapeMismatch {
                num_values,
                num_weights,
            } => write!(
                f,
                "Values and weights differ in length. Values: '{}', Weights: '{}'",
                num_values, num_weights
            ),
            KnapsackError::TableTooLarge {
                rows,
                columns,
                max_cells,
            } => write!(
                f,
                "Table of '{}' x '{}' cells exceeds the limit of '{}' cells",
                rows, columns, max_cells
            ),
            KnapsackError::ValueOutOfRange { item, value } => write!(
                f,
                "Item '{}' has value '{}' out of range. Must be at most '{}'",
                item,
                value,
                u32::MAX
            ),
            KnapsackError::WeightOutOfRange { item, weight } => write!(
                f,
                "Item '{}' has weight '{}' out of range. Must be at most '{}'",
                item,
                weight,
                u32::MAX
            ),
        }
    }
}

impl std::error::Error for KnapsackError {}
