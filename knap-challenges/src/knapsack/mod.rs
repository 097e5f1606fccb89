use crate::error::KnapsackError;
use anyhow::{anyhow, Result};
use rand::{rngs::SmallRng, Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use serde_json::{from_value, Map, Value};
use std::collections::HashSet;

/// Parameters of a randomly generated instance family.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub struct Track {
    pub n_items: usize,
    pub max_item_weight: u32,
    pub max_item_value: u32,
    /// Capacity as a percentage of the total item weight.
    pub budget: u32,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, Default)]
pub struct Solution {
    pub items: Vec<usize>,
}

impl Solution {
    pub fn new() -> Self {
        Self { items: Vec::new() }
    }
}

impl TryFrom<Map<String, Value>> for Solution {
    type Error = serde_json::Error;

    fn try_from(v: Map<String, Value>) -> Result<Self, Self::Error> {
        from_value(Value::Object(v))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Item {
    pub value: u32,
    pub weight: u32,
}

/// Wire form of a [`Challenge`]. Numbers are signed so that negative input
/// reaches validation instead of failing as an opaque parse error.
#[derive(Serialize, Deserialize)]
pub struct ChallengeData {
    values: Vec<i64>,
    weights: Vec<i64>,
    capacity: i64,
}

/// A validated 0/1 knapsack instance: parallel value and weight sequences of
/// equal length plus a capacity.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(try_from = "ChallengeData", into = "ChallengeData")]
pub struct Challenge {
    values: Vec<u32>,
    weights: Vec<u32>,
    capacity: u32,
}

impl TryFrom<ChallengeData> for Challenge {
    type Error = KnapsackError;

    fn try_from(data: ChallengeData) -> Result<Self, Self::Error> {
        Challenge::from_signed(&data.values, &data.weights, data.capacity)
    }
}

impl From<Challenge> for ChallengeData {
    fn from(challenge: Challenge) -> Self {
        ChallengeData {
            values: challenge.values.into_iter().map(i64::from).collect(),
            weights: challenge.weights.into_iter().map(i64::from).collect(),
            capacity: challenge.capacity as i64,
        }
    }
}

impl Challenge {
    pub fn new(values: Vec<u32>, weights: Vec<u32>, capacity: u32) -> Result<Self, KnapsackError> {
        if values.len() != weights.len() {
            return Err(KnapsackError::ShapeMismatch {
                num_values: values.len(),
                num_weights: weights.len(),
            });
        }
        Ok(Challenge {
            values,
            weights,
            capacity,
        })
    }

    /// Builds a challenge from unchecked signed input. The length check runs
    /// first, so a shape mismatch is reported even when other fields are also
    /// invalid.
    pub fn from_signed(
        values: &[i64],
        weights: &[i64],
        capacity: i64,
    ) -> Result<Self, KnapsackError> {
        if values.len() != weights.len() {
            return Err(KnapsackError::ShapeMismatch {
                num_values: values.len(),
                num_weights: weights.len(),
            });
        }
        if capacity < 0 {
            return Err(KnapsackError::NegativeCapacity { capacity });
        }
        let capacity =
            u32::try_from(capacity).map_err(|_| KnapsackError::CapacityOutOfRange { capacity })?;

        let values = values
            .iter()
            .enumerate()
            .map(|(item, &value)| {
                if value < 0 {
                    return Err(KnapsackError::NegativeValue { item, value });
                }
                u32::try_from(value).map_err(|_| KnapsackError::ValueOutOfRange { item, value })
            })
            .collect::<Result<Vec<_>, _>>()?;
        let weights = weights
            .iter()
            .enumerate()
            .map(|(item, &weight)| {
                if weight < 0 {
                    return Err(KnapsackError::NegativeWeight { item, weight });
                }
                u32::try_from(weight).map_err(|_| KnapsackError::WeightOutOfRange { item, weight })
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Challenge {
            values,
            weights,
            capacity,
        })
    }

    pub fn generate_instance(seed: &[u8; 32], track: &Track) -> Result<Self> {
        if track.max_item_weight == 0 {
            return Err(anyhow!("max_item_weight must be at least 1"));
        }
        if track.max_item_value == 0 {
            return Err(anyhow!("max_item_value must be at least 1"));
        }
        if track.budget > 100 {
            return Err(anyhow!(
                "Budget ({}) must be a percentage between 0 and 100",
                track.budget
            ));
        }
        let mut rng = SmallRng::from_seed(seed.clone());

        // Weights in [1, max_item_weight], values in [1, max_item_value]
        let weights: Vec<u32> = (0..track.n_items)
            .map(|_| rng.gen_range(1..=track.max_item_weight))
            .collect();
        let values: Vec<u32> = (0..track.n_items)
            .map(|_| rng.gen_range(1..=track.max_item_value))
            .collect();

        let total_weight: u64 = weights.iter().map(|&w| w as u64).sum();
        let capacity = total_weight * track.budget as u64 / 100;
        let capacity = u32::try_from(capacity)
            .map_err(|_| anyhow!("Capacity ({}) does not fit in u32", capacity))?;

        Ok(Challenge::new(values, weights, capacity)?)
    }

    pub fn num_items(&self) -> usize {
        self.values.len()
    }

    pub fn values(&self) -> &[u32] {
        &self.values
    }

    pub fn weights(&self) -> &[u32] {
        &self.weights
    }

    pub fn capacity(&self) -> u32 {
        self.capacity
    }

    pub fn item(&self, index: usize) -> Option<Item> {
        Some(Item {
            value: *self.values.get(index)?,
            weight: *self.weights.get(index)?,
        })
    }

    pub fn items(&self) -> impl Iterator<Item = Item> + '_ {
        self.values
            .iter()
            .zip(&self.weights)
            .map(|(&value, &weight)| Item { value, weight })
    }

    pub fn total_weight(&self) -> u64 {
        self.weights.iter().map(|&w| w as u64).sum()
    }

    /// Checks that `solution` is a feasible selection and returns its value.
    pub fn evaluate_total_value(&self, solution: &Solution) -> Result<u64> {
        let selected_items: HashSet<usize> = solution.items.iter().cloned().collect();
        if selected_items.len() != solution.items.len() {
            return Err(anyhow!("Duplicate items selected."));
        }

        let mut total_weight = 0u64;
        let mut total_value = 0u64;
        for &index in &solution.items {
            let item = self
                .item(index)
                .ok_or_else(|| anyhow!("Item ({}) is out of bounds", index))?;
            total_weight += item.weight as u64;
            total_value += item.value as u64;
        }

        if total_weight > self.capacity as u64 {
            return Err(anyhow!(
                "Total weight ({}) exceeded capacity ({})",
                total_weight,
                self.capacity
            ));
        }
        Ok(total_value)
    }
}
