use crate::serializable_struct_with_getters;
pub use knap_challenges::knapsack::Track;
use knap_utils::{jsonify, u8s_from_str};
use serde::{Deserialize, Serialize};

serializable_struct_with_getters! {
    GenerateSettings {
        seed: String,
        track: Track,
    }
}
impl GenerateSettings {
    pub fn calc_seed(&self, nonce: u64) -> [u8; 32] {
        u8s_from_str(&format!("{}_{}", jsonify(&self), nonce))
    }
}

serializable_struct_with_getters! {
    OutputData {
        num_items: usize,
        capacity: u32,
        value: u64,
        items: Vec<usize>,
        elapsed_ms: u64,
    }
}
