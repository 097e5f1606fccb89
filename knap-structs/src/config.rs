use crate::serializable_struct_with_getters;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

serializable_struct_with_getters! {
    RuntimeConfig {
        hyperparameters: Option<Map<String, Value>>,
        parallel: Option<bool>,
        timeout_secs: Option<u64>,
    }
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            hyperparameters: None,
            parallel: None,
            timeout_secs: None,
        }
    }
}

impl RuntimeConfig {
    /// Batches run on the rayon pool unless the config turns it off.
    pub fn is_parallel(&self) -> bool {
        self.parallel.unwrap_or(true)
    }
}
