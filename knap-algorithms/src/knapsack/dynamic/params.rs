use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
pub struct Params {
    /// Upper bound on (n + 1) * (capacity + 1) table cells
    pub max_table_cells: u64,

    /// Rows between progress logs, 0 disables them
    pub progress_interval: usize,
}

impl Default for Params {
    fn default() -> Self {
        Self {
            max_table_cells: 1 << 28,
            progress_interval: 0,
        }
    }
}

impl Params {
    pub fn initialize(h: &Option<Map<String, Value>>) -> Self {
        let mut p = Self::default();
        if let Some(m) = h {
            if let Some(v) = m.get("max_table_cells").and_then(|v| v.as_u64()) { p.max_table_cells = v; }
            if let Some(v) = m.get("progress_interval").and_then(|v| v.as_u64()) { p.progress_interval = v as usize; }
        }
        p
    }
}
