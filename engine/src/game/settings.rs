use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::config::Validate;

#[derive(Debug, PartialEq, Serialize, Deserialize, Clone)]
pub struct SimulationSettings {
    /// Side length of the square toroidal grid.
    pub grid_size: usize,
    /// Tick interval at level 1.
    pub base_update_interval_ms: u64,
    /// Floor for the tick interval once the speed curve bottoms out.
    pub min_update_interval_ms: u64,
}

impl SimulationSettings {
    pub fn base_update_interval(&self) -> Duration {
        Duration::from_millis(self.base_update_interval_ms)
    }

    pub fn min_update_interval(&self) -> Duration {
        Duration::from_millis(self.min_update_interval_ms)
    }
}

impl Default for SimulationSettings {
    fn default() -> Self {
        Self {
            grid_size: 20,
            base_update_interval_ms: 200,
            min_update_interval_ms: 20,
        }
    }
}

impl Validate for SimulationSettings {
    fn validate(&self) -> Result<(), String> {
        if self.grid_size < 5 {
            return Err("grid_size must be at least 5".to_string());
        }
        if self.grid_size > 100 {
            return Err("grid_size must not exceed 100".to_string());
        }
        if self.base_update_interval_ms < 50 {
            return Err("base_update_interval_ms must be at least 50".to_string());
        }
        if self.base_update_interval_ms > 5000 {
            return Err("base_update_interval_ms must not exceed 5000".to_string());
        }
        if self.min_update_interval_ms == 0 {
            return Err("min_update_interval_ms must be greater than 0".to_string());
        }
        if self.min_update_interval_ms > self.base_update_interval_ms {
            return Err(
                "min_update_interval_ms must not exceed base_update_interval_ms".to_string(),
            );
        }
        Ok(())
    }
}
