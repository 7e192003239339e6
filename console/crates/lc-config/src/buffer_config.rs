use crate::{ConfigError, ConfigErrorResult};

use serde::Deserialize;

pub const MIN_CAPACITY: usize = 1;
pub const MAX_CAPACITY: usize = 100_000;
pub const DEFAULT_CAPACITY: usize = 500;

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct BufferConfig {
    /// Lines kept in memory; older lines are dropped
    pub capacity: usize,
}

impl Default for BufferConfig {
    fn default() -> Self {
        Self {
            capacity: DEFAULT_CAPACITY,
        }
    }
}

impl BufferConfig {
    pub fn validate(&self) -> ConfigErrorResult<()> {
        if self.capacity < MIN_CAPACITY || self.capacity > MAX_CAPACITY {
            return Err(ConfigError::config(format!(
                "buffer.capacity must be {}-{}, got {}",
                MIN_CAPACITY, MAX_CAPACITY, self.capacity
            )));
        }

        Ok(())
    }
}
