//! Dispatcher configuration.

use crate::buffer::DEFAULT_CAPACITY;
use crate::error::DispatchError;
use serde::{Deserialize, Serialize};

fn default_initial_buffer_capacity() -> usize {
    DEFAULT_CAPACITY
}

fn default_callback_name() -> String {
    "EventDispatcher".to_string()
}

/// Tuning for an [`EventDispatcher`](crate::EventDispatcher).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DispatcherConfig {
    /// Slots allocated for the first dispatch cycle
    #[serde(default = "default_initial_buffer_capacity")]
    pub initial_buffer_capacity: usize,
    /// Key the dispatcher activates on the frame callback source
    #[serde(default = "default_callback_name")]
    pub callback_name: String,
}

impl Default for DispatcherConfig {
    fn default() -> Self {
        Self {
            initial_buffer_capacity: default_initial_buffer_capacity(),
            callback_name: default_callback_name(),
        }
    }
}

impl DispatcherConfig {
    pub fn validate(&self) -> Result<(), DispatchError> {
        if self.initial_buffer_capacity == 0 {
            return Err(DispatchError::Config("initial_buffer_capacity must be at least 1".to_string()));
        }
        if self.callback_name.trim().is_empty() {
            return Err(DispatchError::Config("callback_name cannot be empty".to_string()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let config = DispatcherConfig::default();
        assert_eq!(config.initial_buffer_capacity, 16);
        assert_eq!(config.callback_name, "EventDispatcher");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_missing_fields_fall_back_to_defaults() {
        let config: DispatcherConfig = serde_json::from_str(r#"{ "initial_buffer_capacity": 64 }"#).unwrap();
        assert_eq!(config.initial_buffer_capacity, 64);
        assert_eq!(config.callback_name, "EventDispatcher");
    }

    #[test]
    fn test_rejects_zero_capacity_and_blank_name() {
        let zero = DispatcherConfig {
            initial_buffer_capacity: 0,
            ..Default::default()
        };
        assert!(matches!(zero.validate(), Err(DispatchError::Config(_))));

        let blank = DispatcherConfig {
            callback_name: "  ".to_string(),
            ..Default::default()
        };
        assert!(blank.validate().is_err());
    }
}
