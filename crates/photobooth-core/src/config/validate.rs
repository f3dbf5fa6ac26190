//! Configuration validation with range checks.

use crate::error::ConfigError;

use super::Config;

impl Config {
    /// Validate configuration values are within acceptable ranges.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.server.port == 0 {
            return Err(ConfigError::ValidationError(
                "server.port must be > 0".into(),
            ));
        }
        if self.queue.name.trim().is_empty() {
            return Err(ConfigError::ValidationError(
                "queue.name must not be empty".into(),
            ));
        }
        if self.queue.publish_timeout_ms == 0 {
            return Err(ConfigError::ValidationError(
                "queue.publish_timeout_ms must be > 0".into(),
            ));
        }
        if self.queue.receive_timeout_secs == 0 {
            return Err(ConfigError::ValidationError(
                "queue.receive_timeout_secs must be > 0".into(),
            ));
        }
        if self.store.max_connections == 0 {
            return Err(ConfigError::ValidationError(
                "store.max_connections must be > 0".into(),
            ));
        }
        if self.store.connect_timeout_ms == 0 {
            return Err(ConfigError::ValidationError(
                "store.connect_timeout_ms must be > 0".into(),
            ));
        }
        if self.worker.restart_delay_ms == 0 {
            return Err(ConfigError::ValidationError(
                "worker.restart_delay_ms must be > 0".into(),
            ));
        }
        if self.derivative.jpeg_quality == 0 || self.derivative.jpeg_quality > 100 {
            return Err(ConfigError::ValidationError(
                "derivative.jpeg_quality must be between 1 and 100".into(),
            ));
        }
        if !matches!(self.logging.format.as_str(), "pretty" | "json") {
            return Err(ConfigError::ValidationError(
                "logging.format must be \"pretty\" or \"json\"".into(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_passes_validation() {
        let config = Config::default();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_zero_publish_timeout() {
        let mut config = Config::default();
        config.queue.publish_timeout_ms = 0;
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("publish_timeout_ms"));
    }

    #[test]
    fn test_validate_rejects_blank_queue_name() {
        let mut config = Config::default();
        config.queue.name = "  ".into();
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("queue.name"));
    }

    #[test]
    fn test_validate_rejects_out_of_range_jpeg_quality() {
        let mut config = Config::default();
        config.derivative.jpeg_quality = 101;
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("jpeg_quality"));
    }

    #[test]
    fn test_validate_rejects_zero_restart_delay() {
        let mut config = Config::default();
        config.worker.restart_delay_ms = 0;
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("restart_delay_ms"));

        config.worker.restart_delay_ms = 1;
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_unknown_log_format() {
        let mut config = Config::default();
        config.logging.format = "xml".into();
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("logging.format"));
    }
}
