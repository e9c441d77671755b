//! Configuration validation.
//!
//! Validates journal config fields before the CLI or server uses them.

use crate::domain::error::JournalError;
use crate::ports::config_port::ConfigPort;

pub fn validate_journal_config(config: &dyn ConfigPort) -> Result<(), JournalError> {
    validate_trades_path(config)?;
    validate_sync_delay(config)?;
    validate_scoring(config)?;
    Ok(())
}

pub fn validate_server_config(config: &dyn ConfigPort) -> Result<(), JournalError> {
    match config.get_string("server", "bind") {
        Some(s) if !s.trim().is_empty() => Ok(()),
        Some(_) => Err(JournalError::ConfigInvalid {
            section: "server".to_string(),
            key: "bind".to_string(),
            reason: "bind must not be empty".to_string(),
        }),
        None => Err(JournalError::ConfigMissing {
            section: "server".to_string(),
            key: "bind".to_string(),
        }),
    }
}

fn validate_trades_path(config: &dyn ConfigPort) -> Result<(), JournalError> {
    match config.get_string("storage", "trades_path") {
        Some(s) if !s.trim().is_empty() => Ok(()),
        Some(_) => Err(JournalError::ConfigInvalid {
            section: "storage".to_string(),
            key: "trades_path".to_string(),
            reason: "trades_path must not be empty".to_string(),
        }),
        None => Err(JournalError::ConfigMissing {
            section: "storage".to_string(),
            key: "trades_path".to_string(),
        }),
    }
}

fn validate_sync_delay(config: &dyn ConfigPort) -> Result<(), JournalError> {
    let value = config.get_int("sync", "delay_ms", 500);
    if value < 0 {
        return Err(JournalError::ConfigInvalid {
            section: "sync".to_string(),
            key: "delay_ms".to_string(),
            reason: "delay_ms must be non-negative".to_string(),
        });
    }
    Ok(())
}

fn validate_scoring(config: &dyn ConfigPort) -> Result<(), JournalError> {
    for key in ["discipline", "tilt"] {
        let value = config.get_double("scoring", key, 50.0);
        if !value.is_finite() {
            return Err(JournalError::ConfigInvalid {
                section: "scoring".to_string(),
                key: key.to_string(),
                reason: format!("{key} must be a finite number"),
            });
        }
    }
    Ok(())
}
