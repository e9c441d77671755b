//! Location adapters.
//!
//! `MemoryLocation` backs tests and the CLI with an in-memory URL;
//! `NullLocation` models the headless case where no navigable context
//! exists and every location-touching operation degrades to a no-op.

use crate::ports::location_port::LocationPort;
use std::sync::{Mutex, PoisonError};

/// In-memory URL holder.
pub struct MemoryLocation {
    url: Mutex<String>,
}

impl MemoryLocation {
    pub fn new(url: &str) -> Self {
        Self {
            url: Mutex::new(url.to_string()),
        }
    }

    /// Current URL without going through the port trait.
    pub fn current(&self) -> String {
        self.url
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl LocationPort for MemoryLocation {
    fn read(&self) -> Option<String> {
        Some(self.current())
    }

    fn replace(&self, url: &str) {
        *self.url.lock().unwrap_or_else(PoisonError::into_inner) = url.to_string();
    }
}

/// Absent navigable context.
pub struct NullLocation;

impl LocationPort for NullLocation {
    fn read(&self) -> Option<String> {
        None
    }

    fn replace(&self, _url: &str) {}
}
