use serde::Serialize;
use std::fmt::Display;

/// Per-tool presentation state: the last result, the last error, or neither.
///
/// Each request produces a fresh outcome; nothing accumulates.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Panel<T> {
    result: Option<T>,
    error: Option<String>,
}

impl<T> Panel<T> {
    /// Empty panel
    pub fn new() -> Self {
        Self {
            result: None,
            error: None,
        }
    }

    /// Replace whatever the panel shows with a new outcome
    ///
    /// An error never sits next to a stale result.
    pub fn replace<E: Display>(&mut self, outcome: std::result::Result<T, E>) {
        match outcome {
            Ok(result) => {
                self.result = Some(result);
                self.error = None;
            }
            Err(e) => {
                self.result = None;
                self.error = Some(e.to_string());
            }
        }
    }

    /// Show an error but keep the last result on screen
    pub fn reject<E: Display>(&mut self, error: E) {
        self.error = Some(error.to_string());
    }

    /// Drop both result and error
    pub fn clear(&mut self) {
        self.result = None;
        self.error = None;
    }

    pub fn result(&self) -> Option<&T> {
        self.result.as_ref()
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn is_empty(&self) -> bool {
        self.result.is_none() && self.error.is_none()
    }
}

impl<T> Default for Panel<T> {
    fn default() -> Self {
        Self::new()
    }
}
