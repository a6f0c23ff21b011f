//! Utility functions and helpers for esdump
//!
//! This module provides common utility functions used throughout the
//! application:
//! - String sanitization for filesystem components
//! - Time utilities for artifact naming

/// String utilities
pub mod string {
    /// Sanitize a string for use as a single path component
    ///
    /// Characters outside `[A-Za-z0-9._-]` are replaced with `_` so that
    /// endpoint strings like `host:port` become safe directory names.
    ///
    /// # Arguments
    /// * `s` - String to sanitize
    ///
    /// # Returns
    /// * `String` - Sanitized path component
    pub fn sanitize_component(s: &str) -> String {
        s.chars()
            .map(|c| {
                if c.is_ascii_alphanumeric() || c == '.' || c == '_' || c == '-' {
                    c
                } else {
                    '_'
                }
            })
            .collect()
    }
}

/// Time utilities
pub mod time {
    /// Get current unix timestamp in seconds
    ///
    /// # Returns
    /// * `i64` - Timestamp in seconds
    pub fn now_secs() -> i64 {
        chrono::Utc::now().timestamp()
    }
}
