//! Centralized constants and the per-document configuration knobs.
//!
//! # Environment Variables
//!
//! | Variable                | Default | Description                         |
//! |-------------------------|---------|-------------------------------------|
//! | `CPPON_MAX_ARRAY_DELTA` | 256     | Maximum sparse-array growth gap     |

use std::sync::OnceLock;

// ============================================================================
// REFERENCE PREFIXES
// ============================================================================

/// Default prefix marking a string literal as an absolute-path reference.
pub const DEFAULT_PATH_PREFIX: &str = "$cppon-path:";

/// Default prefix marking a string literal as a base64 blob.
pub const DEFAULT_BLOB_PREFIX: &str = "$cppon-blob:";

/// Default prefix marking a string literal as a number token.
pub const DEFAULT_NUMBER_PREFIX: &str = "$cppon-number:";

// ============================================================================
// CONTAINER RESERVES
// ============================================================================

/// Initial capacity reserved for parsed objects.
pub const OBJECT_RESERVE: usize = 8;

/// Initial capacity reserved for parsed arrays.
pub const ARRAY_RESERVE: usize = 8;

/// Printer preallocation guess, in bytes per tree element.
pub const PRINTER_RESERVE_PER_ELEMENT: usize = 16;

// ============================================================================
// NAVIGATION LIMITS
// ============================================================================

/// Default maximum gap a sparse array write may open past the current size.
pub const DEFAULT_MAX_ARRAY_DELTA: usize = 256;

/// Cached max array delta from the environment.
static MAX_ARRAY_DELTA_CACHE: OnceLock<usize> = OnceLock::new();

/// Returns the maximum sparse-array growth gap.
///
/// Reads `CPPON_MAX_ARRAY_DELTA` on first call and caches the value for the
/// lifetime of the process. Falls back to 256 if unset or invalid.
#[inline]
pub fn max_array_delta() -> usize {
    *MAX_ARRAY_DELTA_CACHE.get_or_init(|| {
        std::env::var("CPPON_MAX_ARRAY_DELTA")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(DEFAULT_MAX_ARRAY_DELTA)
    })
}

// ============================================================================
// PER-DOCUMENT CONFIGURATION
// ============================================================================

/// Per-document configuration knobs consumed by the parser, the navigator,
/// and the printer.
///
/// Prefixes must be ASCII and begin with `$`; [`Config::validate`] enforces
/// this when a caller replaces the defaults.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Prefix marking a string literal as a path reference.
    pub path_prefix: String,
    /// Prefix marking a string literal as a base64 blob.
    pub blob_prefix: String,
    /// Prefix marking a string literal as a number token.
    pub number_prefix: String,
    /// Initial capacity reserved for parsed objects.
    pub object_reserve: usize,
    /// Initial capacity reserved for parsed arrays.
    pub array_reserve: usize,
    /// Printer preallocation guess, in bytes per element.
    pub reserve_per_element: usize,
    /// Maximum sparse-array growth gap.
    pub max_array_delta: usize,
    /// Treat every byte in `0x01..=0x20` as whitespace while parsing.
    ///
    /// Off by default; strict JSON whitespace is the contract unless the
    /// caller opts in for trusted input.
    pub trusted_whitespace: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            path_prefix: DEFAULT_PATH_PREFIX.to_string(),
            blob_prefix: DEFAULT_BLOB_PREFIX.to_string(),
            number_prefix: DEFAULT_NUMBER_PREFIX.to_string(),
            object_reserve: OBJECT_RESERVE,
            array_reserve: ARRAY_RESERVE,
            reserve_per_element: PRINTER_RESERVE_PER_ELEMENT,
            max_array_delta: max_array_delta(),
            trusted_whitespace: false,
        }
    }
}

impl Config {
    /// Check that all three prefixes are ASCII and begin with `$`.
    pub fn validate(&self) -> crate::Result<()> {
        for prefix in [&self.path_prefix, &self.blob_prefix, &self.number_prefix] {
            if !prefix.starts_with('$') || !prefix.is_ascii() {
                return Err(crate::Error::bad_option(format!(
                    "prefix must be ascii and begin with '$': {prefix:?}"
                )));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_consistent() {
        let config = Config::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.path_prefix, "$cppon-path:");
        assert_eq!(config.blob_prefix, "$cppon-blob:");
        assert!(!config.trusted_whitespace);
    }

    #[test]
    fn bad_prefix_rejected() {
        let config = Config {
            path_prefix: "path:".to_string(),
            ..Config::default()
        };
        assert!(config.validate().is_err());
    }
}
