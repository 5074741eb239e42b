//! # Runtime Configuration Module
//!
//! Environment-driven tuning for the `may` coroutine runtime.
//!
//! ## Environment Variables
//!
//! ### `AMOCK_STACK_SIZE`
//!
//! Stack size for request handlers and generation coroutines. Accepts values in:
//! - Decimal: `262144`
//! - Hexadecimal: `0x40000`
//!
//! Default: `0x40000`
//!
//! Handlers call the text-generation backend over blocking HTTP and validate
//! JSON replies, so they need considerably more stack than a plain router.
//!
//! ```bash
//! export AMOCK_STACK_SIZE=0x80000
//! amock serve
//! ```

use std::env;

/// Name of the stack size variable.
pub const STACK_SIZE_ENV: &str = "AMOCK_STACK_SIZE";

/// Default coroutine stack size.
pub const DEFAULT_STACK_SIZE: usize = 0x40000;

/// Runtime configuration loaded from environment variables.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RuntimeConfig {
    /// Stack size for coroutines
    pub stack_size: usize,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            stack_size: DEFAULT_STACK_SIZE,
        }
    }
}

impl RuntimeConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        let stack_size = env::var(STACK_SIZE_ENV)
            .ok()
            .and_then(|val| parse_stack_size(&val))
            .unwrap_or(DEFAULT_STACK_SIZE);
        RuntimeConfig { stack_size }
    }

    /// Apply the stack size to the global `may` configuration.
    pub fn apply(&self) {
        may::config().set_stack_size(self.stack_size);
    }
}

/// Decimal or `0x`-prefixed hexadecimal; zero is rejected.
fn parse_stack_size(raw: &str) -> Option<usize> {
    let raw = raw.trim();
    let parsed = match raw.strip_prefix("0x").or_else(|| raw.strip_prefix("0X")) {
        Some(hex) => usize::from_str_radix(hex, 16).ok(),
        None => raw.parse().ok(),
    };
    parsed.filter(|size| *size > 0)
}
