//! Runtime environment detection.
//!
//! Single source of truth for the runtime environment (test, development,
//! production), read from the `PUSHSYNC_ENV` environment variable.
//!
//! # Usage
//!
//! ```rust
//! use pushsync::env::Environment;
//!
//! if Environment::current().is_any_test() {
//!     // Use repo-local state instead of the platform config dir
//! }
//! ```
//!
//! # Environment Variable
//!
//! Set `PUSHSYNC_ENV` to one of:
//! - `test` - Test mode (repo-local config directory)
//! - `development` or `dev` - Development mode
//! - (anything else or unset) - Production mode

/// Runtime environment for the CLI.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Environment {
    /// Production environment (default).
    Production,
    /// Development environment.
    Development,
    /// Test environment.
    Test,
}

impl Environment {
    /// Detect current environment from `PUSHSYNC_ENV`.
    #[must_use]
    pub fn current() -> Self {
        match std::env::var("PUSHSYNC_ENV").as_deref() {
            Ok("test") => Self::Test,
            Ok("development" | "dev") => Self::Development,
            _ => Self::Production,
        }
    }

    /// Returns `true` if this is the test environment.
    #[must_use]
    pub fn is_any_test(self) -> bool {
        self == Self::Test
    }
}

impl std::fmt::Display for Environment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Production => write!(f, "production"),
            Self::Development => write!(f, "development"),
            Self::Test => write!(f, "test"),
        }
    }
}

/// Returns `true` if running in test mode.
///
/// Equivalent to `Environment::current().is_any_test()`.
#[must_use]
pub fn is_any_test() -> bool {
    Environment::current().is_any_test()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_environment_display() {
        assert_eq!(Environment::Production.to_string(), "production");
        assert_eq!(Environment::Development.to_string(), "development");
        assert_eq!(Environment::Test.to_string(), "test");
    }

    #[test]
    fn test_only_test_env_uses_repo_local_state() {
        assert!(Environment::Test.is_any_test());
        assert!(!Environment::Production.is_any_test());
        assert!(!Environment::Development.is_any_test());
    }
}
