//! Global configuration parsing and validation.

use std::fs;
use std::path::Path;
use std::time::Duration;

use serde::Deserialize;

use crate::models::policy::{
    AdmissionPolicy, COMMAND_CATEGORIES, DEFAULT_FORBIDDEN_PATTERNS, DEFAULT_MAX_COMMAND_LENGTH,
};
use crate::{AppError, Result};

/// Configurable timeout values (seconds) for debugger interactions.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub struct TimeoutConfig {
    /// Budget for absorbing the startup banner and first prompt.
    #[serde(default = "default_startup_seconds")]
    pub startup_seconds: u64,
    /// Budget for framing a single command's output.
    #[serde(default = "default_command_seconds")]
    pub command_seconds: u64,
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self {
            startup_seconds: default_startup_seconds(),
            command_seconds: default_command_seconds(),
        }
    }
}

fn default_startup_seconds() -> u64 {
    5
}

fn default_command_seconds() -> u64 {
    5
}

/// Output and input size limits.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub struct LimitConfig {
    /// Lines collected per command before the truncation marker.
    #[serde(default = "default_max_output_lines")]
    pub max_output_lines: usize,
    /// Maximum free-form command length in characters.
    #[serde(default = "default_max_command_length")]
    pub max_command_length: usize,
}

impl Default for LimitConfig {
    fn default() -> Self {
        Self {
            max_output_lines: default_max_output_lines(),
            max_command_length: default_max_command_length(),
        }
    }
}

fn default_max_output_lines() -> usize {
    200
}

fn default_max_command_length() -> usize {
    DEFAULT_MAX_COMMAND_LENGTH
}

/// Optional overrides for the built-in admission policy lists.
#[derive(Debug, Clone, Default, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub struct PolicyConfig {
    /// Replaces the default admitted base commands when present.
    #[serde(default)]
    pub admitted_commands: Option<Vec<String>>,
    /// Replaces the default forbidden substrings when present.
    #[serde(default)]
    pub forbidden_patterns: Option<Vec<String>>,
}

fn default_debugger() -> String {
    "gdb".into()
}

fn default_prompt() -> String {
    "pwndbg> ".into()
}

/// Global configuration parsed from `config.toml`.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub struct GlobalConfig {
    /// Debugger executable, resolved via `PATH` when not absolute.
    #[serde(default = "default_debugger")]
    pub debugger: String,
    /// Extra arguments placed before the fixed startup flags.
    #[serde(default)]
    pub debugger_args: Vec<String>,
    /// Trailing prompt text that marks the end of a command's output.
    #[serde(default = "default_prompt")]
    pub prompt: String,
    /// Timeout configuration.
    #[serde(default)]
    pub timeouts: TimeoutConfig,
    /// Output and command size limits.
    #[serde(default)]
    pub limits: LimitConfig,
    /// Admission policy overrides.
    #[serde(default)]
    pub policy: PolicyConfig,
}

impl Default for GlobalConfig {
    fn default() -> Self {
        Self {
            debugger: default_debugger(),
            debugger_args: Vec::new(),
            prompt: default_prompt(),
            timeouts: TimeoutConfig::default(),
            limits: LimitConfig::default(),
            policy: PolicyConfig::default(),
        }
    }
}

impl GlobalConfig {
    /// Load and validate configuration from a TOML file path.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Config` if the file cannot be read or contains
    /// invalid TOML, or if validation fails.
    pub fn load_from_path(path: impl AsRef<Path>) -> Result<Self> {
        let raw = fs::read_to_string(path)
            .map_err(|err| AppError::Config(format!("failed to read config: {err}")))?;
        Self::from_toml_str(&raw)
    }

    /// Parse configuration from a TOML string.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Config` if parsing or validation fails.
    pub fn from_toml_str(raw: &str) -> Result<Self> {
        let config: Self = toml::from_str(raw)?;
        config.validate()?;
        Ok(config)
    }

    /// Startup absorption budget.
    #[must_use]
    pub fn startup_timeout(&self) -> Duration {
        Duration::from_secs(self.timeouts.startup_seconds)
    }

    /// Per-command framing budget.
    #[must_use]
    pub fn command_timeout(&self) -> Duration {
        Duration::from_secs(self.timeouts.command_seconds)
    }

    /// Build the admission policy, applying any configured overrides.
    #[must_use]
    pub fn admission_policy(&self) -> AdmissionPolicy {
        let admitted: Vec<String> = self.policy.admitted_commands.clone().unwrap_or_else(|| {
            COMMAND_CATEGORIES
                .iter()
                .flat_map(|(_, commands)| commands.iter().map(|&cmd| cmd.to_owned()))
                .collect()
        });
        // Patterns are matched against lowercased commands.
        let forbidden: Vec<String> = self.policy.forbidden_patterns.as_ref().map_or_else(
            || {
                DEFAULT_FORBIDDEN_PATTERNS
                    .iter()
                    .map(|&pattern| pattern.to_owned())
                    .collect()
            },
            |patterns| patterns.iter().map(|p| p.to_lowercase()).collect(),
        );
        AdmissionPolicy::new(admitted, forbidden, self.limits.max_command_length)
    }

    fn validate(&self) -> Result<()> {
        if self.debugger.trim().is_empty() {
            return Err(AppError::Config("debugger must not be empty".into()));
        }

        if self.prompt.trim().is_empty() {
            return Err(AppError::Config("prompt must not be blank".into()));
        }

        if self.timeouts.startup_seconds == 0 || self.timeouts.command_seconds == 0 {
            return Err(AppError::Config(
                "timeouts must be greater than zero".into(),
            ));
        }

        if self.limits.max_output_lines == 0 || self.limits.max_command_length == 0 {
            return Err(AppError::Config(
                "limits must be greater than zero".into(),
            ));
        }

        if let Some(ref patterns) = self.policy.forbidden_patterns {
            if patterns.iter().any(String::is_empty) {
                return Err(AppError::Config(
                    "forbidden_patterns must not contain empty strings".into(),
                ));
            }
        }

        Ok(())
    }
}
