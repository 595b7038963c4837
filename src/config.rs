//! Driver configuration parsing and validation.
//!
//! A configuration file names the installer to launch, the answers to give
//! its queries, and what to do with queries and lines the answers do not
//! cover:
//!
//! ```toml
//! absent = ["OVESETUP_CONFIG/fqdn"]
//!
//! [installer]
//! command = "otopi"
//! args = ["DIALOG/dialect=str:machine"]
//!
//! [policy]
//! unanswered = "abort"
//! unmatched = "skip"
//!
//! [answers]
//! "OVESETUP_CORE/engineStop" = true
//! "OVESETUP_CONFIG/httpPort" = 80
//! "OVESETUP_CONFIG/adminPassword" = "secret"
//! "OVESETUP_CONFIG/extraHosts" = ["a.example", "b.example"]
//! ```

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::{AppError, Result};

/// How to launch the installer.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub struct InstallerConfig {
    /// Installer binary.
    pub command: String,
    /// Arguments passed to the installer.
    #[serde(default)]
    pub args: Vec<String>,
    /// Working directory; inherited when unset.
    #[serde(default)]
    pub working_dir: Option<PathBuf>,
    /// Extra environment variables for the installer.
    #[serde(default)]
    pub env: HashMap<String, String>,
}

/// What to do with a query that has no configured answer.
#[derive(Debug, Copy, Clone, Default, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum UnansweredPolicy {
    /// Send the protocol abort form.
    #[default]
    Abort,
    /// Stop the session with [`AppError::Unanswered`].
    Fail,
}

/// What to do with a line that matches no directive.
#[derive(Debug, Copy, Clone, Default, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum UnmatchedPolicy {
    /// Log and continue.
    #[default]
    Skip,
    /// Stop the session with [`AppError::UnexpectedEvent`].
    Fail,
}

/// Session policies.
#[derive(Debug, Clone, Copy, Default, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub struct PolicyConfig {
    /// Handling of queries without an answer.
    #[serde(default)]
    pub unanswered: UnansweredPolicy,
    /// Handling of unrecognized lines.
    #[serde(default)]
    pub unmatched: UnmatchedPolicy,
}

/// A configured answer, typed by its TOML representation.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(untagged)]
pub enum Answer {
    /// `true` / `false`
    Flag(bool),
    /// Integer literal.
    Int(i64),
    /// String literal.
    Text(String),
    /// Array of strings.
    Lines(Vec<String>),
}

/// Configuration parsed from the driver's TOML file.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub struct DriverConfig {
    /// Value queries answered with the absent value.
    ///
    /// Only `***Q:VALUE` queries carry an absent form; other query kinds
    /// with a listed name fall through to the unanswered policy.
    #[serde(default)]
    pub absent: Vec<String>,
    /// Installer launch settings.
    pub installer: InstallerConfig,
    /// Session policies.
    #[serde(default)]
    pub policy: PolicyConfig,
    /// Answers keyed by query name (confirmation id for `CONFIRM`).
    #[serde(default)]
    pub answers: HashMap<String, Answer>,
}

impl DriverConfig {
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

    /// Parse and validate configuration from a TOML string.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Config` if parsing or validation fails.
    pub fn from_toml_str(raw: &str) -> Result<Self> {
        let config: Self = toml::from_str(raw)?;
        config.validate()?;
        Ok(config)
    }

    /// Whether `name` is configured to be answered with the absent value.
    #[must_use]
    pub fn is_absent(&self, name: &str) -> bool {
        self.absent.iter().any(|n| n == name)
    }

    fn validate(&self) -> Result<()> {
        if self.installer.command.trim().is_empty() {
            return Err(AppError::Config(
                "installer.command must not be empty".into(),
            ));
        }

        if let Some(name) = self.absent.iter().find(|n| self.answers.contains_key(*n)) {
            return Err(AppError::Config(format!(
                "{name} is listed in absent and has an answer"
            )));
        }

        Ok(())
    }
}
