//! Configuration loading, validation, and management for Herald.
//!
//! Loads configuration from `~/.herald/config.toml` with environment
//! variable overrides. Validates all settings at startup.

use herald_core::knowledge::{ContactChannel, DonationLink, KnowledgeBase, KnowledgeEntry};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// The root configuration structure.
///
/// Maps directly to `~/.herald/config.toml`.
#[derive(Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Credential for the generative fallback. Absent = rule engine only.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub credential: Option<String>,

    /// Assistant identity shown by the front end
    #[serde(default)]
    pub assistant: AssistantConfig,

    /// Generative fallback backend
    #[serde(default)]
    pub fallback: FallbackConfig,

    /// Fact guard policies
    #[serde(default)]
    pub guard: GuardConfig,

    /// Social broadcast targets
    #[serde(default)]
    pub social: SocialConfig,

    /// Knowledge base facts
    #[serde(default = "default_knowledge")]
    pub knowledge: Vec<KnowledgeEntry>,

    /// Contact channels (the first voice channel answers `call`)
    #[serde(default = "default_contacts")]
    pub contacts: Vec<ContactChannel>,

    /// Donation links, in display order
    #[serde(default = "default_donation_links")]
    pub donation_links: Vec<DonationLink>,
}

fn default_knowledge() -> Vec<KnowledgeEntry> {
    vec![KnowledgeEntry::new(
        "seavon",
        "SEAVON PIERCE (#F-13921). Case 5:10-00310(VAP)CW. Violations identified by Judge Thurston.",
    )]
}

fn default_contacts() -> Vec<ContactChannel> {
    vec![ContactChannel::voice("323-364-0769")]
}

fn default_donation_links() -> Vec<DonationLink> {
    vec![
        DonationLink {
            label: "Stripe Secure Donation #1".into(),
            url: "https://buy.stripe.com/test_7sYbJ3dxObqj6IcbV2dEs03".into(),
        },
        DonationLink {
            label: "Stripe Secure Donation #2".into(),
            url: "https://buy.stripe.com/test_bJebJ365mgKD2rWf7edEs04".into(),
        },
    ]
}

fn redact(s: &Option<String>) -> &'static str {
    match s {
        Some(_) => "[REDACTED]",
        None => "None",
    }
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("credential", &redact(&self.credential))
            .field("assistant", &self.assistant)
            .field("fallback", &self.fallback)
            .field("guard", &self.guard)
            .field("social", &self.social)
            .field("knowledge", &self.knowledge)
            .field("contacts", &self.contacts)
            .field("donation_links", &self.donation_links)
            .finish()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssistantConfig {
    #[serde(default = "default_assistant_name")]
    pub name: String,

    /// First agent turn of every conversation
    #[serde(default = "default_greeting")]
    pub greeting: String,
}

fn default_assistant_name() -> String {
    "AI Queen Superior 1.1".into()
}
fn default_greeting() -> String {
    "AI Queen Superior 1.1 Online.\nSeavon Pierce Advocate Active.\nHow may I serve you?".into()
}

impl Default for AssistantConfig {
    fn default() -> Self {
        Self {
            name: default_assistant_name(),
            greeting: default_greeting(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FallbackConfig {
    /// Backend kind; only "gemini" is built in
    #[serde(default = "default_fallback_provider")]
    pub provider: String,

    #[serde(default = "default_base_url")]
    pub base_url: String,

    #[serde(default = "default_model")]
    pub model: String,

    /// Upper bound on one fallback call
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Prepended to the user text in every completion request
    #[serde(default = "default_persona")]
    pub persona: String,
}

fn default_fallback_provider() -> String {
    "gemini".into()
}
fn default_base_url() -> String {
    "https://generativelanguage.googleapis.com/v1beta".into()
}
fn default_model() -> String {
    "gemini-pro".into()
}
fn default_timeout_secs() -> u64 {
    30
}
fn default_persona() -> String {
    "You are AI Queen Superior 1.1. Servant of Seavon Pierce. Reply to: ".into()
}

impl Default for FallbackConfig {
    fn default() -> Self {
        Self {
            provider: default_fallback_provider(),
            base_url: default_base_url(),
            model: default_model(),
            timeout_secs: default_timeout_secs(),
            persona: default_persona(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GuardConfig {
    /// Evaluated in order; the first violated policy rejects the request
    #[serde(default = "default_protected")]
    pub protected: Vec<ProtectedSubjectConfig>,
}

/// A subject that may only be mentioned when the knowledge base holds at
/// least `min_facts` entries for it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProtectedSubjectConfig {
    pub subject: String,

    #[serde(default = "default_min_facts")]
    pub min_facts: usize,
}

fn default_min_facts() -> usize {
    1
}
fn default_protected() -> Vec<ProtectedSubjectConfig> {
    vec![ProtectedSubjectConfig {
        subject: "seavon".into(),
        min_facts: default_min_facts(),
    }]
}

impl Default for GuardConfig {
    fn default() -> Self {
        Self {
            protected: default_protected(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SocialConfig {
    #[serde(default = "default_social_targets")]
    pub targets: Vec<String>,
}

fn default_social_targets() -> Vec<String> {
    vec!["Facebook".into(), "X".into(), "Instagram".into()]
}

impl Default for SocialConfig {
    fn default() -> Self {
        Self {
            targets: default_social_targets(),
        }
    }
}

impl AppConfig {
    /// Load configuration from the default path (~/.herald/config.toml).
    ///
    /// Also checks environment variables:
    /// - `HERALD_API_KEY` (highest priority), then `GEMINI_API_KEY`
    /// - `HERALD_MODEL` overrides the fallback model
    pub fn load() -> Result<Self, ConfigError> {
        let mut config = Self::load_from(&Self::config_path())?;
        config.apply_overrides(|key| std::env::var(key).ok());
        Ok(config)
    }

    /// Apply environment-style overrides from `get`.
    pub fn apply_overrides(&mut self, get: impl Fn(&str) -> Option<String>) {
        if self.credential().is_none() {
            self.credential = get("HERALD_API_KEY")
                .or_else(|| get("GEMINI_API_KEY"))
                .filter(|k| !k.trim().is_empty());
        }

        if let Some(model) = get("HERALD_MODEL") {
            self.fallback.model = model;
        }
    }

    /// Load configuration from a specific file path.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            tracing::info!("No config file found at {}, using defaults", path.display());
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::ReadError {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

        let config = Self::from_toml(&content).map_err(|e| match e {
            ConfigError::ParseError { reason, .. } => ConfigError::ParseError {
                path: path.to_path_buf(),
                reason,
            },
            other => other,
        })?;

        tracing::debug!(
            path = %path.display(),
            knowledge = config.knowledge.len(),
            "Loaded config"
        );
        Ok(config)
    }

    /// Parse and validate a TOML document.
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(content).map_err(|e| ConfigError::ParseError {
            path: PathBuf::new(),
            reason: e.to_string(),
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Get the configuration directory path.
    pub fn config_dir() -> PathBuf {
        dirs_home().join(".herald")
    }

    /// Get the configuration file path.
    pub fn config_path() -> PathBuf {
        Self::config_dir().join("config.toml")
    }

    /// Validate the configuration.
    fn validate(&self) -> Result<(), ConfigError> {
        if self.fallback.timeout_secs == 0 {
            return Err(ConfigError::ValidationError(
                "fallback.timeout_secs must be greater than 0".into(),
            ));
        }

        if self.fallback.base_url.trim().is_empty() {
            return Err(ConfigError::ValidationError(
                "fallback.base_url must not be empty".into(),
            ));
        }

        for policy in &self.guard.protected {
            if policy.subject.trim().is_empty() {
                return Err(ConfigError::ValidationError(
                    "guard.protected subjects must not be blank".into(),
                ));
            }
            if policy.min_facts == 0 {
                return Err(ConfigError::ValidationError(format!(
                    "guard.protected '{}' must require at least one fact",
                    policy.subject
                )));
            }
        }

        Ok(())
    }

    /// The credential, if present and non-blank.
    pub fn credential(&self) -> Option<&str> {
        self.credential
            .as_deref()
            .map(str::trim)
            .filter(|k| !k.is_empty())
    }

    /// Check if a credential is available (from config or environment).
    pub fn has_credential(&self) -> bool {
        self.credential().is_some()
    }

    /// Build the read-only knowledge base from the configured facts.
    pub fn knowledge_base(&self) -> KnowledgeBase {
        KnowledgeBase::new(
            self.knowledge.clone(),
            self.contacts.clone(),
            self.donation_links.clone(),
        )
    }

    /// Generate a default config TOML string (for `init` command).
    pub fn default_toml() -> String {
        let config = Self::default();
        toml::to_string_pretty(&config).unwrap_or_default()
    }

    /// Write the default configuration to `path`, creating parent dirs.
    ///
    /// Refuses to overwrite an existing file unless `force` is set.
    /// Returns `false` when the file already existed and was left alone.
    pub fn write_default(path: &Path, force: bool) -> Result<bool, ConfigError> {
        if path.exists() && !force {
            return Ok(false);
        }

        let write_err = |e: std::io::Error| ConfigError::WriteError {
            path: path.to_path_buf(),
            reason: e.to_string(),
        };

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(write_err)?;
        }
        std::fs::write(path, Self::default_toml()).map_err(write_err)?;
        Ok(true)
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            credential: None,
            assistant: AssistantConfig::default(),
            fallback: FallbackConfig::default(),
            guard: GuardConfig::default(),
            social: SocialConfig::default(),
            knowledge: default_knowledge(),
            contacts: default_contacts(),
            donation_links: default_donation_links(),
        }
    }
}

/// Get the user's home directory.
fn dirs_home() -> PathBuf {
    #[cfg(target_os = "windows")]
    {
        std::env::var("USERPROFILE")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("C:\\Users\\Default"))
    }
    #[cfg(not(target_os = "windows"))]
    {
        std::env::var("HOME")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("/tmp"))
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file at {path}: {reason}")]
    ReadError { path: PathBuf, reason: String },

    #[error("Failed to parse config file at {path}: {reason}")]
    ParseError { path: PathBuf, reason: String },

    #[error("Failed to write config file at {path}: {reason}")]
    WriteError { path: PathBuf, reason: String },

    #[error("Configuration validation failed: {0}")]
    ValidationError(String),
}
