//! Configuration types for Docent
//!
//! One [`DocentConfig`] is built at startup and handed to the agent; nothing
//! below reads the environment on its own.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

use crate::error::{DocentError, Result};
use crate::skills::CachePolicy;

/// System prompt used when none is configured
pub const DEFAULT_SYSTEM_PROMPT: &str =
    "You are a SQL query assistant that helps users write queries against business databases.";

/// Main configuration for Docent
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DocentConfig {
    /// Base system instruction; the skills block is appended per request
    pub system_prompt: String,

    /// Skill registry and content store configuration
    pub skills: SkillsConfig,

    /// Orchestrator limits
    pub agent: AgentConfig,

    /// LLM provider configuration
    pub llm: LLMProviderConfig,
}

impl Default for DocentConfig {
    fn default() -> Self {
        Self {
            system_prompt: DEFAULT_SYSTEM_PROMPT.to_string(),
            skills: SkillsConfig::default(),
            agent: AgentConfig::default(),
            llm: LLMProviderConfig::default(),
        }
    }
}

/// Skill registry and content store configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SkillsConfig {
    /// Directory holding `<name>.md` skill files
    pub dir: PathBuf,

    /// Build the registry from frontmatter in `dir` instead of the builtin set
    pub discover: bool,

    /// Content caching policy
    pub cache: CachePolicy,
}

impl Default for SkillsConfig {
    fn default() -> Self {
        Self {
            dir: PathBuf::from("skills"),
            discover: false,
            cache: CachePolicy::CacheForever,
        }
    }
}

/// Orchestrator limits
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AgentConfig {
    /// Maximum model calls in one turn before giving up
    pub max_iterations: usize,

    /// Upper bound on a single model call
    #[serde(with = "humantime_serde")]
    pub model_call_timeout: Duration,
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            max_iterations: 25,
            model_call_timeout: Duration::from_secs(120),
        }
    }
}

/// LLM provider configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct LLMProviderConfig {
    /// Model name (falls back to `GROQ_MODEL`, then the provider default)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,

    /// API key (prefer the `GROQ_API_KEY` env var)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,

    /// Base URL for OpenAI-compatible endpoints
    #[serde(skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,

    /// Temperature for generation (0.0-2.0)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f32>,

    /// Maximum tokens to generate per call
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_tokens: Option<usize>,
}

impl DocentConfig {
    /// Figment with every configuration source Docent reads, in order:
    ///
    /// 1. Defaults
    /// 2. `docent.toml` in the working directory
    /// 3. The file named by `DOCENT_CONFIG_PATH`
    /// 4. `DOCENT_*` environment variables, nested with `__`
    ///    (e.g. `DOCENT_AGENT__MAX_ITERATIONS=10`)
    pub fn figment() -> figment::Figment {
        use figment::{
            Figment,
            providers::{Env, Format, Serialized, Toml},
        };

        let mut figment = Figment::from(Serialized::defaults(DocentConfig::default()))
            .merge(Toml::file("docent.toml"));

        if let Ok(path) = std::env::var("DOCENT_CONFIG_PATH") {
            figment = figment.merge(Toml::file(path));
        }

        figment.merge(
            Env::prefixed("DOCENT_")
                .ignore(&["CONFIG_PATH"])
                .split("__"),
        )
    }

    /// Load configuration from file and environment variables.
    ///
    /// # Errors
    ///
    /// Returns an error if a configuration source is invalid or the result
    /// fails validation.
    pub fn load() -> Result<Self> {
        let config: DocentConfig = Self::figment().extract().map_err(|e| {
            DocentError::Configuration(format!("Failed to load configuration: {}", e))
        })?;

        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a specific file path, on top of the defaults.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn from_file(path: impl AsRef<std::path::Path>) -> Result<Self> {
        use figment::{
            Figment,
            providers::{Format, Serialized, Toml},
        };

        let config: DocentConfig = Figment::from(Serialized::defaults(DocentConfig::default()))
            .merge(Toml::file(path.as_ref()))
            .extract()
            .map_err(|e| {
                DocentError::Configuration(format!("Failed to load configuration file: {}", e))
            })?;

        config.validate()?;
        Ok(config)
    }

    /// Validate the configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid.
    pub fn validate(&self) -> Result<()> {
        if self.agent.max_iterations == 0 {
            return Err(DocentError::Configuration(
                "agent.max_iterations must be at least 1".to_string(),
            ));
        }

        if self.agent.model_call_timeout.is_zero() {
            return Err(DocentError::Configuration(
                "agent.model_call_timeout must be greater than zero".to_string(),
            ));
        }

        if let Some(temperature) = self.llm.temperature {
            if !(0.0..=2.0).contains(&temperature) {
                return Err(DocentError::Configuration(format!(
                    "llm.temperature must be within 0.0-2.0, got {}",
                    temperature
                )));
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_defaults_are_valid() {
        let config = DocentConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.system_prompt, DEFAULT_SYSTEM_PROMPT);
        assert_eq!(config.skills.dir, PathBuf::from("skills"));
        assert_eq!(config.agent.max_iterations, 25);
    }

    #[test]
    fn test_from_file_merges_over_defaults() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("docent.toml");
        std::fs::write(
            &path,
            r#"
system_prompt = "You answer inventory questions."

[skills]
dir = "/srv/skills"
cache = "reread"

[agent]
model_call_timeout = "30s"

[llm]
model = "llama-3.3-70b-versatile"
"#,
        )
        .unwrap();

        let config = DocentConfig::from_file(&path).unwrap();
        assert_eq!(config.system_prompt, "You answer inventory questions.");
        assert_eq!(config.skills.dir, PathBuf::from("/srv/skills"));
        assert_eq!(config.skills.cache, CachePolicy::Reread);
        assert!(!config.skills.discover);
        assert_eq!(config.agent.model_call_timeout, Duration::from_secs(30));
        assert_eq!(config.agent.max_iterations, 25);
        assert_eq!(config.llm.model.as_deref(), Some("llama-3.3-70b-versatile"));
        assert!(config.llm.api_key.is_none());
    }

    #[test]
    fn test_zero_iterations_rejected() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("docent.toml");
        std::fs::write(&path, "[agent]\nmax_iterations = 0\n").unwrap();

        let err = DocentConfig::from_file(&path).unwrap_err();
        assert!(matches!(err, DocentError::Configuration(_)));
    }

    #[test]
    fn test_out_of_range_temperature_rejected() {
        let mut config = DocentConfig::default();
        config.llm.temperature = Some(3.5);
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_malformed_file_is_configuration_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("docent.toml");
        std::fs::write(&path, "[agent]\nmax_iterations = \"many\"\n").unwrap();

        let err = DocentConfig::from_file(&path).unwrap_err();
        assert!(matches!(err, DocentError::Configuration(_)));
    }
}
