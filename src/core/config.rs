//! Configuration management for Docpipe.
//!
//! Handles loading configuration from TOML or YAML files and applying
//! environment overrides. Credentials only ever come from the environment.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// Process id used when nothing else is configured.
pub const DEFAULT_PROCESS_ID: &str = "new_product";

/// Config file names looked up in the working directory, in order.
const LOCAL_CONFIG_FILES: [&str; 3] = [".docpipe.toml", "docpipe.yaml", "app_config.yaml"];

/// Application configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Chat service settings
    pub ai: AiConfig,

    /// Workflow settings
    pub workflow: WorkflowConfig,

    /// Where approved documentation goes
    pub publish: PublishConfig,

    /// Known processes
    pub processes: Vec<ProcessConfig>,
}

/// Chat service provider.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AiProviderKind {
    #[default]
    Azure,
    OpenAI,
}

/// Chat service settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AiConfig {
    /// Provider (azure, openai)
    pub provider: AiProviderKind,

    /// Azure resource endpoint
    #[serde(skip_serializing_if = "Option::is_none")]
    pub endpoint: Option<String>,

    /// Azure deployment name
    #[serde(skip_serializing_if = "Option::is_none")]
    pub deployment: Option<String>,

    /// Azure API version
    pub api_version: String,

    /// Model (openai only; Azure picks the model through the deployment)
    pub model: String,

    /// Base URL for OpenAI-compatible APIs
    pub base_url: String,

    /// Upper bound for a single chat call
    pub timeout_secs: u64,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f32>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_tokens: Option<u32>,

    /// API key, read from the environment only
    #[serde(skip)]
    pub api_key: Option<String>,
}

/// Workflow settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct WorkflowConfig {
    /// Id of the process to run
    pub process: String,

    /// Cap on proofread rejections per run (unbounded when unset)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_revisions: Option<u32>,
}

/// Publishing target.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PublishTarget {
    #[default]
    Console,
    File,
}

/// Publishing settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PublishConfig {
    pub target: PublishTarget,

    /// Output directory for the file target (`~` is expanded)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub output_dir: Option<String>,
}

/// A named process definition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProcessConfig {
    pub id: String,
    pub name: String,
}

impl ProcessConfig {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self { id: id.into(), name: name.into() }
    }
}

impl Config {
    /// Load configuration from default locations.
    ///
    /// Looks for config in:
    /// 1. `.docpipe.toml`, `docpipe.yaml` or `app_config.yaml` in current directory
    /// 2. `~/.config/docpipe/config.toml`
    /// 3. Falls back to defaults
    ///
    /// Environment overrides are applied on top in every case.
    pub fn load() -> anyhow::Result<Self> {
        let mut config = match Self::locate() {
            Some(path) => {
                tracing::debug!(path = %path.display(), "Loading config");
                Self::load_from_file(&path)?
            }
            None => Self::default(),
        };

        config.apply_env();
        Ok(config)
    }

    /// Find the config file `load` would read, if any.
    pub fn locate() -> Option<PathBuf> {
        LOCAL_CONFIG_FILES
            .iter()
            .map(PathBuf::from)
            .chain(Self::config_dir().map(|d| d.join("config.toml")))
            .find(|p| p.exists())
    }

    /// Load configuration from a specific file.
    ///
    /// `.yaml`/`.yml` files are parsed as YAML, everything else as TOML.
    pub fn load_from_file(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let is_yaml =
            path.extension().and_then(|e| e.to_str()).is_some_and(|e| e == "yaml" || e == "yml");

        let config: Self = if is_yaml {
            serde_yaml::from_str(&content)
                .map_err(|e| anyhow::anyhow!("Invalid config {}: {}", path.display(), e))?
        } else {
            toml::from_str(&content)
                .map_err(|e| anyhow::anyhow!("Invalid config {}: {}", path.display(), e))?
        };

        config.validate().map_err(|e| anyhow::anyhow!("Invalid config {}: {}", path.display(), e))?;
        Ok(config)
    }

    /// Reject values that would make every run fail.
    pub fn validate(&self) -> anyhow::Result<()> {
        anyhow::ensure!(self.ai.timeout_secs > 0, "ai.timeout_secs must be at least 1");
        Ok(())
    }

    /// Apply environment variable overrides.
    pub fn apply_env(&mut self) {
        let var = |name: &str| std::env::var(name).ok().filter(|v| !v.trim().is_empty());

        if let Some(endpoint) = var("AZURE_OPENAI_ENDPOINT") {
            self.ai.endpoint = Some(endpoint);
        }
        if let Some(deployment) = var("AZURE_OPENAI_DEPLOYMENT_NAME") {
            self.ai.deployment = Some(deployment);
        }
        if let Some(version) = var("AZURE_OPENAI_API_VERSION") {
            self.ai.api_version = version;
        }
        if let Some(base_url) = var("OPENAI_BASE_URL") {
            self.ai.base_url = base_url;
        }

        self.ai.api_key = match self.ai.provider {
            AiProviderKind::Azure => var("AZURE_OPENAI_API_KEY"),
            AiProviderKind::OpenAI => var("OPENAI_API_KEY"),
        };

        if let Some(max) = var("DOCPIPE_MAX_REVISIONS") {
            match max.parse() {
                Ok(max) => self.workflow.max_revisions = Some(max),
                Err(_) => tracing::warn!(value = %max, "Ignoring invalid DOCPIPE_MAX_REVISIONS"),
            }
        }
    }

    /// Look up a process by id.
    pub fn process(&self, id: &str) -> Option<&ProcessConfig> {
        self.processes.iter().find(|p| p.id == id)
    }

    /// Resolved output directory for the file publisher.
    pub fn output_dir(&self) -> Option<PathBuf> {
        self.publish
            .output_dir
            .as_deref()
            .map(|dir| PathBuf::from(shellexpand::tilde(dir).into_owned()))
    }

    /// Get the config directory path.
    pub fn config_dir() -> Option<PathBuf> {
        dirs::config_dir().map(|d| d.join("docpipe"))
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            ai: AiConfig::default(),
            workflow: WorkflowConfig::default(),
            publish: PublishConfig::default(),
            processes: vec![ProcessConfig::new(DEFAULT_PROCESS_ID, "DocumentationNewProduct")],
        }
    }
}

impl Default for AiConfig {
    fn default() -> Self {
        Self {
            provider: AiProviderKind::Azure,
            endpoint: None,
            deployment: None,
            api_version: "2024-08-01-preview".to_string(),
            model: "gpt-4o".to_string(),
            base_url: "https://api.openai.com/v1".to_string(),
            timeout_secs: 120,
            temperature: None,
            max_tokens: None,
            api_key: None,
        }
    }
}

impl Default for WorkflowConfig {
    fn default() -> Self {
        Self { process: DEFAULT_PROCESS_ID.to_string(), max_revisions: None }
    }
}
