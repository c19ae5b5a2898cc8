//! Configuration management for Docs Copilot.
//!
//! This module handles loading and merging configuration from multiple sources:
//! - Built-in defaults
//! - Config file (.copilot/config.yaml)
//! - Environment variables
//! - Command-line flags
//!
//! Later sources override earlier ones.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};

use crate::error::{AppError, AppResult};

/// Language-model providers the factory knows how to build.
pub const KNOWN_PROVIDERS: [&str; 3] = ["ollama", "openai", "openrouter"];

/// Embedding providers the ingestion pipeline knows how to build.
pub const KNOWN_EMBEDDING_PROVIDERS: [&str; 3] = ["trigram", "ollama", "openai"];

/// Main application configuration.
///
/// This struct holds all global configuration options that affect
/// CLI behavior across commands.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Path to the workspace root (contains .copilot/)
    pub workspace: PathBuf,

    /// Optional config file path
    pub config_file: Option<PathBuf>,

    /// Language-model provider ("ollama", "openai", "openrouter")
    pub provider: String,

    /// Model identifier used for answer generation
    pub model: String,

    /// API key for the LLM provider
    pub api_key: Option<String>,

    /// Log level override
    pub log_level: Option<String>,

    /// Verbose mode (enables debug logging)
    pub verbose: bool,

    /// Disable colored output
    pub no_color: bool,

    /// Directory holding the markdown corpus
    pub docs_path: PathBuf,

    /// Relevance gate and retrieval settings
    pub rag: RagSettings,

    /// Answer generation settings
    pub generation: GenerationSettings,

    /// Chunking settings used during ingestion
    pub ingest: IngestSettings,

    /// Embedding backend settings
    pub embedding: EmbeddingSettings,

    /// LLM provider configurations
    pub llm: Option<LlmConfig>,
}

/// Settings consumed by the RAG workflow.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RagSettings {
    /// Best-score threshold below which the workflow abstains
    pub min_relevance_score: f32,

    /// Number of evidence items requested from the retriever
    pub top_k: usize,
}

impl Default for RagSettings {
    fn default() -> Self {
        Self {
            min_relevance_score: 0.5,
            top_k: 5,
        }
    }
}

/// Settings for the language-model call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct GenerationSettings {
    /// Sampling temperature
    pub temperature: f32,

    /// Maximum tokens to generate
    pub max_tokens: Option<u32>,

    /// Per-request timeout in seconds
    pub timeout_secs: u64,
}

impl Default for GenerationSettings {
    fn default() -> Self {
        Self {
            temperature: 0.7,
            max_tokens: None,
            timeout_secs: 60,
        }
    }
}

/// Chunking settings.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct IngestSettings {
    /// Chunk size in characters
    pub chunk_size: usize,

    /// Overlap between consecutive chunks in characters
    pub chunk_overlap: usize,
}

impl Default for IngestSettings {
    fn default() -> Self {
        Self {
            chunk_size: 1000,
            chunk_overlap: 200,
        }
    }
}

/// Embedding backend settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct EmbeddingSettings {
    /// Provider name: "trigram", "ollama", "openai"
    pub provider: String,

    /// Model identifier (provider-specific)
    pub model: String,

    /// Embedding vector dimensions
    pub dimensions: usize,

    /// Optional endpoint override
    pub endpoint: Option<String>,

    /// Environment variable holding the API key (openai only)
    pub api_key_env: Option<String>,
}

impl Default for EmbeddingSettings {
    fn default() -> Self {
        Self {
            provider: "trigram".to_string(),
            model: "trigram-v1".to_string(),
            dimensions: 384,
            endpoint: None,
            api_key_env: None,
        }
    }
}

/// LLM configuration from config.yaml.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LlmConfig {
    #[serde(rename = "activeProvider")]
    pub active_provider: String,

    pub providers: HashMap<String, ProviderConfig>,
}

/// Provider-specific configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ProviderConfig {
    /// Any OpenAI-compatible chat completions API (OpenAI, OpenRouter)
    OpenAI {
        #[serde(rename = "apiKeyEnv")]
        api_key_env: String,
        model: String,
        endpoint: Option<String>,
    },
    Ollama {
        endpoint: String,
        model: String,
        timeout: Option<u64>,
    },
}

impl ProviderConfig {
    /// Model configured for this provider.
    pub fn model(&self) -> &str {
        match self {
            ProviderConfig::OpenAI { model, .. } => model,
            ProviderConfig::Ollama { model, .. } => model,
        }
    }

    /// Endpoint configured for this provider, if any.
    pub fn endpoint(&self) -> Option<&str> {
        match self {
            ProviderConfig::OpenAI { endpoint, .. } => endpoint.as_deref(),
            ProviderConfig::Ollama { endpoint, .. } => Some(endpoint),
        }
    }
}

/// Full configuration file structure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct ConfigFile {
    llm: Option<LlmConfig>,
    workspace: Option<WorkspaceConfig>,
    logging: Option<LoggingConfig>,
    rag: Option<RagSettings>,
    generation: Option<GenerationSettings>,
    ingest: Option<IngestFileConfig>,
    embedding: Option<EmbeddingSettings>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct WorkspaceConfig {
    path: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct LoggingConfig {
    level: Option<String>,
    color: Option<bool>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct IngestFileConfig {
    docs_path: Option<String>,
    #[serde(flatten)]
    chunking: IngestSettings,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            workspace: std::env::current_dir().unwrap_or_else(|_| PathBuf::from(".")),
            config_file: None,
            provider: "ollama".to_string(), // Local-first default
            model: "llama3.2".to_string(),
            api_key: None,
            log_level: None,
            verbose: false,
            no_color: false,
            docs_path: PathBuf::from("data/docs"),
            rag: RagSettings::default(),
            generation: GenerationSettings::default(),
            ingest: IngestSettings::default(),
            embedding: EmbeddingSettings::default(),
            llm: None,
        }
    }
}

impl AppConfig {
    /// Load configuration from the config file, environment variables and defaults.
    ///
    /// Environment variables:
    /// - `COPILOT_WORKSPACE`: Override workspace path
    /// - `COPILOT_CONFIG`: Path to config file
    /// - `COPILOT_PROVIDER`: LLM provider
    /// - `COPILOT_MODEL`: Model identifier
    /// - `COPILOT_API_KEY`: API key
    /// - `DOCS_PATH`: Markdown corpus directory
    /// - `MIN_RELEVANCE_SCORE`: Abstention threshold
    /// - `TOP_K`: Number of evidence items to retrieve
    /// - `RUST_LOG`: Log level
    /// - `NO_COLOR`: Disable colored output
    ///
    /// # Example
    /// ```no_run
    /// use copilot_core::config::AppConfig;
    ///
    /// let config = AppConfig::load().expect("Failed to load config");
    /// println!("Docs: {:?}", config.resolved_docs_path());
    /// ```
    pub fn load() -> AppResult<Self> {
        Self::load_from(None, None)
    }

    /// Load configuration from an explicit workspace and config file.
    ///
    /// Paths given here win over `COPILOT_WORKSPACE` and `COPILOT_CONFIG`, and
    /// the config file they name is the one merged.
    pub fn load_from(workspace: Option<PathBuf>, config_file: Option<PathBuf>) -> AppResult<Self> {
        Self::load_with_paths(workspace, config_file, |key| std::env::var(key).ok())
    }

    /// Load configuration using a custom environment lookup.
    pub fn load_with<F>(env: F) -> AppResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        Self::load_with_paths(None, None, env)
    }

    /// Load configuration from explicit paths and a custom environment lookup.
    pub fn load_with_paths<F>(
        workspace: Option<PathBuf>,
        config_file: Option<PathBuf>,
        env: F,
    ) -> AppResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(workspace) = workspace.or_else(|| env("COPILOT_WORKSPACE").map(PathBuf::from)) {
            config.workspace = workspace;
        }

        config.config_file =
            config_file.or_else(|| env("COPILOT_CONFIG").map(PathBuf::from));

        // Validate workspace exists
        if !config.workspace.exists() {
            return Err(AppError::Config(format!(
                "Workspace directory does not exist: {:?}",
                config.workspace
            )));
        }

        let config_path = match config.config_file {
            Some(ref cf) => cf.clone(),
            None => config.copilot_dir().join("config.yaml"),
        };

        if config_path.exists() {
            config = config.merge_yaml(&config_path)?;
        }

        // Environment variables override YAML config
        config.apply_env(env)?;

        Ok(config)
    }

    /// Apply environment variable overrides.
    fn apply_env<F>(&mut self, env: F) -> AppResult<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(provider) = env("COPILOT_PROVIDER") {
            self.provider = provider;
        }

        if let Some(model) = env("COPILOT_MODEL") {
            self.model = model;
        }

        if let Some(key) = env("COPILOT_API_KEY") {
            self.api_key = Some(key);
        }

        if let Some(docs) = env("DOCS_PATH") {
            self.docs_path = PathBuf::from(docs);
        }

        if let Some(raw) = env("MIN_RELEVANCE_SCORE") {
            self.rag.min_relevance_score = raw.trim().parse().map_err(|_| {
                AppError::Config(format!(
                    "MIN_RELEVANCE_SCORE must be a number, got {:?}",
                    raw
                ))
            })?;
        }

        if let Some(raw) = env("TOP_K") {
            self.rag.top_k = raw.trim().parse().map_err(|_| {
                AppError::Config(format!(
                    "TOP_K must be a positive integer, got {:?}",
                    raw
                ))
            })?;
        }

        if let Some(level) = env("RUST_LOG") {
            self.log_level = Some(level);
        }

        // Check for NO_COLOR environment variable
        if env("NO_COLOR").is_some() {
            self.no_color = true;
        }

        Ok(())
    }

    /// Merge YAML configuration file into this config.
    fn merge_yaml(&self, path: &Path) -> AppResult<Self> {
        let contents = std::fs::read_to_string(path).map_err(|e| {
            AppError::Config(format!("Failed to read config file {:?}: {}", path, e))
        })?;

        let config_file: ConfigFile = serde_yaml::from_str(&contents).map_err(|e| {
            AppError::Config(format!("Failed to parse config file {:?}: {}", path, e))
        })?;

        let mut result = self.clone();

        if let Some(ws) = config_file.workspace {
            if let Some(path) = ws.path {
                result.workspace = PathBuf::from(path);
            }
        }

        if let Some(logging) = config_file.logging {
            if let Some(level) = logging.level {
                result.log_level = Some(level);
            }
            if let Some(color) = logging.color {
                result.no_color = !color;
            }
        }

        if let Some(rag) = config_file.rag {
            result.rag = rag;
        }

        if let Some(generation) = config_file.generation {
            result.generation = generation;
        }

        if let Some(ingest) = config_file.ingest {
            if let Some(docs) = ingest.docs_path {
                result.docs_path = PathBuf::from(docs);
            }
            result.ingest = ingest.chunking;
        }

        if let Some(embedding) = config_file.embedding {
            result.embedding = embedding;
        }

        if let Some(llm) = config_file.llm {
            result.provider = llm.active_provider.clone();

            if let Some(provider_config) = llm.providers.get(&llm.active_provider) {
                result.model = provider_config.model().to_string();
                if let ProviderConfig::Ollama {
                    timeout: Some(secs),
                    ..
                } = provider_config
                {
                    result.generation.timeout_secs = *secs;
                }
            }

            result.llm = Some(llm);
        }

        Ok(result)
    }

    /// Apply CLI overrides to the configuration.
    ///
    /// This method merges command-line flags with the loaded configuration,
    /// giving precedence to CLI flags over environment variables. Workspace and
    /// config file are not overrides: pass them to [`AppConfig::load_from`] so
    /// the right file gets merged.
    pub fn with_overrides(
        mut self,
        provider: Option<String>,
        model: Option<String>,
        log_level: Option<String>,
        verbose: bool,
        no_color: bool,
    ) -> Self {
        if let Some(provider) = provider {
            self.provider = provider;
        }

        if let Some(model) = model {
            self.model = model;
        }

        if let Some(log_level) = log_level {
            self.log_level = Some(log_level);
        }

        if verbose {
            self.verbose = true;
            // Verbose mode implies debug logging
            if self.log_level.is_none() {
                self.log_level = Some("debug".to_string());
            }
        }

        if no_color {
            self.no_color = true;
        }

        self
    }

    /// Get the path to the .copilot directory.
    pub fn copilot_dir(&self) -> PathBuf {
        self.workspace.join(".copilot")
    }

    /// Docs directory, resolved against the workspace when relative.
    pub fn resolved_docs_path(&self) -> PathBuf {
        if self.docs_path.is_absolute() {
            self.docs_path.clone()
        } else {
            self.workspace.join(&self.docs_path)
        }
    }

    /// Get the configuration for a provider, if the config file declared one.
    pub fn get_provider_config(&self, provider: &str) -> Option<&ProviderConfig> {
        self.llm.as_ref().and_then(|llm| llm.providers.get(provider))
    }

    /// Endpoint configured for a provider, if any.
    pub fn resolve_endpoint(&self, provider: &str) -> Option<String> {
        self.get_provider_config(provider)
            .and_then(|pc| pc.endpoint())
            .map(str::to_string)
    }

    /// Resolve API key from explicit setting or environment.
    pub fn resolve_api_key(&self, provider: &str) -> Option<String> {
        // Explicit COPILOT_API_KEY wins
        if let Some(ref key) = self.api_key {
            return Some(key.clone());
        }

        let env_var = match self.get_provider_config(provider) {
            Some(ProviderConfig::OpenAI { api_key_env, .. }) => Some(api_key_env.clone()),
            Some(ProviderConfig::Ollama { .. }) => None,
            None => match provider {
                "openrouter" => Some("OPENROUTER_API_KEY".to_string()),
                "openai" => Some("OPENAI_API_KEY".to_string()),
                _ => None,
            },
        };

        env_var.and_then(|var| std::env::var(var).ok())
    }

    /// Resolve the API key for the embedding backend.
    pub fn resolve_embedding_api_key(&self) -> Option<String> {
        let var = self
            .embedding
            .api_key_env
            .clone()
            .unwrap_or_else(|| "OPENAI_API_KEY".to_string());
        std::env::var(var).ok()
    }

    /// Validate configuration for the active provider.
    pub fn validate(&self) -> AppResult<()> {
        let provider = self.provider.as_str();

        if !KNOWN_PROVIDERS.contains(&provider) {
            return Err(AppError::Config(format!(
                "Unknown provider: {}. Supported: {}",
                provider,
                KNOWN_PROVIDERS.join(", ")
            )));
        }

        if provider != "ollama" && self.resolve_api_key(provider).is_none() {
            return Err(AppError::Config(format!(
                "Provider '{}' requires an API key (set COPILOT_API_KEY or the provider's apiKeyEnv)",
                provider
            )));
        }

        if !self.rag.min_relevance_score.is_finite() {
            return Err(AppError::Config(
                "minRelevanceScore must be a finite number".to_string(),
            ));
        }

        if self.rag.top_k == 0 {
            return Err(AppError::Config("topK must be at least 1".to_string()));
        }

        if self.ingest.chunk_size == 0 || self.ingest.chunk_overlap >= self.ingest.chunk_size {
            return Err(AppError::Config(format!(
                "chunkOverlap ({}) must be smaller than a non-zero chunkSize ({})",
                self.ingest.chunk_overlap, self.ingest.chunk_size
            )));
        }

        if !KNOWN_EMBEDDING_PROVIDERS.contains(&self.embedding.provider.as_str()) {
            return Err(AppError::Config(format!(
                "Unknown embedding provider: {}. Supported: {}",
                self.embedding.provider,
                KNOWN_EMBEDDING_PROVIDERS.join(", ")
            )));
        }

        if self.embedding.dimensions == 0 {
            return Err(AppError::Config(
                "Embedding dimensions must be at least 1".to_string(),
            ));
        }

        Ok(())
    }
}
