use config::{Config, Environment};
use serde::Deserialize;
use thiserror::Error;

use crate::agent::{Agent, DEFAULT_MODEL};
use crate::providers::configs::{OpenAiProviderConfig, DEFAULT_HOST};

const ENV_PREFIX: &str = "SWARM";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {env_var}")]
    MissingEnvVar { env_var: String },
    #[error("Configuration error: {0}")]
    Other(#[from] config::ConfigError),
}

/// Map a configuration key to the environment variable that sets it
///
/// Bare field names belong to the provider section, the only section with
/// required fields.
pub fn to_env_var(field: &str) -> String {
    let path = if field.contains('.') {
        field.replace('.', "__")
    } else {
        format!("provider__{}", field)
    };
    format!("{}_{}", ENV_PREFIX, path.to_uppercase())
}

#[derive(Debug, Deserialize)]
pub struct ProviderSettings {
    #[serde(default = "default_host")]
    pub host: String,
    pub api_key: String,
}

impl ProviderSettings {
    pub fn into_config(self) -> OpenAiProviderConfig {
        OpenAiProviderConfig::new(self.api_key).with_host(self.host)
    }
}

#[derive(Debug, Deserialize)]
pub struct AgentSettings {
    #[serde(default = "default_agent_name")]
    pub name: String,
    #[serde(default = "default_instructions")]
    pub instructions: String,
    #[serde(default = "default_model")]
    pub model: String,
}

impl Default for AgentSettings {
    fn default() -> Self {
        Self {
            name: default_agent_name(),
            instructions: default_instructions(),
            model: default_model(),
        }
    }
}

impl AgentSettings {
    /// Build a tool-less agent from these settings
    pub fn to_agent(&self) -> Agent {
        Agent::new(&self.name, &self.instructions).with_model(&self.model)
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct RunSettings {
    #[serde(default)]
    pub max_turns: Option<usize>,
    #[serde(default)]
    pub debug: bool,
}

#[derive(Debug, Deserialize)]
pub struct Settings {
    pub provider: ProviderSettings,
    #[serde(default)]
    pub agent: AgentSettings,
    #[serde(default)]
    pub run: RunSettings,
}

impl Settings {
    /// Load settings from `SWARM_`-prefixed environment variables, e.g.
    /// `SWARM_PROVIDER__API_KEY` or `SWARM_RUN__MAX_TURNS`
    pub fn new() -> Result<Self, ConfigError> {
        Self::load_and_validate()
    }

    fn load_and_validate() -> Result<Self, ConfigError> {
        let config = Config::builder()
            .set_default("provider.host", default_host())?
            .set_default("agent.name", default_agent_name())?
            .set_default("agent.instructions", default_instructions())?
            .set_default("agent.model", default_model())?
            .set_default("run.debug", false)?
            .add_source(
                Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        let result: Result<Self, config::ConfigError> = config.try_deserialize();

        match result {
            Ok(settings) => Ok(settings),
            Err(err) => {
                tracing::debug!("Configuration error: {:?}", &err);

                let error_str = err.to_string();
                // Messages read "missing field `api_key`", possibly followed by the key path
                if let Some(field) = error_str
                    .strip_prefix("missing field `")
                    .and_then(|rest| rest.split('`').next())
                {
                    Err(ConfigError::MissingEnvVar {
                        env_var: to_env_var(field),
                    })
                } else if let config::ConfigError::NotFound(field) = &err {
                    Err(ConfigError::MissingEnvVar {
                        env_var: to_env_var(field),
                    })
                } else {
                    Err(ConfigError::Other(err))
                }
            }
        }
    }
}

fn default_host() -> String {
    DEFAULT_HOST.to_string()
}

fn default_agent_name() -> String {
    "Agent".to_string()
}

fn default_instructions() -> String {
    "You are a helpful agent.".to_string()
}

fn default_model() -> String {
    DEFAULT_MODEL.to_string()
}
