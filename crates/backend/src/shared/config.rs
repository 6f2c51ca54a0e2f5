use serde::Deserialize;
use std::net::SocketAddr;

#[derive(Debug, Deserialize, Clone, Default)]
pub struct Config {
    #[serde(default)]
    pub server: ServerSettings,
    #[serde(default)]
    pub gateway: GatewaySettings,
    #[serde(default)]
    pub pipeline: PipelineSettings,
    #[serde(default)]
    pub assistant: AssistantSettings,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct ServerSettings {
    pub host: String,
    pub port: u16,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".into(),
            port: 3000,
        }
    }
}

impl ServerSettings {
    pub fn socket_addr(&self) -> anyhow::Result<SocketAddr> {
        Ok(format!("{}:{}", self.host, self.port).parse()?)
    }
}

#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum GatewayMode {
    /// Records live in process memory and vanish on restart
    #[default]
    Memory,
    Http,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct GatewaySettings {
    pub mode: GatewayMode,
    pub base_url: String,
    pub app_id: String,
    pub api_key: String,
    pub timeout_secs: u64,
}

impl Default for GatewaySettings {
    fn default() -> Self {
        Self {
            mode: GatewayMode::Memory,
            base_url: String::new(),
            app_id: String::new(),
            api_key: String::new(),
            timeout_secs: 30,
        }
    }
}

#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum TransitionPolicySetting {
    #[default]
    Permissive,
    Strict,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct PipelineSettings {
    /// Upper bound of records fetched per list call
    pub list_limit: usize,
    pub trend_window_months: u32,
    pub transition_policy: TransitionPolicySetting,
}

impl Default for PipelineSettings {
    fn default() -> Self {
        Self {
            list_limit: 500,
            trend_window_months: 6,
            transition_policy: TransitionPolicySetting::Permissive,
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct AssistantSettings {
    pub api_endpoint: String,
    /// Empty disables the assistant; replies degrade to the apology text
    pub api_key: String,
    pub model: String,
    pub temperature: f64,
    pub max_tokens: u32,
    /// Previous messages sent along with each new one, and kept per conversation
    pub history_limit: usize,
    /// Conversations held in memory; the least recently active go first
    pub max_conversations: usize,
}

impl Default for AssistantSettings {
    fn default() -> Self {
        Self {
            api_endpoint: "https://api.openai.com/v1".into(),
            api_key: String::new(),
            model: "gpt-4o-mini".into(),
            temperature: 0.7,
            max_tokens: 1024,
            history_limit: 20,
            max_conversations: 500,
        }
    }
}

/// Default configuration embedded in the binary
const DEFAULT_CONFIG: &str = r#"
[server]
host = "0.0.0.0"
port = 3000

[gateway]
mode = "memory"
timeout_secs = 30

[pipeline]
list_limit = 500
trend_window_months = 6
transition_policy = "permissive"

[assistant]
api_endpoint = "https://api.openai.com/v1"
api_key = ""
model = "gpt-4o-mini"
temperature = 0.7
max_tokens = 1024
history_limit = 20
max_conversations = 500
"#;

/// Load configuration from config.toml file
///
/// Search order:
/// 1. Next to the executable (for production)
/// 2. Falls back to embedded default config
pub fn load_config() -> anyhow::Result<Config> {
    if let Ok(exe_path) = std::env::current_exe() {
        if let Some(exe_dir) = exe_path.parent() {
            let config_path = exe_dir.join("config.toml");

            if config_path.exists() {
                tracing::info!("Loading config from: {}", config_path.display());
                let contents = std::fs::read_to_string(&config_path)?;
                return parse_config(&contents);
            } else {
                tracing::warn!("config.toml not found at: {}", config_path.display());
            }
        }
    }

    tracing::info!("Using default embedded configuration");
    parse_config(DEFAULT_CONFIG)
}

pub fn parse_config(contents: &str) -> anyhow::Result<Config> {
    let config: Config = toml::from_str(contents)?;
    if !crate::dashboards::d400_lead_analytics::is_supported_window(
        config.pipeline.trend_window_months,
    ) {
        anyhow::bail!(
            "pipeline.trend_window_months must be one of 1, 3, 6, 12, got {}",
            config.pipeline.trend_window_months
        );
    }
    Ok(config)
}
