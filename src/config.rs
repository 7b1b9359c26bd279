use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClientConfig {
    pub server: ServerConfig,
    pub session: SessionConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub url: String,
    pub api_path: String,
    pub verify_certificates: bool,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SessionConfig {
    pub user: Option<String>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            server: ServerConfig::default(),
            session: SessionConfig::default(),
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            url: "https://localhost:8443".to_string(),
            api_path: "/openbis/openbis/rmi-application-server-v3.json".to_string(),
            verify_certificates: true,
        }
    }
}

impl ClientConfig {
    /// Load configuration from defaults, an optional `openbis` config file and
    /// `OPENBIS_` environment variables, later sources winning.
    pub fn load() -> anyhow::Result<Self> {
        let mut config = config::Config::builder();

        config = config.add_source(config::Config::try_from(&ClientConfig::default())?);

        config = config.add_source(config::File::with_name("openbis").required(false));

        // Nested keys use a double underscore: OPENBIS_SERVER__API_PATH
        config = config.add_source(
            config::Environment::with_prefix("OPENBIS")
                .separator("__")
                .prefix_separator("_"),
        );

        let config = config.build()?;
        let client_config: ClientConfig = config.try_deserialize()?;

        Ok(client_config)
    }

    /// Full URL of the JSON-RPC endpoint.
    pub fn api_url(&self) -> String {
        format!(
            "{}/{}",
            self.server.url.trim_end_matches('/'),
            self.server.api_path.trim_start_matches('/')
        )
    }
}
