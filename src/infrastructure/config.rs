use anyhow::Context;
use serde::Deserialize;
use std::net::SocketAddr;
use std::path::PathBuf;

pub const DEFAULT_TITLE: &str = "E-commerce Sales & Customer Behaviour Insights";
pub const DEFAULT_CAPTION: &str =
    "Built as a Data Science Portfolio Project (Sales & Customer Behaviour Analysis)";

#[derive(Debug, Deserialize, Clone, Default)]
#[serde(default)]
pub struct AppConfig {
    pub server: ServerSettings,
    pub data: DataSettings,
    pub dashboard: DashboardSettings,
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
            host: "0.0.0.0".to_string(),
            port: 8501,
        }
    }
}

impl ServerSettings {
    pub fn socket_addr(&self) -> anyhow::Result<SocketAddr> {
        format!("{}:{}", self.host, self.port)
            .parse()
            .with_context(|| format!("Invalid listen address {}:{}", self.host, self.port))
    }
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct DataSettings {
    /// Directory holding the CSV and PNG artifacts
    pub base_dir: PathBuf,
}

impl Default for DataSettings {
    fn default() -> Self {
        Self {
            base_dir: PathBuf::from("."),
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct DashboardSettings {
    pub title: String,
    pub caption: String,
    /// Fixed seed for the churn sample; random per render when unset
    pub sample_seed: Option<u64>,
}

impl Default for DashboardSettings {
    fn default() -> Self {
        Self {
            title: DEFAULT_TITLE.to_string(),
            caption: DEFAULT_CAPTION.to_string(),
            sample_seed: None,
        }
    }
}

/// Load `config/dashboard.{toml,yaml,json}` if present, overlaid by
/// `DASHBOARD_*` environment variables (`__` separates nested keys).
pub fn load_app_config() -> anyhow::Result<AppConfig> {
    load_app_config_from(config::File::with_name("config/dashboard").required(false))
}

pub fn load_app_config_from<S>(file: S) -> anyhow::Result<AppConfig>
where
    S: config::Source + Send + Sync + 'static,
{
    load_layers(file, environment())
}

/// `DASHBOARD_DATA__BASE_DIR` style variables
fn environment() -> config::Environment {
    config::Environment::with_prefix("DASHBOARD")
        .prefix_separator("_")
        .separator("__")
        .try_parsing(true)
}

fn load_layers<S>(file: S, env: config::Environment) -> anyhow::Result<AppConfig>
where
    S: config::Source + Send + Sync + 'static,
{
    let settings = config::Config::builder()
        .add_source(file)
        .add_source(env)
        .build()?;

    Ok(settings.try_deserialize()?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults() {
        let config = AppConfig::default();
        assert_eq!(config.server.port, 8501);
        assert_eq!(config.data.base_dir, PathBuf::from("."));
        assert_eq!(config.dashboard.title, DEFAULT_TITLE);
        assert_eq!(config.dashboard.sample_seed, None);
        assert_eq!(
            config.server.socket_addr().unwrap(),
            "0.0.0.0:8501".parse::<SocketAddr>().unwrap()
        );
    }

    #[test]
    fn test_load_from_toml_keeps_unset_defaults() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(file, "[data]").unwrap();
        writeln!(file, "base_dir = \"/srv/analytics\"").unwrap();
        writeln!(file, "[dashboard]").unwrap();
        writeln!(file, "sample_seed = 42").unwrap();

        let config = load_app_config_from(config::File::from(file.path())).unwrap();
        assert_eq!(config.data.base_dir, PathBuf::from("/srv/analytics"));
        assert_eq!(config.dashboard.sample_seed, Some(42));
        assert_eq!(config.dashboard.caption, DEFAULT_CAPTION);
        assert_eq!(config.server.host, "0.0.0.0");
    }

    #[test]
    fn test_env_overrides_nested_keys() {
        let mut vars = config::Map::new();
        vars.insert("DASHBOARD_DATA__BASE_DIR".to_string(), "/srv/exports".to_string());
        vars.insert("DASHBOARD_SERVER__PORT".to_string(), "9000".to_string());
        vars.insert("OTHER_SERVER__PORT".to_string(), "1".to_string());

        let file = config::File::with_name("config/does-not-exist").required(false);
        let config = load_layers(file, environment().source(Some(vars))).unwrap();
        assert_eq!(config.data.base_dir, PathBuf::from("/srv/exports"));
        assert_eq!(config.server.port, 9000);
        assert_eq!(config.server.host, "0.0.0.0");
    }

    #[test]
    fn test_invalid_host() {
        let server = ServerSettings {
            host: "not a host".to_string(),
            port: 80,
        };
        assert!(server.socket_addr().is_err());
    }
}
