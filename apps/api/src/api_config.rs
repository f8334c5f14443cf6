use std::env;
use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use intraextra_core::AppError;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Clone)]
pub struct ApiConfig {
    pub api_host: String,
    pub api_port: u16,
    pub frontend_url: String,
    pub layout_storage_dir: PathBuf,
    pub layout_remote_url: Option<String>,
    pub layout_remote_timeout: Duration,
}

impl ApiConfig {
    pub fn load() -> Result<Self, AppError> {
        let api_host = env::var("API_HOST").unwrap_or_else(|_| "127.0.0.1".to_owned());
        let api_port = env::var("API_PORT")
            .ok()
            .and_then(|value| value.parse::<u16>().ok())
            .unwrap_or(3001);
        let frontend_url =
            env::var("FRONTEND_URL").unwrap_or_else(|_| "http://localhost:3000".to_owned());

        let layout_storage_dir = env::var("LAYOUT_STORAGE_DIR")
            .ok()
            .filter(|value| !value.trim().is_empty())
            .map_or_else(|| PathBuf::from("./data/layouts"), PathBuf::from);
        let layout_remote_url = optional_non_empty_env("LAYOUT_REMOTE_URL");
        let layout_remote_timeout_seconds = optional_non_empty_env("LAYOUT_REMOTE_TIMEOUT_SECONDS")
            .map(|value| {
                value.parse::<u64>().map_err(|error| {
                    AppError::Validation(format!("invalid LAYOUT_REMOTE_TIMEOUT_SECONDS: {error}"))
                })
            })
            .transpose()?
            .unwrap_or(10);

        if layout_remote_timeout_seconds == 0 {
            return Err(AppError::Validation(
                "LAYOUT_REMOTE_TIMEOUT_SECONDS must be greater than zero".to_owned(),
            ));
        }

        Ok(Self {
            api_host,
            api_port,
            frontend_url,
            layout_storage_dir,
            layout_remote_url,
            layout_remote_timeout: Duration::from_secs(layout_remote_timeout_seconds),
        })
    }

    pub fn socket_address(&self) -> Result<SocketAddr, AppError> {
        let host = IpAddr::from_str(&self.api_host).map_err(|error| {
            AppError::Internal(format!("invalid API_HOST '{}': {error}", self.api_host))
        })?;
        Ok(SocketAddr::from((host, self.api_port)))
    }
}

pub fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .compact()
        .init();
}

fn optional_non_empty_env(name: &str) -> Option<String> {
    env::var(name).ok().filter(|value| !value.trim().is_empty())
}
