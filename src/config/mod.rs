use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use serde::Deserialize;

mod defaults;

#[derive(Debug, Deserialize)]
pub struct Config {
    /// Base URL of the backend, including the API prefix.
    #[serde(default = "defaults::server")]
    pub server: String,

    /// Where the file-backed token storage lives. Supports `~` and
    /// environment expansion.
    #[serde(default = "defaults::token_path")]
    pub token_path: String,

    /// How long a notice is allowed to render before a forced redirect
    /// fires.
    #[serde(default = "defaults::redirect_delay_ms")]
    pub redirect_delay_ms: u64,

    #[serde(default = "defaults::pages")]
    pub pages: PagesConfig,
}

/// Navigation targets used by the route guard and the unauthorized
/// handler.
#[derive(Debug, Deserialize)]
pub struct PagesConfig {
    #[serde(default = "defaults::login_page")]
    pub login: String,

    #[serde(default = "defaults::home_page")]
    pub home: String,

    #[serde(default = "defaults::admin_dashboard_page")]
    pub admin_dashboard: String,
}

impl Config {
    pub fn load<P: AsRef<Path>>(path: Option<P>) -> Result<Self> {
        let mut cfg = Self::_load(path)?;
        cfg.validate().context("validate config")?;
        Ok(cfg)
    }

    fn _load<P: AsRef<Path>>(path: Option<P>) -> Result<Self> {
        let path = match path {
            Some(path) => PathBuf::from(path.as_ref()),
            None => {
                let homedir = dirs_home();
                if homedir.is_none() {
                    bail!("home directory is not supported in your system, please set config path manually");
                }

                homedir.unwrap().join(".config").join("shopkit.toml")
            }
        };

        match fs::read(&path) {
            Ok(data) => {
                let toml_str = String::from_utf8(data).with_context(|| {
                    format!("decode config file '{}' into utf-8", path.display())
                })?;

                let cfg: Config = toml::from_str(&toml_str)
                    .with_context(|| format!("parse config file '{}' toml", path.display()))?;

                Ok(cfg)
            }

            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(Self::default()),

            Err(err) => Err(err).with_context(|| format!("read config file '{}'", path.display())),
        }
    }

    pub fn default() -> Self {
        Self {
            server: defaults::server(),
            token_path: defaults::token_path(),
            redirect_delay_ms: defaults::redirect_delay_ms(),
            pages: defaults::pages(),
        }
    }

    fn validate(&mut self) -> Result<()> {
        if self.server.is_empty() {
            bail!("config server cannot be empty");
        }
        self.server = self.server.trim_end_matches('/').to_string();

        self.token_path = shellexpand::full(&self.token_path)
            .context("expand env for token_path")?
            .to_string();
        if self.token_path.is_empty() {
            bail!("config token_path cannot be empty");
        }

        if self.pages.login.is_empty()
            || self.pages.home.is_empty()
            || self.pages.admin_dashboard.is_empty()
        {
            bail!("config pages cannot be empty");
        }

        Ok(())
    }
}

fn dirs_home() -> Option<PathBuf> {
    std::env::var_os("HOME").map(PathBuf::from)
}
