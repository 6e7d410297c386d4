//! Optional TOML configuration file

use clap::ValueEnum;
use esrever_format::{EsreverError, Result};
use serde::Deserialize;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// Shell whose startup file is edited by default.
#[derive(Copy, Clone, Debug, Eq, PartialEq, ValueEnum, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Shell {
    Bash,
    Zsh,
}

impl Shell {
    /// Guess from the basename of `$SHELL`; bash when unknown.
    pub fn detect() -> Self {
        let shell = std::env::var("SHELL").unwrap_or_default();
        match Path::new(&shell).file_name().and_then(|n| n.to_str()) {
            Some("zsh") => Shell::Zsh,
            _ => Shell::Bash,
        }
    }

    /// Startup file name inside the home directory.
    pub fn rc_file_name(&self) -> &'static str {
        match self {
            Shell::Bash => ".bashrc",
            Shell::Zsh => ".zshrc",
        }
    }
}

/// Values read from `config.toml`. Command-line flags take precedence.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Colon-separated directories to scan instead of `$PATH`
    pub search_path: Option<String>,
    /// Startup file to edit
    pub rc_file: Option<PathBuf>,
    /// Shell used to pick the default startup file
    pub shell: Option<Shell>,
    /// Names added to the sensitive blocklist
    pub extra_blocklist: Vec<String>,
    /// Append cd, exit and friends to the scan
    pub include_builtins: bool,
    /// Also ask a real shell about collisions
    pub probe_shell: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            search_path: None,
            rc_file: None,
            shell: None,
            extra_blocklist: Vec::new(),
            include_builtins: true,
            probe_shell: false,
        }
    }
}

impl Config {
    /// Parse configuration text.
    pub fn parse(text: &str) -> Result<Self> {
        toml::from_str(text).map_err(|err| EsreverError::Config(err.to_string()))
    }

    /// Load `explicit`, or the default location when `None`.
    ///
    /// A missing default file yields the defaults; a missing explicit file is
    /// an error.
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        let (path, required) = match explicit {
            Some(path) => (path.to_path_buf(), true),
            None => match default_config_path() {
                Some(path) => (path, false),
                None => return Ok(Self::default()),
            },
        };

        match fs::read_to_string(&path) {
            Ok(text) => Self::parse(&text).map_err(|err| match err {
                EsreverError::Config(msg) => {
                    EsreverError::Config(format!("{}: {}", path.display(), msg))
                }
                other => other,
            }),
            Err(err) if err.kind() == io::ErrorKind::NotFound && !required => {
                Ok(Self::default())
            }
            Err(err) => Err(EsreverError::file_io(&path, err)),
        }
    }
}

/// `$XDG_CONFIG_HOME/esrever/config.toml`, else `~/.config/esrever/config.toml`.
pub fn default_config_path() -> Option<PathBuf> {
    let base = std::env::var_os("XDG_CONFIG_HOME")
        .filter(|v| !v.is_empty())
        .map(PathBuf::from)
        .or_else(|| home_dir().map(|home| home.join(".config")))?;
    Some(base.join("esrever").join("config.toml"))
}

/// `$HOME`, when set.
pub fn home_dir() -> Option<PathBuf> {
    std::env::var_os("HOME")
        .filter(|v| !v.is_empty())
        .map(PathBuf::from)
}
