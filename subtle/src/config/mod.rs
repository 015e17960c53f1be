//! `subtle` general configuration

mod checks;
mod default;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use subtle_core::config::{GrabConfig, TagConfig, ViewConfig};
use xdg::BaseDirectories;

/// General configuration, read from `config.toml`.
///
/// # Example
///
/// ```toml
/// panel_height = 18
///
/// [[tags]]
/// name = "www"
/// match = "firefox"
/// gravity = 5
///
/// [[views]]
/// name = "www"
/// tags = ["www"]
///
/// [[grab]]
/// chord = "W-Return"
/// action = { exec = "xterm" }
/// ```
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct Config {
    /// Height of the panel, 0 hides it.
    pub panel_height: i32,
    /// Log filter used when neither `RUST_LOG` nor `--log-level` is given.
    pub log_level: String,
    pub tags: Vec<TagConfig>,
    pub views: Vec<ViewConfig>,
    #[serde(rename = "grab")]
    pub grabs: Vec<GrabConfig>,
    /// Widget sources handed to the script host.
    pub widgets: Vec<String>,
}

/// Load the configuration from `path`, or from `$XDG_CONFIG_HOME/subtle/config.toml`
/// when no path is given. A missing default file yields the default configuration.
///
/// # Errors
///
/// Will error if the file can't be read or isn't valid TOML for [`Config`],
/// or if the XDG base directories can't be resolved.
pub fn load(path: Option<&Path>) -> Result<Config> {
    let path = match path {
        Some(path) => path.to_path_buf(),
        None => match default_path()? {
            Some(path) => path,
            None => {
                tracing::info!("No config.toml found, using the default configuration");
                return Ok(Config::default());
            }
        },
    };
    load_from_file(&path)
}

/// Path of the user's config file, if there is one.
///
/// # Errors
///
/// Will error if the XDG base directories can't be resolved.
pub fn default_path() -> Result<Option<PathBuf>> {
    let dirs = BaseDirectories::with_prefix("subtle")?;
    Ok(dirs.find_config_file("config.toml"))
}

fn load_from_file(path: &Path) -> Result<Config> {
    let contents = fs::read_to_string(path)
        .with_context(|| format!("Can't read config file {}", path.display()))?;
    let config: Config = toml::from_str(&contents)
        .with_context(|| format!("Can't parse config file {}", path.display()))?;
    tracing::debug!("Loaded config from {}", path.display());
    Ok(config)
}

impl subtle_core::Config for Config {
    fn tags(&self) -> Vec<TagConfig> {
        self.tags.clone()
    }

    fn views(&self) -> Vec<ViewConfig> {
        self.views.clone()
    }

    fn grabs(&self) -> Vec<GrabConfig> {
        self.grabs.clone()
    }

    fn widgets(&self) -> Vec<String> {
        self.widgets.clone()
    }

    fn header_height(&self) -> i32 {
        self.panel_height
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use subtle_core::models::{GrabAction, Gravity};

    fn write_config(contents: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    #[test]
    fn reads_tags_views_and_grabs() {
        let file = write_config(
            r#"
panel_height = 20

[[tags]]
name = "www"
match = "firefox"
gravity = 8

[[tags]]
name = "terms"

[[views]]
name = "web"
tags = ["www", "terms"]

[[grab]]
chord = "W-Return"
action = { exec = "xterm" }

[[grab]]
chord = "W-1"
action = { view_jump = 0 }

[[grab]]
chord = "W-C-r"
action = "reload"
"#,
        );
        let config = load(Some(file.path())).unwrap();
        assert_eq!(config.panel_height, 20);
        assert_eq!(config.tags.len(), 2);
        assert_eq!(config.tags[0].matching.as_deref(), Some("firefox"));
        assert_eq!(config.tags[0].gravity, Gravity::try_from(8_u8).ok());
        assert_eq!(config.views[0].tags, vec!["www", "terms"]);
        assert_eq!(
            config.grabs[0].action,
            GrabAction::Exec("xterm".to_owned())
        );
        assert_eq!(config.grabs[1].action, GrabAction::ViewJump(0));
        assert_eq!(config.grabs[2].action, GrabAction::Reload);
        // Missing keys keep their defaults.
        assert_eq!(config.log_level, Config::default().log_level);
    }

    #[test]
    fn missing_explicit_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = load(Some(&dir.path().join("nope.toml"))).unwrap_err();
        assert!(format!("{err:#}").contains("Can't read config file"));
    }

    #[test]
    fn malformed_file_is_an_error() {
        let file = write_config("panel_height = \"tall\"\n");
        let err = load(Some(file.path())).unwrap_err();
        assert!(format!("{err:#}").contains("Can't parse config file"));
    }

    #[test]
    fn empty_file_gives_the_defaults() {
        let file = write_config("");
        assert_eq!(load(Some(file.path())).unwrap(), Config::default());
    }
}
