//! Startup configuration.
//!
//! Loaded once from `~/.config/tix/config.toml` (or `--config`) into an
//! immutable value that is passed by reference to whatever needs it. There is
//! no global settings object and nothing here changes after startup.

use std::collections::BTreeMap;
use std::env;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use tracing::debug;

use crate::error::ConfigError;

#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Site used when `--site` is not given.
    pub default_site: Option<String>,

    /// Editor command line; `$VISUAL` / `$EDITOR` are consulted when unset.
    pub editor: Option<String>,

    /// Output blocks taller than this are handed to the pager.
    pub pager_threshold: usize,

    /// Bounded wait for one gateway round trip.
    pub timeout_secs: u64,

    pub sites: BTreeMap<String, SiteConfig>,

    /// Alias name to template. Read-only after startup.
    pub aliases: BTreeMap<String, String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            default_site: None,
            editor: None,
            pager_threshold: default_pager_threshold(),
            timeout_secs: default_timeout_secs(),
            sites: BTreeMap::new(),
            aliases: BTreeMap::new(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct SiteConfig {
    /// Endpoint of the tracker's remote-call API.
    pub url: String,
    #[serde(default)]
    pub user: Option<String>,
    #[serde(default)]
    pub password: Option<String>,
}

/// The default config location, `<config dir>/tix/config.toml`.
#[must_use]
pub fn default_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("tix/config.toml"))
}

/// Load configuration.
///
/// An explicit `--config` path must exist; the default location is optional
/// and falls back to built-in defaults when absent.
pub fn load(explicit: Option<&Path>) -> Result<Config, ConfigError> {
    let (path, required) = match explicit {
        Some(path) => (path.to_path_buf(), true),
        None => match default_path() {
            Some(path) => (path, false),
            None => return Ok(Config::default()),
        },
    };

    if !required && !path.exists() {
        debug!(path = %path.display(), "no config file, using defaults");
        return Ok(Config::default());
    }

    let content = std::fs::read_to_string(&path).map_err(|source| ConfigError::Read {
        path: path.clone(),
        source,
    })?;

    toml::from_str(&content).map_err(|source| ConfigError::Parse { path, source })
}

impl Config {
    /// Pick the site to connect to: `--site`, else `default_site`, else the
    /// only configured site.
    pub fn resolve_site(&self, flag: Option<&str>) -> Result<(&str, &SiteConfig), ConfigError> {
        if let Some(name) = flag.or(self.default_site.as_deref()) {
            return self
                .sites
                .get_key_value(name)
                .map(|(key, site)| (key.as_str(), site))
                .ok_or_else(|| ConfigError::UnknownSite {
                    name: name.to_string(),
                });
        }
        if self.sites.len() == 1 {
            if let Some((name, site)) = self.sites.iter().next() {
                return Ok((name.as_str(), site));
            }
        }
        Err(ConfigError::NoSite)
    }

    /// Resolve the editor command: config, then `$VISUAL`, then `$EDITOR`.
    ///
    /// A bare program name must be on `$PATH`; an explicit path must exist.
    /// `None` means edit commands will report that no editor is configured.
    #[must_use]
    pub fn resolve_editor(&self) -> Option<String> {
        let candidate = pick_editor(
            self.editor.as_deref(),
            env::var("VISUAL").ok().as_deref(),
            env::var("EDITOR").ok().as_deref(),
        )?;
        if editor_available(&candidate) {
            Some(candidate)
        } else {
            debug!(editor = %candidate, "configured editor not found");
            None
        }
    }

    /// Reject aliases that shadow built-in command names.
    pub fn ensure_aliases_allowed<'a>(
        &self,
        reserved: impl IntoIterator<Item = &'a str>,
    ) -> Result<(), ConfigError> {
        let names: Vec<String> = reserved
            .into_iter()
            .filter(|name| self.aliases.contains_key(*name))
            .map(str::to_string)
            .collect();
        if names.is_empty() {
            Ok(())
        } else {
            Err(ConfigError::ReservedAlias { names })
        }
    }
}

fn pick_editor(
    configured: Option<&str>,
    visual: Option<&str>,
    editor: Option<&str>,
) -> Option<String> {
    [configured, visual, editor]
        .into_iter()
        .flatten()
        .map(str::trim)
        .find(|candidate| !candidate.is_empty())
        .map(str::to_string)
}

fn editor_available(command: &str) -> bool {
    let words = crate::alias::split_args(command);
    let Some(program) = words.first() else {
        return false;
    };
    if program.contains('/') {
        Path::new(program).exists()
    } else {
        which::which(program).is_ok()
    }
}

const fn default_pager_threshold() -> usize {
    40
}

const fn default_timeout_secs() -> u64 {
    30
}
