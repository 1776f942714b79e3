use serde::{Deserialize, Serialize};

use std::io::Write;
use std::path::Path;

use crate::error::{Result, TrieError};
use crate::wordset::WordSet;

/// Embedded default configuration.
const DEFAULT_CONFIG: &str = include_str!("../config.default.toml");

// ── Final (merged) config types ──

#[derive(Debug, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub settings: Settings,
    #[serde(default)]
    pub words: Words,
}

#[derive(Debug, Deserialize, Serialize)]
pub struct Settings {
    /// Log filter: error, warn, info, debug, trace or off.
    #[serde(default = "default_log_level")]
    pub log_level: String,
    /// Match record file. Tilde-expanded; empty disables the record log.
    #[serde(default)]
    pub match_log: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            match_log: String::new(),
        }
    }
}

fn default_log_level() -> String {
    "warn".into()
}

/// Configured words, split by policy flag.
#[derive(Debug, Deserialize, Serialize, Default)]
pub struct Words {
    #[serde(default)]
    pub enabled: Vec<String>,
    #[serde(default)]
    pub disabled: Vec<String>,
}

// ── Overlay types (user config that merges with defaults) ──

#[derive(Debug, Deserialize, Default)]
struct ConfigOverlay {
    #[serde(default)]
    settings: SettingsOverlay,
    #[serde(default)]
    words: WordsOverlay,
}

#[derive(Debug, Deserialize, Default)]
struct SettingsOverlay {
    log_level: Option<String>,
    match_log: Option<String>,
}

#[derive(Debug, Deserialize, Default)]
struct WordsOverlay {
    #[serde(default)]
    replace: bool,
    #[serde(default)]
    enabled: Vec<String>,
    #[serde(default)]
    disabled: Vec<String>,
    #[serde(default)]
    remove_enabled: Vec<String>,
    #[serde(default)]
    remove_disabled: Vec<String>,
}

// ── Merge logic ──

/// Fold overlay words into `base`. `replace` drops the defaults; otherwise
/// `remove` is subtracted first. Added words are appended once each.
fn merge_words(base: &mut Vec<String>, add: Vec<String>, remove: &[String], replace: bool) {
    if replace {
        base.clear();
    } else {
        base.retain(|word| !remove.contains(word));
    }
    for word in add {
        if !base.contains(&word) {
            base.push(word);
        }
    }
}

/// Read an overlay file. `Ok(None)` when the file does not exist.
fn read_overlay(path: &Path) -> Result<Option<ConfigOverlay>> {
    let content = match std::fs::read_to_string(path) {
        Ok(c) => c,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
        Err(e) => return Err(e.into()),
    };
    Ok(Some(toml::from_str(&content)?))
}

impl Config {
    /// Load the default embedded configuration.
    pub fn default_config() -> Self {
        toml::from_str(DEFAULT_CONFIG).expect("embedded default config must parse")
    }

    /// Parse a complete configuration from TOML text.
    pub fn from_toml_str(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    /// Read and parse a complete configuration file, bypassing defaults.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    /// Load configuration with resolution order:
    /// 1. Start with embedded defaults
    /// 2. Merge user overlay from ~/.config/policy-trie/config.toml (if exists)
    ///
    /// User config merges with defaults: lists extend, scalars override.
    /// Set `replace = true` under `[words]` to replace the default words.
    /// Use `remove_<field>` lists to subtract specific items from defaults.
    pub fn load() -> Self {
        let path = std::env::var_os("HOME")
            .map(|home| Path::new(&home).join(".config/policy-trie/config.toml"));
        Self::load_with_overlay(path.as_deref(), &mut std::io::stderr())
    }

    /// Defaults merged with the overlay at `path`. A missing file is not an
    /// error; one that fails to read or parse is reported on `warn` and skipped.
    fn load_with_overlay(path: Option<&Path>, warn: &mut dyn Write) -> Self {
        let mut config = Self::default_config();
        let Some(path) = path else {
            return config;
        };
        match read_overlay(path) {
            Ok(Some(overlay)) => config.apply_overlay(overlay),
            Ok(None) => {}
            Err(e) => {
                let _ = writeln!(warn, "policy-trie: {}: {e}", path.display());
            }
        }
        config
    }

    /// Apply an overlay on top of this config (merge semantics).
    fn apply_overlay(&mut self, overlay: ConfigOverlay) {
        // Settings: scalar overrides
        if let Some(v) = overlay.settings.log_level {
            self.settings.log_level = v;
        }
        if let Some(v) = overlay.settings.match_log {
            self.settings.match_log = v;
        }

        let w = overlay.words;
        merge_words(
            &mut self.words.enabled,
            w.enabled,
            &w.remove_enabled,
            w.replace,
        );
        merge_words(
            &mut self.words.disabled,
            w.disabled,
            &w.remove_disabled,
            w.replace,
        );
    }

    /// Batch insertion input: enabled words first, then disabled ones.
    pub fn word_set(&self) -> WordSet {
        let enabled = self.words.enabled.iter().map(|w| (w.as_str(), true));
        let disabled = self.words.disabled.iter().map(|w| (w.as_str(), false));
        WordSet::from_pairs(enabled.chain(disabled))
    }

    /// Parsed `settings.log_level`.
    pub fn try_log_level(&self) -> Result<log::LevelFilter> {
        self.settings
            .log_level
            .parse()
            .map_err(|_| TrieError::Config(format!("unknown log level {:?}", self.settings.log_level)))
    }

    /// Parsed `settings.log_level`, falling back to `Warn` for unknown names.
    /// The fallback is reported on stderr since it happens before any logger
    /// is installed.
    pub fn log_level(&self) -> log::LevelFilter {
        self.log_level_reporting(&mut std::io::stderr())
    }

    fn log_level_reporting(&self, warn: &mut dyn Write) -> log::LevelFilter {
        self.try_log_level().unwrap_or_else(|e| {
            let _ = writeln!(warn, "policy-trie: {e}, using warn");
            log::LevelFilter::Warn
        })
    }

    /// Tilde-expanded match log path, or `None` when disabled.
    pub fn match_log_path(&self) -> Option<std::path::PathBuf> {
        if self.settings.match_log.is_empty() {
            return None;
        }
        let expanded = shellexpand::tilde(&self.settings.match_log);
        Some(std::path::PathBuf::from(expanded.as_ref()))
    }

    /// Apply an overlay from a TOML string. Used for testing.
    #[cfg(test)]
    fn apply_overlay_str(&mut self, toml_str: &str) {
        let overlay: ConfigOverlay = toml::from_str(toml_str).unwrap();
        self.apply_overlay(overlay);
    }
}
