//! `cli.toml`: named hashing profiles plus an optional default.
//!
//! Profiles are validated once on load and again on every update; the file
//! is only ever written from validated values.

use super::{ElementTypeArg, OutputFormat, RadixArg};
use clap::ValueEnum;
use jenkinshash::cli::input::parse_delimiter;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Settings applied to `rows`, `text` and `bytes` unless a flag overrides
/// them. `None` falls through to the built-in default.
#[derive(Debug, Clone)]
pub struct Profile {
    pub name: String,
    pub element_type: Option<ElementTypeArg>,
    pub delimiter: Option<String>,
    pub has_headers: Option<bool>,
    pub radix: Option<RadixArg>,
    pub format: Option<OutputFormat>,
}

impl Profile {
    fn empty(name: &str) -> Self {
        Self {
            name: name.to_string(),
            element_type: None,
            delimiter: None,
            has_headers: None,
            radix: None,
            format: None,
        }
    }

    fn from_stored(name: &str, stored: &StoredProfile) -> Result<Self, ConfigError> {
        if let Some(delimiter) = stored.delimiter.as_deref() {
            check_delimiter(name, delimiter)?;
        }
        Ok(Self {
            name: name.to_string(),
            element_type: parse_value(name, "element_type", stored.element_type.as_deref())?,
            delimiter: stored.delimiter.clone(),
            has_headers: stored.has_headers,
            radix: parse_value(name, "radix", stored.radix.as_deref())?,
            format: parse_value(name, "format", stored.format.as_deref())?,
        })
    }

    fn to_stored(&self) -> StoredProfile {
        StoredProfile {
            element_type: self.element_type.map(value_name),
            delimiter: self.delimiter.clone(),
            has_headers: self.has_headers,
            radix: self.radix.map(value_name),
            format: self.format.map(value_name),
        }
    }
}

/// Fields given to `config set-profile`; unset fields keep their value.
#[derive(Debug, Default)]
pub struct ProfileUpdate {
    pub element_type: Option<ElementTypeArg>,
    pub delimiter: Option<String>,
    pub has_headers: Option<bool>,
    pub radix: Option<RadixArg>,
    pub format: Option<OutputFormat>,
}

impl ProfileUpdate {
    fn apply(self, profile: &mut Profile) -> Result<(), ConfigError> {
        if let Some(delimiter) = self.delimiter {
            check_delimiter(&profile.name, &delimiter)?;
            profile.delimiter = Some(delimiter);
        }
        profile.element_type = self.element_type.or(profile.element_type);
        profile.has_headers = self.has_headers.or(profile.has_headers);
        profile.radix = self.radix.or(profile.radix);
        profile.format = self.format.or(profile.format);
        Ok(())
    }
}

#[derive(Debug, Default)]
pub struct CliConfig {
    path: Option<PathBuf>,
    default_profile: Option<String>,
    profiles: BTreeMap<String, Profile>,
}

impl CliConfig {
    /// Reads `explicit`, else the per-user default path. A missing file is
    /// an empty config.
    pub fn load(explicit: Option<PathBuf>) -> Result<Self, ConfigError> {
        let path = explicit.or_else(default_config_path);
        let stored = match path.as_deref() {
            Some(file) if file.exists() => read_stored(file)?,
            _ => StoredConfig::default(),
        };

        let profiles = stored
            .profiles
            .iter()
            .map(|(name, raw)| Ok((name.clone(), Profile::from_stored(name, raw)?)))
            .collect::<Result<BTreeMap<_, _>, ConfigError>>()?;
        if let Some(name) = &stored.default_profile {
            if !profiles.contains_key(name) {
                return Err(ConfigError::ProfileNotFound { name: name.clone() });
            }
        }

        Ok(Self {
            path,
            default_profile: stored.default_profile,
            profiles,
        })
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    pub fn default_profile_name(&self) -> Option<&str> {
        self.default_profile.as_deref()
    }

    /// Profiles in name order.
    pub fn profiles(&self) -> impl Iterator<Item = &Profile> {
        self.profiles.values()
    }

    /// The profile named on the command line, else the configured default.
    pub fn select(&self, explicit: Option<&str>) -> Result<Option<&Profile>, ConfigError> {
        match explicit.or(self.default_profile.as_deref()) {
            Some(name) => self.lookup(name).map(Some),
            None => Ok(None),
        }
    }

    pub fn set_default_profile(&mut self, name: Option<&str>) -> Result<(), ConfigError> {
        if let Some(name) = name {
            self.lookup(name)?;
        }
        self.default_profile = name.map(str::to_string);
        Ok(())
    }

    pub fn upsert_profile(&mut self, name: &str, update: ProfileUpdate) -> Result<(), ConfigError> {
        let mut profile = self
            .profiles
            .get(name)
            .cloned()
            .unwrap_or_else(|| Profile::empty(name));
        update.apply(&mut profile)?;
        self.profiles.insert(name.to_string(), profile);
        Ok(())
    }

    pub fn delete_profile(&mut self, name: &str) -> Result<(), ConfigError> {
        self.profiles
            .remove(name)
            .ok_or_else(|| ConfigError::ProfileNotFound {
                name: name.to_string(),
            })?;
        if self.default_profile.as_deref() == Some(name) {
            self.default_profile = None;
        }
        Ok(())
    }

    /// Writes the config back, creating parent directories. Returns the path
    /// written.
    pub fn persist(&self) -> Result<PathBuf, ConfigError> {
        let target = self
            .path
            .clone()
            .or_else(default_config_path)
            .ok_or(ConfigError::NoConfigPath)?;
        if let Some(dir) = target.parent() {
            fs::create_dir_all(dir).map_err(|source| ConfigError::CreateDir {
                path: dir.to_path_buf(),
                source,
            })?;
        }
        let stored = StoredConfig {
            default_profile: self.default_profile.clone(),
            profiles: self
                .profiles
                .iter()
                .map(|(name, profile)| (name.clone(), profile.to_stored()))
                .collect(),
        };
        let text =
            toml::to_string_pretty(&stored).map_err(|source| ConfigError::Serialize { source })?;
        fs::write(&target, text).map_err(|source| ConfigError::Write {
            path: target.clone(),
            source,
        })?;
        Ok(target)
    }

    fn lookup(&self, name: &str) -> Result<&Profile, ConfigError> {
        self.profiles
            .get(name)
            .ok_or_else(|| ConfigError::ProfileNotFound {
                name: name.to_string(),
            })
    }
}

fn read_stored(path: &Path) -> Result<StoredConfig, ConfigError> {
    let text = fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    toml::from_str(&text).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

fn check_delimiter(profile: &str, delimiter: &str) -> Result<(), ConfigError> {
    parse_delimiter(delimiter)
        .map(|_| ())
        .map_err(|_| ConfigError::InvalidValue {
            profile: profile.to_string(),
            key: "delimiter",
            value: delimiter.to_string(),
        })
}

/// Stored values use clap's value names so the file accepts exactly what
/// the flags accept.
fn value_name<T: ValueEnum>(value: T) -> String {
    value
        .to_possible_value()
        .map(|pv| pv.get_name().to_string())
        .unwrap_or_default()
}

fn parse_value<T: ValueEnum>(
    profile: &str,
    key: &'static str,
    raw: Option<&str>,
) -> Result<Option<T>, ConfigError> {
    raw.map(|value| {
        T::from_str(value, true).map_err(|_| ConfigError::InvalidValue {
            profile: profile.to_string(),
            key,
            value: value.to_string(),
        })
    })
    .transpose()
}

#[derive(Debug, Default, Deserialize, Serialize)]
struct StoredConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    default_profile: Option<String>,
    #[serde(default)]
    profiles: BTreeMap<String, StoredProfile>,
}

#[derive(Debug, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
struct StoredProfile {
    #[serde(skip_serializing_if = "Option::is_none")]
    element_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    delimiter: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    has_headers: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    radix: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    format: Option<String>,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read config {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("invalid config {path}: {source}")]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },
    #[error("cannot encode config: {source}")]
    Serialize { source: toml::ser::Error },
    #[error("cannot write config {path}: {source}")]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("cannot create config directory {path}: {source}")]
    CreateDir {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("profile '{name}' not found")]
    ProfileNotFound { name: String },
    #[error("profile '{profile}' {key} value '{value}' is invalid")]
    InvalidValue {
        profile: String,
        key: &'static str,
        value: String,
    },
    #[error("no config directory found; pass --config or set JENKINSHASH_CONFIG")]
    NoConfigPath,
}

pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|base| base.join("jenkinshash").join("cli.toml"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn config_in(dir: &TempDir, contents: Option<&str>) -> CliConfig {
        let path = dir.path().join("nested").join("cli.toml");
        if let Some(contents) = contents {
            fs::create_dir_all(path.parent().unwrap()).unwrap();
            fs::write(&path, contents).unwrap();
        }
        CliConfig::load(Some(path)).unwrap()
    }

    #[test]
    fn updates_merge_and_survive_a_reload() {
        let dir = TempDir::new().unwrap();
        let mut config = config_in(&dir, None);
        config
            .upsert_profile(
                "audio",
                ProfileUpdate {
                    element_type: Some(ElementTypeArg::Int16),
                    delimiter: Some("tab".into()),
                    ..ProfileUpdate::default()
                },
            )
            .unwrap();
        config
            .upsert_profile(
                "audio",
                ProfileUpdate {
                    radix: Some(RadixArg::Hex),
                    ..ProfileUpdate::default()
                },
            )
            .unwrap();
        config.set_default_profile(Some("audio")).unwrap();
        let path = config.persist().unwrap();

        let saved = fs::read_to_string(&path).unwrap();
        assert!(saved.contains("element_type = \"int16\""), "{saved}");
        assert!(saved.contains("radix = \"hex\""), "{saved}");

        let reloaded = CliConfig::load(Some(path)).unwrap();
        let profile = reloaded.select(None).unwrap().unwrap();
        assert_eq!(profile.name, "audio");
        assert_eq!(profile.element_type, Some(ElementTypeArg::Int16));
        assert_eq!(profile.delimiter.as_deref(), Some("tab"));
        assert_eq!(profile.radix, Some(RadixArg::Hex));
    }

    #[test]
    fn bad_delimiter_update_leaves_profile_untouched() {
        let dir = TempDir::new().unwrap();
        let mut config = config_in(&dir, Some("[profiles.csv]\ndelimiter = \";\"\n"));
        let err = config
            .upsert_profile(
                "csv",
                ProfileUpdate {
                    delimiter: Some("::".into()),
                    ..ProfileUpdate::default()
                },
            )
            .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { key: "delimiter", .. }));
        assert_eq!(config.select(Some("csv")).unwrap().unwrap().delimiter.as_deref(), Some(";"));
    }

    #[test]
    fn default_must_name_an_existing_profile() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("cli.toml");
        fs::write(&path, "default_profile = \"ghost\"\n").unwrap();
        assert!(matches!(
            CliConfig::load(Some(path)),
            Err(ConfigError::ProfileNotFound { name }) if name == "ghost"
        ));
    }

    #[test]
    fn deleting_the_default_clears_it() {
        let dir = TempDir::new().unwrap();
        let mut config = config_in(
            &dir,
            Some("default_profile = \"a\"\n[profiles.a]\nradix = \"dec\"\n"),
        );
        config.delete_profile("a").unwrap();
        assert_eq!(config.default_profile_name(), None);
        assert!(config.select(None).unwrap().is_none());
        assert!(config.delete_profile("a").is_err());
    }
}
