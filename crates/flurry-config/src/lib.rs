//! Configuration file handling for flurry.
//!
//! Settings live in `config.toml` under the platform config directory
//! (`~/.config/flurry/config.toml` on Linux). Every section is optional; a
//! missing file means all defaults.

use std::{
    fmt, fs, io,
    path::{Path, PathBuf},
};

use directories::ProjectDirs;
use flurry_core::{
    AnimationSpeed, BlobTuning, Palette, SceneKind, SledTuning, SpiralTuning, TreeTuning, Tuning,
};
use serde::{Deserialize, Serialize};

/// Frame rate used when none is configured.
pub const DEFAULT_FPS: u32 = 30;

/// Errors raised while loading or writing configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to parse config file {path}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
    #[error("failed to serialize config")]
    Serialize(#[from] toml::ser::Error),
}

/// Where a loaded configuration came from.
///
/// Loading runs before logging is set up, so callers log this afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigSource {
    /// Read from this file.
    File(PathBuf),
    /// No file at the default location; defaults used.
    Missing(PathBuf),
    /// No platform config directory; defaults used.
    NoConfigDir,
}

impl fmt::Display for ConfigSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::File(path) => write!(f, "Loaded config from {}", path.display()),
            Self::Missing(path) => write!(f, "No config at {}, using defaults", path.display()),
            Self::NoConfigDir => write!(f, "No config directory available, using defaults"),
        }
    }
}

/// Logging options.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LogConfig {
    /// Filter used when `RUST_LOG` is not set, e.g. `info` or `flurry=debug`.
    pub level: String,
    /// Log file; defaults to `flurry.log` in the cache directory.
    pub file: Option<PathBuf>,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            file: None,
        }
    }
}

/// Application configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub scene: SceneKind,
    pub speed: AnimationSpeed,
    pub palette: Palette,
    /// Fixed random seed; a clock-derived seed is used when absent.
    pub seed: Option<u64>,
    pub fps: u32,
    pub log: LogConfig,
    pub blobs: BlobTuning,
    pub tree: TreeTuning,
    pub spiral: SpiralTuning,
    pub sled: SledTuning,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            scene: SceneKind::default(),
            speed: AnimationSpeed::default(),
            palette: Palette::default(),
            seed: None,
            fps: DEFAULT_FPS,
            log: LogConfig::default(),
            blobs: BlobTuning::default(),
            tree: TreeTuning::default(),
            spiral: SpiralTuning::default(),
            sled: SledTuning::default(),
        }
    }
}

impl Config {
    /// Load configuration and report where it came from.
    ///
    /// With an explicit `path` the file must exist. Without one, the default
    /// location is tried and a missing file yields [`Config::default`].
    pub fn load(path: Option<&Path>) -> Result<(Self, ConfigSource), ConfigError> {
        match path {
            Some(path) => Self::load_file(path),
            None => Self::load_default(default_config_path()),
        }
    }

    fn load_file(path: &Path) -> Result<(Self, ConfigSource), ConfigError> {
        let config = Self::load_from(path)?.validated();
        Ok((config, ConfigSource::File(path.to_path_buf())))
    }

    fn load_default(path: Option<PathBuf>) -> Result<(Self, ConfigSource), ConfigError> {
        match path {
            Some(path) if path.exists() => Self::load_file(&path),
            Some(path) => Ok((Self::default(), ConfigSource::Missing(path))),
            None => Ok((Self::default(), ConfigSource::NoConfigDir)),
        }
    }

    /// Read and parse one file without falling back to defaults.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let text = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::parse(&text).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(config)
    }

    /// Parse TOML text.
    pub fn parse(text: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(text)
    }

    /// Render as pretty TOML.
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Clamp every numeric field into a usable range.
    pub fn validated(mut self) -> Self {
        self.fps = self.fps.clamp(1, 120);
        let tuning = self.tuning().clamped();
        self.blobs = tuning.blobs;
        self.tree = tuning.tree;
        self.spiral = tuning.spiral;
        self.sled = tuning.sled;
        self
    }

    /// Scene parameters gathered into one value.
    pub fn tuning(&self) -> Tuning {
        Tuning {
            blobs: self.blobs.clone(),
            tree: self.tree.clone(),
            spiral: self.spiral.clone(),
            sled: self.sled.clone(),
        }
    }
}

fn project_dirs() -> Option<ProjectDirs> {
    ProjectDirs::from("", "", "flurry")
}

/// Default location of `config.toml`.
pub fn default_config_path() -> Option<PathBuf> {
    project_dirs().map(|dirs| dirs.config_dir().join("config.toml"))
}

/// Default location of the log file.
pub fn default_log_path() -> Option<PathBuf> {
    project_dirs().map(|dirs| dirs.cache_dir().join("flurry.log"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_round_trip() {
        let config = Config::default();
        let text = config.to_toml().unwrap();
        assert_eq!(Config::parse(&text).unwrap(), config);
    }

    #[test]
    fn test_partial_file_fills_defaults() {
        let config = Config::parse(
            r#"
            scene = "tree"
            palette = "ocean"

            [sled]
            max_charge = 5.0
            "#,
        )
        .unwrap();
        assert_eq!(config.scene, SceneKind::Tree);
        assert_eq!(config.palette, Palette::Ocean);
        assert_eq!(config.speed, AnimationSpeed::Medium);
        assert_eq!(config.fps, DEFAULT_FPS);
        assert_eq!(config.sled.max_charge, 5.0);
        assert_eq!(config.sled.gravity, SledTuning::default().gravity);
        assert_eq!(config.tree, TreeTuning::default());
    }

    #[test]
    fn test_unknown_scene_is_parse_error() {
        assert!(Config::parse(r#"scene = "volcano""#).is_err());
    }

    #[test]
    fn test_validated_clamps() {
        let config = Config {
            fps: 0,
            tree: TreeTuning {
                max_depth: 100,
                ..Default::default()
            },
            ..Default::default()
        }
        .validated();
        assert_eq!(config.fps, 1);
        assert_eq!(config.tree.max_depth, flurry_core::MAX_FRACTAL_DEPTH);
    }

    #[test]
    fn test_load_reports_file_source() {
        let path = std::env::temp_dir().join(format!("flurry-config-{}.toml", std::process::id()));
        fs::write(&path, "scene = \"spiral\"\nfps = 500\n").unwrap();
        let loaded = Config::load(Some(path.as_path()));
        fs::remove_file(&path).unwrap();

        let (config, source) = loaded.unwrap();
        assert_eq!(config.scene, SceneKind::Spiral);
        assert_eq!(config.fps, 120);
        assert_eq!(source, ConfigSource::File(path.clone()));
        assert_eq!(source.to_string(), format!("Loaded config from {}", path.display()));
    }

    #[test]
    fn test_missing_default_falls_back() {
        let path = PathBuf::from("/definitely/not/here/config.toml");
        let (config, source) = Config::load_default(Some(path.clone())).unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(source, ConfigSource::Missing(path));

        let (config, source) = Config::load_default(None).unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(source, ConfigSource::NoConfigDir);
        assert!(source.to_string().contains("using defaults"));
    }

    #[test]
    fn test_explicit_missing_path_is_read_error() {
        let err = Config::load(Some(Path::new("/definitely/not/here/flurry.toml"))).unwrap_err();
        assert!(matches!(err, ConfigError::Read { .. }));
    }
}
