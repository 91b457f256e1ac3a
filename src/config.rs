//! Startup configuration.
//!
//! [`AppConfig`] is read from `hello-triangle.json` in the working directory, falling back to
//! `hello-triangle/config.json` in the user's config directory and finally to the built-in
//! defaults. Every field is optional in the file. Relative shader paths are resolved against
//! the directory of the file that names them.

use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::render::Shape;

const LOCAL_CONFIG: &str = "hello-triangle.json";
const APP_DIR: &str = "hello-triangle";
const USER_CONFIG: &str = "config.json";

/// Errors raised while reading a configuration file.
#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    #[error("failed to read {}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid configuration in {}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Paths of an externally supplied shader pair.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ShaderPaths {
    pub vertex: PathBuf,
    pub fragment: PathBuf,
}

/// Window, context and scene settings read once at startup.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AppConfig {
    pub title: String,
    pub width: u32,
    pub height: u32,
    pub fullscreen: bool,
    /// Requested OpenGL core profile version as `[major, minor]`.
    pub gl_version: [u8; 2],
    pub debug_context: bool,
    pub vsync: bool,
    pub wireframe: bool,
    pub shape: Shape,
    pub clear_color: [f32; 4],
    /// Fill color of the quad, passed to the shader as `uColor`.
    pub quad_color: [f32; 4],
    /// When unset the embedded shaders for `shape` are used.
    pub shaders: Option<ShaderPaths>,
    pub log_level: log::LevelFilter,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            title: "Hello, World!".to_string(),
            width: 800,
            height: 600,
            fullscreen: false,
            gl_version: [3, 3],
            debug_context: cfg!(debug_assertions),
            vsync: true,
            wireframe: false,
            shape: Shape::Triangle,
            clear_color: [0.9, 0.9, 0.9, 1.0],
            quad_color: [1.0, 0.5, 0.2, 1.0],
            shaders: None,
            log_level: log::LevelFilter::Info,
        }
    }
}

impl AppConfig {
    /// Loads the first configuration file found, or the defaults if there is none.
    pub fn load() -> Result<Self, ConfigError> {
        let mut candidates = vec![PathBuf::from(LOCAL_CONFIG)];
        if let Some(dir) = dirs::config_dir() {
            candidates.push(dir.join(APP_DIR).join(USER_CONFIG));
        }

        for path in &candidates {
            if let Some(config) = Self::from_path(path)? {
                return Ok(config);
            }
        }
        Ok(Self::default())
    }

    /// Reads a configuration file. Returns `Ok(None)` if the file does not exist.
    pub fn from_path(path: &Path) -> Result<Option<Self>, ConfigError> {
        let text = match std::fs::read_to_string(path) {
            Ok(text) => text,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(source) => {
                return Err(ConfigError::Io {
                    path: path.to_path_buf(),
                    source,
                });
            }
        };

        let mut config: Self = serde_json::from_str(&text).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;

        if let (Some(shaders), Some(base)) = (&mut config.shaders, path.parent()) {
            shaders.vertex = base.join(&shaders.vertex);
            shaders.fragment = base.join(&shaders.fragment);
        }
        Ok(Some(config))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_path(name: &str) -> PathBuf {
        std::env::temp_dir().join(format!("hello-triangle-{}-{}", std::process::id(), name))
    }

    #[test]
    fn test_defaults() {
        let config = AppConfig::default();
        assert_eq!(config.title, "Hello, World!");
        assert_eq!((config.width, config.height), (800, 600));
        assert_eq!(config.gl_version, [3, 3]);
        assert_eq!(config.clear_color, [0.9, 0.9, 0.9, 1.0]);
        assert!(config.shaders.is_none());
        assert_eq!(config.shape, Shape::Triangle);
        assert_eq!(config.log_level, log::LevelFilter::Info);
    }

    #[test]
    fn test_partial_config() {
        let config: AppConfig = serde_json::from_str(
            r#"{
                "width": 1024,
                "wireframe": true,
                "shape": "quad",
                "log_level": "debug",
                "shaders": { "vertex": "a.vert", "fragment": "a.frag" }
            }"#,
        )
        .unwrap();

        assert_eq!(config.width, 1024);
        assert_eq!(config.height, 600);
        assert!(config.wireframe);
        assert_eq!(config.shape, Shape::Quad);
        assert_eq!(config.quad_color, [1.0, 0.5, 0.2, 1.0]);
        assert_eq!(config.log_level, log::LevelFilter::Debug);
        assert_eq!(
            config.shaders,
            Some(ShaderPaths {
                vertex: PathBuf::from("a.vert"),
                fragment: PathBuf::from("a.frag"),
            })
        );
    }

    #[test]
    fn test_missing_file_is_none() {
        let path = temp_path("no-such-config.json");
        assert!(AppConfig::from_path(&path).unwrap().is_none());
    }

    #[test]
    fn test_malformed_file() {
        let path = temp_path("bad-config.json");
        std::fs::write(&path, r#"{ "width": "wide" }"#).unwrap();

        let err = AppConfig::from_path(&path).unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
        assert!(err.to_string().contains("bad-config.json"));

        std::fs::remove_file(path).unwrap();
    }

    #[test]
    fn test_unknown_field_rejected() {
        assert!(serde_json::from_str::<AppConfig>(r#"{ "widht": 10 }"#).is_err());
    }

    #[test]
    fn test_from_path() {
        let path = temp_path("good-config.json");
        std::fs::write(&path, r#"{ "title": "Triangle", "vsync": false }"#).unwrap();

        let config = AppConfig::from_path(&path).unwrap().unwrap();
        assert_eq!(config.title, "Triangle");
        assert!(!config.vsync);
        assert_eq!(config.width, 800);

        std::fs::remove_file(path).unwrap();
    }

    #[test]
    fn test_shader_paths_relative_to_config_file() {
        let dir = temp_path("config-dir");
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("config.json");
        let absolute = std::env::temp_dir().join("absolute.frag");
        let json = serde_json::json!({
            "shaders": { "vertex": "shaders/tri.vert", "fragment": absolute }
        });
        std::fs::write(&path, json.to_string()).unwrap();

        let shaders = AppConfig::from_path(&path).unwrap().unwrap().shaders.unwrap();
        assert_eq!(shaders.vertex, dir.join("shaders/tri.vert"));
        assert_eq!(shaders.fragment, absolute);

        std::fs::remove_dir_all(dir).unwrap();
    }
}
