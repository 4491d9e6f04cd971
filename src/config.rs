use serde::Deserialize;
use std::path::{Path, PathBuf};

use crate::audio::analysis::{DEFAULT_FFT_SIZE, DEFAULT_HISTORY, DEFAULT_RESOLUTION};

#[derive(Debug, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub analysis: AnalysisConfig,
    #[serde(default)]
    pub output: OutputConfig,
}

#[derive(Debug, Deserialize)]
pub struct AnalysisConfig {
    #[serde(default = "default_resolution")]
    pub resolution: usize,
    #[serde(default = "default_fft_size")]
    pub fft_size: usize,
    #[serde(default = "default_history")]
    pub history: usize,
}

#[derive(Debug, Default, Deserialize)]
pub struct OutputConfig {
    #[serde(default)]
    pub pretty: bool,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            resolution: default_resolution(),
            fft_size: default_fft_size(),
            history: default_history(),
        }
    }
}

fn default_resolution() -> usize { DEFAULT_RESOLUTION }
fn default_fft_size() -> usize { DEFAULT_FFT_SIZE }
fn default_history() -> usize { DEFAULT_HISTORY }

/// `explicit`, else `./wavescope.toml`, else the per-user config file.
pub fn find_config(explicit: Option<&Path>) -> Option<PathBuf> {
    if let Some(path) = explicit {
        return Some(path.to_path_buf());
    }
    let local = PathBuf::from("wavescope.toml");
    if local.exists() {
        return Some(local);
    }
    if let Some(home) = dirs::home_dir() {
        let xdg = home.join(".config").join("wavescope").join("config.toml");
        if xdg.exists() {
            return Some(xdg);
        }
    }
    if let Some(config_dir) = dirs::config_dir() {
        let platform = config_dir.join("wavescope").join("config.toml");
        if platform.exists() {
            return Some(platform);
        }
    }
    None
}

pub fn load_config(path: &Path) -> Option<Config> {
    let content = std::fs::read_to_string(path).ok()?;
    parse_config(&content)
}

pub fn parse_config(content: &str) -> Option<Config> {
    match toml::from_str(content) {
        Ok(cfg) => Some(cfg),
        Err(err) => {
            log::debug!("Config parse error: {}", err);
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_file_uses_defaults() {
        let cfg = parse_config("").unwrap();
        assert_eq!(cfg.analysis.resolution, 1024);
        assert_eq!(cfg.analysis.fft_size, 1024);
        assert_eq!(cfg.analysis.history, 10);
        assert!(!cfg.output.pretty);
    }

    #[test]
    fn partial_sections_fill_in() {
        let cfg = parse_config(
            r#"
            [analysis]
            fft_size = 2048

            [output]
            pretty = true
            "#,
        )
        .unwrap();
        assert_eq!(cfg.analysis.resolution, 1024);
        assert_eq!(cfg.analysis.fft_size, 2048);
        assert!(cfg.output.pretty);
    }

    #[test]
    fn malformed_file_is_rejected() {
        assert!(parse_config("[analysis\nresolution = ").is_none());
        assert!(parse_config("[analysis]\nresolution = \"wide\"").is_none());
    }

    #[test]
    fn explicit_path_wins() {
        let p = Path::new("/tmp/some.toml");
        assert_eq!(find_config(Some(p)), Some(p.to_path_buf()));
    }
}
