use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

/// Per-pattern probability gates consumed by the performers.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct PatternProfile {
    pub mouse_movement_frequency: f64,
    pub click_frequency: f64,
}

/// Bounds for micro-break durations, in seconds.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct IdlePeriod {
    pub min_secs: f64,
    pub max_secs: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Config {
    pub screen_width: i32,
    pub screen_height: i32,
    pub max_errors: u32,
    pub kill_switch_file: String,
    /// Which entry of `activity_patterns` gates the performers.
    pub active_pattern: String,
    pub idle_period: IdlePeriod,
    pub activity_patterns: HashMap<String, PatternProfile>,
}

impl Default for Config {
    fn default() -> Self {
        let mut activity_patterns = HashMap::new();
        activity_patterns.insert(
            "coding".to_string(),
            PatternProfile {
                mouse_movement_frequency: 0.9,
                click_frequency: 0.8,
            },
        );
        activity_patterns.insert(
            "browsing".to_string(),
            PatternProfile {
                mouse_movement_frequency: 0.95,
                click_frequency: 0.9,
            },
        );
        activity_patterns.insert(
            "research".to_string(),
            PatternProfile {
                mouse_movement_frequency: 0.92,
                click_frequency: 0.85,
            },
        );
        Self {
            screen_width: 2880,
            screen_height: 1800,
            max_errors: 100,
            kill_switch_file: "STOP_JIGGL.txt".to_string(),
            active_pattern: "coding".to_string(),
            idle_period: IdlePeriod {
                min_secs: 5.0,
                max_secs: 30.0,
            },
            activity_patterns,
        }
    }
}

impl Config {
    /// The profile named by `active_pattern`, or the coding defaults when
    /// the config names a pattern it does not define.
    pub fn pattern_profile(&self) -> PatternProfile {
        self.activity_patterns
            .get(&self.active_pattern)
            .copied()
            .unwrap_or(PatternProfile {
                mouse_movement_frequency: 0.9,
                click_frequency: 0.8,
            })
    }
}

pub trait ConfigStore {
    fn load(&self) -> Config;
    fn save(&self, cfg: &Config) -> std::io::Result<()>;
}

#[derive(Debug, Clone)]
pub struct FileConfigStore {
    path: PathBuf,
}

impl FileConfigStore {
    #[allow(clippy::new_without_default)]
    pub fn new() -> Self {
        let path = if let Some(pd) = ProjectDirs::from("", "", "jiggl") {
            pd.config_dir().join("config.json")
        } else {
            PathBuf::from("jiggl_config.json")
        };
        Self { path }
    }

    pub fn with_path<P: AsRef<Path>>(p: P) -> Self {
        Self {
            path: p.as_ref().to_path_buf(),
        }
    }
}

impl Default for FileConfigStore {
    fn default() -> Self {
        Self::new()
    }
}

impl ConfigStore for FileConfigStore {
    fn load(&self) -> Config {
        if let Ok(bytes) = fs::read(&self.path) {
            if let Ok(cfg) = serde_json::from_slice::<Config>(&bytes) {
                return cfg;
            }
        }
        Config::default()
    }

    fn save(&self, cfg: &Config) -> std::io::Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let data = serde_json::to_vec_pretty(cfg).unwrap_or_default();
        fs::write(&self.path, data)
    }
}
