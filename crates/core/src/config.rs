use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use directories::{BaseDirs, ProjectDirs};
use once_cell::sync::Lazy;

use crate::seed::SeedConfig;

static TASKS_FILE_NAME: &str = "tasks.json";
static LOG_FILE_NAME: &str = "dolist.log";
static ENV_DATA_DIR: &str = "DOLIST_DATA_DIR";
static ENV_SEED_URL: &str = "DOLIST_SEED_URL";

static PROJECT_DIRS: Lazy<Option<ProjectDirs>> =
    Lazy::new(|| ProjectDirs::from("dev", "dolist", "dolist"));

#[derive(Debug, Clone)]
pub struct AppConfig {
    data_dir: PathBuf,
    tasks_path: PathBuf,
    seed: SeedConfig,
    ephemeral: bool,
}

impl AppConfig {
    /// Construct [`AppConfig`] by resolving the data directory using the provided override,
    /// environment variables, and platform defaults.
    pub fn discover(data_dir_override: Option<PathBuf>) -> Result<Self> {
        let data_dir = resolve_data_dir(data_dir_override)?;
        if !data_dir.exists() {
            fs::create_dir_all(&data_dir).with_context(|| {
                format!("Failed to create data directory at {}", data_dir.display())
            })?;
        }
        let mut config = Self::from_data_dir(data_dir)?;
        if let Ok(endpoint) = env::var(ENV_SEED_URL) {
            config.seed.endpoint = endpoint;
        }
        Ok(config)
    }

    /// Construct [`AppConfig`] directly from a resolved data directory.
    pub fn from_data_dir(data_dir: PathBuf) -> Result<Self> {
        let tasks_path = data_dir.join(TASKS_FILE_NAME);
        Ok(Self {
            data_dir,
            tasks_path,
            seed: SeedConfig::default(),
            ephemeral: false,
        })
    }

    pub fn with_seed(mut self, seed: SeedConfig) -> Self {
        self.seed = seed;
        self
    }

    /// Keep tasks in memory only; `tasks.json` is neither read nor written.
    pub fn with_ephemeral(mut self, ephemeral: bool) -> Self {
        self.ephemeral = ephemeral;
        self
    }

    pub fn is_ephemeral(&self) -> bool {
        self.ephemeral
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    pub fn tasks_path(&self) -> &Path {
        &self.tasks_path
    }

    pub fn log_path(&self) -> PathBuf {
        self.data_dir.join(LOG_FILE_NAME)
    }

    pub fn seed(&self) -> &SeedConfig {
        &self.seed
    }
}

fn resolve_data_dir(data_dir_override: Option<PathBuf>) -> Result<PathBuf> {
    if let Some(dir) = data_dir_override {
        return Ok(dir);
    }

    if let Ok(env_dir) = env::var(ENV_DATA_DIR) {
        return Ok(PathBuf::from(env_dir));
    }

    if cfg!(debug_assertions) {
        let manifest_dir = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
        let dev_dir = manifest_dir.join("..").join("tmp").join("dev-dolist");
        return Ok(dev_dir);
    }

    if let Some(project) = &*PROJECT_DIRS {
        return Ok(project.data_dir().to_path_buf());
    }

    if let Some(base) = BaseDirs::new() {
        return Ok(base.home_dir().join(".dolist"));
    }

    Ok(env::current_dir()?.join(".dolist"))
}
