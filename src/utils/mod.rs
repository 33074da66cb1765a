use std::path::{Path, PathBuf};
use std::sync::Once;

use crate::errors::Result;

static TRACING_INIT: Once = Once::new();

/// Initializes the global tracing subscriber with sensible defaults.
pub fn init_tracing() {
    TRACING_INIT.call_once(|| {
        use tracing_subscriber::{fmt, EnvFilter};

        let filter =
            EnvFilter::from_default_env().add_directive("finance_core=info".parse().unwrap());

        fmt().with_env_filter(filter).init();
    });
}

pub fn ensure_dir(path: &Path) -> Result<()> {
    if !path.exists() {
        std::fs::create_dir_all(path)?;
    }
    Ok(())
}

/// Resolves application directories, honoring the `FINANCE_CORE_HOME`
/// override so tests and scripts can redirect all file access.
pub struct PathResolver;

impl PathResolver {
    pub fn base_dir() -> PathBuf {
        if let Ok(custom) = std::env::var("FINANCE_CORE_HOME") {
            if !custom.trim().is_empty() {
                return PathBuf::from(custom);
            }
        }
        dirs::data_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("finance_core")
    }

    pub fn resolve_base(root: Option<PathBuf>) -> PathBuf {
        root.unwrap_or_else(Self::base_dir)
    }

    pub fn data_file_in(base: &Path) -> PathBuf {
        base.join("workspace.json")
    }

    pub fn backup_dir_in(base: &Path) -> PathBuf {
        base.join("backups")
    }
}
