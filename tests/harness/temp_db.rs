use std::path::PathBuf;

use marketlink::adapter::outbound::sqlite::database::connection::{open, DbPool};
use tempfile::TempDir;

/// Temporary file-backed SQLite database for integration tests.
pub struct TempDb {
    _dir: TempDir,
    path: PathBuf,
    pool: DbPool,
}

impl TempDb {
    pub fn create(name: &str) -> Self {
        let dir = tempfile::tempdir().expect("create temp dir");
        let path = dir.path().join(format!("{name}.db"));
        let pool = open(&path.display().to_string()).expect("open sqlite database");
        Self {
            _dir: dir,
            path,
            pool,
        }
    }

    pub fn pool(&self) -> &DbPool {
        &self.pool
    }

    pub fn path(&self) -> &PathBuf {
        &self.path
    }
}
