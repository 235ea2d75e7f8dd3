use std::fs;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use common::error::{AppError, Res};

/// Durable storage for the bearer token: a single key, absent when logged out.
pub trait TokenStore: Send + Sync {
    fn load(&self) -> Res<Option<String>>;
    fn save(&self, token: &str) -> Res<()>;
    fn clear(&self) -> Res<()>;
}

/// Token kept in one file, readable only by the owner on unix.
#[derive(Debug, Clone)]
pub struct FileTokenStore {
    path: PathBuf,
}

impl FileTokenStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        FileTokenStore { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl TokenStore for FileTokenStore {
    fn load(&self) -> Res<Option<String>> {
        match fs::read_to_string(&self.path) {
            Ok(contents) => {
                let token = contents.trim();
                Ok((!token.is_empty()).then(|| token.to_string()))
            }
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(None),
            Err(err) => Err(AppError::from(err)),
        }
    }

    fn save(&self, token: &str) -> Res<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        let mut options = fs::OpenOptions::new();
        options.write(true).create(true).truncate(true);
        #[cfg(unix)]
        {
            use std::os::unix::fs::{OpenOptionsExt, PermissionsExt};
            options.mode(0o600);
            // mode only applies on creation; tighten a file left by an older run
            if self.path.exists() {
                fs::set_permissions(&self.path, fs::Permissions::from_mode(0o600))?;
            }
        }
        let mut file = options.open(&self.path)?;
        file.write_all(token.as_bytes())?;
        Ok(())
    }

    fn clear(&self) -> Res<()> {
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(()),
            Err(err) => Err(AppError::from(err)),
        }
    }
}

/// In-process store. Clones share the same slot, so a clone handed to a
/// second [`crate::Session`] behaves like storage surviving a reload.
#[derive(Debug, Clone, Default)]
pub struct MemoryTokenStore {
    token: Arc<Mutex<Option<String>>>,
}

impl MemoryTokenStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_token(token: &str) -> Self {
        MemoryTokenStore {
            token: Arc::new(Mutex::new(Some(token.to_string()))),
        }
    }

    fn slot(&self) -> Res<std::sync::MutexGuard<'_, Option<String>>> {
        self.token
            .lock()
            .map_err(|_| AppError::Internal("token store lock poisoned".to_string()))
    }
}

impl TokenStore for MemoryTokenStore {
    fn load(&self) -> Res<Option<String>> {
        Ok(self.slot()?.clone())
    }

    fn save(&self, token: &str) -> Res<()> {
        *self.slot()? = Some(token.to_string());
        Ok(())
    }

    fn clear(&self) -> Res<()> {
        *self.slot()? = None;
        Ok(())
    }
}
