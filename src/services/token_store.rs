use std::fs;
use std::io::Write;
use std::path::PathBuf;
use std::sync::Mutex;

use anivault_auth::{StoreError, TokenStore};

/// File-backed credential store.
///
/// Keeps exactly one value per key in `<dir>/<key>.token`. Writes go to a
/// temp file first and are renamed into place, so readers never observe a
/// torn value; a mutex serializes callers so last-writer-wins holds across
/// threads. Survives process restart.
pub struct FileTokenStore {
    dir: PathBuf,
    lock: Mutex<()>,
}

impl FileTokenStore {
    pub fn new(dir: PathBuf) -> Self {
        Self {
            dir,
            lock: Mutex::new(()),
        }
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{}.token", key))
    }

    fn write_restricted(path: &PathBuf, token: &str) -> std::io::Result<()> {
        // Tokens are secrets: restrict permissions where the platform allows
        #[cfg(unix)]
        {
            use std::os::unix::fs::OpenOptionsExt;
            let mut file = fs::OpenOptions::new()
                .write(true)
                .create(true)
                .truncate(true)
                .mode(0o600)
                .open(path)?;
            file.write_all(token.as_bytes())?;
            file.flush()
        }

        #[cfg(not(unix))]
        {
            fs::write(path, token)
        }
    }
}

impl TokenStore for FileTokenStore {
    fn save(&self, key: &str, token: &str) -> Result<(), StoreError> {
        let _guard = self.lock.lock().unwrap_or_else(|p| p.into_inner());

        fs::create_dir_all(&self.dir)
            .map_err(|e| StoreError(format!("could not create {}: {}", self.dir.display(), e)))?;

        let path = self.path_for(key);
        let tmp = self.dir.join(format!("{}.token.tmp", key));
        Self::write_restricted(&tmp, token)
            .map_err(|e| StoreError(format!("could not write {}: {}", tmp.display(), e)))?;
        fs::rename(&tmp, &path)
            .map_err(|e| StoreError(format!("could not replace {}: {}", path.display(), e)))?;
        Ok(())
    }

    fn get(&self, key: &str) -> Option<String> {
        let _guard = self.lock.lock().unwrap_or_else(|p| p.into_inner());

        fs::read_to_string(self.path_for(key))
            .ok()
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
    }

    fn delete(&self, key: &str) -> Result<(), StoreError> {
        let _guard = self.lock.lock().unwrap_or_else(|p| p.into_inner());

        match fs::remove_file(self.path_for(key)) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(StoreError(format!("could not delete credential: {}", e))),
        }
    }
}
