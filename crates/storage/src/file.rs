use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use snafu::{ResultExt, ensure};

use super::KeyValueStore;
use super::error::{
    CreateStoreDirectorySnafu, InvalidKeySnafu, ReadStoreSnafu, RemoveStoreSnafu,
    RenameTempFileSnafu, StorageResult, WriteStoreSnafu,
};

/// Directory-backed store holding one `<key>.json` file per key.
///
/// Keys are used verbatim as file stems, so only `[A-Za-z0-9._-]` is
/// accepted; anything else is rejected rather than rewritten.
#[derive(Debug, Clone)]
pub struct FileStore {
    root: PathBuf,
}

impl FileStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// File a key maps to.
    pub fn path_for(&self, key: &str) -> StorageResult<PathBuf> {
        let valid = !key.is_empty()
            && !key.chars().all(|character| character == '.')
            && key.chars().all(|character| {
                character.is_ascii_alphanumeric() || matches!(character, '.' | '_' | '-')
            });
        ensure!(
            valid,
            InvalidKeySnafu {
                stage: "resolve-store-path",
                key,
            }
        );

        Ok(self.root.join(format!("{key}.json")))
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> StorageResult<Option<String>> {
        let path = self.path_for(key)?;
        match std::fs::read_to_string(&path) {
            Ok(contents) => Ok(Some(contents)),
            Err(error) if error.kind() == ErrorKind::NotFound => Ok(None),
            Err(error) => Err(error).context(ReadStoreSnafu {
                stage: "read-store-file",
                path: display_path(&path),
            }),
        }
    }

    fn set(&mut self, key: &str, value: &str) -> StorageResult<()> {
        let path = self.path_for(key)?;
        std::fs::create_dir_all(&self.root).context(CreateStoreDirectorySnafu {
            stage: "create-store-directory",
            path: display_path(&self.root),
        })?;

        let temp_path = path.with_extension("json.tmp");
        std::fs::write(&temp_path, value).context(WriteStoreSnafu {
            stage: "write-temporary-store-file",
            path: display_path(&temp_path),
        })?;

        std::fs::rename(&temp_path, &path)
            .inspect_err(|_| {
                if let Err(error) = std::fs::remove_file(&temp_path) {
                    tracing::debug!("failed to remove {}: {error}", temp_path.display());
                }
            })
            .context(RenameTempFileSnafu {
                stage: "rename-temporary-store-file",
                from: display_path(&temp_path),
                to: display_path(&path),
            })
    }

    fn remove(&mut self, key: &str) -> StorageResult<()> {
        let path = self.path_for(key)?;
        match std::fs::remove_file(&path) {
            Ok(()) => Ok(()),
            Err(error) if error.kind() == ErrorKind::NotFound => Ok(()),
            Err(error) => Err(error).context(RemoveStoreSnafu {
                stage: "remove-store-file",
                path: display_path(&path),
            }),
        }
    }
}

fn display_path(path: &Path) -> String {
    path.display().to_string()
}
