use std::{
    fs::{self, File},
    io::Write,
    path::{Path, PathBuf},
};

use super::{Result, StorageBackend};

const BLOB_EXTENSION: &str = "json";
const TMP_SUFFIX: &str = "tmp";

/// File-backed key/value store keeping one JSON blob per key.
///
/// Writes are staged to a `.tmp` sibling and renamed into place so a failed
/// write never leaves a torn blob behind.
#[derive(Debug, Clone)]
pub struct JsonStorage {
    root: PathBuf,
}

impl JsonStorage {
    pub fn new(root: Option<PathBuf>) -> Result<Self> {
        let root = root.unwrap_or_else(default_root);
        ensure_dir(&root)?;
        Ok(Self { root })
    }

    pub fn new_default() -> Result<Self> {
        Self::new(None)
    }

    pub fn base_dir(&self) -> &Path {
        &self.root
    }

    pub fn blob_path(&self, key: &str) -> PathBuf {
        self.root
            .join(format!("{}.{}", canonical_name(key), BLOB_EXTENSION))
    }
}

impl StorageBackend for JsonStorage {
    fn get(&self, key: &str) -> Result<Option<String>> {
        let path = self.blob_path(key);
        if !path.exists() {
            return Ok(None);
        }
        Ok(Some(fs::read_to_string(&path)?))
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        let path = self.blob_path(key);
        let tmp = tmp_path(&path);
        write_all(&tmp, value)?;
        fs::rename(&tmp, &path)?;
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<()> {
        let path = self.blob_path(key);
        if path.exists() {
            fs::remove_file(&path)?;
        }
        Ok(())
    }
}

fn default_root() -> PathBuf {
    dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("pixelfin")
}

fn ensure_dir(path: &Path) -> Result<()> {
    fs::create_dir_all(path)?;
    Ok(())
}

/// Maps an arbitrary key onto a stable, filesystem-safe file stem.
fn canonical_name(key: &str) -> String {
    let sanitized: String = key
        .trim()
        .to_lowercase()
        .chars()
        .map(|c| match c {
            'a'..='z' | '0'..='9' => c,
            _ => '_',
        })
        .collect();
    if sanitized.trim_matches('_').is_empty() {
        "ledger".into()
    } else {
        sanitized
    }
}

fn tmp_path(path: &Path) -> PathBuf {
    let mut tmp = path.to_path_buf();
    let ext = match path.extension().and_then(|ext| ext.to_str()) {
        Some(existing) => format!("{}.{}", existing, TMP_SUFFIX),
        None => TMP_SUFFIX.to_string(),
    };
    tmp.set_extension(ext);
    tmp
}

fn write_all(path: &Path, data: &str) -> Result<()> {
    let mut file = File::create(path)?;
    file.write_all(data.as_bytes())?;
    file.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use tempfile::TempDir;

    use super::*;

    fn storage_with_temp_dir() -> (JsonStorage, TempDir) {
        let temp = TempDir::new().expect("temp dir");
        let storage = JsonStorage::new(Some(temp.path().to_path_buf())).expect("json storage");
        (storage, temp)
    }

    #[test]
    fn set_and_get_roundtrip() {
        let (storage, _guard) = storage_with_temp_dir();
        storage.set("@pixelfin/transactions/v1", "[]").expect("set blob");
        let loaded = storage.get("@pixelfin/transactions/v1").expect("get blob");
        assert_eq!(loaded.as_deref(), Some("[]"));
    }

    #[test]
    fn absent_key_reads_as_none() {
        let (storage, _guard) = storage_with_temp_dir();
        assert!(storage.get("missing").expect("get").is_none());
    }

    #[test]
    fn remove_is_idempotent() {
        let (storage, _guard) = storage_with_temp_dir();
        storage.set("k", "data").expect("set");
        storage.remove("k").expect("first remove");
        storage.remove("k").expect("second remove");
        assert!(storage.get("k").expect("get").is_none());
    }

    #[test]
    fn keys_map_to_canonical_file_names() {
        let (storage, _guard) = storage_with_temp_dir();
        let path = storage.blob_path("@pixelfin/transactions/v1");
        let name = path.file_name().and_then(|n| n.to_str()).unwrap();
        assert_eq!(name, "_pixelfin_transactions_v1.json");
        assert_eq!(storage.blob_path("///"), storage.blob_path("  "));
        assert!(storage
            .blob_path("  ")
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap()
            .starts_with("ledger"));
    }

    #[test]
    fn failed_staging_leaves_existing_blob_intact() {
        let (storage, _guard) = storage_with_temp_dir();
        storage.set("k", "original").expect("initial set");

        // A directory squatting on the staging path forces the write to fail.
        let tmp = tmp_path(&storage.blob_path("k"));
        fs::create_dir_all(&tmp).unwrap();
        assert!(storage.set("k", "updated").is_err());

        assert_eq!(storage.get("k").expect("get").as_deref(), Some("original"));
        let _ = fs::remove_dir_all(&tmp);
    }
}
