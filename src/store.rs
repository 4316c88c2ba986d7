use crate::error::{CodecError, Result};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};

/// Directory-backed JSON key-value store for compressed artifacts
///
/// Keys are `/`-separated paths such as `audio/track1`; each key maps to a
/// `.json` file under the store root. Unlike a write-only asset host, the
/// store supports real listing and deletion, so no side channel of uploaded
/// keys needs to be maintained.
pub struct JsonStore {
    root: PathBuf,
}

impl JsonStore {
    /// Opens a store rooted at the given directory, creating it if needed
    pub fn open(root: impl AsRef<Path>) -> Result<Self> {
        fs::create_dir_all(&root)?;
        Ok(Self {
            root: root.as_ref().to_path_buf(),
        })
    }

    /// Serializes a value as JSON under the given key, overwriting any
    /// previous value
    pub fn put<T: Serialize>(&self, key: &str, value: &T) -> Result<()> {
        let path = self.path_for_key(key)?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string(value)?;
        fs::write(path, json)?;
        Ok(())
    }

    /// Loads and deserializes the value stored under the given key
    pub fn get<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>> {
        let path = self.path_for_key(key)?;
        if !path.exists() {
            return Ok(None);
        }
        let json = fs::read_to_string(path)?;
        Ok(Some(serde_json::from_str(&json)?))
    }

    /// Returns all keys starting with the given prefix, sorted
    pub fn list(&self, prefix: &str) -> Result<Vec<String>> {
        let mut keys = Vec::new();
        collect_keys(&self.root, "", &mut keys)?;
        keys.retain(|key| key.starts_with(prefix));
        keys.sort();
        Ok(keys)
    }

    /// Removes the value stored under the given key, reporting whether it
    /// existed
    pub fn delete(&self, key: &str) -> Result<bool> {
        let path = self.path_for_key(key)?;
        if !path.exists() {
            return Ok(false);
        }
        fs::remove_file(path)?;
        Ok(true)
    }

    fn path_for_key(&self, key: &str) -> Result<PathBuf> {
        validate_key(key)?;
        let mut path = self.root.clone();
        let mut components = key.split('/').peekable();
        while let Some(component) = components.next() {
            if components.peek().is_some() {
                path.push(component);
            } else {
                path.push(format!("{}.json", component));
            }
        }
        Ok(path)
    }
}

fn validate_key(key: &str) -> Result<()> {
    let valid = !key.is_empty()
        && !key.starts_with('/')
        && !key.ends_with('/')
        && !key.contains('\\')
        && key.split('/').all(|component| {
            !component.is_empty() && component != "." && component != ".."
        });

    if !valid {
        return Err(CodecError::InvalidInput(format!(
            "invalid storage key: {:?}",
            key
        )));
    }
    Ok(())
}

fn collect_keys(directory: &Path, prefix: &str, keys: &mut Vec<String>) -> Result<()> {
    for entry in fs::read_dir(directory)? {
        let entry = entry?;
        let name = entry.file_name().to_string_lossy().into_owned();
        let qualified = if prefix.is_empty() {
            name.clone()
        } else {
            format!("{}/{}", prefix, name)
        };

        if entry.file_type()?.is_dir() {
            collect_keys(&entry.path(), &qualified, keys)?;
        } else if let Some(key) = qualified.strip_suffix(".json") {
            keys.push(key.to_string());
        }
    }
    Ok(())
}
