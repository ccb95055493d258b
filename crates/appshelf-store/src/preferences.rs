//! Boolean flags in a JSON object document.

use std::collections::BTreeMap;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, PoisonError};

use appshelf_core::{PreferencesError, PreferencesPort};

use crate::atomic::write_atomic;

type Flags = BTreeMap<String, bool>;

/// [`PreferencesPort`] backed by a JSON file.
///
/// Flags are cached after the first read; every write persists the whole
/// document before updating the cache.
#[derive(Debug)]
pub struct JsonPreferences {
    path: PathBuf,
    cache: Mutex<Option<Flags>>,
}

impl JsonPreferences {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            cache: Mutex::new(None),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_file(&self) -> Result<Flags, PreferencesError> {
        match std::fs::read_to_string(&self.path) {
            Ok(document) => serde_json::from_str(&document)
                .map_err(|e| PreferencesError::Serialization(e.to_string())),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(Flags::new()),
            Err(e) => Err(PreferencesError::Storage(e.to_string())),
        }
    }

    fn with_flags<T>(
        &self,
        f: impl FnOnce(&mut Flags) -> Result<T, PreferencesError>,
    ) -> Result<T, PreferencesError> {
        let mut cache = self.cache.lock().unwrap_or_else(PoisonError::into_inner);
        if cache.is_none() {
            *cache = Some(self.read_file()?);
        }
        f(cache.get_or_insert_with(Flags::new))
    }
}

impl PreferencesPort for JsonPreferences {
    fn get_flag(&self, name: &str) -> Result<Option<bool>, PreferencesError> {
        self.with_flags(|flags| Ok(flags.get(name).copied()))
    }

    fn set_flag(&self, name: &str, value: bool) -> Result<(), PreferencesError> {
        self.with_flags(|flags| {
            let mut next = flags.clone();
            next.insert(name.to_string(), value);
            let document = serde_json::to_vec_pretty(&next)
                .map_err(|e| PreferencesError::Serialization(e.to_string()))?;
            write_atomic(&self.path, &document)
                .map_err(|e| PreferencesError::Storage(e.to_string()))?;
            *flags = next;
            Ok(())
        })
    }
}
