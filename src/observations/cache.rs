use crate::observations::error::IngestError;
use crate::observations::loader::ObservationLoader;
use crate::observations::table::ObservationTable;
use crate::types::schema::DatasetSchema;
use log::{info, warn};
use std::collections::{hash_map::Entry, HashMap};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, PoisonError};

/// Process-scoped memo of loaded tables, keyed by the source path as given.
///
/// A path is read at most once; later requests for the same path return the
/// same [`Arc`] until the cache is dropped. Tables are never invalidated.
pub struct DatasetCache {
    loader: ObservationLoader,
    tables: Mutex<HashMap<PathBuf, Arc<ObservationTable>>>,
}

impl DatasetCache {
    pub fn new(schema: DatasetSchema) -> Self {
        Self {
            loader: ObservationLoader::new(schema),
            tables: Mutex::new(HashMap::new()),
        }
    }

    pub fn schema(&self) -> &DatasetSchema {
        self.loader.schema()
    }

    /// Returns the table for `path`, loading it on first request.
    pub fn get_or_load(&self, path: &Path) -> Result<Arc<ObservationTable>, IngestError> {
        let key = path.to_path_buf();

        {
            let tables = self.tables.lock().unwrap_or_else(PoisonError::into_inner);
            if let Some(table) = tables.get(&key) {
                info!("Cache hit for dataset {:?}", key);
                return Ok(Arc::clone(table));
            }
        }

        warn!("Cache miss for dataset {:?}. Loading from disk.", key);
        let loaded = Arc::new(self.loader.load(path)?);

        let mut tables = self.tables.lock().unwrap_or_else(PoisonError::into_inner);
        match tables.entry(key) {
            // Loaded by someone else while we were reading; keep theirs.
            Entry::Occupied(entry) => Ok(Arc::clone(entry.get())),
            Entry::Vacant(entry) => {
                entry.insert(Arc::clone(&loaded));
                Ok(loaded)
            }
        }
    }

    pub fn contains(&self, path: &Path) -> bool {
        self.tables
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .contains_key(path)
    }

    pub fn len(&self) -> usize {
        self.tables
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for DatasetCache {
    fn default() -> Self {
        Self::new(DatasetSchema::default())
    }
}
