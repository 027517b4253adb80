//! Persistence for the booking workbook, split into reading and writing.
//!
//! The whole workbook is the unit of work: it is read once, cached for the
//! rest of the process, and rewritten from scratch on every save.

mod reader;
mod writer;

use std::path::{Path, PathBuf};

use tracing::{debug, info};

use crate::error::StorageError;
use crate::models::TableCollection;

/// Handle to the backing workbook plus the tables read from it.
///
/// Saving takes `&mut self`, so two writers can never race on the same file
/// through one store. A multi-threaded host would put the store behind a
/// `Mutex` to keep that property.
#[derive(Debug)]
pub struct Store {
    path: PathBuf,
    cache: Option<TableCollection>,
}

impl Store {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            cache: None,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Return every sheet of the workbook. The file is read on the first call
    /// only; later calls hand out copies of the cached tables.
    pub fn load_all(&mut self) -> Result<TableCollection, StorageError> {
        if let Some(cached) = &self.cache {
            debug!(path = %self.path.display(), "serving workbook from cache");
            return Ok(cached.clone());
        }

        let tables = reader::read_workbook(&self.path)?;
        info!(
            path = %self.path.display(),
            sheets = tables.len(),
            "loaded workbook"
        );
        self.cache = Some(tables.clone());
        Ok(tables)
    }

    /// Overwrite the workbook with `tables`, one sheet per table in collection
    /// order. Nothing of the previous file is merged. On success the cache
    /// holds what was written.
    pub fn save_all(&mut self, tables: &TableCollection) -> Result<(), StorageError> {
        let bytes = writer::render_workbook(tables)?;
        writer::replace_file(&self.path, &bytes)?;
        info!(
            path = %self.path.display(),
            sheets = tables.len(),
            bytes = bytes.len(),
            "saved workbook"
        );
        self.cache = Some(tables.clone());
        Ok(())
    }
}
