use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;

use super::seed::reference_bookings;
use super::types::Booking;

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("I/O error on {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// JSON file holding the serialized booking list
#[derive(Debug, Clone)]
pub struct BookingStorage {
    path: PathBuf,
}

impl BookingStorage {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        BookingStorage { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Restores the saved bookings verbatim. A missing or unreadable file
    /// falls back to the reference bookings.
    pub fn load(&self) -> Vec<Booking> {
        let raw = match fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                tracing::info!(path = %self.path.display(), "no saved bookings, using reference data");
                return reference_bookings();
            }
            Err(e) => {
                tracing::warn!(path = %self.path.display(), error = %e, "failed to read saved bookings");
                return reference_bookings();
            }
        };

        match serde_json::from_str::<Vec<Booking>>(&raw) {
            Ok(bookings) => {
                tracing::info!(count = bookings.len(), "restored saved bookings");
                bookings
            }
            Err(e) => {
                tracing::warn!(path = %self.path.display(), error = %e, "failed to parse saved bookings");
                reference_bookings()
            }
        }
    }

    /// Writes the full booking list, replacing the previous file
    pub fn save(&self, bookings: &[Booking]) -> Result<(), StorageError> {
        let io_err = |source: io::Error| StorageError::Io {
            path: self.path.clone(),
            source,
        };

        if let Some(dir) = self.path.parent().filter(|d| !d.as_os_str().is_empty()) {
            fs::create_dir_all(dir).map_err(io_err)?;
        }

        let json = serde_json::to_string_pretty(bookings)?;

        // Write next to the target, then swap it in
        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, json).map_err(io_err)?;
        fs::rename(&tmp, &self.path).map_err(io_err)?;

        tracing::debug!(count = bookings.len(), path = %self.path.display(), "saved bookings");
        Ok(())
    }
}
