//! File-based storage backend implementation.
//!
//! Keeps the full state in memory and rewrites a JSON snapshot of every
//! non-zero slot on each commit. The snapshot is written to a temp file and
//! renamed over the previous one while an exclusive lock is held on a
//! sibling `.lock` file, so readers never observe a torn snapshot.

use crate::{StorageError, StorageInterface, WriteSet};
use fs2::FileExt;
use permit2_types::{ConfigSchema, Field, FieldType, Schema, StorageSlot, ValidationError, U256};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs::{self, File, OpenOptions};
use std::path::{Path, PathBuf};

const DEFAULT_PATH: &str = "./data/permit2-state.json";

/// On-disk snapshot layout.
#[derive(Debug, Serialize, Deserialize)]
struct Snapshot {
	version: u16,
	entries: Vec<SnapshotEntry>,
}

#[derive(Debug, Serialize, Deserialize)]
struct SnapshotEntry {
	slot: StorageSlot,
	value: U256,
}

impl Snapshot {
	const VERSION: u16 = 1;
}

/// File-based storage implementation.
pub struct FileStorage {
	/// Snapshot file location.
	path: PathBuf,
	/// Current state, mirrored to disk on every commit.
	slots: BTreeMap<StorageSlot, U256>,
}

impl FileStorage {
	/// Opens the snapshot at `path`, starting empty if the file does not exist.
	pub fn open(path: impl Into<PathBuf>) -> Result<Self, StorageError> {
		let path = path.into();
		let slots = if path.exists() {
			Self::read_snapshot(&path)?
		} else {
			BTreeMap::new()
		};

		tracing::debug!(path = %path.display(), slots = slots.len(), "Opened state snapshot");
		Ok(Self { path, slots })
	}

	/// Returns the snapshot file location.
	pub fn path(&self) -> &Path {
		&self.path
	}

	fn lock_path(&self) -> PathBuf {
		self.path.with_extension("lock")
	}

	fn read_snapshot(path: &Path) -> Result<BTreeMap<StorageSlot, U256>, StorageError> {
		let data = fs::read(path).map_err(|e| StorageError::Backend(e.to_string()))?;
		let snapshot: Snapshot =
			serde_json::from_slice(&data).map_err(|e| StorageError::Serialization(e.to_string()))?;

		if snapshot.version > Snapshot::VERSION {
			return Err(StorageError::Backend(format!(
				"Unsupported snapshot version: {}",
				snapshot.version
			)));
		}

		Ok(snapshot
			.entries
			.into_iter()
			.filter(|entry| !entry.value.is_zero())
			.map(|entry| (entry.slot, entry.value))
			.collect())
	}

	fn write_snapshot(&self, slots: &BTreeMap<StorageSlot, U256>) -> Result<(), StorageError> {
		if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
			fs::create_dir_all(parent).map_err(|e| StorageError::Backend(e.to_string()))?;
		}

		let snapshot = Snapshot {
			version: Snapshot::VERSION,
			entries: slots
				.iter()
				.map(|(slot, value)| SnapshotEntry {
					slot: *slot,
					value: *value,
				})
				.collect(),
		};
		let bytes = serde_json::to_vec_pretty(&snapshot)
			.map_err(|e| StorageError::Serialization(e.to_string()))?;

		let lock_file = OpenOptions::new()
			.create(true)
			.truncate(false)
			.write(true)
			.open(self.lock_path())
			.map_err(|e| StorageError::Backend(e.to_string()))?;
		FileExt::lock_exclusive(&lock_file).map_err(|e| StorageError::Backend(e.to_string()))?;

		let result = Self::replace_file(&self.path, &bytes);

		if let Err(e) = FileExt::unlock(&lock_file) {
			tracing::warn!(path = %self.path.display(), error = %e, "Failed to release snapshot lock");
		}
		result
	}

	// Write atomically by writing to temp file then renaming
	fn replace_file(path: &Path, bytes: &[u8]) -> Result<(), StorageError> {
		let temp_path = path.with_extension("tmp");
		let mut temp = File::create(&temp_path).map_err(|e| StorageError::Backend(e.to_string()))?;
		std::io::Write::write_all(&mut temp, bytes)
			.and_then(|_| temp.sync_all())
			.map_err(|e| StorageError::Backend(e.to_string()))?;
		fs::rename(&temp_path, path).map_err(|e| StorageError::Backend(e.to_string()))
	}
}

impl StorageInterface for FileStorage {
	fn load(&self, slot: &StorageSlot) -> Result<U256, StorageError> {
		Ok(self.slots.get(slot).copied().unwrap_or(U256::ZERO))
	}

	fn commit(&mut self, writes: WriteSet) -> Result<(), StorageError> {
		if writes.is_empty() {
			return Ok(());
		}

		let mut next = self.slots.clone();
		for (slot, value) in writes {
			if value.is_zero() {
				next.remove(&slot);
			} else {
				next.insert(slot, value);
			}
		}

		// In-memory state only advances once the snapshot is on disk
		self.write_snapshot(&next)?;
		self.slots = next;

		tracing::debug!(path = %self.path.display(), slots = self.slots.len(), "Committed state snapshot");
		Ok(())
	}
}

/// Configuration schema for FileStorage.
pub struct FileStorageSchema;

impl ConfigSchema for FileStorageSchema {
	fn validate(&self, config: &toml::Value) -> Result<(), ValidationError> {
		let schema = Schema::new(
			vec![],
			vec![Field::new("path", FieldType::String).with_validator(|value| {
				match value.as_str() {
					Some(path) if path.trim().is_empty() => Err("path cannot be empty".to_string()),
					_ => Ok(()),
				}
			})],
		);
		schema.validate(config)
	}
}

/// Factory function to create a file storage backend from configuration.
///
/// Configuration parameters:
/// - `path`: Snapshot file location (default: "./data/permit2-state.json")
pub fn create_storage(config: &toml::Value) -> Result<Box<dyn StorageInterface>, StorageError> {
	FileStorageSchema
		.validate(config)
		.map_err(|e| StorageError::Configuration(e.to_string()))?;

	let path = config
		.get("path")
		.and_then(|v| v.as_str())
		.unwrap_or(DEFAULT_PATH);

	Ok(Box::new(FileStorage::open(path)?))
}

/// Registry for the file storage implementation.
pub struct Registry;

impl permit2_types::ImplementationRegistry for Registry {
	const NAME: &'static str = "file";
	type Factory = crate::StorageFactory;

	fn factory() -> Self::Factory {
		create_storage
	}
}

impl crate::StorageRegistry for Registry {}
