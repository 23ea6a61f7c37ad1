//! Blob store abstraction and the explored-set snapshot format.
//!
//! The grid persists its explored set as one named blob: a JSON object
//! `{"version": 1, "cells": [i64...]}` where each entry is a packed cell
//! key. Earlier builds wrote a bare JSON array of keys with no version
//! header; that legacy form is still accepted on read.

use crate::cell::PackedCell;
use crate::error::Result;
use bytes::Bytes;
use rustc_hash::{FxHashMap, FxHashSet};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

/// Current snapshot schema version.
pub const SNAPSHOT_VERSION: u32 = 1;

/// Trait for blob storage backends.
///
/// This abstracts the persistence layer behind the grid store: a named-blob
/// interface with whole-blob reads and writes. The snapshot is always
/// rewritten in full, so backends need no append or partial-update support.
pub trait BlobStore: Send + Sync {
    /// Read a blob by key. `Ok(None)` if the key has never been written.
    fn load(&self, key: &str) -> Result<Option<Bytes>>;

    /// Write a blob, replacing any previous value atomically.
    fn save(&mut self, key: &str, bytes: &[u8]) -> Result<()>;

    /// Delete a blob. Deleting a missing key is not an error.
    fn delete(&mut self, key: &str) -> Result<()>;
}

/// In-memory blob store for tests and ephemeral grids.
#[derive(Debug, Default)]
pub struct MemoryBlobStore {
    blobs: FxHashMap<String, Bytes>,
}

impl MemoryBlobStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl BlobStore for MemoryBlobStore {
    fn load(&self, key: &str) -> Result<Option<Bytes>> {
        Ok(self.blobs.get(key).cloned())
    }

    fn save(&mut self, key: &str, bytes: &[u8]) -> Result<()> {
        self.blobs
            .insert(key.to_string(), Bytes::copy_from_slice(bytes));
        Ok(())
    }

    fn delete(&mut self, key: &str) -> Result<()> {
        self.blobs.remove(key);
        Ok(())
    }
}

/// File-backed blob store: one file per key under a directory.
///
/// Writes go through a temp file and rename, so a crash mid-write leaves the
/// previous snapshot intact rather than a truncated file.
#[derive(Debug)]
pub struct FileBlobStore {
    dir: PathBuf,
}

impl FileBlobStore {
    /// Open a store rooted at `dir`, creating the directory if needed.
    pub fn open<P: Into<PathBuf>>(dir: P) -> Result<Self> {
        let dir = dir.into();
        fs::create_dir_all(&dir)?;
        Ok(Self { dir })
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{key}.json"))
    }
}

impl BlobStore for FileBlobStore {
    fn load(&self, key: &str) -> Result<Option<Bytes>> {
        match fs::read(self.path_for(key)) {
            Ok(bytes) => Ok(Some(Bytes::from(bytes))),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn save(&mut self, key: &str, bytes: &[u8]) -> Result<()> {
        let path = self.path_for(key);
        let tmp = self.dir.join(format!(".{key}.json.tmp"));
        fs::write(&tmp, bytes)?;
        fs::rename(&tmp, &path)?;
        Ok(())
    }

    fn delete(&mut self, key: &str) -> Result<()> {
        match fs::remove_file(self.path_for(key)) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

#[derive(Serialize, Deserialize)]
struct Snapshot {
    version: u32,
    cells: Vec<i64>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum SnapshotOnDisk {
    Versioned(Snapshot),
    /// Pre-versioning layout: a bare array of packed keys.
    Legacy(Vec<i64>),
}

/// Serialize the explored set to snapshot bytes. Set order is not
/// meaningful.
pub fn encode_snapshot(cells: &FxHashSet<PackedCell>) -> Result<Vec<u8>> {
    let snapshot = Snapshot {
        version: SNAPSHOT_VERSION,
        cells: cells.iter().map(|c| c.as_i64()).collect(),
    };
    Ok(serde_json::to_vec(&snapshot)?)
}

/// Deserialize snapshot bytes, accepting both the versioned object and the
/// legacy bare-array form.
pub fn decode_snapshot(bytes: &[u8]) -> Result<FxHashSet<PackedCell>> {
    let cells = match serde_json::from_slice::<SnapshotOnDisk>(bytes)? {
        SnapshotOnDisk::Versioned(snapshot) => snapshot.cells,
        SnapshotOnDisk::Legacy(cells) => cells,
    };
    Ok(cells.into_iter().map(PackedCell::from_i64).collect())
}
