//! Mapping and listing files.
//!
//! Both files are written wholesale; the last writer wins.

use std::fs;
use std::path::{Path, PathBuf};

use hostmap_common::error::StoreError;
use hostmap_common::mapping::Mapping;
use serde::Serialize;
use serde_json::Serializer;
use serde_json::ser::PrettyFormatter;
use tracing::debug;

#[derive(Debug, Clone)]
pub struct MappingStore {
    path: PathBuf,
}

impl MappingStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn load(&self) -> Result<Mapping, StoreError> {
        let contents = fs::read(&self.path).map_err(|source| StoreError::Read {
            path: self.path.clone(),
            source,
        })?;
        let mapping: Mapping =
            serde_json::from_slice(&contents).map_err(|source| StoreError::Parse {
                path: self.path.clone(),
                source,
            })?;
        debug!("Loaded {} hosts from {}", mapping.len(), self.path.display());
        Ok(mapping)
    }

    pub fn save(&self, mapping: &Mapping) -> Result<(), StoreError> {
        let bytes: Vec<u8> = encode(mapping)?;
        write_file(&self.path, &bytes)
    }
}

/// Tab-indented JSON, keys in sorted order.
pub fn encode(mapping: &Mapping) -> Result<Vec<u8>, StoreError> {
    let mut buf: Vec<u8> = Vec::new();
    let mut serializer = Serializer::with_formatter(&mut buf, PrettyFormatter::with_indent(b"\t"));
    mapping.serialize(&mut serializer)?;
    Ok(buf)
}

pub fn write_listing(path: &Path, body: &str) -> Result<(), StoreError> {
    write_file(path, body.as_bytes())
}

fn write_file(path: &Path, bytes: &[u8]) -> Result<(), StoreError> {
    fs::write(path, bytes).map_err(|source| StoreError::Write {
        path: path.to_path_buf(),
        source,
    })?;
    debug!("Wrote {} bytes to {}", bytes.len(), path.display());
    Ok(())
}
