//! Manual `<address> <hostname>` imports.
//!
//! The import file uses hosts file syntax. Lines starting with `#` are comments;
//! any other line with at least two fields contributes its first two fields.
//! Addresses are merged with the same set-add rule as a resolve run and are not
//! probed. Bytes that are not valid UTF-8 are replaced rather than rejected.

use std::fs;
use std::path::Path;

use hostmap_common::error::ImportError;
use hostmap_common::mapping::Mapping;
use hostmap_common::policy::AddressFilter;
use tracing::{debug, warn};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ImportSummary {
    pub entries: usize,
    pub merged: usize,
    pub rejected: usize,
}

/// `(address, hostname)` pairs in file order.
pub fn parse_import(contents: &str) -> Vec<(String, String)> {
    contents
        .lines()
        .filter(|line| !line.trim_start().starts_with('#'))
        .filter_map(|line| {
            let mut fields = line.split_whitespace();
            match (fields.next(), fields.next()) {
                (Some(addr), Some(host)) => Some((addr.to_string(), host.to_string())),
                _ => None,
            }
        })
        .collect()
}

pub fn merge_pairs(
    mapping: &mut Mapping,
    pairs: Vec<(String, String)>,
    filter: AddressFilter,
) -> ImportSummary {
    let mut summary = ImportSummary {
        entries: pairs.len(),
        ..ImportSummary::default()
    };

    for (addr, host) in pairs {
        if !filter.accepts(&addr) {
            debug!("Skipping {addr} for {host}");
            summary.rejected += 1;
            continue;
        }
        if mapping.insert_address(&host, &addr) {
            summary.merged += 1;
        }
    }
    summary
}

/// Reads `path` and merges its entries into `mapping`.
///
/// A missing file is an error; something that exists but is not a regular file
/// is skipped.
pub fn import_file(
    path: &Path,
    mapping: &mut Mapping,
    filter: AddressFilter,
) -> Result<ImportSummary, ImportError> {
    let metadata = fs::metadata(path).map_err(|source| ImportError::Stat {
        path: path.to_path_buf(),
        source,
    })?;
    if !metadata.is_file() {
        warn!("{} is not a regular file, nothing imported", path.display());
        return Ok(ImportSummary::default());
    }

    let bytes = fs::read(path).map_err(|source| ImportError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let contents = String::from_utf8_lossy(&bytes);
    Ok(merge_pairs(mapping, parse_import(&contents), filter))
}
