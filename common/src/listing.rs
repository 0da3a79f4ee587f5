//! # Listing Emitter
//!
//! Turns the rows collected during a run into hosts file text.
//!
//! Rows are ordered by `(sort key of host, address)` and rendered as
//! `"%-16s%s\n"`: the address left-justified in a 16 column field followed by
//! the hostname.

use std::fmt;

use crate::policy::SortKey;

pub const ADDRESS_WIDTH: usize = 16;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ListingRow {
    pub address: String,
    pub host: String,
}

impl ListingRow {
    pub fn new(address: impl Into<String>, host: impl Into<String>) -> Self {
        Self {
            address: address.into(),
            host: host.into(),
        }
    }
}

impl fmt::Display for ListingRow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:<width$}{}", self.address, self.host, width = ADDRESS_WIDTH)
    }
}

/// One line of the hosts file, terminator included.
pub fn format_row(row: &ListingRow) -> String {
    format!("{row}\n")
}

/// Rows accumulated by one pipeline run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Listing {
    rows: Vec<ListingRow>,
}

impl Listing {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, row: ListingRow) {
        self.rows.push(row);
    }

    pub fn rows(&self) -> &[ListingRow] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Orders rows by the transformed hostname, then by address.
    pub fn sort(&mut self, sort_key: SortKey) {
        self.rows.sort_by_cached_key(|row| {
            (sort_key.key(&row.host).into_owned(), row.address.clone())
        });
    }

    /// Sorts, then concatenates every row into the hosts file body.
    pub fn render(&mut self, sort_key: SortKey) -> String {
        self.emit(sort_key, |_| {})
    }

    /// Like [`Listing::render`], handing each formatted line to `sink` as well.
    pub fn emit<F>(&mut self, sort_key: SortKey, mut sink: F) -> String
    where
        F: FnMut(&str),
    {
        self.sort(sort_key);

        let mut buf = String::with_capacity(self.rows.len() * (ADDRESS_WIDTH + 24));
        for row in &self.rows {
            let line = format_row(row);
            sink(&line);
            buf.push_str(&line);
        }
        buf
    }
}

impl FromIterator<ListingRow> for Listing {
    fn from_iter<I: IntoIterator<Item = ListingRow>>(iter: I) -> Self {
        Self {
            rows: iter.into_iter().collect(),
        }
    }
}
