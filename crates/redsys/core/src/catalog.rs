//! Response code catalog
//!
//! Maps gateway codes to human-readable descriptions. The concrete [`Catalog`]
//! is built explicitly and handed to consumers by reference; its entries are
//! loaded on first use, exactly once, however many threads race to it.

use std::{
    collections::HashMap,
    fmt, fs,
    path::{Path, PathBuf},
    sync::OnceLock,
};

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::Result;

const EMBEDDED_MESSAGES: &str = include_str!("../data/messages.json");

/// Lookup key into the catalog
///
/// Numeric-looking codes are normalized to integers so that `"0101"`, `"101"`
/// and `101` refer to the same entry.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum CatalogCode {
    /// Numeric operation code
    Numeric(u32),
    /// Textual code such as `SIS0041`
    Text(String),
}

impl From<&str> for CatalogCode {
    fn from(code: &str) -> Self {
        let trimmed = code.trim();
        if !trimmed.is_empty() && trimmed.bytes().all(|b| b.is_ascii_digit()) {
            if let Ok(number) = trimmed.parse() {
                return Self::Numeric(number);
            }
        }
        Self::Text(trimmed.to_owned())
    }
}

impl From<u32> for CatalogCode {
    fn from(code: u32) -> Self {
        Self::Numeric(code)
    }
}

impl fmt::Display for CatalogCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Numeric(code) => write!(f, "{code}"),
            Self::Text(code) => f.write_str(code),
        }
    }
}

/// Description of a single code
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogEntry {
    /// Normalized code
    pub code: String,
    /// Human-readable description
    pub message: String,
}

/// Code to description lookup
pub trait MessageCatalog {
    /// Look up a code, returning `None` when it is unknown
    fn lookup(&self, code: &CatalogCode) -> Option<CatalogEntry>;
}

impl<T: MessageCatalog + ?Sized> MessageCatalog for &T {
    fn lookup(&self, code: &CatalogCode) -> Option<CatalogEntry> {
        (**self).lookup(code)
    }
}

#[derive(Debug, Clone)]
enum Source {
    Embedded,
    File(PathBuf),
    Entries(Vec<(CatalogCode, String)>),
}

/// Lazily loaded catalog backed by a JSON object of `code -> message`
#[derive(Debug)]
pub struct Catalog {
    source: Source,
    entries: OnceLock<HashMap<CatalogCode, String>>,
}

impl Catalog {
    /// Catalog backed by the data file shipped with the crate
    pub const fn embedded() -> Self {
        Self {
            source: Source::Embedded,
            entries: OnceLock::new(),
        }
    }

    /// Catalog backed by a JSON file, read on first lookup
    ///
    /// A file that cannot be read or parsed is reported once and leaves the
    /// catalog empty.
    pub fn from_path(path: impl AsRef<Path>) -> Self {
        Self {
            source: Source::File(path.as_ref().to_path_buf()),
            entries: OnceLock::new(),
        }
    }

    /// Catalog with the given entries
    pub fn from_entries<C, M>(entries: impl IntoIterator<Item = (C, M)>) -> Self
    where
        C: Into<CatalogCode>,
        M: Into<String>,
    {
        Self {
            source: Source::Entries(
                entries
                    .into_iter()
                    .map(|(code, message)| (code.into(), message.into()))
                    .collect(),
            ),
            entries: OnceLock::new(),
        }
    }

    /// Check if the entries have been loaded yet
    pub fn is_loaded(&self) -> bool {
        self.entries.get().is_some()
    }

    /// Number of entries, loading them if needed
    pub fn len(&self) -> usize {
        self.entries().len()
    }

    /// Check if the catalog has no entries, loading them if needed
    pub fn is_empty(&self) -> bool {
        self.entries().is_empty()
    }

    fn entries(&self) -> &HashMap<CatalogCode, String> {
        self.entries.get_or_init(|| {
            let entries = match &self.source {
                Source::Embedded => parse(EMBEDDED_MESSAGES),
                Source::File(path) => {
                    fs::read_to_string(path).map_err(Into::into).and_then(|raw| parse(&raw))
                }
                Source::Entries(entries) => Ok(entries.iter().cloned().collect()),
            };

            match entries {
                Ok(entries) => {
                    debug!(entries = entries.len(), "Loaded message catalog");
                    entries
                }
                Err(e) => {
                    warn!(error = %e, source = ?self.source, "Failed to load message catalog");
                    HashMap::new()
                }
            }
        })
    }
}

impl Default for Catalog {
    fn default() -> Self {
        Self::embedded()
    }
}

impl MessageCatalog for Catalog {
    fn lookup(&self, code: &CatalogCode) -> Option<CatalogEntry> {
        self.entries().get(code).map(|message| CatalogEntry {
            code: code.to_string(),
            message: message.clone(),
        })
    }
}

fn parse(raw: &str) -> Result<HashMap<CatalogCode, String>> {
    let messages: HashMap<String, String> = serde_json::from_str(raw)?;
    Ok(messages
        .into_iter()
        .map(|(code, message)| (CatalogCode::from(code.as_str()), message))
        .collect())
}
