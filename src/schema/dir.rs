//! Loading a catalog from a directory of profile documents.
//!
//! _Requires Cargo features `std` and `serde`._

use std::{fs, io, path::Path, vec::Vec};

use thiserror::Error;
use tracing::{debug, warn};

use super::{Catalog, Schema};

extern crate std;

/// Errors occurring while loading a catalog directory.
#[derive(Debug, Error)]
pub enum LoadError {
    /// An error reading the directory or a document.
    #[error(transparent)]
    Io(#[from] io::Error),
    /// A document for a category could not be parsed.
    #[error("Invalid schema for category {category}: {source}.")]
    Json {
        category: u8,
        source: serde_json::Error,
    },
}

impl Catalog {
    /// Load every `cat_<N>.json` document in a directory, where `N` is the
    /// decimal category number.
    ///
    /// Files not following this naming scheme are ignored. A profile document
    /// that cannot be read or parsed is skipped, so records of other categories
    /// can still be validated; its error is returned alongside the catalog.
    pub fn load_dir(dir: impl AsRef<Path>) -> Result<(Self, Vec<LoadError>), LoadError> {
        let mut catalog = Catalog::new();
        let mut skipped = Vec::new();

        for entry in fs::read_dir(dir)? {
            let path = entry?.path();

            let Some(category) = category_of(&path) else {
                debug!(path = %path.display(), "ignoring non-profile file");
                continue;
            };

            if let Err(err) = catalog.load_file(category, &path) {
                warn!(category, path = %path.display(), "skipping profile: {err}");
                skipped.push(err);
            }
        }

        Ok((catalog, skipped))
    }

    /// Load the document at `path` as the schema for a category.
    pub fn load_file(&mut self, category: u8, path: impl AsRef<Path>) -> Result<(), LoadError> {
        let path = path.as_ref();
        let text = fs::read_to_string(path)?;
        let schema =
            Schema::from_json(&text).map_err(|source| LoadError::Json { category, source })?;

        debug!(category, items = schema.len(), path = %path.display(), "loaded profile");

        if self.insert(category, schema).is_some() {
            warn!(category, path = %path.display(), "profile replaced an earlier one");
        }

        Ok(())
    }
}

/// Parse the category from a `cat_<N>.json` file name.
fn category_of(path: &Path) -> Option<u8> {
    if path.extension()? != "json" {
        return None;
    }

    path.file_stem()?.to_str()?.strip_prefix("cat_")?.parse().ok()
}
