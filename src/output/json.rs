//! JSON file review store
//!
//! Layout: `<root>/<category>/<product>.json`, each file holding one
//! pretty-printed array of review objects. Non-ASCII text is written as-is.

use crate::model::Review;
use crate::output::traits::{OutputError, OutputResult, ReviewStore};
use serde::Serialize;
use serde_json::ser::PrettyFormatter;
use std::fs::File;
use std::io::{BufWriter, ErrorKind, Write};
use std::path::{Path, PathBuf};

/// Writes review files below a root directory
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    root: PathBuf,
}

impl JsonFileStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }
}

impl ReviewStore for JsonFileStore {
    fn create_category_dir(&self, category_name: &str) -> OutputResult<PathBuf> {
        std::fs::create_dir_all(&self.root)?;

        let dir = self.root.join(category_name);
        match std::fs::create_dir(&dir) {
            Ok(()) => Ok(dir),
            Err(e) if e.kind() == ErrorKind::AlreadyExists => Err(OutputError::DirectoryExists(dir)),
            Err(e) => Err(e.into()),
        }
    }

    fn write_reviews(
        &self,
        category_dir: &Path,
        product_name: &str,
        reviews: &[Review],
    ) -> OutputResult<PathBuf> {
        let path = category_dir.join(format!("{}.json", product_name));

        let mut writer = BufWriter::new(File::create(&path)?);
        let formatter = PrettyFormatter::with_indent(b"    ");
        let mut serializer = serde_json::Serializer::with_formatter(&mut writer, formatter);
        reviews.serialize(&mut serializer)?;
        writer.flush()?;

        Ok(path)
    }
}
