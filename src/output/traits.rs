//! Review store trait and error types
//!
//! The crawl only needs two capabilities from the output side: creating a
//! fresh directory per category and writing one review file per product.

use crate::model::Review;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Errors that can occur during output operations
#[derive(Debug, Error)]
pub enum OutputError {
    #[error("Output directory already exists: {}", .0.display())]
    DirectoryExists(PathBuf),

    #[error("Failed to serialize reviews: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for output operations
pub type OutputResult<T> = Result<T, OutputError>;

/// Trait for review output backends
///
/// Implementations are shared between concurrently running crawl tasks.
pub trait ReviewStore: Send + Sync {
    /// Creates the directory for one category
    ///
    /// # Returns
    ///
    /// * `Ok(PathBuf)` - The newly created directory
    /// * `Err(OutputError::DirectoryExists)` - The category was already crawled into this root
    fn create_category_dir(&self, category_name: &str) -> OutputResult<PathBuf>;

    /// Writes the reviews of one product, replacing any previous file
    ///
    /// # Returns
    ///
    /// The path of the written file
    fn write_reviews(
        &self,
        category_dir: &Path,
        product_name: &str,
        reviews: &[Review],
    ) -> OutputResult<PathBuf>;
}
