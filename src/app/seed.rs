use std::path::Path;

use anyhow::Context as _;

use crate::app::book_store::BookStore;
use crate::app::model::BookInput;

/// Reads a JSON array of books to preload at startup.
pub fn load(path: &Path) -> anyhow::Result<Vec<BookInput>> {
    let bytes =
        std::fs::read(path).with_context(|| format!("read seed file: {}", path.display()))?;
    serde_json::from_slice(&bytes).with_context(|| format!("parse seed file: {}", path.display()))
}

/// Adds every seed book through the regular add path. Stops at the first
/// rejected entry.
pub async fn apply(store: &dyn BookStore, books: Vec<BookInput>) -> anyhow::Result<usize> {
    let total = books.len();
    for (index, input) in books.into_iter().enumerate() {
        let book_id = store
            .add(input)
            .await
            .with_context(|| format!("seed entry #{index}"))?;
        tracing::debug!(index, book_id = %book_id, "seeded book");
    }
    Ok(total)
}
