use std::path::Path;
use tracing::info;
use crate::error::Result;
use crate::models::Comment;
use crate::table::Table;

pub fn load_comments(path: &Path, column: &str) -> Result<Vec<Comment>> {
    let table = Table::read(path)?;
    comments_from_table(&table, column, path)
}

/// Keeps only `column`, dropping rows whose value is missing or blank.
/// `row` keeps the position in the source table.
pub fn comments_from_table(table: &Table, column: &str, source: &Path) -> Result<Vec<Comment>> {
    let index = table.column_index(column, source)?;

    let comments: Vec<Comment> = table.column(index)
        .enumerate()
        .filter(|(_, text)| !text.trim().is_empty())
        .map(|(row, text)| Comment { row, text: text.to_string() })
        .collect();

    info!(
        "loaded {} comments from {} ({} rows dropped as empty)",
        comments.len(),
        source.display(),
        table.len() - comments.len(),
    );

    Ok(comments)
}
