//! Manual-labeling helpers: a seeded sample for annotation, and the pass
//! that turns an annotated sheet into integer label columns.

use std::{collections::HashSet, path::Path};
use rand::{rngs::StdRng, seq::index, SeedableRng};
use tracing::info;
use crate::error::{Error, Result};
use crate::table::Table;

#[derive(Debug, Clone, PartialEq)]
pub struct LabelingSample {
    pub sampled: Table,
    pub remainder: Table,
}

/// Draws `size` rows with a non-blank `text_column` using a seeded RNG.
///
/// The remainder holds every other non-blank row whose text does not occur
/// in the sample, so duplicated comments never end up on both sides.
pub fn sample_for_labeling(
    table: &Table,
    text_column: &str,
    size: usize,
    seed: u64,
    source: &Path,
) -> Result<LabelingSample> {
    let column = table.column_index(text_column, source)?;

    let candidates: Vec<usize> = table.column(column)
        .enumerate()
        .filter(|(_, text)| !text.trim().is_empty())
        .map(|(i, _)| i)
        .collect();

    if size > candidates.len() {
        return Err(Error::SampleTooLarge {
            requested: size,
            available: candidates.len(),
        });
    }

    let mut rng = StdRng::seed_from_u64(seed);
    let picked: Vec<usize> = index::sample(&mut rng, candidates.len(), size)
        .into_iter()
        .map(|i| candidates[i])
        .collect();

    let sampled = table.select_rows(&picked);
    let sampled_texts: HashSet<&str> = sampled.column(column).collect();

    let rest: Vec<usize> = candidates.iter()
        .copied()
        .filter(|&i| !sampled_texts.contains(table.rows()[i][column].as_str()))
        .collect();
    let remainder = table.select_rows(&rest);

    info!(
        "sampled {} of {} comments for labeling, {} left",
        sampled.len(),
        candidates.len(),
        remainder.len(),
    );

    Ok(LabelingSample { sampled, remainder })
}

/// Restricts an annotated table to the text column plus `label_columns`,
/// with blank labels set to 0 and the rest coerced to integers.
pub fn finalize_labels<S: AsRef<str>>(
    table: &Table,
    text_column: &str,
    label_columns: &[S],
    source: &Path,
) -> Result<Table> {
    let text = table.column_index(text_column, source)?;
    let labels = label_columns.iter()
        .map(|name| table.column_index(name.as_ref(), source))
        .collect::<Result<Vec<usize>>>()?;

    let mut headers = vec![text_column.to_string()];
    headers.extend(label_columns.iter().map(|name| name.as_ref().to_string()));

    let mut rows = Vec::with_capacity(table.len());
    for (row_number, row) in table.rows().iter().enumerate() {
        let mut out = vec![row[text].clone()];
        for (name, &index) in label_columns.iter().zip(&labels) {
            let value = parse_label(&row[index]).ok_or_else(|| Error::InvalidLabel {
                column: name.as_ref().to_string(),
                row: row_number,
                value: row[index].clone(),
            })?;
            out.push(value.to_string());
        }
        rows.push(out);
    }

    info!("finalized {} labeled rows over {} label columns", rows.len(), labels.len());
    Ok(Table::new(headers, rows))
}

/// Blank is 0; floats are truncated toward zero.
fn parse_label(cell: &str) -> Option<i64> {
    let cell = cell.trim();
    if cell.is_empty() {
        return Some(0);
    }

    cell.parse::<i64>().ok().or_else(|| {
        cell.parse::<f64>()
            .ok()
            .filter(|v| v.is_finite())
            .map(|v| v.trunc() as i64)
    })
}
