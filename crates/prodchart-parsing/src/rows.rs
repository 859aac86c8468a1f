//! Fold table rows into per-entity buckets.
//!
//! Each table is walked top to bottom carrying the most recent non-empty
//! first cell as the current entity label. Rows under a recognized label
//! with a non-empty second cell contribute `(second cell, third cell)`.

use prodchart_core::{Row, Table};

use crate::ExtractError;
use crate::text_processing::parse_quantity;

/// Raw `(category, quantity)` pairs collected for one entity, in row order.
pub type Bucket = Vec<(String, f64)>;

struct FoldState<'a> {
    current_label: Option<&'a str>,
    buckets: Vec<Bucket>,
}

/// Fold every table into one bucket per entity, indexed like `entities`.
///
/// The label pointer starts empty for each table and persists across rows
/// whose second cell is empty. Labels may repeat or interleave; items keep
/// appending to their entity's bucket.
pub fn fold_rows(tables: &[Table], entities: &[&str]) -> Result<Vec<Bucket>, ExtractError> {
    let init = vec![Bucket::new(); entities.len()];
    tables
        .iter()
        .try_fold(init, |buckets, table| fold_table(table, entities, buckets))
}

fn fold_table(
    table: &Table,
    entities: &[&str],
    buckets: Vec<Bucket>,
) -> Result<Vec<Bucket>, ExtractError> {
    let state = FoldState {
        current_label: None,
        buckets,
    };

    let state = table.rows.iter().try_fold(state, |mut state, row| {
        if let Some(label) = cell(row, 0) {
            if state.current_label != Some(label) {
                tracing::trace!(label, "entity label");
            }
            state.current_label = Some(label);
        }

        let Some(label) = state.current_label else {
            return Ok(state);
        };
        let Some(index) = entities.iter().position(|e| *e == label) else {
            tracing::trace!(label, "skipping row under unrecognized label");
            return Ok(state);
        };
        let Some(category) = cell(row, 1) else {
            return Ok(state);
        };

        if row.len() < 3 {
            return Err(ExtractError::ShortRow {
                entity: label.to_string(),
                cells: row.len(),
            });
        }

        let raw = row[2].as_deref().unwrap_or("");
        let quantity = parse_quantity(raw).ok_or_else(|| ExtractError::MalformedCell {
            entity: label.to_string(),
            category: category.to_string(),
            value: raw.to_string(),
        })?;

        state.buckets[index].push((category.to_string(), quantity));
        Ok(state)
    })?;

    Ok(state.buckets)
}

/// Trimmed cell text, `None` when missing or blank.
fn cell(row: &Row, index: usize) -> Option<&str> {
    row.get(index)
        .and_then(|c| c.as_deref())
        .map(str::trim)
        .filter(|c| !c.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    const ENTITIES: [&str; 2] = ["Lantabur", "Taqwa"];

    fn fold(tables: &[Table]) -> Result<Vec<Bucket>, ExtractError> {
        fold_rows(tables, &ENTITIES)
    }

    fn bucket(items: &[(&str, f64)]) -> Bucket {
        items.iter().map(|(c, q)| (c.to_string(), *q)).collect()
    }

    #[test]
    fn label_applies_to_following_rows() {
        let table = Table::from_strs(&[
            &["Lantabur", "Red", "10"],
            &["", "Blue", "20"],
            &["Taqwa", "Green", "5"],
        ]);
        let buckets = fold(&[table]).unwrap();
        assert_eq!(buckets[0], bucket(&[("Red", 10.0), ("Blue", 20.0)]));
        assert_eq!(buckets[1], bucket(&[("Green", 5.0)]));
    }

    #[test]
    fn subheader_rows_are_skipped_but_label_persists() {
        let table = Table::from_strs(&[
            &["Lantabur", "", ""],
            &["", "", "Kg"],
            &["", "Black", "2747"],
            &["", "White", "2537"],
        ]);
        let buckets = fold(&[table]).unwrap();
        assert_eq!(buckets[0], bucket(&[("Black", 2747.0), ("White", 2537.0)]));
        assert!(buckets[1].is_empty());
    }

    #[test]
    fn unrecognized_label_drops_rows_until_next_label() {
        let table = Table::from_strs(&[
            &["Lantabur", "Red", "10"],
            &["Other Mill", "Blue", "20"],
            &["", "Grey", "30"],
            &["Taqwa", "Green", "5"],
        ]);
        let buckets = fold(&[table]).unwrap();
        assert_eq!(buckets[0], bucket(&[("Red", 10.0)]));
        assert_eq!(buckets[1], bucket(&[("Green", 5.0)]));
    }

    #[test]
    fn interleaved_labels_keep_appending() {
        let table = Table::from_strs(&[
            &["Lantabur", "Red", "1"],
            &["Taqwa", "Green", "2"],
            &["Lantabur", "Blue", "3"],
        ]);
        let buckets = fold(&[table]).unwrap();
        assert_eq!(buckets[0], bucket(&[("Red", 1.0), ("Blue", 3.0)]));
        assert_eq!(buckets[1], bucket(&[("Green", 2.0)]));
    }

    #[test]
    fn label_does_not_carry_into_the_next_table() {
        let first = Table::from_strs(&[&["Lantabur", "Red", "1"]]);
        let second = Table::from_strs(&[&["", "Blue", "2"]]);
        let buckets = fold(&[first, second]).unwrap();
        assert_eq!(buckets[0], bucket(&[("Red", 1.0)]));
    }

    #[test]
    fn rows_before_any_label_are_ignored() {
        let table = Table::from_strs(&[&["", "Red", "abc"], &["Taqwa", "Green", "5"]]);
        let buckets = fold(&[table]).unwrap();
        assert!(buckets[0].is_empty());
        assert_eq!(buckets[1], bucket(&[("Green", 5.0)]));
    }

    #[test]
    fn non_numeric_quantity_is_an_error() {
        let table = Table::from_strs(&[&["Lantabur", "Red", "ten"]]);
        let err = fold(&[table]).unwrap_err();
        match err {
            ExtractError::MalformedCell {
                entity,
                category,
                value,
            } => {
                assert_eq!(entity, "Lantabur");
                assert_eq!(category, "Red");
                assert_eq!(value, "ten");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn missing_quantity_is_an_error() {
        let table = Table::from_strs(&[&["Lantabur", "Red", ""]]);
        assert!(matches!(
            fold(&[table]).unwrap_err(),
            ExtractError::MalformedCell { .. }
        ));
    }

    #[test]
    fn two_cell_item_row_is_an_error() {
        let table = Table::from_strs(&[&["Lantabur", "Red"]]);
        assert!(matches!(
            fold(&[table]).unwrap_err(),
            ExtractError::ShortRow { cells: 2, .. }
        ));
    }

    #[test]
    fn short_rows_under_unrecognized_labels_are_fine() {
        let table = Table::from_strs(&[&["Summary", "Total"], &["Lantabur", "Red", "4"]]);
        let buckets = fold(&[table]).unwrap();
        assert_eq!(buckets[0], bucket(&[("Red", 4.0)]));
    }

    #[test]
    fn labels_are_trimmed_before_matching() {
        let table = Table::new(vec![vec![
            Some(" Taqwa ".into()),
            Some(" Royal ".into()),
            Some(" 7 ".into()),
        ]]);
        let buckets = fold(&[table]).unwrap();
        assert_eq!(buckets[1], bucket(&[("Royal", 7.0)]));
    }
}
