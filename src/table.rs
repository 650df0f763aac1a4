// SPDX-FileCopyrightText: The industry-model-tree authors
// SPDX-License-Identifier: MPL-2.0

use crate::{Cell, Value};

/// A row of nullable cells.
pub type Row = Vec<Cell>;

/// Ordered rows of ordered, nullable cells.
///
/// Columns carry no names. The position of a cell within its row
/// is its depth in the hierarchy. Rows may be ragged.
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Table {
    rows: Vec<Row>,
}

impl Table {
    #[must_use]
    pub const fn new() -> Self {
        Self { rows: Vec::new() }
    }

    #[must_use]
    pub fn from_rows(rows: impl IntoIterator<Item = Row>) -> Self {
        Self {
            rows: rows.into_iter().collect(),
        }
    }

    /// Build a table from rows of labels.
    ///
    /// Empty labels become null cells.
    ///
    /// ```
    /// # use industry_model_tree::Table;
    /// let table = Table::from_labels([vec!["Blade", "Cross"], vec!["Blade", ""]]);
    /// assert_eq!(2, table.width());
    /// assert_eq!(vec!["Blade"], table.row_labels(1));
    /// ```
    #[must_use]
    pub fn from_labels<R, S>(rows: impl IntoIterator<Item = R>) -> Self
    where
        R: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self::from_rows(rows.into_iter().map(|row| {
            row.into_iter()
                .map(|label| {
                    let label = label.as_ref();
                    (!label.is_empty()).then(|| Value::from(label))
                })
                .collect()
        }))
    }

    pub fn push_row(&mut self, row: Row) {
        self.rows.push(row);
    }

    #[must_use]
    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    #[must_use]
    pub fn into_rows(self) -> Vec<Row> {
        self.rows
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// The length of the longest row.
    #[must_use]
    pub fn width(&self) -> usize {
        self.rows.iter().map(Vec::len).max().unwrap_or(0)
    }

    /// Pad all rows with null cells up to [`Self::width()`].
    pub fn pad(&mut self) {
        let width = self.width();
        for row in &mut self.rows {
            row.resize(width, None);
        }
    }

    /// Remove all columns that contain only null cells.
    ///
    /// The table is padded first.
    pub fn drop_null_columns(&mut self) {
        self.pad();
        let width = self.width();
        let keep = (0..width)
            .map(|column| self.rows.iter().any(|row| row[column].is_some()))
            .collect::<Vec<_>>();
        if keep.iter().all(|keep| *keep) {
            return;
        }
        for row in &mut self.rows {
            let mut column = 0;
            row.retain(|_| {
                let retain = keep[column];
                column += 1;
                retain
            });
        }
    }

    /// Labels of all non-null cells of a row in column order.
    ///
    /// Returns an empty vector if the row does not exist.
    #[must_use]
    pub fn row_labels(&self, index: usize) -> Vec<String> {
        self.rows
            .get(index)
            .map(|row| row.iter().flatten().map(Value::label).collect())
            .unwrap_or_default()
    }
}

impl FromIterator<Row> for Table {
    fn from_iter<I: IntoIterator<Item = Row>>(iter: I) -> Self {
        Self::from_rows(iter)
    }
}

impl<'a> IntoIterator for &'a Table {
    type Item = &'a Row;
    type IntoIter = std::slice::Iter<'a, Row>;

    fn into_iter(self) -> Self::IntoIter {
        self.rows.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::Table;
    use crate::Value;

    #[test]
    fn drop_null_columns_keeps_sparse_columns() {
        let mut table = Table::from_rows([
            vec![Some(Value::from("a")), None, Some(Value::from("c"))],
            vec![Some(Value::from("x"))],
        ]);
        table.drop_null_columns();
        assert_eq!(2, table.width());
        assert_eq!(vec!["a", "c"], table.row_labels(0));
        assert_eq!(vec![Some(Value::from("x")), None], table.rows()[1]);
    }

    #[test]
    fn empty_table_has_zero_width() {
        let mut table = Table::new();
        table.drop_null_columns();
        assert!(table.is_empty());
        assert_eq!(0, table.width());
    }
}
