// SPDX-FileCopyrightText: The industry-model-tree authors
// SPDX-License-Identifier: MPL-2.0

use crate::{Cell, ModelTree, NodeId, NodeKind, Table};

/// Turns an object table into a tree of objects.
///
/// Every row describes one path of objects from the top level down to
/// a leaf. Rows that share a prefix share the corresponding ancestors.
#[derive(Debug, Clone, Copy, Default)]
pub struct TableToTreeBuilder;

impl TableToTreeBuilder {
    /// Build a new tree from an object table.
    ///
    /// ```
    /// # use industry_model_tree::{Table, TableToTreeBuilder};
    /// let table = Table::from_labels([vec!["A", "B", "C"], vec!["A", "B", "D"]]);
    /// let tree = TableToTreeBuilder.build(&table);
    /// assert_eq!(1 + 4, tree.node_count());
    /// ```
    #[must_use]
    pub fn build(self, table: &Table) -> ModelTree {
        let mut tree = ModelTree::new();
        self.extend(&mut tree, table);
        tree
    }

    /// Add all rows of an object table to an existing tree.
    ///
    /// Returns the ids of the last node of each row in row order,
    /// `None` for rows that start with a null cell.
    pub fn extend(self, tree: &mut ModelTree, table: &Table) -> Vec<Option<NodeId>> {
        table
            .rows()
            .iter()
            .enumerate()
            .map(|(index, row)| {
                let leaf_id = add_row(tree, row);
                if leaf_id.is_none() {
                    log::debug!("Skipping empty object row {index}");
                }
                leaf_id
            })
            .collect()
    }
}

fn add_row(tree: &mut ModelTree, row: &[Cell]) -> Option<NodeId> {
    let mut current_id = tree.root_node_id();
    let mut last_id = None;
    // The first null cell terminates the path
    for value in row.iter().map_while(Option::as_ref) {
        current_id = tree.find_or_create_child(current_id, &value.label(), NodeKind::Object);
        last_id = Some(current_id);
    }
    last_id
}
