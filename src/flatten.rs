// SPDX-FileCopyrightText: The industry-model-tree authors
// SPDX-License-Identifier: MPL-2.0

use crate::{DataStore, ModelTree, NodeId, NodeKind, Row, Table, Value};

/// Every path from the top level down to a leaf as a row of names.
///
/// Without parameters, objects whose children are all parameters (or
/// parameter groups) are leaves and the parameter subtrees are omitted.
/// Rows are padded with null cells and all-null columns are dropped.
#[must_use]
pub fn to_table(tree: &ModelTree, include_parameters: bool) -> Table {
    let mut table = Table::new();
    let mut path = Vec::new();
    for child_id in tree.root_node().children() {
        collect_paths(tree, *child_id, include_parameters, &mut path, &mut table);
    }
    table.drop_null_columns();
    table
}

fn collect_paths(
    tree: &ModelTree,
    node_id: NodeId,
    include_parameters: bool,
    path: &mut Vec<String>,
    table: &mut Table,
) {
    let Some(node) = tree.lookup_node(node_id) else {
        return;
    };
    if !include_parameters && node.kind().is_parameter_side() {
        return;
    }
    path.push(node.name().to_owned());
    let children = node
        .children()
        .iter()
        .copied()
        .filter(|child_id| {
            include_parameters
                || tree
                    .lookup_node(*child_id)
                    .is_some_and(|child| !child.kind().is_parameter_side())
        })
        .collect::<Vec<_>>();
    if children.is_empty() {
        table.push_row(path.iter().map(|name| Some(Value::from(name.as_str()))).collect());
    }
    for child_id in children {
        collect_paths(tree, child_id, include_parameters, path, table);
    }
    path.pop();
}

/// One row `(path of the owning object, parameter name)` per parameter.
///
/// Grouping levels are part of the path.
#[must_use]
pub fn to_parameter_table(tree: &ModelTree) -> Table {
    tree.descendants(tree.root_node_id())
        .filter(|node| node.kind() == NodeKind::Parameter)
        .filter_map(|node| {
            let parent_path = tree.node_path(node.parent?)?;
            let row: Row = vec![
                Some(Value::Text(parent_path.to_string())),
                Some(Value::from(node.name())),
            ];
            Some(row)
        })
        .collect()
}

/// One row `(node path, key, value)` per stored value in path order.
#[must_use]
pub fn to_data_table(store: &DataStore) -> Table {
    store
        .entries()
        .map(|(path, key, value)| {
            vec![
                Some(Value::Text(path.to_string())),
                Some(Value::from(key)),
                Some(value.clone()),
            ]
        })
        .collect()
}
