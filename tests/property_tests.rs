// SPDX-FileCopyrightText: The industry-model-tree authors
// SPDX-License-Identifier: MPL-2.0

//! Structural invariants of building, binding and flattening.

use std::collections::BTreeSet;

use industry_model_tree::{
    flatten, BindOptions, IndustryModel, ParameterBinder, RenderMode, Table, TableToTreeBuilder,
    Value,
};
use proptest::collection::vec;
use proptest::prelude::*;

/// Rows of short labels from a small alphabet to provoke shared prefixes.
fn object_rows() -> impl Strategy<Value = Vec<Vec<String>>> {
    vec(vec("[a-d]", 1..5), 0..30)
}

fn to_table(rows: &[Vec<String>]) -> Table {
    Table::from_labels(rows.iter().map(|row| row.iter().map(String::as_str)))
}

fn row_set(table: &Table) -> BTreeSet<Vec<String>> {
    (0..table.len()).map(|index| table.row_labels(index)).collect()
}

/// The distinct paths of the input after removing paths that are a
/// proper prefix of another path, i.e. that end at an inner node.
fn leaf_paths(rows: &[Vec<String>]) -> BTreeSet<Vec<String>> {
    let all = rows.iter().cloned().collect::<BTreeSet<_>>();
    all.iter()
        .filter(|path| {
            !all.iter()
                .any(|other| other.len() > path.len() && other.starts_with(path))
        })
        .cloned()
        .collect()
}

proptest! {
    /// Building twice from the same table yields the same shape.
    #[test]
    fn identical_input_produces_identical_shape(rows in object_rows()) {
        let table = to_table(&rows);
        let first = TableToTreeBuilder.build(&table);
        let second = TableToTreeBuilder.build(&table);
        prop_assert_eq!(first.node_count(), second.node_count());
        prop_assert_eq!(first.render(RenderMode::Name), second.render(RenderMode::Name));
    }

    /// Flattening reproduces exactly the leaf paths of the input.
    #[test]
    fn flattening_round_trip(rows in object_rows()) {
        let tree = TableToTreeBuilder.build(&to_table(&rows));
        let flattened = flatten::to_table(&tree, true);
        prop_assert_eq!(leaf_paths(&rows), row_set(&flattened));
    }

    /// Every distinct prefix of every row is exactly one node.
    #[test]
    fn prefixes_are_shared(rows in object_rows()) {
        let tree = TableToTreeBuilder.build(&to_table(&rows));
        let prefixes = rows
            .iter()
            .flat_map(|row| (1..=row.len()).map(move |len| row[..len].to_vec()))
            .collect::<BTreeSet<_>>();
        prop_assert_eq!(1 + prefixes.len(), tree.node_count());
    }

    /// Binding never changes the object structure and creates one
    /// parameter per matching object.
    #[test]
    fn binding_keeps_objects(rows in object_rows(), object in "[a-d]", parameter in "[x-z]") {
        let table = to_table(&rows);
        let mut tree = TableToTreeBuilder.build(&table);
        let objects_before = row_set(&flatten::to_table(&tree, false));
        let matches = tree.find_nodes_by_name(&object).len();
        let parameters = Table::from_rows([vec![
            None,
            Some(Value::from(object.as_str())),
            Some(Value::from(parameter.as_str())),
        ]]);
        let report = ParameterBinder::default().bind(&mut tree, &parameters);
        prop_assert_eq!(matches, report.bound);
        prop_assert_eq!(matches, tree.find_nodes_by_name(&parameter).len());
        prop_assert_eq!(objects_before, row_set(&flatten::to_table(&tree, false)));
    }

    /// Removing a node removes all of its descendants and their data.
    #[test]
    fn removal_cascades(rows in object_rows(), name in "[a-d]") {
        let (mut model, _) =
            IndustryModel::from_tables(&to_table(&rows), None, BindOptions::default());
        let ids = model
            .tree()
            .descendants(model.tree().root_node_id())
            .skip(1)
            .map(|node| node.id)
            .collect::<Vec<_>>();
        for id in &ids {
            model.set_data(*id, "v", 1).unwrap();
        }
        let Some(target) = model.tree().find_node_by_name(&name, None).map(|node| node.id) else {
            return Ok(());
        };
        let subtree = model
            .tree()
            .descendants(target)
            .map(|node| node.id)
            .collect::<Vec<_>>();
        let count_before = model.tree().node_count();
        let removed = model.remove_node(target).unwrap().unwrap();
        prop_assert_eq!(subtree.clone(), removed.removed_node_ids().collect::<Vec<_>>());
        prop_assert_eq!(count_before - subtree.len(), model.tree().node_count());
        for id in subtree {
            prop_assert!(model.tree().find_node_by_id(id).is_none());
        }
        for (path, _, _) in model.store().entries() {
            prop_assert!(!path.starts_with(&removed.path));
        }
    }

    /// Appending samples one by one accumulates all of them in order.
    #[test]
    fn append_accumulates(samples in vec(any::<i64>(), 2..10)) {
        let (mut model, _) = IndustryModel::from_tables(
            &Table::from_labels([vec!["a"]]),
            None,
            BindOptions::default(),
        );
        let node_id = model.tree().find_node_by_name("a", None).unwrap().id;
        for sample in &samples {
            model.append_data(node_id, "y", *sample).unwrap();
        }
        let expected = Value::List(samples.into_iter().map(Value::Int).collect());
        prop_assert_eq!(Some(&expected), model.get_data(node_id, "y").unwrap());
    }
}
