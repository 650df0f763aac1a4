// SPDX-FileCopyrightText: The industry-model-tree authors
// SPDX-License-Identifier: MPL-2.0

use crate::{
    tree::Result, Cell, ModelTree, Node, NodeId, NodeKind, NodePath, ParameterGroup, Table,
    TreeError, Value,
};

/// Where to look for the object and the parameter within a row.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ReadDirection {
    /// The last non-null cell is the parameter, the one before it the object.
    ///
    /// Leading cells are only grouping columns for humans.
    #[default]
    RightToLeft,
    /// The first non-null cell is the object, the next one the parameter.
    LeftToRight,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BindOptions {
    pub direction: ReadDirection,
}

/// Outcome of binding a parameter table.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BindReport {
    /// Number of rows that have been processed.
    pub rows: usize,
    /// Number of parameter nodes that have been created.
    pub bound: usize,
    /// Indexes of rows with less than two non-null cells.
    pub skipped_rows: Vec<usize>,
    /// Indexes of rows whose object did not match any node.
    pub unmatched_rows: Vec<usize>,
}

/// Attaches parameters from a parameter table to objects of a tree.
#[derive(Debug, Clone, Copy, Default)]
pub struct ParameterBinder {
    options: BindOptions,
}

impl ParameterBinder {
    #[must_use]
    pub const fn new(options: BindOptions) -> Self {
        Self { options }
    }

    #[must_use]
    pub const fn options(&self) -> BindOptions {
        self.options
    }

    /// Bind all rows of a parameter table.
    ///
    /// Each parameter is attached below every object with a matching
    /// name. Malformed or unmatched rows are skipped and reported, they
    /// never abort the remaining rows.
    pub fn bind(&self, tree: &mut ModelTree, table: &Table) -> BindReport {
        let mut report = BindReport {
            rows: table.len(),
            ..Default::default()
        };
        for (index, row) in table.rows().iter().enumerate() {
            let Some((object_name, parameter_name)) = self.object_parameter_names(row) else {
                log::warn!("Skipping parameter row {index} with less than two values: {row:?}");
                report.skipped_rows.push(index);
                continue;
            };
            let object_ids = tree
                .find_nodes_by_name(&object_name)
                .into_iter()
                .filter(|node| node.kind() == NodeKind::Object)
                .map(|node| node.id)
                .collect::<Vec<_>>();
            if object_ids.is_empty() {
                log::warn!(
                    "No object {object_name:?} for parameter {parameter_name:?} in row {index}"
                );
                report.unmatched_rows.push(index);
                continue;
            }
            for object_id in object_ids {
                log::debug!(
                    "Binding parameter {parameter_name:?} to object {object_id} {object_name:?}"
                );
                tree.insert_child(object_id, Node::parameter(parameter_name.clone()));
                report.bound += 1;
            }
        }
        report
    }

    /// Extract `(object_name, parameter_name)` from a row.
    fn object_parameter_names(&self, row: &[Cell]) -> Option<(String, String)> {
        let mut values = row.iter().flatten().map(Value::label);
        match self.options.direction {
            ReadDirection::RightToLeft => {
                let mut values = values.rev();
                let parameter_name = values.next()?;
                let object_name = values.next()?;
                Some((object_name, parameter_name))
            }
            ReadDirection::LeftToRight => {
                let object_name = values.next()?;
                let parameter_name = values.next()?;
                Some((object_name, parameter_name))
            }
        }
    }

    /// Bind a single parameter to the object at an exact path.
    ///
    /// If `type_tag` names a [`ParameterGroup`] the parameter is placed
    /// below a grouping node of that name, which is created on demand.
    /// Any other tag binds the parameter directly to the object.
    pub fn bind_named(
        &self,
        tree: &mut ModelTree,
        type_tag: &str,
        parameter_name: &str,
        object_path: &NodePath,
    ) -> Result<NodeId> {
        let object_id = tree
            .find_node_by_path(object_path)
            .map(|node| node.id)
            .ok_or_else(|| TreeError::PathNotFound(object_path.clone()))?;
        let parent_id = match type_tag.parse::<ParameterGroup>() {
            Ok(group) => tree.find_or_create_child(object_id, group.name(), NodeKind::Group),
            Err(_) => {
                log::debug!("Binding {parameter_name:?} without grouping for tag {type_tag:?}");
                object_id
            }
        };
        Ok(tree.insert_child(parent_id, Node::parameter(parameter_name)))
    }
}
