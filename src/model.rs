// SPDX-FileCopyrightText: The industry-model-tree authors
// SPDX-License-Identifier: MPL-2.0

use crate::{
    flatten, tree::Result, BindOptions, BindReport, DataStore, ModelTree, Node, NodeId,
    NodePath, ParameterBinder, RemovedSubtree, RenderMode, Table, TableToTreeBuilder, TreeError,
    Value, ValueMap,
};

/// A tree together with the runtime data of its nodes.
///
/// All mutations that affect both parts go through this type, e.g.
/// removing or renaming a node also purges or moves the data stored
/// for its subtree.
///
/// Data is keyed by [`NodePath`], which only consists of names. Nodes
/// with the same name below the same parent share their data, this
/// includes an object and a parameter of the same name.
#[derive(Debug, Clone, Default)]
pub struct IndustryModel {
    tree: ModelTree,
    store: DataStore,
    binder: ParameterBinder,
}

impl IndustryModel {
    #[must_use]
    pub fn new(options: BindOptions) -> Self {
        Self {
            binder: ParameterBinder::new(options),
            ..Default::default()
        }
    }

    /// Build the objects and optionally bind parameters.
    ///
    /// ```
    /// # use industry_model_tree::{BindOptions, IndustryModel, Table};
    /// let objects = Table::from_labels([vec!["Blade", "Cross", "Line"], vec!["Blade", "Tip"]]);
    /// let parameters = Table::from_labels([vec!["Cross", "Thickness"]]);
    /// let (model, report) = IndustryModel::from_tables(&objects, Some(&parameters), BindOptions::default());
    /// assert_eq!(1, report.bound);
    /// assert_eq!(2, model.object_table().len());
    /// ```
    #[must_use]
    pub fn from_tables(
        objects: &Table,
        parameters: Option<&Table>,
        options: BindOptions,
    ) -> (Self, BindReport) {
        let mut model = Self::new(options);
        TableToTreeBuilder.extend(&mut model.tree, objects);
        let report = parameters
            .map(|parameters| model.bind_parameters(parameters))
            .unwrap_or_default();
        (model, report)
    }

    #[must_use]
    pub const fn tree(&self) -> &ModelTree {
        &self.tree
    }

    /// Mutable access to the tree.
    ///
    /// Nodes removed or renamed through this reference leave their stored
    /// data behind, use [`Self::remove_node()`] and [`Self::rename_node()`]
    /// instead.
    pub fn tree_mut(&mut self) -> &mut ModelTree {
        &mut self.tree
    }

    #[must_use]
    pub const fn store(&self) -> &DataStore {
        &self.store
    }

    #[must_use]
    pub fn into_parts(self) -> (ModelTree, DataStore) {
        (self.tree, self.store)
    }

    /// Add more objects from an object table.
    pub fn add_objects(&mut self, objects: &Table) {
        TableToTreeBuilder.extend(&mut self.tree, objects);
    }

    pub fn bind_parameters(&mut self, parameters: &Table) -> BindReport {
        self.binder.bind(&mut self.tree, parameters)
    }

    pub fn bind_named(
        &mut self,
        type_tag: &str,
        parameter_name: &str,
        object_path: &NodePath,
    ) -> Result<NodeId> {
        self.binder
            .bind_named(&mut self.tree, type_tag, parameter_name, object_path)
    }

    /// Insert a detached node, see [`ModelTree::create_node()`].
    pub fn create_node(&mut self, node: Node, parent_id: Option<NodeId>) -> Result<NodeId> {
        self.tree.create_node(node, parent_id)
    }

    pub fn add_object_to_node(
        &mut self,
        parent_name: &str,
        name: impl Into<String>,
    ) -> Result<NodeId> {
        self.tree.add_object_to_node(parent_name, name)
    }

    fn node_path(&self, node_id: NodeId) -> Result<NodePath> {
        self.tree
            .node_path(node_id)
            .ok_or(TreeError::NodeNotFound(node_id))
    }

    /// Store a value for a node, overwriting any previous value.
    pub fn set_data(
        &mut self,
        node_id: NodeId,
        key: impl Into<String>,
        value: impl Into<Value>,
    ) -> Result<Option<Value>> {
        let path = self.node_path(node_id)?;
        Ok(self.store.set(&path, key, value.into()))
    }

    pub fn get_data(&self, node_id: NodeId, key: &str) -> Result<Option<&Value>> {
        let path = self.node_path(node_id)?;
        Ok(self.store.get(&path, key))
    }

    /// Accumulate a sample for a node, see [`DataStore::append()`].
    pub fn append_data(
        &mut self,
        node_id: NodeId,
        key: impl Into<String>,
        sample: impl Into<Value>,
    ) -> Result<()> {
        let path = self.node_path(node_id)?;
        self.store.append(&path, key, sample.into());
        Ok(())
    }

    pub fn delete_data(&mut self, node_id: NodeId, key: &str) -> Result<Option<Value>> {
        let path = self.node_path(node_id)?;
        Ok(self.store.delete(&path, key))
    }

    /// All values stored for a node.
    pub fn data_of(&self, node_id: NodeId) -> Result<Option<&ValueMap>> {
        let path = self.node_path(node_id)?;
        Ok(self.store.get_all(&path))
    }

    /// The first node below the root with the given name.
    fn node_id_by_name(&self, name: &str) -> Result<NodeId> {
        self.tree
            .descendants(self.tree.root_node_id())
            .skip(1)
            .find(|node| node.name() == name)
            .map(|node| node.id)
            .ok_or_else(|| TreeError::NameNotFound(name.to_owned()))
    }

    /// Replace the attached data of the first node with the given name.
    ///
    /// Fails if no such node exists, nodes are never created implicitly.
    pub fn set_node_data(&mut self, name: &str, value: impl Into<Value>) -> Result<NodeId> {
        let node_id = self.node_id_by_name(name)?;
        self.tree.set_node_data(node_id, Some(value.into()))?;
        Ok(node_id)
    }

    /// Accumulate a sample in the attached data of the first node
    /// with the given name.
    pub fn add_node_data(&mut self, name: &str, sample: impl Into<Value>) -> Result<NodeId> {
        let node_id = self.node_id_by_name(name)?;
        self.tree.append_node_data(node_id, sample.into())?;
        Ok(node_id)
    }

    /// Parameters and their attached data of the first node with
    /// the given name.
    pub fn parameters_of(&self, name: &str) -> Result<Vec<(&str, Option<&Value>)>> {
        let node_id = self.node_id_by_name(name)?;
        self.tree.parameters(node_id)
    }

    /// Remove a node with its subtree and all data stored for it.
    ///
    /// Data is purged by path. Siblings that share the name of the
    /// removed node share its path and lose their data, too.
    pub fn remove_node(&mut self, node_id: NodeId) -> Result<Option<RemovedSubtree>> {
        let Some(removed) = self.tree.remove_node(node_id)? else {
            return Ok(None);
        };
        let purged = self.store.remove_subtree(&removed.path);
        log::debug!(
            "Purged data of {purged} path(s) below {path:?}",
            path = removed.path
        );
        Ok(Some(removed))
    }

    /// Rename a node and move the data stored for its subtree.
    ///
    /// Stored values at the new path are overwritten by moved values
    /// with the same key. Data of same-named siblings moves, too.
    pub fn rename_node(&mut self, node_id: NodeId, name: impl Into<String>) -> Result<()> {
        let old_path = self.node_path(node_id)?;
        self.tree.rename_node(node_id, name)?;
        let new_path = self.node_path(node_id)?;
        let moved = self.store.move_subtree(&old_path, &new_path);
        log::debug!("Moved data of {moved} path(s) from {old_path:?} to {new_path:?}");
        Ok(())
    }

    /// Object paths without parameters.
    #[must_use]
    pub fn object_table(&self) -> Table {
        flatten::to_table(&self.tree, false)
    }

    /// Object paths including parameters.
    #[must_use]
    pub fn full_table(&self) -> Table {
        flatten::to_table(&self.tree, true)
    }

    #[must_use]
    pub fn parameter_table(&self) -> Table {
        flatten::to_parameter_table(&self.tree)
    }

    #[must_use]
    pub fn data_table(&self) -> Table {
        flatten::to_data_table(&self.store)
    }

    #[must_use]
    pub fn render(&self, mode: RenderMode) -> String {
        self.tree.render(mode)
    }
}
