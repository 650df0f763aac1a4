// SPDX-FileCopyrightText: The industry-model-tree authors
// SPDX-License-Identifier: MPL-2.0

use std::fmt;

use thiserror::Error;

use crate::{HashMap, IdAllocator, Node, NodeId, NodeKind, NodePath, TreeNode, Value};

#[derive(Debug, Clone, PartialEq, Error)]
pub enum TreeError {
    #[error("top-level node {0:?} already exists")]
    DuplicateRoot(String),
    #[error("parent node {0} not found")]
    ParentNotFound(NodeId),
    #[error("node {0} not found")]
    NodeNotFound(NodeId),
    #[error("no node named {0:?}")]
    NameNotFound(String),
    #[error("no node at path {0:?}")]
    PathNotFound(NodePath),
    #[error("node {node_id} has no parameter {name:?}")]
    ParameterNotFound { node_id: NodeId, name: String },
    #[error("the root node cannot be removed")]
    RootRemoval,
}

pub type Result<T> = std::result::Result<T, TreeError>;

/// Selects the label of each line when rendering a tree.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum RenderMode {
    Id,
    #[default]
    Name,
    /// The name followed by the attached data, if any.
    Data,
}

/// Return type when removing a node from the tree.
#[derive(Debug, Clone)]
pub struct RemovedSubtree {
    /// The former parent of the removed node.
    pub parent_id: NodeId,

    /// The path of the removed node at the time of removal.
    pub path: NodePath,

    /// All removed nodes in depth-first order, starting with the
    /// requested node.
    pub removed_nodes: Vec<TreeNode>,
}

impl RemovedSubtree {
    pub fn removed_node_ids(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.removed_nodes.iter().map(|node| node.id)
    }
}

/// Hierarchy of objects and parameters below a single root.
///
/// Nodes are owned by an index keyed by [`NodeId`]. Parent and child
/// links refer to other nodes by their id. With the `im` feature
/// cloning a tree is cheap.
#[derive(Debug, Clone)]
pub struct ModelTree {
    root_node_id: NodeId,
    nodes: HashMap<NodeId, TreeNode>,
    ids: IdAllocator,
}

impl Default for ModelTree {
    fn default() -> Self {
        Self::new()
    }
}

impl ModelTree {
    pub const DEFAULT_ROOT_NAME: &'static str = "Root";

    /// Create a new tree that only contains the root node.
    #[must_use]
    pub fn new() -> Self {
        Self::with_root_name(Self::DEFAULT_ROOT_NAME)
    }

    #[must_use]
    pub fn with_root_name(root_name: impl Into<String>) -> Self {
        let mut ids = IdAllocator::default();
        let root_node_id = ids.next_id();
        let root_node = TreeNode::new(root_node_id, None, Node::new(root_name, NodeKind::Root));
        let mut nodes = HashMap::new();
        nodes.insert(root_node_id, root_node);
        Self {
            root_node_id,
            nodes,
            ids,
        }
    }

    #[must_use]
    pub const fn root_node_id(&self) -> NodeId {
        self.root_node_id
    }

    #[must_use]
    pub fn root_node(&self) -> &TreeNode {
        self.resolve_node(self.root_node_id)
    }

    #[must_use]
    pub fn contains_node(&self, id: NodeId) -> bool {
        self.nodes.contains_key(&id)
    }

    #[must_use]
    pub fn lookup_node(&self, id: NodeId) -> Option<&TreeNode> {
        self.nodes.get(&id)
    }

    /// Same as [`Self::lookup_node()`].
    #[must_use]
    pub fn find_node_by_id(&self, id: NodeId) -> Option<&TreeNode> {
        self.lookup_node(id)
    }

    fn lookup_node_mut(&mut self, id: NodeId) -> Option<&mut TreeNode> {
        self.nodes.get_mut(&id)
    }

    /// Resolve a node that is referenced by another node of this tree.
    ///
    /// # Panics
    ///
    /// Panics if the node does not exist, i.e. if the tree is inconsistent.
    #[must_use]
    fn resolve_node(&self, id: NodeId) -> &TreeNode {
        self.nodes.get(&id).expect("node exists")
    }

    /// Total number of nodes in the tree, including the root.
    #[must_use]
    pub fn node_count(&self) -> usize {
        let node_count = self.nodes.len();
        debug_assert_eq!(node_count, self.descendants(self.root_node_id).count());
        node_count
    }

    /// Insert a detached node into the tree.
    ///
    /// Without a parent the node becomes a new top-level node directly below
    /// the root, which fails if a top-level node with the same name exists.
    pub fn create_node(&mut self, node: Node, parent_id: Option<NodeId>) -> Result<NodeId> {
        let parent_id = match parent_id {
            Some(parent_id) => {
                if !self.contains_node(parent_id) {
                    return Err(TreeError::ParentNotFound(parent_id));
                }
                parent_id
            }
            None => {
                if self
                    .child_by_name(self.root_node_id, &node.name, |_| true)
                    .is_some()
                {
                    return Err(TreeError::DuplicateRoot(node.name));
                }
                self.root_node_id
            }
        };
        Ok(self.insert_child(parent_id, node))
    }

    /// Attach a new child, assuming that the parent exists.
    pub(crate) fn insert_child(&mut self, parent_id: NodeId, node: Node) -> NodeId {
        let child_id = self.ids.next_id();
        debug_assert!(!self.contains_node(child_id));
        log::debug!(
            "Adding {kind} node {child_id} {name:?} below {parent_id}",
            kind = node.kind,
            name = node.name
        );
        self.nodes
            .insert(child_id, TreeNode::new(child_id, Some(parent_id), node));
        let parent = self.lookup_node_mut(parent_id);
        debug_assert!(parent.is_some(), "parent node {parent_id} exists");
        if let Some(parent) = parent {
            parent.add_child(child_id);
        }
        child_id
    }

    /// Find a direct child by name among children that match the predicate.
    #[must_use]
    pub fn child_by_name(
        &self,
        parent_id: NodeId,
        name: &str,
        mut predicate: impl FnMut(&TreeNode) -> bool,
    ) -> Option<NodeId> {
        self.lookup_node(parent_id)?
            .children
            .iter()
            .map(|child_id| self.resolve_node(*child_id))
            .find(|child| child.name() == name && predicate(child))
            .map(|child| child.id)
    }

    /// Return the matching child or create it.
    pub(crate) fn find_or_create_child(
        &mut self,
        parent_id: NodeId,
        name: &str,
        kind: NodeKind,
    ) -> NodeId {
        if let Some(child_id) = self.child_by_name(parent_id, name, |child| child.kind() == kind) {
            log::debug!("Found child node {child_id} for {name:?}");
            return child_id;
        }
        self.insert_child(parent_id, Node::new(name, kind))
    }

    /// Remove a node and all of its descendants.
    ///
    /// Removing a node that does not exist (anymore) is a no-op and
    /// returns `None`. The root node cannot be removed.
    pub fn remove_node(&mut self, node_id: NodeId) -> Result<Option<RemovedSubtree>> {
        if node_id == self.root_node_id {
            return Err(TreeError::RootRemoval);
        }
        let Some(path) = self.node_path(node_id) else {
            log::debug!("Node {node_id} has already been removed");
            return Ok(None);
        };
        let removed_node_ids = self.descendants(node_id).map(|node| node.id).collect::<Vec<_>>();
        let parent_id = self
            .resolve_node(node_id)
            .parent
            .expect("non-root node has a parent");
        let removed = self
            .lookup_node_mut(parent_id)
            .is_some_and(|parent| parent.remove_child(node_id));
        debug_assert!(removed);
        let node_count_before = self.nodes.len();
        let removed_nodes = removed_node_ids
            .into_iter()
            .filter_map(|id| self.nodes.remove(&id))
            .collect::<Vec<_>>();
        debug_assert_eq!(node_count_before - self.nodes.len(), removed_nodes.len());
        log::debug!(
            "Removed {count} node(s) at {path:?} below {parent_id}",
            count = removed_nodes.len()
        );
        Ok(Some(RemovedSubtree {
            parent_id,
            path,
            removed_nodes,
        }))
    }

    pub fn rename_node(&mut self, node_id: NodeId, name: impl Into<String>) -> Result<()> {
        let node = self
            .lookup_node_mut(node_id)
            .ok_or(TreeError::NodeNotFound(node_id))?;
        node.node.name = name.into();
        Ok(())
    }

    /// Replace the data attached to a node.
    ///
    /// Returns the previous data.
    pub fn set_node_data(&mut self, node_id: NodeId, data: Option<Value>) -> Result<Option<Value>> {
        let node = self
            .lookup_node_mut(node_id)
            .ok_or(TreeError::NodeNotFound(node_id))?;
        Ok(std::mem::replace(&mut node.node.data, data))
    }

    /// Accumulate a data sample on a node, see [`Value::push_sample()`].
    pub fn append_node_data(&mut self, node_id: NodeId, sample: Value) -> Result<()> {
        let node = self
            .lookup_node_mut(node_id)
            .ok_or(TreeError::NodeNotFound(node_id))?;
        match &mut node.node.data {
            Some(data) => data.push_sample(sample),
            data @ None => *data = Some(sample),
        }
        Ok(())
    }

    /// All ancestors of the given node up to and including the root node.
    ///
    /// Returns `None` if the given node is not found.
    #[must_use]
    pub fn ancestor_nodes(&self, node_id: NodeId) -> Option<impl Iterator<Item = &TreeNode> + '_> {
        let mut next_node = self.lookup_node(node_id)?;
        Some(std::iter::from_fn(move || {
            let parent_node = next_node.parent.map(|parent_id| self.resolve_node(parent_id))?;
            next_node = parent_node;
            Some(parent_node)
        }))
    }

    /// The number of ancestors, i.e. 0 for the root node.
    #[must_use]
    pub fn depth(&self, node_id: NodeId) -> Option<usize> {
        self.ancestor_nodes(node_id).map(Iterator::count)
    }

    /// Names from just below the root down to the node.
    ///
    /// Returns `None` if the node is not found.
    #[must_use]
    pub fn node_path(&self, node_id: NodeId) -> Option<NodePath> {
        let node = self.lookup_node(node_id)?;
        let mut path = NodePath::default();
        if node.parent.is_some() {
            path.push(node.name().to_owned());
        }
        for ancestor in self.ancestor_nodes(node_id)? {
            if ancestor.parent.is_some() {
                path.push(ancestor.name().to_owned());
            }
        }
        path.reverse();
        Some(path)
    }

    /// Traverse the subtree of a node in depth-first pre-order.
    ///
    /// The start node is visited first. Children are visited in
    /// insertion order. The iterator is empty if the node is not found.
    #[must_use]
    pub fn descendants(&self, node_id: NodeId) -> DepthFirstIter<'_> {
        DepthFirstIter {
            tree: self,
            stack: self.lookup_node(node_id).map(|node| node.id).into_iter().collect(),
        }
    }

    /// Find the first node with the given name in pre-order.
    ///
    /// The search starts at `start_id` which is included. The root
    /// is used if `start_id` is `None`.
    #[must_use]
    pub fn find_node_by_name(&self, name: &str, start_id: Option<NodeId>) -> Option<&TreeNode> {
        self.descendants(start_id.unwrap_or(self.root_node_id))
            .find(|node| node.name() == name)
    }

    /// Find all nodes with the given name in pre-order.
    #[must_use]
    pub fn find_nodes_by_name(&self, name: &str) -> Vec<&TreeNode> {
        self.descendants(self.root_node_id)
            .filter(|node| node.name() == name)
            .collect()
    }

    /// Find all nodes whose description contains the given text.
    ///
    /// Nodes without a description never match.
    #[must_use]
    pub fn find_nodes_by_description(&self, text: &str) -> Vec<&TreeNode> {
        self.descendants(self.root_node_id)
            .filter(|node| node.description().is_some_and(|desc| desc.contains(text)))
            .collect()
    }

    /// Mark a node as a tag or clear the mark.
    pub fn set_node_tag(&mut self, node_id: NodeId, is_tag: bool) -> Result<()> {
        let node = self
            .lookup_node_mut(node_id)
            .ok_or(TreeError::NodeNotFound(node_id))?;
        node.node.is_tag = is_tag;
        Ok(())
    }

    /// All nodes below the root that are not tagged, in pre-order.
    pub fn untagged_nodes(&self) -> impl Iterator<Item = &TreeNode> + '_ {
        self.descendants(self.root_node_id)
            .skip(1)
            .filter(|node| !node.is_tag())
    }

    /// Names of all untagged nodes in pre-order.
    #[must_use]
    pub fn untagged_names(&self) -> Vec<&str> {
        self.untagged_nodes().map(TreeNode::name).collect()
    }

    /// Descriptions of all untagged nodes in pre-order, `None` for
    /// nodes without a description.
    #[must_use]
    pub fn untagged_descriptions(&self) -> Vec<Option<&str>> {
        self.untagged_nodes().map(TreeNode::description).collect()
    }

    /// Resolve a path starting below the root.
    ///
    /// Among same-named siblings the first one that leads to a match wins.
    #[must_use]
    pub fn find_node_by_path(&self, path: &NodePath) -> Option<&TreeNode> {
        fn resolve<'a>(
            tree: &'a ModelTree,
            node: &'a TreeNode,
            segments: &[&str],
        ) -> Option<&'a TreeNode> {
            let Some((first, rest)) = segments.split_first() else {
                return Some(node);
            };
            node.children
                .iter()
                .map(|child_id| tree.resolve_node(*child_id))
                .filter(|child| child.name() == *first)
                .find_map(|child| resolve(tree, child, rest))
        }
        let segments = path.segments().collect::<Vec<_>>();
        resolve(self, self.root_node(), &segments)
    }

    /// Insert a new object below the first node with the given name.
    pub fn add_object_to_node(
        &mut self,
        parent_name: &str,
        name: impl Into<String>,
    ) -> Result<NodeId> {
        let parent_id = self
            .find_node_by_name(parent_name, None)
            .map(|node| node.id)
            .ok_or_else(|| TreeError::NameNotFound(parent_name.to_owned()))?;
        Ok(self.insert_child(parent_id, Node::object(name)))
    }

    fn parameter_ids(&self, object_id: NodeId) -> Result<Vec<NodeId>> {
        let object = self
            .lookup_node(object_id)
            .ok_or(TreeError::NodeNotFound(object_id))?;
        let mut parameter_ids = Vec::new();
        for child in object.children.iter().map(|id| self.resolve_node(*id)) {
            match child.kind() {
                NodeKind::Parameter => parameter_ids.push(child.id),
                NodeKind::Group => parameter_ids.extend(
                    child
                        .children
                        .iter()
                        .copied()
                        .filter(|id| self.resolve_node(*id).kind() == NodeKind::Parameter),
                ),
                NodeKind::Root | NodeKind::Object => {}
            }
        }
        Ok(parameter_ids)
    }

    fn parameter_id(&self, object_id: NodeId, name: &str) -> Result<NodeId> {
        self.parameter_ids(object_id)?
            .into_iter()
            .find(|id| self.resolve_node(*id).name() == name)
            .ok_or_else(|| TreeError::ParameterNotFound {
                node_id: object_id,
                name: name.to_owned(),
            })
    }

    /// Parameters of an object with their data, in binding order.
    ///
    /// Includes parameters that are grouped below the object.
    pub fn parameters(&self, object_id: NodeId) -> Result<Vec<(&str, Option<&Value>)>> {
        Ok(self
            .parameter_ids(object_id)?
            .into_iter()
            .map(|id| {
                let node = self.resolve_node(id);
                (node.name(), node.data())
            })
            .collect())
    }

    /// The data of a named parameter of an object.
    pub fn parameter(&self, object_id: NodeId, name: &str) -> Result<Option<&Value>> {
        let parameter_id = self.parameter_id(object_id, name)?;
        Ok(self.resolve_node(parameter_id).data())
    }

    /// Replace the data of a named parameter of an object.
    pub fn set_parameter(
        &mut self,
        object_id: NodeId,
        name: &str,
        value: impl Into<Value>,
    ) -> Result<()> {
        let parameter_id = self.parameter_id(object_id, name)?;
        self.set_node_data(parameter_id, Some(value.into()))?;
        Ok(())
    }

    /// Names of all objects in pre-order.
    #[must_use]
    pub fn object_names(&self) -> Vec<&str> {
        self.names_of_kind(NodeKind::Object)
    }

    /// Names of all parameters in pre-order.
    #[must_use]
    pub fn parameter_names(&self) -> Vec<&str> {
        self.names_of_kind(NodeKind::Parameter)
    }

    fn names_of_kind(&self, kind: NodeKind) -> Vec<&str> {
        self.descendants(self.root_node_id)
            .filter(|node| node.kind() == kind)
            .map(TreeNode::name)
            .collect()
    }

    /// Draw the tree with `├──`/`└──` connectors.
    ///
    /// The first line holds the root label, every further line one
    /// descendant, indented by its depth.
    #[must_use]
    pub fn render(&self, mode: RenderMode) -> String {
        let mut rendered = String::new();
        let root_node = self.root_node();
        rendered.push_str(&format_label(root_node, mode));
        rendered.push('\n');
        let child_count = root_node.children.len();
        for (index, child_id) in root_node.children.iter().enumerate() {
            self.render_subtree(&mut rendered, *child_id, "", index + 1 == child_count, mode);
        }
        rendered
    }

    fn render_subtree(
        &self,
        rendered: &mut String,
        node_id: NodeId,
        prefix: &str,
        is_last: bool,
        mode: RenderMode,
    ) {
        let node = self.resolve_node(node_id);
        let connector = if is_last { "└── " } else { "├── " };
        rendered.push_str(prefix);
        rendered.push_str(connector);
        rendered.push_str(&format_label(node, mode));
        rendered.push('\n');
        let child_prefix = format!("{prefix}{}", if is_last { "    " } else { "│   " });
        let child_count = node.children.len();
        for (index, child_id) in node.children.iter().enumerate() {
            self.render_subtree(rendered, *child_id, &child_prefix, index + 1 == child_count, mode);
        }
    }
}

fn format_label(node: &TreeNode, mode: RenderMode) -> String {
    match mode {
        RenderMode::Id => node.id.to_string(),
        RenderMode::Name => node.name().to_owned(),
        RenderMode::Data => match node.data() {
            Some(data) => format!("{} = {data}", node.name()),
            None => node.name().to_owned(),
        },
    }
}

impl fmt::Display for ModelTree {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render(RenderMode::Name))
    }
}

/// Depth-first pre-order traversal of a subtree.
#[derive(Debug)]
pub struct DepthFirstIter<'a> {
    tree: &'a ModelTree,
    stack: Vec<NodeId>,
}

impl<'a> Iterator for DepthFirstIter<'a> {
    type Item = &'a TreeNode;

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.tree.resolve_node(self.stack.pop()?);
        // Push in reverse to visit children in insertion order
        self.stack.extend(node.children.iter().rev());
        Some(node)
    }
}
