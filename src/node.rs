// SPDX-FileCopyrightText: The industry-model-tree authors
// SPDX-License-Identifier: MPL-2.0

use std::{fmt, str::FromStr};

use crate::{NodeId, Value};

/// The role of a node in the hierarchy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, derive_more::Display)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum NodeKind {
    /// The single distinguished root of a tree.
    Root,
    /// An object, created from an object table.
    Object,
    /// A parameter bound to an object.
    Parameter,
    /// Grouping level between an object and its parameters,
    /// e.g. "input" or "output".
    Group,
}

impl NodeKind {
    /// Parameters and their grouping levels.
    #[must_use]
    pub const fn is_parameter_side(self) -> bool {
        matches!(self, Self::Parameter | Self::Group)
    }
}

/// Grouping levels supported by named parameter binding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ParameterGroup {
    Input,
    Output,
}

impl ParameterGroup {
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Input => "input",
            Self::Output => "output",
        }
    }
}

impl fmt::Display for ParameterGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown parameter group {0:?}")]
pub struct UnknownParameterGroup(pub String);

impl FromStr for ParameterGroup {
    type Err = UnknownParameterGroup;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.eq_ignore_ascii_case(Self::Input.name()) {
            Ok(Self::Input)
        } else if s.eq_ignore_ascii_case(Self::Output.name()) {
            Ok(Self::Output)
        } else {
            Err(UnknownParameterGroup(s.to_owned()))
        }
    }
}

/// Intrinsic data of a node, independent of its position in a tree.
#[derive(Debug, Clone, PartialEq)]
pub struct Node {
    pub name: String,
    pub kind: NodeKind,
    /// Optional attached value, mostly used by parameters.
    pub data: Option<Value>,
    /// Human readable text, searchable by substring.
    pub description: Option<String>,
    /// Tagged nodes only group other nodes and are excluded from
    /// the untagged listings of a tree.
    pub is_tag: bool,
}

impl Node {
    /// Construct a detached, untagged node without data.
    #[must_use]
    pub fn new(name: impl Into<String>, kind: NodeKind) -> Self {
        Self {
            name: name.into(),
            kind,
            data: None,
            description: None,
            is_tag: false,
        }
    }

    #[must_use]
    pub fn object(name: impl Into<String>) -> Self {
        Self::new(name, NodeKind::Object)
    }

    #[must_use]
    pub fn parameter(name: impl Into<String>) -> Self {
        Self::new(name, NodeKind::Parameter)
    }

    #[must_use]
    pub fn with_data(mut self, data: impl Into<Value>) -> Self {
        self.data = Some(data.into());
        self
    }

    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    #[must_use]
    pub fn with_tag(mut self, is_tag: bool) -> Self {
        self.is_tag = is_tag;
        self
    }
}

/// A node that is attached to a tree.
#[derive(Debug, Clone)]
pub struct TreeNode {
    /// Identifier for direct lookup.
    pub id: NodeId,

    /// Link to the parent node.
    ///
    /// Must be `None` for the root node and `Some` for all other nodes.
    pub parent: Option<NodeId>,

    pub(crate) children: Vec<NodeId>,

    /// The actual content of this node.
    pub node: Node,
}

impl TreeNode {
    pub(crate) const fn new(id: NodeId, parent: Option<NodeId>, node: Node) -> Self {
        Self {
            id,
            parent,
            children: Vec::new(),
            node,
        }
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.node.name
    }

    #[must_use]
    pub const fn kind(&self) -> NodeKind {
        self.node.kind
    }

    #[must_use]
    pub const fn data(&self) -> Option<&Value> {
        self.node.data.as_ref()
    }

    #[must_use]
    pub fn description(&self) -> Option<&str> {
        self.node.description.as_deref()
    }

    #[must_use]
    pub const fn is_tag(&self) -> bool {
        self.node.is_tag
    }

    /// Direct children in insertion order.
    #[must_use]
    pub fn children(&self) -> &[NodeId] {
        &self.children
    }

    #[must_use]
    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }

    /// Append a child.
    ///
    /// Adding the same child twice duplicates it.
    pub(crate) fn add_child(&mut self, child_id: NodeId) {
        self.children.push(child_id);
    }

    /// Remove a child.
    ///
    /// Returns `false` if the node is not a child.
    pub(crate) fn remove_child(&mut self, child_id: NodeId) -> bool {
        let Some(index) = self.children.iter().position(|id| *id == child_id) else {
            return false;
        };
        self.children.remove(index);
        true
    }
}

#[cfg(test)]
mod tests {
    use super::{Node, NodeKind, ParameterGroup, TreeNode};
    use crate::IdAllocator;

    #[test]
    fn remove_child_is_idempotent() {
        let mut ids = IdAllocator::default();
        let mut parent = TreeNode::new(ids.next_id(), None, Node::object("a"));
        let child_id = ids.next_id();
        parent.add_child(child_id);
        assert!(parent.remove_child(child_id));
        assert!(!parent.remove_child(child_id));
        assert!(parent.is_leaf());
    }

    #[test]
    fn parse_parameter_group() {
        assert_eq!(Ok(ParameterGroup::Input), "Input".parse());
        assert_eq!(Ok(ParameterGroup::Output), "output".parse());
        assert!("category".parse::<ParameterGroup>().is_err());
    }

    #[test]
    fn parameter_side_kinds() {
        assert!(NodeKind::Parameter.is_parameter_side());
        assert!(NodeKind::Group.is_parameter_side());
        assert!(!NodeKind::Object.is_parameter_side());
        assert!(!NodeKind::Root.is_parameter_side());
    }
}
