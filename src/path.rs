// SPDX-FileCopyrightText: The industry-model-tree authors
// SPDX-License-Identifier: MPL-2.0

use std::{convert::Infallible, fmt, str::FromStr};

/// Names of all nodes from just below the root down to a node.
///
/// The root itself has the empty path. Unlike plain names, paths
/// distinguish same-named nodes in different branches.
#[derive(Debug, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct NodePath(Vec<String>);

impl NodePath {
    pub const SEPARATOR: char = '/';

    pub const ROOT: Self = Self(Vec::new());

    #[must_use]
    pub fn new(segments: impl IntoIterator<Item = impl Into<String>>) -> Self {
        Self(segments.into_iter().map(Into::into).collect())
    }

    #[must_use]
    pub fn is_root(&self) -> bool {
        self.0.is_empty()
    }

    pub fn segments(&self) -> impl ExactSizeIterator<Item = &str> + '_ {
        self.0.iter().map(String::as_str)
    }

    #[must_use]
    pub fn depth(&self) -> usize {
        self.0.len()
    }

    /// The name of the addressed node, `None` for the root.
    #[must_use]
    pub fn last_segment(&self) -> Option<&str> {
        self.0.last().map(String::as_str)
    }

    /// Split the path into parent segments and the last child segment.
    #[must_use]
    pub fn parent_child_segments(&self) -> (&[String], Option<&str>) {
        match self.0.split_last() {
            Some((child, parents)) => (parents, Some(child.as_str())),
            None => (&[], None),
        }
    }

    /// Check if `prefix` addresses this node or one of its ancestors.
    #[must_use]
    pub fn starts_with(&self, prefix: &NodePath) -> bool {
        self.0.starts_with(&prefix.0)
    }

    #[must_use]
    pub fn join(&self, segment: impl Into<String>) -> Self {
        let mut segments = self.0.clone();
        segments.push(segment.into());
        Self(segments)
    }

    pub(crate) fn push(&mut self, segment: String) {
        self.0.push(segment);
    }

    pub(crate) fn reverse(&mut self) {
        self.0.reverse();
    }
}

impl<S: Into<String>> FromIterator<S> for NodePath {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self::new(iter)
    }
}

/// Inverse of the [`Display`](fmt::Display) representation.
///
/// Segments that contain the separator cannot be recovered.
impl FromStr for NodePath {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.is_empty() {
            return Ok(Self::ROOT);
        }
        Ok(s.split(Self::SEPARATOR).collect())
    }
}

impl fmt::Display for NodePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (index, segment) in self.0.iter().enumerate() {
            if index > 0 {
                write!(f, "{}", Self::SEPARATOR)?;
            }
            f.write_str(segment)?;
        }
        Ok(())
    }
}
