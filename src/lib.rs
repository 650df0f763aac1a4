// SPDX-FileCopyrightText: The industry-model-tree authors
// SPDX-License-Identifier: MPL-2.0

//! Hierarchical industry model trees built from tabular input.
//!
//! An object table is turned into a tree of objects by
//! [`TableToTreeBuilder`]. A [`ParameterBinder`] attaches parameters
//! from a parameter table to objects of the same name. Runtime data
//! is kept in a [`DataStore`] keyed by [`NodePath`]. The [`flatten`]
//! functions and [`ModelTree::render()`] turn the structure back into
//! tables and text. [`IndustryModel`] ties all parts together and a
//! [`System`] holds one model per [`ModelLayer`].

mod binder;
pub use self::binder::{BindOptions, BindReport, ParameterBinder, ReadDirection};

mod builder;
pub use self::builder::TableToTreeBuilder;

pub mod flatten;

mod imd;
pub use self::imd::{ImdError, ImdRecord, ImdReport};

mod model;
pub use self::model::IndustryModel;

mod node;
pub use self::node::{Node, NodeKind, ParameterGroup, TreeNode, UnknownParameterGroup};

mod node_id;
pub use self::node_id::{IdAllocator, NodeId};

mod path;
pub use self::path::NodePath;

mod store;
pub use self::store::{DataStore, ValueMap};

mod system;
pub use self::system::{ModelLayer, System};

mod table;
pub use self::table::{Row, Table};

mod tree;
pub use self::tree::{DepthFirstIter, ModelTree, RemovedSubtree, RenderMode, Result, TreeError};

mod value;
pub use self::value::{Cell, Value};

#[cfg(feature = "im")]
type HashMap<K, V> = im::HashMap<K, V>;

#[cfg(not(feature = "im"))]
type HashMap<K, V> = std::collections::HashMap<K, V>;
