// SPDX-FileCopyrightText: The industry-model-tree authors
// SPDX-License-Identifier: MPL-2.0

use crate::{BindOptions, IndustryModel, TreeNode};

/// The layers of a system, each described by its own model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, derive_more::Display)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ModelLayer {
    /// Physical units and their parts.
    Element,
    /// Methods that operate on elements.
    Method,
    /// Procedures that combine methods.
    Procedure,
}

impl ModelLayer {
    pub const ALL: [Self; 3] = [Self::Element, Self::Method, Self::Procedure];
}

/// One independent [`IndustryModel`] per [`ModelLayer`].
#[derive(Debug, Clone, Default)]
pub struct System {
    element: IndustryModel,
    method: IndustryModel,
    procedure: IndustryModel,
}

impl System {
    /// All layers bind parameters with the same options.
    #[must_use]
    pub fn new(options: BindOptions) -> Self {
        Self {
            element: IndustryModel::new(options),
            method: IndustryModel::new(options),
            procedure: IndustryModel::new(options),
        }
    }

    #[must_use]
    pub const fn model(&self, layer: ModelLayer) -> &IndustryModel {
        match layer {
            ModelLayer::Element => &self.element,
            ModelLayer::Method => &self.method,
            ModelLayer::Procedure => &self.procedure,
        }
    }

    pub fn model_mut(&mut self, layer: ModelLayer) -> &mut IndustryModel {
        match layer {
            ModelLayer::Element => &mut self.element,
            ModelLayer::Method => &mut self.method,
            ModelLayer::Procedure => &mut self.procedure,
        }
    }

    #[must_use]
    pub const fn element(&self) -> &IndustryModel {
        &self.element
    }

    #[must_use]
    pub const fn method(&self) -> &IndustryModel {
        &self.method
    }

    #[must_use]
    pub const fn procedure(&self) -> &IndustryModel {
        &self.procedure
    }

    /// All models in layer order.
    pub fn models(&self) -> impl Iterator<Item = (ModelLayer, &IndustryModel)> + '_ {
        ModelLayer::ALL
            .into_iter()
            .map(|layer| (layer, self.model(layer)))
    }

    /// Search the descriptions of all layers, see
    /// [`ModelTree::find_nodes_by_description()`](crate::ModelTree::find_nodes_by_description).
    #[must_use]
    pub fn find_nodes_by_description(&self, text: &str) -> Vec<(ModelLayer, &TreeNode)> {
        self.models()
            .flat_map(|(layer, model)| {
                model
                    .tree()
                    .find_nodes_by_description(text)
                    .into_iter()
                    .map(move |node| (layer, node))
            })
            .collect()
    }
}
