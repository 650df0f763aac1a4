// SPDX-FileCopyrightText: The industry-model-tree authors
// SPDX-License-Identifier: MPL-2.0

//! Line-oriented export format.
//!
//! Every line starts with a tag followed by comma-separated fields:
//!
//! ```text
//! O,<model name>
//! P,<unit path>,<parameter 1>,<parameter 2>[],...
//! U,<unit path>,<value 1>,<value 2>,...
//! ```
//!
//! A unit is an object, addressed by its [`NodePath`] (`Blade/Cross`).
//! The `P` row lists the parameters of a unit in binding order. A
//! trailing `[]` marks a parameter whose data is a list of samples.
//! Each `U` row carries one sample per list parameter. Scalars are only
//! written on the first `U` row of their unit, later rows leave the field
//! empty.
//!
//! Fields are not escaped, i.e. names and values must neither contain
//! commas nor line breaks. Same-named siblings share a path and cannot
//! be told apart, the first one receives all rows.

use std::{collections::HashSet, fmt};

use thiserror::Error;

use crate::{IndustryModel, NodeId, NodeKind, NodePath, Value};

const FIELD_SEPARATOR: char = ',';

const LIST_MARKER: &str = "[]";

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ImdError {
    #[error("unknown tag {tag:?} in line {line}")]
    UnknownTag { line: usize, tag: String },
    #[error("missing name in line {line}")]
    MissingField { line: usize },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImdRecord {
    /// `O`: model header.
    Model(String),
    /// `U`: one row of parameter values of a unit.
    Unit { unit: String, values: Vec<String> },
    /// `P`: parameter names of a unit, list parameters with a trailing `[]`.
    Parameter { unit: String, names: Vec<String> },
}

impl ImdRecord {
    pub const MODEL_TAG: &'static str = "O";
    pub const UNIT_TAG: &'static str = "U";
    pub const PARAMETER_TAG: &'static str = "P";

    /// Parse a single line.
    ///
    /// `line_number` is only used for error reporting. Returns `None` for
    /// blank lines.
    pub fn parse_line(line: &str, line_number: usize) -> Result<Option<Self>, ImdError> {
        let line = line.trim_end_matches(['\r', '\n']);
        if line.trim().is_empty() {
            return Ok(None);
        }
        let mut fields = line.split(FIELD_SEPARATOR);
        let tag = fields.next().unwrap_or_default();
        let missing_field = || ImdError::MissingField { line: line_number };
        let record = match tag {
            Self::MODEL_TAG => Self::Model(fields.next().ok_or_else(missing_field)?.to_owned()),
            Self::UNIT_TAG | Self::PARAMETER_TAG => {
                let unit = fields
                    .next()
                    .filter(|unit| !unit.is_empty())
                    .ok_or_else(missing_field)?
                    .to_owned();
                let fields = fields.map(ToOwned::to_owned).collect();
                if tag == Self::UNIT_TAG {
                    Self::Unit {
                        unit,
                        values: fields,
                    }
                } else {
                    Self::Parameter {
                        unit,
                        names: fields,
                    }
                }
            }
            tag => {
                return Err(ImdError::UnknownTag {
                    line: line_number,
                    tag: tag.to_owned(),
                })
            }
        };
        Ok(Some(record))
    }
}

impl fmt::Display for ImdRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (tag, unit, fields) = match self {
            Self::Model(name) => return write!(f, "{}{FIELD_SEPARATOR}{name}", Self::MODEL_TAG),
            Self::Unit { unit, values } => (Self::UNIT_TAG, unit, values),
            Self::Parameter { unit, names } => (Self::PARAMETER_TAG, unit, names),
        };
        write!(f, "{tag}{FIELD_SEPARATOR}{unit}")?;
        for field in fields {
            write!(f, "{FIELD_SEPARATOR}{field}")?;
        }
        Ok(())
    }
}

/// Outcome of loading an export.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ImdReport {
    /// The name from the last `O` line.
    pub model_name: Option<String>,
    /// Number of `U` rows that have been applied.
    pub loaded_rows: usize,
    /// Line numbers of `P` and `U` rows that have been skipped.
    pub skipped_lines: Vec<usize>,
}

impl IndustryModel {
    /// Export the attached parameter data of all objects.
    ///
    /// Objects without parameters are omitted. Every other object yields
    /// a `P` row followed by one `U` row per sample of its longest list,
    /// at least one if it has a scalar or a parameter without data.
    /// Missing data is written as an empty field.
    #[must_use]
    pub fn to_imd(&self, model_name: &str) -> String {
        let tree = self.tree();
        let mut lines = vec![ImdRecord::Model(model_name.to_owned()).to_string()];
        for object in tree
            .descendants(tree.root_node_id())
            .filter(|node| node.kind() == NodeKind::Object)
        {
            let Ok(parameters) = tree.parameters(object.id) else {
                continue;
            };
            if parameters.is_empty() {
                continue;
            }
            let Some(unit) = tree.node_path(object.id).map(|path| path.to_string()) else {
                continue;
            };
            let names = parameters
                .iter()
                .map(|(name, data)| match data {
                    Some(Value::List(_)) => format!("{name}{LIST_MARKER}"),
                    _ => (*name).to_owned(),
                })
                .collect();
            lines.push(
                ImdRecord::Parameter {
                    unit: unit.clone(),
                    names,
                }
                .to_string(),
            );
            let sample_count = parameters
                .iter()
                .map(|(_, data)| match data {
                    Some(Value::List(samples)) => samples.len(),
                    _ => 1,
                })
                .max()
                .unwrap_or(0);
            for sample_index in 0..sample_count {
                let values = parameters
                    .iter()
                    .map(|(_, data)| match data {
                        Some(Value::List(samples)) => samples
                            .get(sample_index)
                            .map(ToString::to_string)
                            .unwrap_or_default(),
                        Some(scalar) if sample_index == 0 => scalar.to_string(),
                        Some(_) | None => String::new(),
                    })
                    .collect();
                lines.push(
                    ImdRecord::Unit {
                        unit: unit.clone(),
                        values,
                    }
                    .to_string(),
                );
            }
        }
        let mut exported = lines.join("\n");
        exported.push('\n');
        exported
    }

    /// Load parameter data from an export.
    ///
    /// Units are resolved by path. A unit that consists of a single name
    /// that does not resolve as a path falls back to the first object
    /// with that name.
    ///
    /// A `P` row resets the list parameters it marks to an empty list.
    /// Every non-empty `U` field of a list parameter appends a sample.
    /// The first `U` row of a unit replaces the data of its other
    /// parameters, further rows append samples. Rows of unknown units or
    /// with a mismatching number of values are skipped. Empty fields leave
    /// the parameter untouched.
    pub fn load_imd(&mut self, text: &str) -> Result<ImdReport, ImdError> {
        let mut report = ImdReport::default();
        let mut loaded_units = HashSet::<NodeId>::new();
        let mut list_parameters = HashSet::<(NodeId, String)>::new();
        for (index, line) in text.lines().enumerate() {
            let line_number = index + 1;
            let Some(record) = ImdRecord::parse_line(line, line_number)? else {
                continue;
            };
            log::debug!("Line {line_number}: {record:?}");
            let (unit, fields, is_header) = match record {
                ImdRecord::Model(name) => {
                    report.model_name = Some(name);
                    continue;
                }
                ImdRecord::Parameter { unit, names } => (unit, names, true),
                ImdRecord::Unit { unit, values } => (unit, values, false),
            };
            let Some(object_id) = self.resolve_unit(&unit) else {
                log::warn!("Skipping line {line_number}: unknown unit {unit:?}");
                report.skipped_lines.push(line_number);
                continue;
            };
            let parameter_names = match self.tree().parameters(object_id) {
                Ok(parameters) => parameters
                    .into_iter()
                    .map(|(name, _)| name.to_owned())
                    .collect::<Vec<_>>(),
                Err(err) => {
                    log::warn!("Skipping line {line_number}: {err}");
                    report.skipped_lines.push(line_number);
                    continue;
                }
            };
            if is_header {
                loaded_units.remove(&object_id);
                for name in &fields {
                    let Some(name) = name.strip_suffix(LIST_MARKER) else {
                        list_parameters.remove(&(object_id, name.clone()));
                        continue;
                    };
                    match self
                        .tree_mut()
                        .set_parameter(object_id, name, Value::List(Vec::new()))
                    {
                        Ok(()) => {
                            list_parameters.insert((object_id, name.to_owned()));
                        }
                        Err(err) => log::warn!("Line {line_number}: {err}"),
                    }
                }
                continue;
            }
            if parameter_names.len() != fields.len() {
                log::warn!(
                    "Skipping line {line_number}: unit {unit:?} has {expected} parameter(s), found {actual} value(s)",
                    expected = parameter_names.len(),
                    actual = fields.len()
                );
                report.skipped_lines.push(line_number);
                continue;
            }
            let is_first_row = loaded_units.insert(object_id);
            for (parameter_name, field) in parameter_names.into_iter().zip(&fields) {
                if field.is_empty() {
                    continue;
                }
                let value = Value::parse(field);
                let key = (object_id, parameter_name);
                let applied = if is_first_row && !list_parameters.contains(&key) {
                    self.tree_mut().set_parameter(object_id, &key.1, value)
                } else {
                    self.append_parameter_sample(object_id, &key.1, value)
                };
                if let Err(err) = applied {
                    log::warn!("Line {line_number}: {err}");
                }
            }
            report.loaded_rows += 1;
        }
        Ok(report)
    }

    fn resolve_unit(&self, unit: &str) -> Option<NodeId> {
        let tree = self.tree();
        let path = unit.parse::<NodePath>().unwrap_or_default();
        if let Some(node) = tree
            .find_node_by_path(&path)
            .filter(|node| node.kind() == NodeKind::Object)
        {
            return Some(node.id);
        }
        if path.depth() != 1 {
            return None;
        }
        tree.descendants(tree.root_node_id())
            .find(|node| node.kind() == NodeKind::Object && node.name() == unit)
            .map(|node| node.id)
    }

    fn append_parameter_sample(
        &mut self,
        object_id: NodeId,
        parameter_name: &str,
        sample: Value,
    ) -> crate::tree::Result<()> {
        let data = match self.tree().parameter(object_id, parameter_name)? {
            Some(data) => {
                let mut data = data.clone();
                data.push_sample(sample);
                data
            }
            None => sample,
        };
        self.tree_mut()
            .set_parameter(object_id, parameter_name, data)
    }
}

#[cfg(test)]
mod tests {
    use super::{ImdError, ImdRecord};

    #[test]
    fn parse_and_write_lines() {
        let record = ImdRecord::parse_line("U,Blade/Line,0.5,,3", 1)
            .unwrap()
            .unwrap();
        assert_eq!(
            ImdRecord::Unit {
                unit: "Blade/Line".to_owned(),
                values: vec!["0.5".to_owned(), String::new(), "3".to_owned()],
            },
            record
        );
        assert_eq!("U,Blade/Line,0.5,,3", record.to_string());
        let header = ImdRecord::parse_line("P,Blade/Line,x[],y", 2)
            .unwrap()
            .unwrap();
        assert_eq!(
            ImdRecord::Parameter {
                unit: "Blade/Line".to_owned(),
                names: vec!["x[]".to_owned(), "y".to_owned()],
            },
            header
        );
        assert_eq!("P,Blade/Line,x[],y", header.to_string());
        assert_eq!(
            Some(ImdRecord::Model("Blade".to_owned())),
            ImdRecord::parse_line("O,Blade\r", 3).unwrap()
        );
        assert_eq!(None, ImdRecord::parse_line("  ", 4).unwrap());
    }

    #[test]
    fn reject_malformed_lines() {
        assert_eq!(
            Err(ImdError::UnknownTag {
                line: 4,
                tag: "X".to_owned()
            }),
            ImdRecord::parse_line("X,1", 4)
        );
        assert_eq!(
            Err(ImdError::MissingField { line: 5 }),
            ImdRecord::parse_line("U", 5)
        );
        assert_eq!(
            Err(ImdError::MissingField { line: 6 }),
            ImdRecord::parse_line("O", 6)
        );
        assert_eq!(
            Err(ImdError::MissingField { line: 7 }),
            ImdRecord::parse_line("P,", 7)
        );
    }
}
