// SPDX-FileCopyrightText: The industry-model-tree authors
// SPDX-License-Identifier: MPL-2.0

use std::fmt;

/// A value attached to a node or stored in a table cell.
#[derive(Debug, Clone, PartialEq, derive_more::From)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(untagged))]
pub enum Value {
    Bool(bool),
    Int(i64),
    Float(f64),
    Text(String),
    List(Vec<Value>),
}

/// A single table cell.
///
/// `None` is the null marker that terminates a path within a row.
pub type Cell = Option<Value>;

impl Value {
    /// Parse a textual field into the most specific value.
    ///
    /// Integers win over floats, floats over booleans. Everything else
    /// is kept as text, including the empty string.
    ///
    /// ```
    /// # use industry_model_tree::Value;
    /// assert_eq!(Value::Int(3), Value::parse("3"));
    /// assert_eq!(Value::Float(0.5), Value::parse("0.5"));
    /// assert_eq!(Value::Bool(true), Value::parse("true"));
    /// assert_eq!(Value::from("x"), Value::parse("x"));
    /// ```
    #[must_use]
    pub fn parse(field: &str) -> Self {
        let trimmed = field.trim();
        if let Ok(value) = trimmed.parse::<i64>() {
            return Self::Int(value);
        }
        if let Ok(value) = trimmed.parse::<f64>() {
            return Self::Float(value);
        }
        if let Ok(value) = trimmed.parse::<bool>() {
            return Self::Bool(value);
        }
        Self::Text(field.to_owned())
    }

    #[must_use]
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(text) => Some(text),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_list(&self) -> Option<&[Value]> {
        match self {
            Self::List(items) => Some(items),
            _ => None,
        }
    }

    #[must_use]
    pub const fn is_list(&self) -> bool {
        matches!(self, Self::List(_))
    }

    /// Accumulate a new sample.
    ///
    /// A scalar turns into the two-element list `[self, sample]`,
    /// a list grows by one element.
    pub fn push_sample(&mut self, sample: Value) {
        match self {
            Self::List(items) => items.push(sample),
            scalar => {
                let first = std::mem::replace(scalar, Self::List(Vec::with_capacity(2)));
                if let Self::List(items) = scalar {
                    items.push(first);
                    items.push(sample);
                }
            }
        }
    }

    /// The label of a cell, i.e. the name of the node it describes.
    #[must_use]
    pub fn label(&self) -> String {
        match self {
            Self::Text(text) => text.clone(),
            other => other.to_string(),
        }
    }
}

impl From<&str> for Value {
    fn from(text: &str) -> Self {
        Self::Text(text.to_owned())
    }
}

impl From<i32> for Value {
    fn from(value: i32) -> Self {
        Self::Int(value.into())
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bool(value) => write!(f, "{value}"),
            Self::Int(value) => write!(f, "{value}"),
            Self::Float(value) => write!(f, "{value}"),
            Self::Text(value) => f.write_str(value),
            Self::List(items) => {
                f.write_str("[")?;
                for (index, item) in items.iter().enumerate() {
                    if index > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{item}")?;
                }
                f.write_str("]")
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::Value;

    #[test]
    fn push_sample_accumulates() {
        let mut value = Value::Int(1);
        value.push_sample(Value::Int(2));
        assert_eq!(Value::List(vec![1.into(), 2.into()]), value);
        value.push_sample(Value::Int(3));
        assert_eq!(Value::List(vec![1.into(), 2.into(), 3.into()]), value);
    }

    #[test]
    fn display_nested_list() {
        let value = Value::List(vec![
            Value::Float(0.5),
            Value::List(vec!["x".into(), Value::Bool(false)]),
        ]);
        assert_eq!("[0.5, [x, false]]", value.to_string());
    }

    #[test]
    fn parse_keeps_untrimmed_text() {
        assert_eq!(Value::Text(" a ".to_owned()), Value::parse(" a "));
        assert_eq!(Value::Int(-7), Value::parse(" -7"));
        assert_eq!(Value::Text(String::new()), Value::parse(""));
    }
}
