//! This module defines [JoinValue], the dynamic value model the join
//! operators work over. A [JoinValue] is either a scalar, a sequence, or an
//! insertion-ordered record; sequences, records and strings double as the
//! collection shapes accepted by the joins.
//!
//! Two comparison regimes are defined here and kept deliberately separate:
//! the canonical string form (via [std::fmt::Display]), which hash and
//! group join use for key equality, and the native total order (via [Ord]),
//! which merge and unique join use. Under the string form `Int(1)`,
//! `Float(1.0)` and `String("1")` all share the key `"1"`; under the native
//! order the integer and the float are equal to each other but not to the
//! string.

use std::cmp::Ordering;
use std::fmt;

use itertools::Itertools;
use linked_hash_map::LinkedHashMap;

/// A dynamically typed value that can act as a join input collection, an
/// element, a join key, or a projected result.
#[derive(Debug, Clone)]
pub enum JoinValue {
    /// The absent value; as a selector result it suppresses the output row.
    Null,
    /// A boolean value.
    Bool(bool),
    /// A signed integer value.
    Int(i64),
    /// A double-precision floating point value.
    Float(f64),
    /// A Unicode string; as a collection it enumerates its characters.
    String(String),
    /// An ordered sequence of values; the "array" collection shape.
    Seq(Vec<JoinValue>),
    /// A mapping from field names to values with a defined (insertion)
    /// enumeration order; the "object" collection shape.
    Record(LinkedHashMap<String, JoinValue>),
}

impl JoinValue {
    /// Construct a string value.
    pub fn string(value: impl Into<String>) -> Self {
        JoinValue::String(value.into())
    }

    /// Construct a sequence value from anything iterating over values.
    pub fn seq(values: impl IntoIterator<Item = JoinValue>) -> Self {
        JoinValue::Seq(values.into_iter().collect())
    }

    /// Construct a record value from field-name/value pairs, preserving
    /// their order as the record's enumeration order.
    pub fn record<N: Into<String>>(fields: impl IntoIterator<Item = (N, JoinValue)>) -> Self {
        JoinValue::Record(
            fields
                .into_iter()
                .map(|(name, value)| (name.into(), value))
                .collect(),
        )
    }

    /// Whether this is the absent value.
    pub fn is_null(&self) -> bool {
        matches!(self, JoinValue::Null)
    }

    /// The named field of a record value, if present.
    pub fn get_field(&self, name: &str) -> Option<&JoinValue> {
        match self {
            JoinValue::Record(fields) => fields.get(name),
            _ => None,
        }
    }

    /// The elements of a true sequence, or `None` for every other shape.
    pub fn as_seq(&self) -> Option<&[JoinValue]> {
        match self {
            JoinValue::Seq(elements) => Some(elements),
            _ => None,
        }
    }

    /// The canonical string form of this value, used as the key of the
    /// string-equality regime (hash and group join).
    pub fn key_string(&self) -> String {
        self.to_string()
    }

    /// Rank of the variant within the native total order.
    fn rank(&self) -> u8 {
        match self {
            JoinValue::Null => 0,
            JoinValue::Bool(_) => 1,
            JoinValue::Int(_) | JoinValue::Float(_) => 2,
            JoinValue::String(_) => 3,
            JoinValue::Seq(_) => 4,
            JoinValue::Record(_) => 5,
        }
    }
}

impl From<bool> for JoinValue {
    fn from(value: bool) -> Self {
        JoinValue::Bool(value)
    }
}

impl From<i64> for JoinValue {
    fn from(value: i64) -> Self {
        JoinValue::Int(value)
    }
}

impl From<f64> for JoinValue {
    fn from(value: f64) -> Self {
        JoinValue::Float(value)
    }
}

impl From<&str> for JoinValue {
    fn from(value: &str) -> Self {
        JoinValue::String(value.to_string())
    }
}

impl From<String> for JoinValue {
    fn from(value: String) -> Self {
        JoinValue::String(value)
    }
}

impl From<Vec<JoinValue>> for JoinValue {
    fn from(values: Vec<JoinValue>) -> Self {
        JoinValue::Seq(values)
    }
}

impl fmt::Display for JoinValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            JoinValue::Null => write!(f, "null"),
            JoinValue::Bool(value) => write!(f, "{value}"),
            JoinValue::Int(value) => write!(f, "{value}"),
            JoinValue::Float(value) => {
                if value.is_nan() {
                    write!(f, "NaN")
                } else if value.is_infinite() {
                    write!(f, "{}", if *value > 0.0 { "Infinity" } else { "-Infinity" })
                } else if *value == value.trunc() && value.abs() < 9.0e18 {
                    // Integral floats print without a fraction so that
                    // Int(1) and Float(1.0) coerce to the same key.
                    write!(f, "{}", *value as i64)
                } else {
                    write!(f, "{value}")
                }
            }
            JoinValue::String(value) => write!(f, "{value}"),
            JoinValue::Seq(elements) => write!(f, "{}", elements.iter().format(",")),
            JoinValue::Record(fields) => write!(
                f,
                "{{{}}}",
                fields
                    .iter()
                    .format_with(",", |(name, value), g| g(&format_args!("{name}:{value}")))
            ),
        }
    }
}

impl Ord for JoinValue {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self, other) {
            (JoinValue::Null, JoinValue::Null) => Ordering::Equal,
            (JoinValue::Bool(left), JoinValue::Bool(right)) => left.cmp(right),
            (JoinValue::Int(left), JoinValue::Int(right)) => left.cmp(right),
            (JoinValue::Int(left), JoinValue::Float(right)) => (*left as f64).total_cmp(right),
            (JoinValue::Float(left), JoinValue::Int(right)) => left.total_cmp(&(*right as f64)),
            (JoinValue::Float(left), JoinValue::Float(right)) => left.total_cmp(right),
            (JoinValue::String(left), JoinValue::String(right)) => left.cmp(right),
            (JoinValue::Seq(left), JoinValue::Seq(right)) => left
                .iter()
                .zip(right.iter())
                .map(|(l, r)| l.cmp(r))
                .find(|ordering| *ordering != Ordering::Equal)
                .unwrap_or_else(|| left.len().cmp(&right.len())),
            (JoinValue::Record(left), JoinValue::Record(right)) => left
                .iter()
                .zip(right.iter())
                .map(|((ln, lv), (rn, rv))| ln.cmp(rn).then_with(|| lv.cmp(rv)))
                .find(|ordering| *ordering != Ordering::Equal)
                .unwrap_or_else(|| left.len().cmp(&right.len())),
            // Remaining combinations are of distinct ranks.
            _ => self.rank().cmp(&other.rank()),
        }
    }
}

impl PartialOrd for JoinValue {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for JoinValue {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for JoinValue {}
