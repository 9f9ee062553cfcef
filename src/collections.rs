//! This module defines the uniform enumeration surface over the three
//! collection shapes of [JoinValue]: sequences enumerate their elements by
//! position, records enumerate their values by field name in insertion
//! order, and strings enumerate their characters by position. Scalars
//! enumerate as empty.
//!
//! Every join consumes its operands exclusively through [entries], so the
//! algorithms never branch on the concrete collection shape themselves.

use std::borrow::Cow;
use std::fmt;

use crate::value::JoinValue;

/// The position of a value within its source collection: a numeric index
/// for sequences and strings, a field name for records.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum EntryKey {
    /// Position within a sequence or string.
    Index(usize),
    /// Field name within a record.
    Key(String),
}

impl EntryKey {
    /// The numeric index, if this entry came from a sequence or string.
    pub fn as_index(&self) -> Option<usize> {
        match self {
            EntryKey::Index(index) => Some(*index),
            EntryKey::Key(_) => None,
        }
    }
}

impl fmt::Display for EntryKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EntryKey::Index(index) => write!(f, "{index}"),
            EntryKey::Key(key) => write!(f, "{key}"),
        }
    }
}

/// Enumerate a collection as `(position, value)` pairs.
///
/// Sequence and record entries borrow their values from the collection;
/// string entries carry owned one-character values.
pub fn entries(collection: &JoinValue) -> Entries<'_> {
    let inner = match collection {
        JoinValue::Seq(elements) => EntriesInner::Seq(elements.iter().enumerate()),
        JoinValue::Record(fields) => EntriesInner::Record(fields.iter()),
        JoinValue::String(text) => EntriesInner::Chars(text.chars().enumerate()),
        _ => EntriesInner::Empty,
    };
    Entries { inner }
}

/// Iterator over the entries of a collection, see [entries].
pub struct Entries<'a> {
    inner: EntriesInner<'a>,
}

enum EntriesInner<'a> {
    Seq(std::iter::Enumerate<std::slice::Iter<'a, JoinValue>>),
    Record(linked_hash_map::Iter<'a, String, JoinValue>),
    Chars(std::iter::Enumerate<std::str::Chars<'a>>),
    Empty,
}

impl<'a> Iterator for Entries<'a> {
    type Item = (EntryKey, Cow<'a, JoinValue>);

    fn next(&mut self) -> Option<Self::Item> {
        match &mut self.inner {
            EntriesInner::Seq(iter) => iter
                .next()
                .map(|(index, value)| (EntryKey::Index(index), Cow::Borrowed(value))),
            EntriesInner::Record(iter) => iter
                .next()
                .map(|(name, value)| (EntryKey::Key(name.clone()), Cow::Borrowed(value))),
            EntriesInner::Chars(iter) => iter.next().map(|(index, character)| {
                (
                    EntryKey::Index(index),
                    Cow::Owned(JoinValue::String(character.to_string())),
                )
            }),
            EntriesInner::Empty => None,
        }
    }
}

impl fmt::Debug for Entries<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let shape = match self.inner {
            EntriesInner::Seq(_) => "Seq",
            EntriesInner::Record(_) => "Record",
            EntriesInner::Chars(_) => "Chars",
            EntriesInner::Empty => "Empty",
        };
        f.debug_struct("Entries").field("shape", &shape).finish()
    }
}

#[cfg(test)]
mod test {
    use std::borrow::Cow;

    use test_log::test;

    use super::{entries, EntryKey};
    use crate::value::JoinValue;

    fn collect(collection: &JoinValue) -> Vec<(EntryKey, JoinValue)> {
        entries(collection)
            .map(|(at, value)| (at, value.into_owned()))
            .collect()
    }

    #[test]
    fn sequence_entries_are_indexed() {
        let collection = JoinValue::seq([JoinValue::Int(10), JoinValue::Int(20)]);
        assert_eq!(
            collect(&collection),
            vec![
                (EntryKey::Index(0), JoinValue::Int(10)),
                (EntryKey::Index(1), JoinValue::Int(20)),
            ]
        );
    }

    #[test]
    fn record_entries_preserve_insertion_order() {
        let collection =
            JoinValue::record([("b", JoinValue::Int(2)), ("a", JoinValue::Int(1))]);
        assert_eq!(
            collect(&collection),
            vec![
                (EntryKey::Key("b".to_string()), JoinValue::Int(2)),
                (EntryKey::Key("a".to_string()), JoinValue::Int(1)),
            ]
        );
    }

    #[test]
    fn string_entries_are_characters() {
        let collection = JoinValue::string("ab");
        assert_eq!(
            collect(&collection),
            vec![
                (EntryKey::Index(0), JoinValue::string("a")),
                (EntryKey::Index(1), JoinValue::string("b")),
            ]
        );
    }

    #[test]
    fn entry_keys_display_plainly() {
        assert_eq!(EntryKey::Index(3).to_string(), "3");
        assert_eq!(EntryKey::Key("a".to_string()).to_string(), "a");
    }

    #[test]
    fn scalars_enumerate_empty() {
        assert!(entries(&JoinValue::Int(1)).next().is_none());
        assert!(entries(&JoinValue::Null).next().is_none());
    }

    #[test]
    fn sequence_entries_borrow() {
        let collection = JoinValue::seq([JoinValue::Int(1)]);
        let (_, value) = entries(&collection).next().unwrap();
        assert!(matches!(value, Cow::Borrowed(_)));
    }
}
