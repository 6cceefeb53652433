//! Records and the values they carry

use smartstring::{LazyCompact, SmartString};
use std::{
	collections::{btree_map, BTreeMap, BTreeSet},
	fmt::Display,
};
use time::OffsetDateTime;

use crate::{errors::SchemaError, labels::FieldName};

/// One field's value inside a [`Record`]
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
	/// A real number
	Float(f64),

	/// An integer
	Integer(i64),

	/// A boolean
	Boolean(bool),

	/// A categorical value
	Text(SmartString<LazyCompact>),

	/// A point in time
	Timestamp(OffsetDateTime),
}

impl Value {
	/// A short name for this value's type, used in error messages.
	pub fn type_name(&self) -> &'static str {
		match self {
			Self::Float(_) => "float",
			Self::Integer(_) => "integer",
			Self::Boolean(_) => "boolean",
			Self::Text(_) => "text",
			Self::Timestamp(_) => "timestamp",
		}
	}

	/// Read this value as a number.
	/// Booleans are read as `0.0` or `1.0`.
	pub fn as_f64(&self) -> Option<f64> {
		match self {
			Self::Float(x) => Some(*x),
			Self::Integer(x) => Some(*x as f64),
			Self::Boolean(x) => Some(if *x { 1.0 } else { 0.0 }),
			Self::Text(_) | Self::Timestamp(_) => None,
		}
	}

	pub fn as_str(&self) -> Option<&str> {
		match self {
			Self::Text(x) => Some(x),
			_ => None,
		}
	}

	pub fn as_timestamp(&self) -> Option<OffsetDateTime> {
		match self {
			Self::Timestamp(x) => Some(*x),
			_ => None,
		}
	}

	/// Is this value a [`Value::Float`] or a [`Value::Integer`]?
	pub fn is_numeric(&self) -> bool {
		matches!(self, Self::Float(_) | Self::Integer(_))
	}
}

impl Display for Value {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		match self {
			Self::Float(x) => write!(f, "{x}"),
			Self::Integer(x) => write!(f, "{x}"),
			Self::Boolean(x) => write!(f, "{x}"),
			Self::Text(x) => write!(f, "{x}"),
			Self::Timestamp(x) => write!(f, "{x}"),
		}
	}
}

impl From<f64> for Value {
	fn from(value: f64) -> Self {
		Self::Float(value)
	}
}

impl From<i64> for Value {
	fn from(value: i64) -> Self {
		Self::Integer(value)
	}
}

impl From<i32> for Value {
	fn from(value: i32) -> Self {
		Self::Integer(value.into())
	}
}

impl From<bool> for Value {
	fn from(value: bool) -> Self {
		Self::Boolean(value)
	}
}

impl From<&str> for Value {
	fn from(value: &str) -> Self {
		Self::Text(value.into())
	}
}

impl From<SmartString<LazyCompact>> for Value {
	fn from(value: SmartString<LazyCompact>) -> Self {
		Self::Text(value)
	}
}

impl From<OffsetDateTime> for Value {
	fn from(value: OffsetDateTime) -> Self {
		Self::Timestamp(value)
	}
}

/// One observation flowing through a pipeline.
///
/// Fields are kept in key order, so iteration is deterministic.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Record {
	fields: BTreeMap<FieldName, Value>,
}

impl Record {
	/// Create an empty record
	pub fn new() -> Self {
		Self {
			fields: BTreeMap::new(),
		}
	}

	pub fn len(&self) -> usize {
		self.fields.len()
	}

	pub fn is_empty(&self) -> bool {
		self.fields.is_empty()
	}

	pub fn get(&self, field: &str) -> Option<&Value> {
		self.fields.get(field)
	}

	/// Get a field as a number.
	///
	/// Fails if the field is missing or isn't numeric.
	pub fn get_f64(&self, field: &str) -> Result<f64, SchemaError> {
		let value = self.get_required(field)?;
		return value.as_f64().ok_or(SchemaError::BadFieldType {
			field: field.into(),
			expected: "number",
			found: value.type_name(),
		});
	}

	/// Get a field, failing if it doesn't exist.
	pub fn get_required(&self, field: &str) -> Result<&Value, SchemaError> {
		return self.fields.get(field).ok_or(SchemaError::MissingField {
			field: field.into(),
		});
	}

	pub fn contains(&self, field: &str) -> bool {
		self.fields.contains_key(field)
	}

	/// Set a field, returning its previous value if there was one.
	pub fn insert(&mut self, field: impl Into<FieldName>, value: impl Into<Value>) -> Option<Value> {
		self.fields.insert(field.into(), value.into())
	}

	pub fn remove(&mut self, field: &str) -> Option<Value> {
		self.fields.remove(field)
	}

	pub fn iter(&self) -> btree_map::Iter<'_, FieldName, Value> {
		self.fields.iter()
	}

	pub fn keys(&self) -> impl Iterator<Item = &FieldName> {
		self.fields.keys()
	}

	/// Iterate over all numeric fields (floats and integers) in this record.
	pub fn numeric(&self) -> impl Iterator<Item = (&FieldName, f64)> {
		self.fields
			.iter()
			.filter(|(_, v)| v.is_numeric())
			.filter_map(|(k, v)| v.as_f64().map(|x| (k, x)))
	}

	/// Copy every field of `other` into this record.
	/// Fields in `other` overwrite fields with the same name in `self`.
	pub fn extend(&mut self, other: Record) {
		self.fields.extend(other.fields);
	}

	/// Like [`Record::extend`], but takes and returns ownership.
	pub fn merge(mut self, other: Record) -> Record {
		self.extend(other);
		self
	}

	/// Apply the changes that turned `before` into `after` to this record.
	/// Fields `after` adds or changes are set.
	/// Fields of `before` that are missing from `after` are removed.
	pub fn apply_changes(&mut self, before: &Record, after: Record) {
		for field in before.fields.keys() {
			if !after.fields.contains_key(field) {
				self.fields.remove(field);
			}
		}

		for (field, value) in after {
			if before.fields.get(&field) != Some(&value) {
				self.fields.insert(field, value);
			}
		}
	}

	/// Copy this record, leaving out the given fields.
	/// Fields that don't exist are ignored.
	pub fn without(&self, fields: &BTreeSet<FieldName>) -> Record {
		Record {
			fields: self
				.fields
				.iter()
				.filter(|(k, _)| !fields.contains(*k))
				.map(|(k, v)| (k.clone(), v.clone()))
				.collect(),
		}
	}
}

impl IntoIterator for Record {
	type Item = (FieldName, Value);
	type IntoIter = btree_map::IntoIter<FieldName, Value>;

	fn into_iter(self) -> Self::IntoIter {
		self.fields.into_iter()
	}
}

impl<K: Into<FieldName>, V: Into<Value>> FromIterator<(K, V)> for Record {
	fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
		Record {
			fields: iter
				.into_iter()
				.map(|(k, v)| (k.into(), v.into()))
				.collect(),
		}
	}
}

impl<K: Into<FieldName>, V: Into<Value>, const N: usize> From<[(K, V); N]> for Record {
	fn from(value: [(K, V); N]) -> Self {
		value.into_iter().collect()
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn merge_overwrites_from_the_right() {
		let a = Record::from([("x", 1.0), ("y", 2.0)]);
		let b = Record::from([("y", 3.0), ("z", 4.0)]);

		assert_eq!(
			a.merge(b),
			Record::from([("x", 1.0), ("y", 3.0), ("z", 4.0)])
		);
	}

	#[test]
	fn without_ignores_missing_fields() {
		let r = Record::from([("x", 1), ("y", 2)]);
		let drop: BTreeSet<FieldName> = ["y".into(), "nope".into()].into_iter().collect();
		assert_eq!(r.without(&drop), Record::from([("x", 1)]));
	}

	#[test]
	fn get_f64_reports_schema_problems() {
		let mut r = Record::new();
		r.insert("n", 3);
		r.insert("flag", true);
		r.insert("store", "s1");

		assert_eq!(r.get_f64("n"), Ok(3.0));
		assert_eq!(r.get_f64("flag"), Ok(1.0));
		assert_eq!(
			r.get_f64("missing"),
			Err(SchemaError::MissingField {
				field: "missing".into()
			})
		);
		assert_eq!(
			r.get_f64("store"),
			Err(SchemaError::BadFieldType {
				field: "store".into(),
				expected: "number",
				found: "text",
			})
		);
	}

	#[test]
	fn numeric_skips_booleans_and_text() {
		let r = Record::from([
			("a", Value::Float(0.5)),
			("b", Value::Integer(2)),
			("c", Value::Boolean(true)),
			("d", Value::from("s1")),
		]);

		let n: Vec<(String, f64)> = r.numeric().map(|(k, v)| (k.to_string(), v)).collect();
		assert_eq!(n, vec![("a".into(), 0.5), ("b".into(), 2.0)]);
	}

	#[test]
	fn apply_changes_ignores_untouched_fields() {
		let before = Record::from([("a", 1), ("b", 2), ("c", 3)]);
		let mut current = Record::from([("a", 10), ("b", 2), ("c", 3)]);

		// Keeps `a` as-is, changes `b`, drops `c`, adds `d`
		let after = Record::from([("a", 1), ("b", 20), ("d", 4)]);
		current.apply_changes(&before, after);

		assert_eq!(current, Record::from([("a", 10), ("b", 20), ("d", 4)]));
	}
}
