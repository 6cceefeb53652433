//! Helpful types for stage and field labels

use serde::{Deserialize, Serialize};
use smartstring::{LazyCompact, SmartString};
use std::{borrow::Borrow, fmt::Display};

macro_rules! label {
	($(#[$attr:meta])* $name:ident) => {
		$(#[$attr])*
		#[derive(Debug, Hash, PartialEq, Eq, Clone, PartialOrd, Ord, Serialize, Deserialize)]
		#[serde(transparent)]
		pub struct $name(SmartString<LazyCompact>);

		impl $name {
			pub fn as_str(&self) -> &str {
				&self.0
			}
		}

		impl Display for $name {
			fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
				self.0.fmt(f)
			}
		}

		impl AsRef<str> for $name {
			fn as_ref(&self) -> &str {
				&self.0
			}
		}

		// Lets maps keyed by this label be queried with a `&str`.
		impl Borrow<str> for $name {
			fn borrow(&self) -> &str {
				&self.0
			}
		}

		impl From<SmartString<LazyCompact>> for $name {
			fn from(s: SmartString<LazyCompact>) -> Self {
				Self(s)
			}
		}

		impl From<$name> for SmartString<LazyCompact> {
			fn from(value: $name) -> Self {
				value.0
			}
		}

		impl From<&$name> for $name {
			fn from(value: &$name) -> Self {
				value.clone()
			}
		}

		impl From<&str> for $name {
			fn from(s: &str) -> Self {
				Self(s.into())
			}
		}

		impl From<String> for $name {
			fn from(s: String) -> Self {
				Self(s.into())
			}
		}
	};
}

label!(
	/// The display name of a stage.
	///
	/// Also used as a step's default key inside a [`crate::Pipeline`] or [`crate::Union`].
	StageName
);

label!(
	/// The name of a field in a [`crate::Record`]
	FieldName
);
