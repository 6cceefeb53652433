//! Name utilities
use thiserror::Error;

/// The ways a name may be invalid
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum NameError {
	/// This name is empty
	#[error("name cannot be empty")]
	Empty,

	/// This name is entirely whitespace
	#[error("name cannot be entirely whitespace")]
	IsWhitespace,

	/// This name has leading or trailing whitespace
	#[error("name cannot have leading or trailing whitespace")]
	TrimWhitespace,
}

/// Check the given name for errors.
pub fn check_name(name: &str) -> Result<(), NameError> {
	if name.is_empty() {
		return Err(NameError::Empty);
	}

	let trimmed = name.trim();
	if trimmed.is_empty() {
		return Err(NameError::IsWhitespace);
	}

	if trimmed.len() != name.len() {
		return Err(NameError::TrimWhitespace);
	}

	return Ok(());
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn names() {
		assert_eq!(check_name("store_id"), Ok(()));
		assert_eq!(check_name("target rolling mean"), Ok(()));
		assert_eq!(check_name(""), Err(NameError::Empty));
		assert_eq!(check_name("  \t"), Err(NameError::IsWhitespace));
		assert_eq!(check_name(" x"), Err(NameError::TrimWhitespace));
		assert_eq!(check_name("x\n"), Err(NameError::TrimWhitespace));
	}
}
