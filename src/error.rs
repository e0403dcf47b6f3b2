use thiserror::Error;

use crate::nbt::tag::TagID;

/// The master error type.
#[derive(Debug, Error)]
pub enum StoreError {
	#[error("Out of range: {0}")]
	OutOfRange(String),
	#[error("IO Error: {0}")]
	IoError(#[from] std::io::Error),
	#[error("Compression Error: {0}")]
	CompressionError(String),
	#[error("Format Error: {0}")]
	FormatError(String),
	#[error("Unknown Tag ID: {0}")]
	UnknownTagType(u8),
	#[error("Tag was not found.\n\"{0}\"")]
	TagNotFound(String),
	#[error("{}", type_mismatch_message(.path, .expected, .found))]
	TypeMismatch {
		/// Empty when the mismatch is an element pushed onto a list.
		path: String,
		expected: TagID,
		found: TagID,
	},
}

/// The category of a [StoreError], without the message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
	OutOfRange,
	IoError,
	CompressionError,
	FormatError,
	UnknownTagType,
	TagNotFound,
	TypeMismatch,
}

impl StoreError {
	pub fn kind(&self) -> ErrorKind {
		match self {
			StoreError::OutOfRange(_) => ErrorKind::OutOfRange,
			StoreError::IoError(_) => ErrorKind::IoError,
			StoreError::CompressionError(_) => ErrorKind::CompressionError,
			StoreError::FormatError(_) => ErrorKind::FormatError,
			StoreError::UnknownTagType(_) => ErrorKind::UnknownTagType,
			StoreError::TagNotFound(_) => ErrorKind::TagNotFound,
			StoreError::TypeMismatch { .. } => ErrorKind::TypeMismatch,
		}
	}

	#[inline(always)]
	pub fn format<T, S: AsRef<str>>(msg: S) -> Result<T, Self> {
		Err(StoreError::FormatError(msg.as_ref().to_owned()))
	}
}

pub type StoreResult<T> = Result<T, StoreError>;

fn type_mismatch_message(path: &str, expected: &TagID, found: &TagID) -> String {
	if path.is_empty() {
		format!("Type mismatch: a list of {expected} cannot hold {found}.")
	} else {
		format!("Type mismatch at \"{path}\": expected {expected}, found {found}.")
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn kinds_match_variants() {
		let err = StoreError::from(std::io::Error::new(std::io::ErrorKind::NotFound, "gone"));
		assert_eq!(err.kind(), ErrorKind::IoError);
		assert_eq!(StoreError::UnknownTagType(42).kind(), ErrorKind::UnknownTagType);
		let err = StoreError::TypeMismatch {
			path: "Level.Width".to_owned(),
			expected: TagID::Int,
			found: TagID::Short,
		};
		assert_eq!(err.kind(), ErrorKind::TypeMismatch);
		assert!(err.to_string().contains("Level.Width"));
	}
}
