use std::io::{Read, Write};
use chrono::{DateTime, Utc, TimeZone};
use crate::{
	StoreError,
	StoreResult,
	ioext::*,
};

/// A 32-bit Unix timestamp. Zero means the slot was never written.
#[derive(Debug, PartialEq, Eq, PartialOrd, Ord, Clone, Copy, Default, Hash)]
pub struct Timestamp(u32);

impl Timestamp {
	pub const NEVER: Timestamp = Timestamp(0);

	pub fn to_datetime(&self) -> Option<DateTime<Utc>> {
		DateTime::<Utc>::try_from(*self).ok()
	}

	/// Get a [Timestamp] for the current time (in Utc).
	pub fn utc_now() -> Timestamp {
		Timestamp(
			Utc::now().timestamp() as u32
		)
	}

	pub fn is_never(&self) -> bool {
		self.0 == 0
	}

	pub fn seconds(&self) -> u32 {
		self.0
	}
}

macro_rules! __timestamp_impls {
	(lossless $($type:ty),+) => {
		$(
			impl From<$type> for Timestamp {
				fn from(value: $type) -> Self {
					Self(value.into())
				}
			}
		)+
	};
	(checked $($type:ty),+) => {
		$(
			impl TryFrom<$type> for Timestamp {
				type Error = StoreError;

				fn try_from(value: $type) -> Result<Self, Self::Error> {
					u32::try_from(value)
						.map(Self)
						.map_err(|_| StoreError::OutOfRange(format!("Timestamp {value} does not fit in 32 bits.")))
				}
			}
		)+
	};
	(into $($type:ty),+) => {
		$(
			impl From<Timestamp> for $type {
				fn from(value: Timestamp) -> Self {
					value.0.into()
				}
			}
		)+
	};
}

__timestamp_impls!(lossless u8, u16, u32);
__timestamp_impls!(checked usize, u64, isize, i64, i32, i16, i8);
__timestamp_impls!(into u32, u64, i64);

impl Readable for Timestamp {
	fn read_from<R: Read>(reader: &mut R) -> StoreResult<Self> {
		Ok(Self(reader.read_value()?))
	}
}

impl Writable for Timestamp {
	fn write_to<W: Write>(&self, writer: &mut W) -> StoreResult<usize> {
		writer.write_value(self.0)
	}
}

impl TryFrom<DateTime<Utc>> for Timestamp {
	type Error = StoreError;

	fn try_from(value: DateTime<Utc>) -> Result<Self, Self::Error> {
		Timestamp::try_from(value.timestamp())
	}
}

impl TryFrom<Timestamp> for DateTime<Utc> {
	type Error = ();

	fn try_from(value: Timestamp) -> Result<Self, Self::Error> {
		Utc.timestamp_opt(value.0 as i64, 0).single().ok_or(())
	}
}

impl std::fmt::Display for Timestamp {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		match self.to_datetime() {
			Some(datetime) if !self.is_never() => write!(f, "{}", datetime.to_rfc3339()),
			_ => write!(f, "never"),
		}
	}
}
