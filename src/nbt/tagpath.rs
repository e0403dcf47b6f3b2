use std::fmt::Display;
use std::str::FromStr;

use chumsky::prelude::*;

use crate::nbt::tag::*;
use crate::nbt::tagtype::TagType;
use crate::{StoreError, StoreResult};

/// A dotted path through nested Compounds, such as `Level.Width`.
/// Segments that contain dots or quotes can be written quoted:
/// `Level."odd.name"`.
///
/// Paths only step through Compound members. There is no index syntax,
/// so a List is always a dead end.
#[derive(PartialEq, Eq, PartialOrd, Ord, Clone, Hash, Debug)]
pub struct TagPath(pub Vec<String>);

/// Returns a parser that splits a path into its segments.
fn tag_path_parser() -> impl Parser<char, Vec<String>, Error = Simple<char>> {
	let escape = just::<_, _, Simple<char>>('\\').ignore_then(one_of("\\\""));
	let quoted = just('"')
		.ignore_then(none_of("\\\"").or(escape).repeated())
		.then_ignore(just('"'))
		.collect::<String>()
		.labelled("Quoted Segment");
	let bare = none_of(".\"")
		.repeated().at_least(1)
		.collect::<String>()
		.labelled("Segment");
	quoted.or(bare)
		.separated_by(just('.'))
		.at_least(1)
		.then_ignore(end())
}

impl TagPath {
	/// Parses a path. A malformed path cannot name any tag, so it fails with
	/// [StoreError::TagNotFound].
	pub fn parse<S: AsRef<str>>(source: S) -> StoreResult<Self> {
		let source = source.as_ref();
		tag_path_parser().parse(source)
			.map(TagPath)
			.map_err(|_| StoreError::TagNotFound(source.to_owned()))
	}

	pub fn path(&self) -> &[String] {
		&self.0
	}

	pub fn join<S: Into<String>>(&self, key: S) -> TagPath {
		let mut parts = self.0.clone();
		parts.push(key.into());
		TagPath(parts)
	}

	fn not_found(&self) -> StoreError {
		StoreError::TagNotFound(self.to_string())
	}

	/// Walks from `root` through each segment.
	pub fn resolve<'a>(&self, root: &'a Tag) -> StoreResult<&'a Tag> {
		self.0.iter().try_fold(root, |node, key| {
			node.as_compound()
				.and_then(|map| map.get(key))
				.ok_or_else(|| self.not_found())
		})
	}

	pub fn resolve_mut<'a>(&self, root: &'a mut Tag) -> StoreResult<&'a mut Tag> {
		self.0.iter().try_fold(root, |node, key| {
			node.as_compound_mut()
				.and_then(|map| map.get_mut(key))
				.ok_or_else(|| self.not_found())
		})
	}
}

impl FromStr for TagPath {
	type Err = StoreError;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		TagPath::parse(s)
	}
}

fn needs_quotes(segment: &str) -> bool {
	segment.is_empty() || segment.contains(|c| matches!(c, '.' | '"' | '\\'))
}

impl Display for TagPath {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		for (index, segment) in self.0.iter().enumerate() {
			if index > 0 {
				write!(f, ".")?;
			}
			if needs_quotes(segment) {
				write!(f, "\"")?;
				for c in segment.chars() {
					if c == '"' || c == '\\' {
						write!(f, "\\")?;
					}
					write!(f, "{c}")?;
				}
				write!(f, "\"")?;
			} else {
				write!(f, "{segment}")?;
			}
		}
		Ok(())
	}
}

impl Tag {
	/// Finds a nested tag by dotted path. Only Compound members are traversed.
	pub fn get_tag<P: AsRef<str>>(&self, path: P) -> StoreResult<&Tag> {
		TagPath::parse(path)?.resolve(self)
	}

	/// Like [Tag::get_tag], but also requires the found tag to have type `id`.
	pub fn get_tag_typed<P: AsRef<str>>(&self, path: P, id: TagID) -> StoreResult<&Tag> {
		let found = self.get_tag(path.as_ref())?;
		if found.id() != id {
			return Err(StoreError::TypeMismatch {
				path: path.as_ref().to_owned(),
				expected: id,
				found: found.id(),
			});
		}
		Ok(found)
	}

	/// Finds a nested tag and borrows its payload as `T`.
	pub fn get<T: TagType, P: AsRef<str>>(&self, path: P) -> StoreResult<&T> {
		let path = path.as_ref();
		let found = self.get_tag_typed(path, T::ID)?;
		// The id matched, so the borrow cannot fail.
		T::from_tag(found).ok_or_else(|| StoreError::TypeMismatch {
			path: path.to_owned(),
			expected: T::ID,
			found: found.id(),
		})
	}

	pub fn get_tag_mut<P: AsRef<str>>(&mut self, path: P) -> StoreResult<&mut Tag> {
		TagPath::parse(path)?.resolve_mut(self)
	}

	/// Inserts `value` at `path`. Every segment but the last must already
	/// resolve to a Compound. Returns the tag that was replaced, if any.
	pub fn set_tag<P: AsRef<str>, T: Into<Tag>>(&mut self, path: P, value: T) -> StoreResult<Option<Tag>> {
		let path = TagPath::parse(path)?;
		let Some((last, parent)) = path.0.split_last() else {
			return Err(path.not_found());
		};
		let parent = TagPath(parent.to_vec()).resolve_mut(self)?;
		match parent.as_compound_mut() {
			Some(map) => Ok(map.insert(last.to_owned(), value.into())),
			None => Err(path.not_found()),
		}
	}
}

impl NamedTag {
	pub fn get_tag<P: AsRef<str>>(&self, path: P) -> StoreResult<&Tag> {
		self.tag.get_tag(path)
	}

	pub fn get<T: TagType, P: AsRef<str>>(&self, path: P) -> StoreResult<&T> {
		self.tag.get(path)
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::{compound, ErrorKind};

	fn level() -> Tag {
		compound! {
			("Level", compound! {
				("Width", 16i16),
				("Entities", ListTag::Compound(vec![crate::nbt::Map::new()])),
				("odd.name", 1i8),
			}),
		}
	}

	#[test]
	fn parse_segments() {
		let path = TagPath::parse("Level.Width").unwrap();
		assert_eq!(path.path(), &["Level".to_owned(), "Width".to_owned()]);
		let quoted = TagPath::parse(r#"Level."odd.name""#).unwrap();
		assert_eq!(quoted.path()[1], "odd.name");
		assert_eq!(quoted.to_string(), r#"Level."odd.name""#);
		assert_eq!(TagPath::parse("").unwrap_err().kind(), ErrorKind::TagNotFound);
		assert_eq!(TagPath::parse("A..B").unwrap_err().kind(), ErrorKind::TagNotFound);
		assert_eq!("A.B".parse::<TagPath>().unwrap().join("C").to_string(), "A.B.C");
	}

	#[test]
	fn lookup() {
		let root = level();
		assert_eq!(root.get_tag("Level.Width").unwrap(), &Tag::Short(16));
		assert_eq!(root.get::<i16, _>("Level.Width").unwrap(), &16);
		assert_eq!(root.get_tag(r#"Level."odd.name""#).unwrap(), &Tag::Byte(1));
		assert_eq!(root.get_tag("Level.Height").unwrap_err().kind(), ErrorKind::TagNotFound);
		assert_eq!(root.get_tag_typed("Level.Width", TagID::Int).unwrap_err().kind(), ErrorKind::TypeMismatch);
		assert_eq!(root.get::<i32, _>("Level.Width").unwrap_err().kind(), ErrorKind::TypeMismatch);
		// Stepping into a non-Compound fails.
		assert_eq!(root.get_tag("Level.Width.Deeper").unwrap_err().kind(), ErrorKind::TagNotFound);
	}

	#[test]
	fn no_list_descent() {
		let root = level();
		assert!(root.get_tag("Level.Entities").is_ok());
		assert_eq!(root.get_tag("Level.Entities.0").unwrap_err().kind(), ErrorKind::TagNotFound);
	}

	#[test]
	fn mutate_by_path() {
		let mut root = level();
		*root.get_tag_mut("Level.Width").unwrap() = Tag::Short(32);
		assert_eq!(root.get_tag("Level.Width").unwrap(), &Tag::Short(32));
		assert_eq!(root.set_tag("Level.Height", 256i16).unwrap(), None);
		assert_eq!(root.get::<i16, _>("Level.Height").unwrap(), &256);
		assert_eq!(root.set_tag("Level.Height", 128i16).unwrap(), Some(Tag::Short(256)));
		assert_eq!(root.set_tag("Level.Width.X", 1i8).unwrap_err().kind(), ErrorKind::TagNotFound);
		assert_eq!(root.set_tag("Missing.X", 1i8).unwrap_err().kind(), ErrorKind::TagNotFound);
	}
}
