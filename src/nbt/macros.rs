/// Shorthand way to create a Tag::Compound.
/// Example:
/// ```no_run
/// # use tagstore::{compound, nbt::Tag};
/// compound!{
///     ("Item One", 0i8),
///     (String::from("Item Two"), 2i32),
///     ("Item Three", Tag::Byte(1))
/// };
/// ```
#[macro_export]
macro_rules! compound {
    ($(($name:expr, $value:expr)),+$(,)?) => {
        $crate::nbt::tag::Tag::Compound($crate::nbt::Map::from([
            $(
                (::std::string::String::from($name), $crate::nbt::tag::Tag::from($value)),
            )+
        ]))
    };
    () => {
        $crate::nbt::tag::Tag::Compound($crate::nbt::Map::new())
    };
}

/// Shorthand way to create a Tag::List.
/// Example:
/// ```no_run
/// # use tagstore::list;
/// list![1i32, 2, 3, 4, 5, 6, 7, 8, 9, 10];
/// list![
///     "One",
///     "Two",
///     "Three",
/// ];
/// list![0i8; 16];
/// ```
#[macro_export]
macro_rules! list {
    ($($item:expr),+$(,)?) => {
        $crate::nbt::tag::Tag::List($crate::nbt::tag::ListTag::from(::std::vec![
            $(
                $item,
            )+
        ]))
    };
    ($value:expr; $repititions:expr) => {
        $crate::nbt::tag::Tag::List($crate::nbt::tag::ListTag::from(::std::vec![$value; $repititions]))
    };
    () => {
        $crate::nbt::tag::Tag::List($crate::nbt::tag::ListTag::Empty)
    };
}
