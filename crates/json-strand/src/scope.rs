/// Nesting state shared by [`crate::JsonReader`] and [`crate::JsonWriter`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Scope {
    EmptyDocument,
    NonEmptyDocument,
    EmptyArray,
    NonEmptyArray,
    EmptyObject,
    /// A name has been read or written; its value is pending.
    DanglingName,
    NonEmptyObject,
}
