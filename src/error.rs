use std::error::Error;
use std::fmt;

/// Errors surfaced by fallible [`Collection`](crate::Collection) operations.
///
/// A failed operation never leaves a partially applied change behind: the collection
/// looks exactly as it did before the call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CollectionError {
    /// `get(index)` with `index >= count`, or `first`/`last`/`shift`/`pop` on an empty
    /// collection (reported with `index == 0`).
    OutOfBounds { index: usize, count: usize },
    /// `pluck(field)` found an element without a field of that name.
    MissingField { field: String, index: usize },
    /// `pluck` found an element that is not a record (struct or string-keyed map).
    UnsupportedElementShape { index: usize, shape: &'static str },
}

impl CollectionError {
    pub(crate) fn empty() -> Self {
        CollectionError::OutOfBounds { index: 0, count: 0 }
    }
}

impl fmt::Display for CollectionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CollectionError::OutOfBounds { count: 0, .. } => {
                write!(f, "collection is empty")
            }
            CollectionError::OutOfBounds { index, count } => write!(
                f,
                "index (is {}) should be < count (is {})",
                index, count
            ),
            CollectionError::MissingField { field, index } => {
                write!(f, "element {} has no field named `{}`", index, field)
            }
            CollectionError::UnsupportedElementShape { index, shape } => write!(
                f,
                "element {} has shape `{}`, expected a record with named fields",
                index, shape
            ),
        }
    }
}

impl Error for CollectionError {}

/// Result alias used throughout the crate.
pub type Result<T, E = CollectionError> = core::result::Result<T, E>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display_messages() {
        assert_eq!(CollectionError::empty().to_string(), "collection is empty");
        assert_eq!(
            CollectionError::OutOfBounds { index: 7, count: 3 }.to_string(),
            "index (is 7) should be < count (is 3)"
        );
        assert_eq!(
            CollectionError::MissingField {
                field: "age".into(),
                index: 2
            }
            .to_string(),
            "element 2 has no field named `age`"
        );
        assert_eq!(
            CollectionError::UnsupportedElementShape {
                index: 0,
                shape: "integer"
            }
            .to_string(),
            "element 0 has shape `integer`, expected a record with named fields"
        );
    }

    #[test]
    fn test_error_is_std_error() {
        fn assert_error<E: Error + Send + Sync + 'static>(_: &E) {}
        assert_error(&CollectionError::empty());
    }
}
