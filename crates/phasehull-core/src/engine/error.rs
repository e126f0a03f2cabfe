use crate::core::geometry::barycentric::MappingError;
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum HullError {
    #[error("Barycentric mapping needs 3 or 4 elements, got {found}")]
    InvalidArity { found: usize },

    #[error("Composition contains none of the requested elements")]
    EmptyComposition,

    #[error("Entry '{entry}' contains element '{element}' outside the reference system")]
    ElementOutsideSystem { entry: String, element: String },

    #[error("Chemical systems with {0} elements are not supported (expected 1 to 4)")]
    UnsupportedArity(usize),

    #[error("Entry label '{id}' is used by more than one entry")]
    DuplicateEntryId { id: String },
}

impl From<MappingError> for HullError {
    fn from(err: MappingError) -> Self {
        match err {
            MappingError::InvalidArity { found } => Self::InvalidArity { found },
            MappingError::EmptyComposition => Self::EmptyComposition,
        }
    }
}
