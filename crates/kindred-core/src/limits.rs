//! Generation bounds and input validation limits

/// Default generations walked by a pedigree query
pub const DEFAULT_PEDIGREE_GENERATIONS: u32 = 5;

/// Default generations walked by a descendancy query (descendant trees branch faster)
pub const DEFAULT_DESCENDANCY_GENERATIONS: u32 = 4;

/// Default generations numbered by an Ahnentafel query
pub const DEFAULT_AHNENTAFEL_GENERATIONS: u32 = 5;

/// Hard cap on tree-shaped queries, whatever the caller asks for
pub const MAX_TREE_GENERATIONS: u32 = 10;

/// Depth bound on the ancestor maps built for relationship queries
pub const MAX_RELATIONSHIP_GENERATIONS: u32 = 15;

/// Maximum length for person and family ids (128 chars)
pub const MAX_ID_LEN: usize = 128;

/// Maximum length for a given name or surname (256 chars)
pub const MAX_NAME_LEN: usize = 256;

/// Maximum length for a place name (512 chars)
pub const MAX_PLACE_LEN: usize = 512;

/// Clamp a requested generation count.
///
/// Zero and negative requests fall back to `default`; anything above
/// [`MAX_TREE_GENERATIONS`] is capped. Never rejects.
pub fn clamp_generations(requested: i32, default: u32) -> u32 {
    if requested <= 0 {
        default
    } else {
        (requested as u32).min(MAX_TREE_GENERATIONS)
    }
}

/// Validation error type
#[derive(Debug, Clone, PartialEq)]
pub enum ValidationError {
    EmptyId,
    IdTooLong { len: usize, max: usize },
    NameTooLong { len: usize, max: usize },
    PlaceTooLong { len: usize, max: usize },
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyId => write!(f, "Id cannot be empty"),
            Self::IdTooLong { len, max } => {
                write!(f, "Id too long: {} chars (max {})", len, max)
            }
            Self::NameTooLong { len, max } => {
                write!(f, "Name too long: {} chars (max {})", len, max)
            }
            Self::PlaceTooLong { len, max } => {
                write!(f, "Place too long: {} chars (max {})", len, max)
            }
        }
    }
}

impl std::error::Error for ValidationError {}

/// Validate a person or family id
pub fn validate_id(id: &str) -> Result<(), ValidationError> {
    if id.trim().is_empty() {
        return Err(ValidationError::EmptyId);
    }
    if id.len() > MAX_ID_LEN {
        return Err(ValidationError::IdTooLong {
            len: id.len(),
            max: MAX_ID_LEN,
        });
    }
    Ok(())
}

/// Validate a given name or surname
pub fn validate_name(name: &str) -> Result<(), ValidationError> {
    if name.len() > MAX_NAME_LEN {
        return Err(ValidationError::NameTooLong {
            len: name.len(),
            max: MAX_NAME_LEN,
        });
    }
    Ok(())
}

/// Validate a place name
pub fn validate_place(place: &str) -> Result<(), ValidationError> {
    if place.len() > MAX_PLACE_LEN {
        return Err(ValidationError::PlaceTooLong {
            len: place.len(),
            max: MAX_PLACE_LEN,
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clamp_generations() {
        assert_eq!(clamp_generations(0, DEFAULT_PEDIGREE_GENERATIONS), 5);
        assert_eq!(clamp_generations(-3, DEFAULT_PEDIGREE_GENERATIONS), 5);
        assert_eq!(clamp_generations(0, DEFAULT_DESCENDANCY_GENERATIONS), 4);
        assert_eq!(clamp_generations(3, DEFAULT_PEDIGREE_GENERATIONS), 3);
        assert_eq!(clamp_generations(10, DEFAULT_PEDIGREE_GENERATIONS), 10);
        assert_eq!(clamp_generations(11, DEFAULT_PEDIGREE_GENERATIONS), 10);
        assert_eq!(clamp_generations(i32::MAX, DEFAULT_DESCENDANCY_GENERATIONS), 10);
    }

    #[test]
    fn test_validate_id() {
        assert!(validate_id("I12").is_ok());
        assert_eq!(validate_id(""), Err(ValidationError::EmptyId));
        assert_eq!(validate_id("   "), Err(ValidationError::EmptyId));
        assert!(validate_id(&"x".repeat(200)).is_err());
    }

    #[test]
    fn test_validate_name() {
        assert!(validate_name("").is_ok());
        assert!(validate_name("Johann Sebastian").is_ok());
        assert!(validate_name(&"x".repeat(300)).is_err());
    }
}
