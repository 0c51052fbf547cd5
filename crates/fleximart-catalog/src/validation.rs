//! Input validation for catalog operations
//!
//! Collection names and query filters are validated client-side before any
//! request reaches the server, to keep operator injection out of filters
//! built from user input (e.g. CLI arguments).

use bson::Bson;
use fleximart_common::CatalogError;

use crate::Result;

/// Maximum allowed length for collection names (server limit is 255)
const MAX_COLLECTION_NAME_LENGTH: usize = 120;

/// Operators that execute server-side JavaScript; never valid in catalog filters
const FORBIDDEN_OPERATORS: &[&str] = &["$where", "$function", "$accumulator"];

/// Collection name checked against the catalog naming rules
///
/// Guarantees: not empty, at most 120 characters, no NUL bytes, no
/// `system.` prefix, no `$` characters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedCollectionName {
    name: String,
}

impl ValidatedCollectionName {
    /// Validates and wraps a collection name
    ///
    /// # Errors
    /// Returns `CatalogError::Validation` when any naming rule is violated.
    pub fn new(name: &str) -> Result<Self> {
        if name.is_empty() {
            return Err(CatalogError::Validation(
                "Collection name cannot be empty".to_string(),
            ));
        }

        if name.len() > MAX_COLLECTION_NAME_LENGTH {
            return Err(CatalogError::Validation(format!(
                "Collection name exceeds maximum length of {} characters: '{}'",
                MAX_COLLECTION_NAME_LENGTH, name
            )));
        }

        if name.contains('\0') {
            return Err(CatalogError::Validation(
                "Collection name cannot contain null bytes".to_string(),
            ));
        }

        if name.starts_with("system.") {
            return Err(CatalogError::Validation(format!(
                "Collection name cannot start with 'system.' (reserved): '{}'",
                name
            )));
        }

        if name.contains('$') {
            return Err(CatalogError::Validation(format!(
                "Collection name cannot contain '$' character: '{}'",
                name
            )));
        }

        if name.contains("..") || name.contains("//") {
            tracing::warn!(collection = %name, "collection name contains suspicious pattern");
        }

        Ok(ValidatedCollectionName {
            name: name.to_string(),
        })
    }

    pub fn as_str(&self) -> &str {
        &self.name
    }

    pub fn into_string(self) -> String {
        self.name
    }
}

impl AsRef<str> for ValidatedCollectionName {
    fn as_ref(&self) -> &str {
        &self.name
    }
}

impl std::fmt::Display for ValidatedCollectionName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name)
    }
}

/// Rejects filters containing server-side JavaScript operators
///
/// Walks the whole value recursively; nested documents and arrays are
/// checked the same way as the top level.
///
/// # Errors
/// Returns `CatalogError::Validation` naming the offending operator.
pub fn validate_filter(filter: &Bson) -> Result<()> {
    match filter {
        Bson::Document(doc) => {
            for (key, value) in doc.iter() {
                if FORBIDDEN_OPERATORS.contains(&key.as_str()) {
                    return Err(CatalogError::Validation(format!(
                        "Operator '{}' is not allowed in catalog filters",
                        key
                    )));
                }
                validate_filter(value)?;
            }
            Ok(())
        }
        Bson::Array(arr) => {
            for item in arr {
                validate_filter(item)?;
            }
            Ok(())
        }
        _ => Ok(()),
    }
}
