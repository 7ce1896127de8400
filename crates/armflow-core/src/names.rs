//! Derived-name helpers and the storage-account name sanitizer

use crate::error::{BuildError, Result};

/// Minimum / maximum length for an Azure storage-account name
const STORAGE_NAME_MIN: usize = 3;
const STORAGE_NAME_MAX: usize = 24;

/// Derive the canonical name of a dependent resource from its owner.
///
/// `derived_name("web1", "nic")` yields `"web1-nic"`.
pub fn derived_name(owner: &str, tag: &str) -> String {
    format!("{}-{}", owner, tag)
}

/// Sanitize a candidate storage-account name.
///
/// Storage accounts only accept lowercase alphanumeric names of 3 to 24
/// characters; everything else is stripped. Fails when too few usable
/// characters remain.
pub fn sanitize_storage_name(candidate: &str) -> Result<String> {
    let cleaned: String = candidate
        .chars()
        .filter(|c| c.is_ascii_alphanumeric())
        .map(|c| c.to_ascii_lowercase())
        .take(STORAGE_NAME_MAX)
        .collect();

    if cleaned.len() < STORAGE_NAME_MIN {
        return Err(BuildError::InvalidName(format!(
            "'{}' leaves fewer than {} usable characters for a storage account name",
            candidate, STORAGE_NAME_MIN
        )));
    }

    Ok(cleaned)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_derived_name_format() {
        assert_eq!(derived_name("web1", "nic"), "web1-nic");
        assert_eq!(derived_name("web1", "subnet"), "web1-subnet");
    }

    #[test]
    fn test_sanitize_strips_separators_and_case() {
        assert_eq!(sanitize_storage_name("Web1-storage").unwrap(), "web1storage");
    }

    #[test]
    fn test_sanitize_truncates_to_limit() {
        let long = "a".repeat(40);
        assert_eq!(sanitize_storage_name(&long).unwrap().len(), 24);
    }

    #[test]
    fn test_sanitize_rejects_too_short() {
        assert!(sanitize_storage_name("--").is_err());
    }
}
