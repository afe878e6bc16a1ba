use std::path::{Component, Path};

use crate::TransferError;

/// Validates a file name used as a local destination or remote path segment.
///
/// The name must be a single plain path component. Rejects:
/// - Empty names
/// - `.` and `..`
/// - Any separator (`/` or `\`), so nothing can escape the target directory
/// - NUL bytes
pub fn validate_file_name(name: &str) -> Result<(), TransferError> {
    if name.is_empty() {
        return Err(TransferError::InvalidName("empty name".into()));
    }

    if name.contains(['/', '\\', '\0']) {
        return Err(TransferError::InvalidName(format!(
            "path separators not allowed: {name}"
        )));
    }

    let mut components = Path::new(name).components();
    match (components.next(), components.next()) {
        (Some(Component::Normal(_)), None) => Ok(()),
        _ => Err(TransferError::InvalidName(format!(
            "not a plain file name: {name}"
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_empty_name() {
        assert!(validate_file_name("").is_err());
    }

    #[test]
    fn rejects_parent_dir() {
        assert!(validate_file_name("..").is_err());
    }

    #[test]
    fn rejects_current_dir() {
        assert!(validate_file_name(".").is_err());
    }

    #[test]
    fn rejects_traversal() {
        assert!(validate_file_name("../../etc/passwd").is_err());
        assert!(validate_file_name("..\\secret").is_err());
    }

    #[test]
    fn rejects_absolute_path() {
        assert!(validate_file_name("/tmp/evil").is_err());
    }

    #[test]
    fn rejects_nested_path() {
        assert!(validate_file_name("sub/file.txt").is_err());
    }

    #[test]
    fn rejects_nul() {
        assert!(validate_file_name("a\0b").is_err());
    }

    #[test]
    fn accepts_plain_names() {
        assert!(validate_file_name("report.pdf").is_ok());
        assert!(validate_file_name("IMG 2024-01-01.jpg").is_ok());
        assert!(validate_file_name(".hidden").is_ok());
        assert!(validate_file_name("naïve résumé.txt").is_ok());
    }
}
