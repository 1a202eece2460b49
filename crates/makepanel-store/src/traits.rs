//! Store trait definitions

use crate::StoreResult;

/// Store of editable configuration files
///
/// Names are bare file names; implementations reject anything that could
/// address a file outside the store.
pub trait ConfigStore: Send + Sync {
    /// List file names, sorted
    fn list(&self) -> StoreResult<Vec<String>>;

    /// Read a file's content
    fn read(&self, name: &str) -> StoreResult<String>;

    /// Write a file, returning the name it was stored under
    fn write(&self, name: &str, content: &str) -> StoreResult<String>;

    /// Delete a file
    fn delete(&self, name: &str) -> StoreResult<()>;
}

/// Check that a name is a single, visible path component
pub fn is_valid_file_name(name: &str) -> bool {
    !name.is_empty()
        && !name.starts_with('.')
        && !name.contains(['/', '\\', '\0'])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn file_name_rules() {
        assert!(is_valid_file_name("app.toml"));
        assert!(is_valid_file_name("my config.toml"));

        assert!(!is_valid_file_name(""));
        assert!(!is_valid_file_name(".."));
        assert!(!is_valid_file_name(".hidden"));
        assert!(!is_valid_file_name("../etc/passwd"));
        assert!(!is_valid_file_name("sub/app.toml"));
        assert!(!is_valid_file_name("sub\\app.toml"));
    }
}
