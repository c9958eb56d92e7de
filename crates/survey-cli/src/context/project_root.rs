use std::path::{Path, PathBuf};

use survey_config::PROJECT_DIR;

/// Walk upwards from `start` until a `.survey` directory is found.
#[must_use]
pub fn find_project_root(start: &Path) -> Option<PathBuf> {
    start
        .ancestors()
        .find(|dir| dir.join(PROJECT_DIR).is_dir())
        .map(Path::to_path_buf)
}

#[cfg(test)]
mod tests {
    use tempfile::TempDir;

    use super::find_project_root;

    #[test]
    fn finds_root_in_current_directory() {
        let temp = TempDir::new().expect("tempdir should create");
        std::fs::create_dir(temp.path().join(".survey")).expect(".survey should create");

        assert_eq!(find_project_root(temp.path()).as_deref(), Some(temp.path()));
    }

    #[test]
    fn finds_root_from_nested_directory() {
        let temp = TempDir::new().expect("tempdir should create");
        std::fs::create_dir(temp.path().join(".survey")).expect(".survey should create");
        let deep = temp.path().join("a/b");
        std::fs::create_dir_all(&deep).expect("nested dirs should create");

        assert_eq!(find_project_root(&deep).as_deref(), Some(temp.path()));
    }

    #[test]
    fn none_without_marker() {
        let temp = TempDir::new().expect("tempdir should create");
        assert!(find_project_root(temp.path()).is_none());
    }
}
