//! Unit tests for hidden-file detection, extensions and timestamps

#[cfg(test)]
mod tests {
    use foldersize::services::metadata::{extension_of, is_hidden, modified_at};
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_extension_from_own_name() {
        assert_eq!(extension_of("report.pdf"), ".pdf");
        assert_eq!(extension_of("archive.tar.gz"), ".gz");
        assert_eq!(extension_of("Makefile"), "");
        assert_eq!(extension_of(".bashrc"), "");
        assert_eq!(extension_of(".config.toml"), ".toml");
    }

    #[test]
    fn test_dot_names_are_hidden() {
        let temp_dir = TempDir::new().unwrap();
        let hidden = temp_dir.path().join(".secret");
        let visible = temp_dir.path().join("plain.txt");
        fs::write(&hidden, b"x").unwrap();
        fs::write(&visible, b"x").unwrap();

        assert!(is_hidden(".secret", &fs::metadata(&hidden).unwrap()));
        assert!(!is_hidden("plain.txt", &fs::metadata(&visible).unwrap()));
    }

    #[test]
    fn test_modified_at_matches_metadata() {
        let temp_dir = TempDir::new().unwrap();
        let file = temp_dir.path().join("stamp.txt");
        fs::write(&file, b"x").unwrap();
        let meta = fs::metadata(&file).unwrap();

        let stamp = modified_at(&file, &meta);
        let expected = chrono::DateTime::<chrono::Utc>::from(meta.modified().unwrap());
        assert_eq!(stamp, expected);
    }
}
