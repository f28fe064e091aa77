//! Unit tests for subtree aggregation and size ordering

#[cfg(test)]
mod tests {
    use crate::fixtures::{create_nested_fixture, write_file_sync};
    use chrono::{DateTime, Utc};
    use foldersize::services::aggregate::{compute_size, heaviest, sort_by_size};
    use foldersize::{ItemInfo, ItemType, SizeAggregator, SizeBasis, WalkAggregator};
    use std::fs;
    use tempfile::TempDir;

    fn item(name: &str, size: u64) -> ItemInfo {
        ItemInfo {
            name: name.to_string(),
            path: format!("/d/{name}"),
            size,
            size_human: String::new(),
            file_count: 0,
            folder_count: 0,
            last_modified: DateTime::<Utc>::from(std::time::UNIX_EPOCH),
            is_hidden: false,
            extension: String::new(),
            item_type: ItemType::File,
        }
    }

    fn names(items: &[ItemInfo]) -> Vec<&str> {
        items.iter().map(|i| i.name.as_str()).collect()
    }

    #[test]
    fn test_sum_of_nested_files() {
        let temp_dir = TempDir::new().unwrap();
        let root = create_nested_fixture(temp_dir.path()).unwrap();

        assert_eq!(compute_size(&root).unwrap(), 13 + 1024 + 512 + 2048);
        assert_eq!(compute_size(root.join("subdir1")).unwrap(), 1024 + 512);
        assert_eq!(compute_size(root.join("empty")).unwrap(), 0);
    }

    #[test]
    fn test_file_root_is_its_own_length() {
        let temp_dir = TempDir::new().unwrap();
        let file = temp_dir.path().join("single.bin");
        write_file_sync(&file, vec![7u8; 4096]).unwrap();

        let totals = WalkAggregator::default().compute_totals(&file).unwrap();
        assert_eq!(totals.bytes, 4096);
        assert_eq!(totals.files, 1);
        assert_eq!(totals.folders, 0);
    }

    #[test]
    fn test_counts_exclude_root_directory() {
        let temp_dir = TempDir::new().unwrap();
        let root = create_nested_fixture(temp_dir.path()).unwrap();

        let totals = WalkAggregator::default().compute_totals(&root).unwrap();
        assert_eq!(totals.files, 4);
        // subdir1, subdir1/nested, subdir2, empty
        assert_eq!(totals.folders, 4);
    }

    #[test]
    fn test_deep_nesting() {
        let temp_dir = TempDir::new().unwrap();
        let mut dir = temp_dir.path().join("deep");
        for level in 0..200 {
            dir = dir.join(format!("l{level}"));
        }
        write_file_sync(dir.join("leaf.txt"), b"leaf").unwrap();
        write_file_sync(temp_dir.path().join("deep/top.txt"), b"top").unwrap();

        let totals = WalkAggregator::default()
            .compute_totals(&temp_dir.path().join("deep"))
            .unwrap();
        assert_eq!(totals.bytes, 7);
        assert_eq!(totals.folders, 200);
    }

    #[test]
    fn test_missing_root_is_an_error() {
        let temp_dir = TempDir::new().unwrap();
        let missing = temp_dir.path().join("gone");

        let err = compute_size(&missing).unwrap_err();
        assert_eq!(err.path, missing);
        assert_eq!(err.source.kind(), std::io::ErrorKind::NotFound);
        assert!(err.to_string().contains("gone"));
    }

    #[test]
    fn test_physical_basis_counts_allocated_blocks() {
        let temp_dir = TempDir::new().unwrap();
        let root = create_nested_fixture(temp_dir.path()).unwrap();

        let physical = WalkAggregator::new(SizeBasis::Physical)
            .compute_size(&root)
            .unwrap();
        // Filesystems differ in allocation; non-empty files occupy something.
        assert!(physical > 0);
    }

    #[cfg(unix)]
    #[test]
    fn test_unreadable_subdirectory_voids_the_total() {
        use std::os::unix::fs::PermissionsExt;

        let temp_dir = TempDir::new().unwrap();
        if !crate::fixtures::permissions_enforced(temp_dir.path()) {
            eprintln!("permission bits not enforced, skipping");
            return;
        }

        let root = create_nested_fixture(temp_dir.path()).unwrap();
        let locked = root.join("subdir2");
        fs::set_permissions(&locked, fs::Permissions::from_mode(0o000)).unwrap();

        let result = compute_size(&root);
        fs::set_permissions(&locked, fs::Permissions::from_mode(0o755)).unwrap();

        let err = result.expect_err("unreadable subtree must not yield a sum");
        assert_eq!(err.path, locked);
        assert_eq!(err.source.kind(), std::io::ErrorKind::PermissionDenied);
    }

    #[cfg(unix)]
    #[test]
    fn test_symlinks_are_not_followed() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path().join("links");
        write_file_sync(root.join("real/data.bin"), vec![0u8; 1000]).unwrap();
        std::os::unix::fs::symlink(root.join("real"), root.join("alias")).unwrap();
        // A cycle back to the root must terminate.
        std::os::unix::fs::symlink(&root, root.join("real/loop")).unwrap();

        let totals = WalkAggregator::default().compute_totals(&root).unwrap();
        let alias_len = fs::symlink_metadata(root.join("alias")).unwrap().len();
        let loop_len = fs::symlink_metadata(root.join("real/loop")).unwrap().len();

        assert_eq!(totals.bytes, 1000 + alias_len + loop_len);
        assert_eq!(totals.files, 3);
    }

    #[test]
    fn test_sort_by_size_descending() {
        let mut items = vec![item("a", 10), item("b", 20), item("c", 5)];
        sort_by_size(&mut items);

        assert_eq!(names(&items), vec!["b", "a", "c"]);
        for pair in items.windows(2) {
            assert!(pair[0].size >= pair[1].size);
        }
    }

    #[test]
    fn test_sort_is_idempotent_with_ties() {
        let mut items = vec![
            item("p", 3),
            item("q", 7),
            item("r", 3),
            item("s", 7),
            item("t", 0),
        ];
        sort_by_size(&mut items);
        let once = items.clone();
        sort_by_size(&mut items);

        assert_eq!(items, once);
    }

    #[test]
    fn test_heaviest_limits_without_touching_input() {
        let items = vec![item("a", 10), item("b", 20), item("c", 5)];

        let top = heaviest(&items, Some(2));
        assert_eq!(names(&top), vec!["b", "a"]);
        assert_eq!(names(&items), vec!["a", "b", "c"]);

        assert_eq!(heaviest(&items, None).len(), 3);
    }
}
