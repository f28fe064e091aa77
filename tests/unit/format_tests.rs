//! Unit tests for human-readable sizes

#[cfg(test)]
mod tests {
    use foldersize::services::format::format_size;

    #[test]
    fn test_bytes_are_exact() {
        assert_eq!(format_size(0), "0 B");
        assert_eq!(format_size(1), "1 B");
        assert_eq!(format_size(1023), "1023 B");
    }

    #[test]
    fn test_binary_units() {
        assert_eq!(format_size(1024), "1.0 KB");
        assert_eq!(format_size(1536), "1.5 KB");
        assert_eq!(format_size(1024 * 1024), "1.0 MB");
        assert_eq!(format_size(5 * 1024 * 1024 * 1024), "5.0 GB");
    }

    #[test]
    fn test_largest_value_stays_in_exabytes() {
        assert_eq!(format_size(u64::MAX), "16.0 EB");
    }
}
