//! RocksDB column family definitions.

/// User records: username → UserRecord
pub const CF_USERS: &str = "users";

/// Get all column family names
pub fn all_column_families() -> Vec<&'static str> {
    vec![CF_USERS]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_all_column_families_non_empty() {
        let cfs = all_column_families();
        assert!(!cfs.is_empty());
    }

    #[test]
    fn test_no_duplicate_column_families() {
        let cfs = all_column_families();
        let mut unique = std::collections::HashSet::new();

        for cf in &cfs {
            assert!(unique.insert(cf), "Duplicate column family: {}", cf);
        }
    }
}
