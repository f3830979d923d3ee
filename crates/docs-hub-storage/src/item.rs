//! Listing entries and the virtual directory rule

use serde::{Deserialize, Serialize};

/// One entry returned by a non-recursive listing
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct StorageItem {
    /// Object key (or common prefix for directories)
    pub file_name: String,
    /// Prefix the listing was queried with
    pub directory_name: String,
    /// Derived from [`is_virtual_directory`]
    pub is_directory: bool,
}

impl StorageItem {
    /// Build an entry from a listed key and the content tag the backend reported for it
    pub fn from_listing(key: impl Into<String>, prefix: &str, etag: Option<&str>) -> Self {
        Self {
            file_name: key.into(),
            directory_name: prefix.to_string(),
            is_directory: is_virtual_directory(etag),
        }
    }
}

/// Decide whether a listed entry is a synthetic folder.
///
/// Object stores have no directories; a non-recursive listing reports common
/// prefixes without a content tag, while real objects always carry one. A
/// backend that stores zero-byte marker objects without an ETag will have them
/// reported as directories too.
pub fn is_virtual_directory(etag: Option<&str>) -> bool {
    etag.map_or(true, |tag| tag.trim_matches('"').is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(None, true)]
    #[case(Some(""), true)]
    #[case(Some("\"\""), true)]
    #[case(Some("\"d41d8cd98f00b204e9800998ecf8427e\""), false)]
    #[case(Some("abc123"), false)]
    fn test_virtual_directory_rule(#[case] etag: Option<&str>, #[case] expected: bool) {
        assert_eq!(is_virtual_directory(etag), expected);
    }

    #[test]
    fn test_storage_item_json_shape() {
        let item = StorageItem::from_listing("docs/a.txt", "docs/", Some("etag"));
        let json = serde_json::to_value(&item).unwrap();

        assert_eq!(json["file_name"], "docs/a.txt");
        assert_eq!(json["directory_name"], "docs/");
        assert_eq!(json["is_directory"], false);
    }
}
