//! Front-matter schema: the fixed key table checked by the validator.
//!
//! ```yaml
//! ---
//! title: 'title name'
//! summary: 'summary text'
//! __int_icon: 'dir/to/icon'
//! dashboard:
//!   - desc: 'dashboard name'
//!     path: 'dir/to/dashboard-json'
//! monitor:
//!   - desc: 'monitor name'
//!     path: 'dir/to/monitor-json'
//! ---
//! ```

/// Key holding the integration icon directory. Prefixed to avoid clashing
/// with the site theme's own `icon` key.
pub const ICON_KEY: &str = "__int_icon";
/// Sidebar icon key used by the site theme; not part of the metadata.
pub const SIDEBAR_ICON_KEY: &str = "icon";
/// Files required inside the icon directory (light, dark).
pub const ICON_FILES: [&str; 2] = ["icon.png", "icon-dark.png"];
/// File required inside every dashboard/monitor asset directory.
pub const ASSET_META_FILE: &str = "meta.json";
/// Asset path meaning "intentionally not provided".
pub const UNSET_PATH: &str = "-";
/// Sub-keys accepted in a dashboard/monitor entry.
pub const ASSET_DESC_KEY: &str = "desc";
pub const ASSET_PATH_KEY: &str = "path";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
/// How a key's value is validated.
pub enum KeyRule {
    /// Non-empty string.
    Text,
    /// Non-empty string naming a directory holding `ICON_FILES`.
    IconDir,
    /// Non-empty list of `{desc, path}` entries pointing at JSON assets.
    AssetList,
}

#[derive(Debug, Clone, Copy)]
pub struct KeyDescriptor {
    pub key: &'static str,
    pub required: bool,
    pub rule: KeyRule,
}

pub const SCHEMA: &[KeyDescriptor] = &[
    KeyDescriptor {
        key: "title",
        required: true,
        rule: KeyRule::Text,
    },
    KeyDescriptor {
        key: "summary",
        required: true,
        rule: KeyRule::Text,
    },
    KeyDescriptor {
        key: ICON_KEY,
        required: true,
        rule: KeyRule::IconDir,
    },
    KeyDescriptor {
        key: "dashboard",
        required: true,
        rule: KeyRule::AssetList,
    },
    KeyDescriptor {
        key: "monitor",
        required: true,
        rule: KeyRule::AssetList,
    },
];

/// Schema entry for `key`; unknown keys are ignored by validation.
pub fn lookup(key: &str) -> Option<&'static KeyDescriptor> {
    SCHEMA.iter().find(|d| d.key == key)
}

pub fn required_keys() -> impl Iterator<Item = &'static str> {
    SCHEMA.iter().filter(|d| d.required).map(|d| d.key)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookup_is_case_sensitive() {
        assert_eq!(lookup("title").map(|d| d.rule), Some(KeyRule::Text));
        assert!(lookup("Title").is_none());
        assert!(lookup(SIDEBAR_ICON_KEY).is_none());
    }

    #[test]
    fn test_required_keys_cover_schema() {
        let keys: Vec<_> = required_keys().collect();
        assert_eq!(keys, ["title", "summary", ICON_KEY, "dashboard", "monitor"]);
    }
}
