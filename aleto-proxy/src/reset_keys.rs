//! Static reset-key table.
//!
//! Reset keys are opaque strings handed out to plugin users. Checking one
//! only reports what reset it stands for; the relay performs no credit
//! bookkeeping itself.

use std::collections::HashMap;

use serde::Serialize;

/// Kind of credit reset a key grants.
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum ResetType {
    Default,
    Zero,
}

impl std::fmt::Display for ResetType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Self::Default => "default",
            Self::Zero => "zero",
        })
    }
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ResetKeyDescriptor {
    pub reset_type: ResetType,
    pub credits_granted: u32,
    pub message: String,
}

impl ResetKeyDescriptor {
    pub fn new(reset_type: ResetType, credits_granted: u32, message: impl Into<String>) -> Self {
        Self {
            reset_type,
            credits_granted,
            message: message.into(),
        }
    }
}

/// Immutable exact-match lookup from reset key to descriptor.
#[derive(Debug, Clone, Default)]
pub struct ResetKeyTable {
    entries: HashMap<String, ResetKeyDescriptor>,
}

impl ResetKeyTable {
    /// The keys shipped with the plugin.
    pub fn builtin() -> Self {
        Self::from_entries([
            (
                "ALETO_RESET_DEFAULT_2024",
                ResetKeyDescriptor::new(
                    ResetType::Default,
                    2,
                    "Credits reset to default (2 credits)",
                ),
            ),
            (
                "ALETO_RESET_ZERO_2024",
                ResetKeyDescriptor::new(ResetType::Zero, 0, "Credits reset to zero"),
            ),
        ])
    }

    pub fn from_entries<K, I>(entries: I) -> Self
    where
        K: Into<String>,
        I: IntoIterator<Item = (K, ResetKeyDescriptor)>,
    {
        Self {
            entries: entries
                .into_iter()
                .map(|(k, v)| (k.into(), v))
                .collect(),
        }
    }

    /// Case-sensitive, no trimming.
    #[inline]
    pub fn lookup(&self, key: &str) -> Option<&ResetKeyDescriptor> {
        self.entries.get(key)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_default_key() {
        let table = ResetKeyTable::builtin();
        let d = table.lookup("ALETO_RESET_DEFAULT_2024").expect("known key");
        assert_eq!(d.reset_type, ResetType::Default);
        assert_eq!(d.credits_granted, 2);
        assert_eq!(d.message, "Credits reset to default (2 credits)");
    }

    #[test]
    fn builtin_zero_key() {
        let table = ResetKeyTable::builtin();
        let d = table.lookup("ALETO_RESET_ZERO_2024").expect("known key");
        assert_eq!(d.reset_type, ResetType::Zero);
        assert_eq!(d.credits_granted, 0);
    }

    #[test]
    fn lookup_is_exact() {
        let table = ResetKeyTable::builtin();
        assert!(table.lookup("aleto_reset_default_2024").is_none());
        assert!(table.lookup(" ALETO_RESET_DEFAULT_2024").is_none());
        assert!(table.lookup("ALETO_RESET_DEFAULT").is_none());
        assert!(table.lookup("nonexistent").is_none());
        assert_eq!(table.len(), 2);
    }

    #[test]
    fn empty_table_rejects_everything() {
        let table = ResetKeyTable::from_entries(Vec::<(String, ResetKeyDescriptor)>::new());
        assert!(table.is_empty());
        assert!(table.lookup("ALETO_RESET_DEFAULT_2024").is_none());
        assert!(!ResetKeyTable::builtin().is_empty());
    }

    #[test]
    fn descriptor_serializes_camel_case() {
        let d = ResetKeyDescriptor::new(ResetType::Zero, 0, "Credits reset to zero");
        let v = serde_json::to_value(&d).unwrap();
        assert_eq!(
            v,
            serde_json::json!({
                "resetType": "zero",
                "creditsGranted": 0,
                "message": "Credits reset to zero"
            })
        );
    }
}
