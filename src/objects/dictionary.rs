//! Dictionary object - ordered name to handle mapping

use indexmap::IndexMap;

use crate::cad_object::ObjectCommon;
use crate::types::Handle;

/// Duplicate record cloning behaviour (group code 281 of a dictionary,
/// 280 of an xrecord).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DictionaryCloningFlags {
    NotApplicable = 0,
    #[default]
    KeepExisting = 1,
    UseClone = 2,
    XrefName = 3,
    Name = 4,
    UnmangleName = 5,
}

impl DictionaryCloningFlags {
    /// Create from DXF value
    pub fn from_value(value: i16) -> Self {
        match value {
            1 => DictionaryCloningFlags::KeepExisting,
            2 => DictionaryCloningFlags::UseClone,
            3 => DictionaryCloningFlags::XrefName,
            4 => DictionaryCloningFlags::Name,
            5 => DictionaryCloningFlags::UnmangleName,
            _ => DictionaryCloningFlags::NotApplicable,
        }
    }

    /// Convert to DXF value
    pub fn to_value(self) -> i16 {
        self as i16
    }
}

/// Named container for non-graphical objects.
///
/// Keys keep insertion order, which is also the order entries are written
/// in. Values may be other dictionaries, so dictionaries nest to any depth.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct CadDictionary {
    pub common: ObjectCommon,
    entries: IndexMap<String, Handle>,
    /// Entries are hard-owned (written with 360 instead of 350)
    pub hard_owner: bool,
    pub cloning: DictionaryCloningFlags,
    /// Written as `ACDBDICTIONARYWDFLT`, which carries a default entry
    pub with_default: bool,
    /// Entry used when a lookup misses (340); a reference, not owned
    pub default_entry: Option<Handle>,
}

impl CadDictionary {
    pub fn new() -> Self {
        Self::default()
    }

    /// A dictionary with a default entry, like `ACAD_PLOTSTYLENAME`.
    pub fn with_default(default_entry: Option<Handle>) -> Self {
        Self {
            with_default: true,
            default_entry,
            ..Self::default()
        }
    }

    /// Entry for `key`, falling back to the default entry.
    pub fn get_or_default(&self, key: &str) -> Option<Handle> {
        self.get(key).or(self.default_entry)
    }

    /// Insert an entry; an existing key is replaced in place.
    pub fn insert(&mut self, key: impl Into<String>, handle: Handle) -> Option<Handle> {
        self.entries.insert(key.into(), handle)
    }

    pub fn get(&self, key: &str) -> Option<Handle> {
        self.entries.get(key).copied()
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    /// Key under which a handle is stored.
    pub fn key_of(&self, handle: Handle) -> Option<&str> {
        self.entries
            .iter()
            .find(|(_, h)| **h == handle)
            .map(|(k, _)| k.as_str())
    }

    /// Remove every entry pointing at `handle`, keeping the order of the rest.
    pub fn remove_handle(&mut self, handle: Handle) -> bool {
        let before = self.entries.len();
        self.entries.retain(|_, h| *h != handle);
        before != self.entries.len()
    }

    /// Keep only the entries accepted by `keep`.
    pub fn retain(&mut self, mut keep: impl FnMut(&str, Handle) -> bool) {
        self.entries.retain(|k, h| keep(k, *h));
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn entries(&self) -> impl Iterator<Item = (&str, Handle)> {
        self.entries.iter().map(|(k, h)| (k.as_str(), *h))
    }

    pub fn handles(&self) -> impl Iterator<Item = Handle> + '_ {
        self.entries.values().copied()
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
    fn test_insertion_order_is_kept() {
        let mut dict = CadDictionary::new();
        dict.insert("ZETA", Handle::new(3));
        dict.insert("ALPHA", Handle::new(1));
        dict.insert("MU", Handle::new(2));

        let keys: Vec<&str> = dict.entries().map(|(k, _)| k).collect();
        assert_eq!(keys, vec!["ZETA", "ALPHA", "MU"]);
    }

    #[test]
    fn test_replace_keeps_position() {
        let mut dict = CadDictionary::new();
        dict.insert("A", Handle::new(1));
        dict.insert("B", Handle::new(2));
        assert_eq!(dict.insert("A", Handle::new(9)), Some(Handle::new(1)));
        assert_eq!(dict.entries().next(), Some(("A", Handle::new(9))));
    }

    #[test]
    fn test_remove_and_lookup() {
        let mut dict = CadDictionary::new();
        dict.insert("A", Handle::new(1));
        dict.insert("B", Handle::new(2));
        assert_eq!(dict.key_of(Handle::new(2)), Some("B"));
        assert!(dict.remove_handle(Handle::new(1)));
        assert!(!dict.contains_key("A"));
        assert_eq!(dict.len(), 1);
    }

    #[test]
    fn test_default_entry_fallback() {
        let mut dict = CadDictionary::with_default(Some(Handle::new(0xF)));
        dict.insert("Normal", Handle::new(0xF));
        dict.insert("Thin", Handle::new(0x10));
        assert!(dict.with_default);
        assert_eq!(dict.get_or_default("Thin"), Some(Handle::new(0x10)));
        assert_eq!(dict.get_or_default("Missing"), Some(Handle::new(0xF)));
        assert_eq!(CadDictionary::new().get_or_default("Missing"), None);
    }

    #[test]
    fn test_cloning_flags() {
        assert_eq!(DictionaryCloningFlags::from_value(3), DictionaryCloningFlags::XrefName);
        assert_eq!(DictionaryCloningFlags::from_value(42), DictionaryCloningFlags::NotApplicable);
        assert_eq!(DictionaryCloningFlags::default().to_value(), 1);
    }
}
