//! Name interning.
//!
//! Every port name, type name and instance name is addressed by a small
//! [`StringId`]; two names are equal iff their ids are equal. A dictionary is
//! created once per process (or per test) and handed to resources as an
//! `Arc<StringDictionary>`.

use std::fmt;
use std::sync::Arc;

use parking_lot::RwLock;
use rustc_hash::FxHashMap;
use smol_str::SmolStr;

use crate::names;

/// Interned name identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct StringId(pub u32);

impl StringId {
    /// Sentinel returned for names that are not interned.
    pub const INVALID: Self = Self(u32::MAX);

    /// Returns true unless this is [`StringId::INVALID`].
    #[must_use]
    pub fn is_valid(self) -> bool {
        self != Self::INVALID
    }
}

impl fmt::Display for StringId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_valid() {
            write!(f, "#{}", self.0)
        } else {
            f.write_str("#invalid")
        }
    }
}

#[derive(Debug, Default)]
struct Entries {
    ids: FxHashMap<SmolStr, StringId>,
    names: Vec<SmolStr>,
}

/// Bidirectional, thread-safe mapping between names and [`StringId`]s.
#[derive(Debug)]
pub struct StringDictionary {
    entries: RwLock<Entries>,
}

impl Default for StringDictionary {
    fn default() -> Self {
        Self::new()
    }
}

impl StringDictionary {
    /// Creates a dictionary pre-seeded with the well-known names in
    /// [`names::SEEDED`], so their ids match the `names::*` constants.
    #[must_use]
    pub fn new() -> Self {
        let mut entries = Entries::default();
        for name in names::SEEDED {
            let id = StringId(entries.names.len() as u32);
            entries.names.push(SmolStr::new(name));
            entries.ids.insert(SmolStr::new(name), id);
        }
        Self {
            entries: RwLock::new(entries),
        }
    }

    /// Creates a shared dictionary handle.
    #[must_use]
    pub fn shared() -> Arc<Self> {
        Arc::new(Self::new())
    }

    /// Looks up the id of `name` without interning it.
    #[must_use]
    pub fn get_id(&self, name: &str) -> StringId {
        self.entries
            .read()
            .ids
            .get(name)
            .copied()
            .unwrap_or(StringId::INVALID)
    }

    /// Interns `name`, returning its existing id when already present.
    pub fn insert(&self, name: &str) -> StringId {
        if let Some(id) = self.entries.read().ids.get(name) {
            return *id;
        }
        let mut entries = self.entries.write();
        // Another writer may have interned it between the two locks.
        if let Some(id) = entries.ids.get(name) {
            return *id;
        }
        let id = StringId(entries.names.len() as u32);
        let name = SmolStr::new(name);
        entries.names.push(name.clone());
        entries.ids.insert(name, id);
        id
    }

    /// Returns the text for `id`.
    #[must_use]
    pub fn get(&self, id: StringId) -> Option<SmolStr> {
        self.entries.read().names.get(id.0 as usize).cloned()
    }

    /// Returns the text for `id`, or a placeholder for unknown ids.
    #[must_use]
    pub fn name(&self, id: StringId) -> SmolStr {
        self.get(id).unwrap_or_else(|| SmolStr::new_inline("?"))
    }

    /// Number of interned names.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.read().names.len()
    }

    /// Returns true if nothing has been interned.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn interning_is_stable() {
        let dict = StringDictionary::new();
        let a = dict.insert("Motor1");
        let b = dict.insert("Motor1");
        assert_eq!(a, b);
        assert_eq!(dict.get_id("Motor1"), a);
        assert_eq!(dict.get(a).as_deref(), Some("Motor1"));
        assert_ne!(dict.insert("motor1"), a);
    }

    #[test]
    fn misses_return_the_invalid_sentinel() {
        let dict = StringDictionary::new();
        assert_eq!(dict.get_id("NOT_THERE"), StringId::INVALID);
        assert!(!StringId::INVALID.is_valid());
        assert_eq!(dict.get(StringId::INVALID), None);
        assert_eq!(dict.name(StringId::INVALID), "?");
    }

    #[test]
    fn seeded_names_match_constants() {
        let dict = StringDictionary::new();
        assert_eq!(dict.len(), names::SEEDED.len());
        for (index, name) in names::SEEDED.iter().enumerate() {
            assert_eq!(dict.get_id(name), StringId(index as u32));
        }
        assert_eq!(dict.get(names::REQ).as_deref(), Some("REQ"));
        assert_eq!(dict.get(names::GEN_STRUCT_MUX).as_deref(), Some("GEN_STRUCT_MUX"));
        assert_eq!(dict.get(names::DATE_AND_TIME).as_deref(), Some("DATE_AND_TIME"));
    }

    #[test]
    fn concurrent_inserts_agree() {
        let dict = StringDictionary::shared();
        let handles: Vec<_> = (0..4)
            .map(|_| {
                let dict = Arc::clone(&dict);
                std::thread::spawn(move || dict.insert("Shared"))
            })
            .collect();
        let ids: Vec<_> = handles.into_iter().map(|h| h.join().unwrap()).collect();
        assert!(ids.windows(2).all(|w| w[0] == w[1]));
    }
}
