//! Interned names.
//!
//! Phase names, capability names and component identities are compared and
//! hashed constantly while the ordering graph is built. Every distinct live
//! string is stored once in a process-wide table; an [`InternedString`] is a
//! reference-counted handle whose equality and hashing work on the pointer.
//!
//! The table only holds weak references. When the last handle to a name is
//! dropped, its entry is removed and the storage is freed, so dropping a
//! builder (or an ordered chain) releases every name it used.

use std::cmp::Ordering;
use std::collections::HashMap;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::ops::Deref;
use std::sync::{Arc, LazyLock, Mutex, MutexGuard, PoisonError, Weak};

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Live names, keyed by content.
#[derive(Default)]
struct Table {
    entries: HashMap<Box<str>, Weak<str>>,
    /// Size at which `new` next drops entries whose names are gone.
    sweep_at: usize,
}

static NAMES: LazyLock<Mutex<Table>> = LazyLock::new(Default::default);

fn table() -> MutexGuard<'static, Table> {
    // Entries are inserted and removed whole, so a poisoned table is still consistent.
    NAMES.lock().unwrap_or_else(PoisonError::into_inner)
}

/// A string stored once per process for as long as a handle to it lives.
#[derive(Clone)]
pub struct InternedString {
    inner: Arc<str>,
}

impl InternedString {
    /// Intern `s`, reusing the live copy when one exists.
    pub fn new(s: impl AsRef<str>) -> Self {
        let s = s.as_ref();
        let mut table = table();
        if let Some(inner) = table.entries.get(s).and_then(Weak::upgrade) {
            return InternedString { inner };
        }

        // Two handles dropped at once on different threads can both miss the
        // eager removal in `drop`; sweeping here keeps the table within twice
        // the number of live names.
        if table.entries.len() >= table.sweep_at {
            table.entries.retain(|_, name| name.strong_count() > 0);
            table.sweep_at = (table.entries.len() * 2).max(64);
        }

        let inner: Arc<str> = Arc::from(s);
        table.entries.insert(Box::from(s), Arc::downgrade(&inner));
        InternedString { inner }
    }

    #[inline]
    pub fn as_str(&self) -> &str {
        &self.inner
    }

    /// Whether a handle to `s` is alive anywhere in the process.
    pub fn is_interned(s: &str) -> bool {
        table()
            .entries
            .get(s)
            .is_some_and(|name| name.strong_count() > 0)
    }
}

impl Drop for InternedString {
    fn drop(&mut self) {
        let mut table = table();
        if Arc::strong_count(&self.inner) != 1 {
            return;
        }
        let ours = table
            .entries
            .get(&*self.inner)
            .is_some_and(|entry| std::ptr::eq(entry.as_ptr(), Arc::as_ptr(&self.inner)));
        if ours {
            table.entries.remove(&*self.inner);
        }
    }
}

impl Deref for InternedString {
    type Target = str;

    #[inline]
    fn deref(&self) -> &str {
        &self.inner
    }
}

impl AsRef<str> for InternedString {
    #[inline]
    fn as_ref(&self) -> &str {
        &self.inner
    }
}

impl PartialEq for InternedString {
    #[inline]
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }
}

impl Eq for InternedString {}

impl PartialEq<str> for InternedString {
    fn eq(&self, other: &str) -> bool {
        &*self.inner == other
    }
}

impl PartialEq<&str> for InternedString {
    fn eq(&self, other: &&str) -> bool {
        &*self.inner == *other
    }
}

impl PartialOrd for InternedString {
    #[inline]
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Lexicographic, so sorted collections of names are stable across runs.
impl Ord for InternedString {
    #[inline]
    fn cmp(&self, other: &Self) -> Ordering {
        self.inner.cmp(&other.inner)
    }
}

impl Hash for InternedString {
    #[inline]
    fn hash<H: Hasher>(&self, state: &mut H) {
        std::ptr::hash(Arc::as_ptr(&self.inner), state)
    }
}

impl fmt::Debug for InternedString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(&*self.inner, f)
    }
}

impl fmt::Display for InternedString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&*self.inner, f)
    }
}

impl From<&str> for InternedString {
    fn from(s: &str) -> Self {
        InternedString::new(s)
    }
}

impl From<String> for InternedString {
    fn from(s: String) -> Self {
        InternedString::new(s)
    }
}

impl From<&String> for InternedString {
    fn from(s: &String) -> Self {
        InternedString::new(s)
    }
}

impl Serialize for InternedString {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.inner)
    }
}

impl<'de> Deserialize<'de> for InternedString {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        String::deserialize(deserializer).map(InternedString::new)
    }
}
