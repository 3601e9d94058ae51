//! Node identities: the `@name` a node carries in a `.dg` document.
//!
//! Names are interned process-wide, so a `NodeId` is a 4-byte handle that
//! compares and hashes without touching the string.

use lasso::{Spur, ThreadedRodeo};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::sync::LazyLock;
use std::sync::atomic::{AtomicU64, Ordering};

static NAMES: LazyLock<ThreadedRodeo> = LazyLock::new(ThreadedRodeo::default);

/// Suffix source for generated names. Shared by every scene in the process.
static NEXT_SUFFIX: AtomicU64 = AtomicU64::new(1);

#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(Spur);

impl NodeId {
    pub fn intern(name: &str) -> Self {
        NodeId(NAMES.get_or_intern(name))
    }

    /// Like [`NodeId::intern`], but only for names the document format
    /// can write back: letters, digits, `_` and `-`.
    pub fn parse(name: &str) -> Option<Self> {
        Self::is_valid_name(name).then(|| Self::intern(name))
    }

    pub fn is_valid_name(name: &str) -> bool {
        !name.is_empty()
            && name
                .chars()
                .all(|c| c.is_alphanumeric() || c == '_' || c == '-')
    }

    pub fn as_str(&self) -> &str {
        NAMES.resolve(&self.0)
    }

    /// `{prefix}_{n}` with a process-wide increasing `n`.
    pub fn with_prefix(prefix: &str) -> Self {
        let n = NEXT_SUFFIX.fetch_add(1, Ordering::Relaxed);
        Self::intern(&format!("{prefix}_{n}"))
    }

    /// A generated name that `taken` rejects none of. Loaded documents may
    /// already use names like `block_4`, so the suffix alone is not enough.
    pub fn fresh(prefix: &str, mut taken: impl FnMut(NodeId) -> bool) -> Self {
        loop {
            let id = Self::with_prefix(prefix);
            if !taken(id) {
                return id;
            }
        }
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "@{}", self.as_str())
    }
}

impl fmt::Debug for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(self, f)
    }
}

// Serialized as the bare name, without the `@`.
impl Serialize for NodeId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for NodeId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let name = String::deserialize(deserializer)?;
        Ok(NodeId::intern(&name))
    }
}
