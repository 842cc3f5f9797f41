use lasso::{Spur, ThreadedRodeo};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::sync::LazyLock;
use uuid::Uuid;

/// Global string interner for entity IDs.
static INTERNER: LazyLock<ThreadedRodeo> = LazyLock::new(ThreadedRodeo::default);

/// A lightweight, interned identifier for floors, nodes, edges and beacons.
/// Internally a `Spur` index: 4 bytes and `Copy`.
///
/// Client-authored entities get a UUID v4 until the backend assigns its own;
/// ids received from the backend are interned verbatim.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct EntityId(Spur);

impl EntityId {
    /// Intern a string as an EntityId, or return the existing one.
    pub fn intern(s: &str) -> Self {
        EntityId(INTERNER.get_or_intern(s))
    }

    /// Resolve back to a string slice.
    pub fn as_str(&self) -> &str {
        INTERNER.resolve(&self.0)
    }

    /// Generate a fresh client-side id (UUID v4).
    pub fn generate() -> Self {
        Self::intern(&Uuid::new_v4().to_string())
    }

    /// The empty id, used for the floor of an editor with no floor loaded.
    pub fn empty() -> Self {
        Self::intern("")
    }

    pub fn is_empty(&self) -> bool {
        self.as_str().is_empty()
    }

    /// Whether the id is a hyphenated UUID (`8-4-4-4-12` hex groups).
    /// Braced, URN and unhyphenated forms are rejected.
    pub fn is_uuid(&self) -> bool {
        let s = self.as_str();
        s.len() == 36 && Uuid::parse_str(s).is_ok()
    }

    /// First 8 characters, used where a node has no name to show.
    pub fn short(&self) -> &str {
        let s = self.as_str();
        match s.char_indices().nth(8) {
            Some((end, _)) => &s[..end],
            None => s,
        }
    }
}

impl fmt::Debug for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.as_str())
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for EntityId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for EntityId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Ok(EntityId::intern(&s))
    }
}
