use std::fmt::{self, Debug, Display};
use std::hash::{Hash, Hasher};
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::geometry::{Cuboid, Geometry};

/// An immutable pair of a payload value and its geometry.
///
/// The pair lives behind an `Arc`, so cloning an entry (when a leaf is
/// rebuilt or a match is handed to a consumer) never clones the payload and
/// every tree version refers to the same allocation.
///
/// # Examples
///
/// ```rust
/// use rtree3d::{entry, geometries, Geometry};
///
/// let e = entry("a", geometries::point(1.0, 2.0, 3.0));
/// assert_eq!(*e.value(), "a");
/// assert_eq!(e.mbc().x1(), 1.0);
/// ```
pub struct Entry<V, G> {
    inner: Arc<EntryInner<V, G>>,
}

#[derive(Debug, Serialize, Deserialize)]
struct EntryInner<V, G> {
    value: V,
    geometry: G,
}

impl<V, G: Geometry> Entry<V, G> {
    /// Creates a new entry.
    pub fn new(value: V, geometry: G) -> Self {
        Entry {
            inner: Arc::new(EntryInner { value, geometry }),
        }
    }

    pub fn value(&self) -> &V {
        &self.inner.value
    }

    pub fn geometry(&self) -> &G {
        &self.inner.geometry
    }

    /// Returns the minimum bounding cuboid of the entry's geometry.
    pub fn mbc(&self) -> Cuboid {
        self.inner.geometry.mbc()
    }

    /// Checks if both handles point at the same allocation.
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }
}

/// Creates an entry, see [`Entry::new`].
pub fn entry<V, G: Geometry>(value: V, geometry: G) -> Entry<V, G> {
    Entry::new(value, geometry)
}

impl<V, G> Clone for Entry<V, G> {
    fn clone(&self) -> Self {
        Entry {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<V: Debug, G: Debug> Debug for Entry<V, G> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Entry")
            .field("value", &self.inner.value)
            .field("geometry", &self.inner.geometry)
            .finish()
    }
}

impl<V: Display, G: Geometry> Display for Entry<V, G> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Entry[value={}, geometry={}]", self.inner.value, self.mbc())
    }
}

impl<V: PartialEq, G: PartialEq> PartialEq for Entry<V, G> {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
            || (self.inner.value == other.inner.value
                && self.inner.geometry == other.inner.geometry)
    }
}

impl<V: Eq, G: Eq> Eq for Entry<V, G> {}

impl<V: Hash, G: Geometry> Hash for Entry<V, G> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.inner.value.hash(state);
        self.mbc().hash(state);
    }
}

impl<V: Serialize, G: Serialize> Serialize for Entry<V, G> {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        self.inner.serialize(serializer)
    }
}

impl<'de, V: Deserialize<'de>, G: Deserialize<'de>> Deserialize<'de> for Entry<V, G> {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let inner = EntryInner::deserialize(deserializer)?;
        Ok(Entry {
            inner: Arc::new(inner),
        })
    }
}
