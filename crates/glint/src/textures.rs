//! Texture handles and the per-renderer texture registry
//!
//! Draw commands refer to textures through [`TextureId`], a 64-bit value
//! that crosses the C boundary unchanged. Renderer backends own a
//! [`Textures`] registry mapping ids to their native texture objects;
//! generational slots make stale ids fail lookup instead of aliasing a
//! reused entry.

use slotmap::{Key, KeyData, SlotMap};

slotmap::new_key_type! {
    struct TextureKey;
}

/// Opaque 64-bit texture handle carried inside [`DrawCmd`](crate::draw::DrawCmd).
///
/// The zero value never names a live registry entry and doubles as the
/// "no texture" sentinel.
#[repr(transparent)]
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TextureId(u64);

impl TextureId {
    /// The "no texture" sentinel.
    #[must_use]
    pub const fn null() -> Self {
        Self(0)
    }

    /// Rebuilds an id from its raw value, typically one received over the
    /// C boundary.
    #[must_use]
    pub const fn from_raw(raw: u64) -> Self {
        Self(raw)
    }

    /// Raw value for the C boundary.
    #[must_use]
    pub const fn to_raw(self) -> u64 {
        self.0
    }

    /// Whether this is the sentinel.
    #[must_use]
    pub const fn is_null(self) -> bool {
        self.0 == 0
    }

    fn key(self) -> TextureKey {
        TextureKey::from(KeyData::from_ffi(self.0))
    }

    fn from_key(key: TextureKey) -> Self {
        Self(key.data().as_ffi())
    }
}

/// Registry mapping [`TextureId`]s to a renderer's native texture type.
#[derive(Debug)]
pub struct Textures<T> {
    map: SlotMap<TextureKey, T>,
}

impl<T> Default for Textures<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Textures<T> {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self { map: SlotMap::with_key() }
    }

    /// Registers a native texture and returns its id.
    pub fn insert(&mut self, texture: T) -> TextureId {
        TextureId::from_key(self.map.insert(texture))
    }

    /// Replaces the native texture behind an existing id, returning the
    /// previous value; `None` when the id is stale.
    pub fn replace(&mut self, id: TextureId, texture: T) -> Option<T> {
        self.map
            .get_mut(id.key())
            .map(|slot| std::mem::replace(slot, texture))
    }

    /// Native texture behind `id`; `None` for stale or null ids.
    #[must_use]
    pub fn get(&self, id: TextureId) -> Option<&T> {
        self.map.get(id.key())
    }

    /// Unregisters `id`, returning the native texture for destruction.
    pub fn remove(&mut self, id: TextureId) -> Option<T> {
        self.map.remove(id.key())
    }

    /// Removes every entry, yielding the native textures for destruction.
    pub fn drain(&mut self) -> impl Iterator<Item = T> + '_ {
        self.map.drain().map(|(_, texture)| texture)
    }

    /// Number of live entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.map.len()
    }

    /// Whether the registry is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insert_and_lookup() {
        let mut textures = Textures::new();
        let id = textures.insert(42u32);
        assert!(!id.is_null());
        assert_eq!(textures.get(id), Some(&42));
        assert_eq!(textures.len(), 1);
    }

    #[test]
    fn test_raw_round_trip() {
        let mut textures = Textures::new();
        let id = textures.insert("gpu-object");
        let raw = id.to_raw();
        assert_ne!(raw, 0);
        assert_eq!(TextureId::from_raw(raw), id);
        assert_eq!(textures.get(TextureId::from_raw(raw)), Some(&"gpu-object"));
    }

    #[test]
    fn test_stale_id_fails_lookup_after_reuse() {
        let mut textures = Textures::new();
        let first = textures.insert(1u32);
        assert_eq!(textures.remove(first), Some(1));
        let second = textures.insert(2u32);
        assert_ne!(first, second);
        assert_eq!(textures.get(first), None);
        assert_eq!(textures.get(second), Some(&2));
    }

    #[test]
    fn test_null_id_never_resolves() {
        let mut textures = Textures::new();
        textures.insert(7u32);
        assert_eq!(textures.get(TextureId::null()), None);
        assert_eq!(textures.get(TextureId::from_raw(0)), None);
    }

    #[test]
    fn test_drain_empties_registry() {
        let mut textures = Textures::new();
        textures.insert(1u32);
        textures.insert(2u32);
        let mut drained: Vec<u32> = textures.drain().collect();
        drained.sort_unstable();
        assert_eq!(drained, vec![1, 2]);
        assert!(textures.is_empty());
    }
}
