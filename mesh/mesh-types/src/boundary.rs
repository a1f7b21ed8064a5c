//! Side-based boundary tags.

use std::collections::{BTreeMap, BTreeSet};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::BoundaryId;

/// One boundary tag attached to one element side.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct SideTag {
    /// Element index.
    pub element: u32,
    /// Local side index.
    pub side: u8,
    /// Boundary id.
    pub id: BoundaryId,
}

/// Sideset table of a mesh.
///
/// Tags are kept in a sorted set so iteration order, and therefore every
/// algorithm that walks the boundary, is deterministic.
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct BoundaryInfo {
    sides: BTreeSet<SideTag>,
    names: BTreeMap<BoundaryId, String>,
}

impl BoundaryInfo {
    /// Empty table.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Attach `id` to a side. Returns `false` if it was already present.
    pub fn add_side(&mut self, element: u32, side: u8, id: BoundaryId) -> bool {
        self.sides.insert(SideTag { element, side, id })
    }

    /// Detach `id` from a side. Returns `true` if it was present.
    pub fn remove_side(&mut self, element: u32, side: u8, id: BoundaryId) -> bool {
        self.sides.remove(&SideTag { element, side, id })
    }

    /// Remove every tag carrying `id`, and its name.
    pub fn remove_id(&mut self, id: BoundaryId) {
        self.sides.retain(|t| t.id != id);
        self.names.remove(&id);
    }

    /// Replace `old` by `new` on every side. The name of `old` moves too
    /// unless `new` already has one.
    pub fn rename_id(&mut self, old: BoundaryId, new: BoundaryId) {
        if old == new {
            return;
        }
        let moved: Vec<SideTag> = self.sides.iter().filter(|t| t.id == old).copied().collect();
        for t in moved {
            self.sides.remove(&t);
            self.sides.insert(SideTag { id: new, ..t });
        }
        if let Some(name) = self.names.remove(&old) {
            self.names.entry(new).or_insert(name);
        }
    }

    /// Whether any side carries `id`.
    #[must_use]
    pub fn has_id(&self, id: BoundaryId) -> bool {
        self.sides.iter().any(|t| t.id == id)
    }

    /// Whether a given side carries `id`.
    #[must_use]
    pub fn has_side(&self, element: u32, side: u8, id: BoundaryId) -> bool {
        self.sides.contains(&SideTag { element, side, id })
    }

    /// All tags in sorted order.
    pub fn iter(&self) -> impl Iterator<Item = &SideTag> {
        self.sides.iter()
    }

    /// `(element, side)` pairs carrying `id`.
    pub fn sides_with_id(&self, id: BoundaryId) -> impl Iterator<Item = (u32, u8)> + '_ {
        self.sides.iter().filter(move |t| t.id == id).map(|t| (t.element, t.side))
    }

    /// Number of sides carrying `id`.
    #[must_use]
    pub fn side_count(&self, id: BoundaryId) -> usize {
        self.sides_with_id(id).count()
    }

    /// Every id in use.
    #[must_use]
    pub fn ids(&self) -> BTreeSet<BoundaryId> {
        self.sides.iter().map(|t| t.id).collect()
    }

    /// Total number of tags.
    #[must_use]
    pub fn len(&self) -> usize {
        self.sides.len()
    }

    /// Whether the table holds no tags.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.sides.is_empty()
    }

    /// Keep only tags satisfying the predicate.
    pub fn retain(&mut self, f: impl FnMut(&SideTag) -> bool) {
        self.sides.retain(f);
    }

    /// Name an id.
    pub fn set_name(&mut self, id: BoundaryId, name: impl Into<String>) {
        self.names.insert(id, name.into());
    }

    /// Name of an id, if any.
    #[must_use]
    pub fn name(&self, id: BoundaryId) -> Option<&str> {
        self.names.get(&id).map(String::as_str)
    }

    /// Id bound to a name, if any.
    #[must_use]
    pub fn id_by_name(&self, name: &str) -> Option<BoundaryId> {
        self.names.iter().find(|(_, n)| n.as_str() == name).map(|(&id, _)| id)
    }

    /// The id → name map.
    #[must_use]
    pub const fn names(&self) -> &BTreeMap<BoundaryId, String> {
        &self.names
    }

    pub(crate) fn insert_raw(&mut self, tag: SideTag) {
        self.sides.insert(tag);
    }

    pub(crate) fn names_mut(&mut self) -> &mut BTreeMap<BoundaryId, String> {
        &mut self.names
    }

    pub(crate) fn take_sides(&mut self) -> BTreeSet<SideTag> {
        std::mem::take(&mut self.sides)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rename_moves_tags_and_name() {
        let mut info = BoundaryInfo::new();
        info.add_side(0, 1, 5);
        info.add_side(2, 0, 5);
        info.add_side(2, 1, 6);
        info.set_name(5, "rim");
        info.rename_id(5, 9);
        assert!(!info.has_id(5));
        assert_eq!(info.side_count(9), 2);
        assert_eq!(info.name(9), Some("rim"));
        assert_eq!(info.id_by_name("rim"), Some(9));
    }

    #[test]
    fn remove_id_clears_name() {
        let mut info = BoundaryInfo::new();
        info.add_side(0, 0, 3);
        info.set_name(3, "gone");
        info.remove_id(3);
        assert!(info.is_empty());
        assert_eq!(info.name(3), None);
    }

    #[test]
    fn duplicate_tags_are_ignored() {
        let mut info = BoundaryInfo::new();
        assert!(info.add_side(1, 2, 7));
        assert!(!info.add_side(1, 2, 7));
        assert_eq!(info.len(), 1);
    }
}
