use crate::model::{
    ActivityGroup, ActivityGroupId, Item, ItemId, Label, LabelId, Ring, RingId, RingType,
    WheelStructure,
};
use std::cell::{OnceCell, RefCell};
use std::collections::HashMap;
use std::hash::{DefaultHasher, Hash, Hasher};
use std::rc::Rc;

/// Identity and visibility summary of a structure. Two structures with equal fingerprints
/// produce the same render set.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Fingerprint {
    rings: Vec<(RingId, bool)>,
    activity_groups: Vec<(ActivityGroupId, bool)>,
    labels: Vec<(LabelId, bool)>,
    item_count: usize,
    // catches edits that keep ids and flags intact, e.g. a committed drag
    content: u64,
}

impl Fingerprint {
    pub fn of(structure: &WheelStructure) -> Self {
        let mut hasher = DefaultHasher::new();
        structure.hash(&mut hasher);

        Self {
            rings: structure
                .rings
                .iter()
                .map(|r| (r.id.clone(), r.visible))
                .collect(),
            activity_groups: structure
                .activity_groups
                .iter()
                .map(|g| (g.id.clone(), g.visible))
                .collect(),
            labels: structure
                .labels
                .iter()
                .map(|l| (l.id.clone(), l.visible))
                .collect(),
            item_count: structure.items.len(),
            content: hasher.finish(),
        }
    }
}

#[derive(Default)]
struct Derived {
    inner_rings: OnceCell<Rc<[Ring]>>,
    outer_rings: OnceCell<Rc<[Ring]>>,
    visible_rings: OnceCell<Rc<[Ring]>>,
    activity_groups: OnceCell<Rc<[ActivityGroup]>>,
    labels: OnceCell<Rc<[Label]>>,
    ring_index: OnceCell<HashMap<RingId, usize>>,
    group_index: OnceCell<HashMap<ActivityGroupId, usize>>,
    label_index: OnceCell<HashMap<LabelId, usize>>,
    item_index: OnceCell<HashMap<ItemId, usize>>,
    ring_items: RefCell<HashMap<RingId, Rc<[Item]>>>,
    renderable: OnceCell<Rc<[Item]>>,
}

/// Memoised view of what should currently be drawn.
///
/// Collection accessors hand out shared slices that stay pointer-identical until
/// [`RenderSetCache::update_structure`] sees a different fingerprint.
pub struct RenderSetCache {
    structure: WheelStructure,
    fingerprint: Fingerprint,
    version: u64,
    derived: Derived,
}

impl RenderSetCache {
    pub fn new(structure: WheelStructure) -> Self {
        Self {
            fingerprint: Fingerprint::of(&structure),
            structure,
            version: 0,
            derived: Derived::default(),
        }
    }

    /// Replaces the structure. Derived data is only dropped when the fingerprint changed;
    /// returns whether it did.
    pub fn update_structure(&mut self, next: WheelStructure) -> bool {
        let fingerprint = Fingerprint::of(&next);
        if fingerprint == self.fingerprint {
            return false;
        }

        self.structure = next;
        self.fingerprint = fingerprint;
        self.derived = Derived::default();
        self.version += 1;
        log::debug!("Render set invalidated, cache version {}", self.version);
        true
    }

    pub fn structure(&self) -> &WheelStructure {
        &self.structure
    }

    pub fn cache_version(&self) -> u64 {
        self.version
    }

    pub fn visible_rings(&self, kind: Option<RingType>) -> Rc<[Ring]> {
        let cell = match kind {
            Some(RingType::Inner) => &self.derived.inner_rings,
            Some(RingType::Outer) => &self.derived.outer_rings,
            None => &self.derived.visible_rings,
        };
        Rc::clone(cell.get_or_init(|| {
            self.structure
                .rings
                .iter()
                .filter(|r| r.visible && kind.is_none_or(|k| r.kind == k))
                .cloned()
                .collect()
        }))
    }

    pub fn visible_activity_groups(&self) -> Rc<[ActivityGroup]> {
        Rc::clone(self.derived.activity_groups.get_or_init(|| {
            self.structure
                .activity_groups
                .iter()
                .filter(|g| g.visible)
                .cloned()
                .collect()
        }))
    }

    pub fn visible_labels(&self) -> Rc<[Label]> {
        Rc::clone(self.derived.labels.get_or_init(|| {
            self.structure
                .labels
                .iter()
                .filter(|l| l.visible)
                .cloned()
                .collect()
        }))
    }

    fn ring_index(&self) -> &HashMap<RingId, usize> {
        self.derived.ring_index.get_or_init(|| {
            self.structure
                .rings
                .iter()
                .enumerate()
                .map(|(i, r)| (r.id.clone(), i))
                .collect()
        })
    }

    // Only visible groups and labels are indexed; hidden ones behave as missing.
    fn group_index(&self) -> &HashMap<ActivityGroupId, usize> {
        self.derived.group_index.get_or_init(|| {
            self.structure
                .activity_groups
                .iter()
                .enumerate()
                .filter(|(_, g)| g.visible)
                .map(|(i, g)| (g.id.clone(), i))
                .collect()
        })
    }

    fn label_index(&self) -> &HashMap<LabelId, usize> {
        self.derived.label_index.get_or_init(|| {
            self.structure
                .labels
                .iter()
                .enumerate()
                .filter(|(_, l)| l.visible)
                .map(|(i, l)| (l.id.clone(), i))
                .collect()
        })
    }

    pub fn ring_by_id(&self, id: &RingId) -> Option<&Ring> {
        self.ring_index()
            .get(id)
            .and_then(|&i| self.structure.rings.get(i))
    }

    /// Visible activity group with this id.
    pub fn activity_group_by_id(&self, id: &ActivityGroupId) -> Option<&ActivityGroup> {
        self.group_index()
            .get(id)
            .and_then(|&i| self.structure.activity_groups.get(i))
    }

    /// Visible label with this id.
    pub fn label_by_id(&self, id: &LabelId) -> Option<&Label> {
        self.label_index()
            .get(id)
            .and_then(|&i| self.structure.labels.get(i))
    }

    pub fn item_by_id(&self, id: &ItemId) -> Option<&Item> {
        self.derived
            .item_index
            .get_or_init(|| {
                self.structure
                    .items
                    .iter()
                    .enumerate()
                    .map(|(i, item)| (item.id.clone(), i))
                    .collect()
            })
            .get(id)
            .and_then(|&i| self.structure.items.get(i))
    }

    fn passes_filters(&self, item: &Item) -> bool {
        self.group_index().contains_key(&item.activity_id)
            && item
                .label_id
                .as_ref()
                .is_none_or(|label| self.label_index().contains_key(label))
    }

    /// Items of one ring whose group and label are visible. The ring's own visibility is
    /// the caller's concern.
    pub fn items_for_ring(&self, ring_id: &RingId) -> Rc<[Item]> {
        if let Some(items) = self.derived.ring_items.borrow().get(ring_id) {
            return Rc::clone(items);
        }

        let items: Rc<[Item]> = self
            .structure
            .items
            .iter()
            .filter(|item| &item.ring_id == ring_id && self.passes_filters(item))
            .cloned()
            .collect();
        self.derived
            .ring_items
            .borrow_mut()
            .insert(ring_id.clone(), Rc::clone(&items));
        items
    }

    pub fn is_item_renderable(&self, item: &Item) -> bool {
        self.ring_by_id(&item.ring_id).is_some_and(|ring| ring.visible) && self.passes_filters(item)
    }

    pub fn all_renderable_items(&self) -> Rc<[Item]> {
        Rc::clone(self.derived.renderable.get_or_init(|| {
            self.structure
                .items
                .iter()
                .filter(|item| self.is_item_renderable(item))
                .cloned()
                .collect()
        }))
    }
}
