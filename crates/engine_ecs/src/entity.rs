// crates/engine_ecs/src/entity.rs
use std::any::TypeId;
use std::collections::BTreeMap;
use std::fmt;

use crate::component::Component;
use crate::error::{EcsError, EcsResult, Missing};
use crate::storage::ComponentStore;

/// Handed out by `Game` in strictly increasing order and never reused.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct EntityId(u64);

impl EntityId {
    pub const fn from_raw(raw: u64) -> Self {
        Self(raw)
    }

    pub const fn raw(self) -> u64 {
        self.0
    }
}

impl fmt::Debug for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "EntityId({})", self.0)
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// A node in the scene tree. Owns its components and its children.
///
/// Entities move; they never clone. Dropping one drops its whole subtree.
pub struct Entity {
    id: EntityId,
    enabled: bool,
    parent: Option<EntityId>,
    components: ComponentStore,
    children: BTreeMap<EntityId, Entity>,
}

impl fmt::Debug for Entity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Entity")
            .field("id", &self.id)
            .field("enabled", &self.enabled)
            .field("parent", &self.parent)
            .field("components", &self.components.type_names().collect::<Vec<_>>())
            .field("children", &self.children.keys().collect::<Vec<_>>())
            .finish()
    }
}

impl Entity {
    pub(crate) fn new(id: EntityId) -> Self {
        Self {
            id,
            enabled: true,
            parent: None,
            components: ComponentStore::default(),
            children: BTreeMap::new(),
        }
    }

    pub fn id(&self) -> EntityId {
        self.id
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }

    pub fn parent_id(&self) -> Option<EntityId> {
        self.parent
    }

    pub fn has_parent(&self) -> bool {
        self.parent.is_some()
    }

    pub(crate) fn set_parent(&mut self, parent: Option<EntityId>) {
        self.parent = parent;
    }

    // ==================================================================================
    // COMPONENTS
    // ==================================================================================

    /// Starts a new bucket for an unseen type, appends to a non-unique one,
    /// and refuses a second unique instance.
    pub fn add_component<C: Component>(&mut self, component: C) -> EcsResult<()> {
        self.add_boxed_component(Box::new(component))
    }

    pub fn add_boxed_component(&mut self, component: Box<dyn Component>) -> EcsResult<()> {
        self.components.insert(self.id, component)
    }

    /// Builder-style `add_component` for scene setup.
    pub fn with_component<C: Component>(mut self, component: C) -> EcsResult<Self> {
        self.add_component(component)?;
        Ok(self)
    }

    pub fn has_component<C: Component>(&self) -> bool {
        self.components.contains::<C>()
    }

    pub fn component_count<C: Component>(&self) -> usize {
        self.components.count::<C>()
    }

    pub fn get_single_component<C: Component>(&self) -> EcsResult<&C> {
        self.components.first::<C>().ok_or_else(not_found::<C>)
    }

    pub fn get_single_component_mut<C: Component>(&mut self) -> EcsResult<&mut C> {
        self.components.first_mut::<C>().ok_or_else(not_found::<C>)
    }

    /// Every instance of `C` in attach order.
    pub fn get_components<C: Component>(&self) -> EcsResult<Vec<&C>> {
        let all = self.components.all::<C>();
        if all.is_empty() {
            return Err(not_found::<C>());
        }
        Ok(all)
    }

    pub fn get_components_mut<C: Component>(&mut self) -> EcsResult<Vec<&mut C>> {
        let all = self.components.all_mut::<C>();
        if all.is_empty() {
            return Err(not_found::<C>());
        }
        Ok(all)
    }

    /// Removes every instance of `C`.
    pub fn remove_component<C: Component>(&mut self) -> EcsResult<()> {
        self.components.remove::<C>()
    }

    pub fn set_component_enabled<C: Component>(&mut self, index: usize, enabled: bool) -> EcsResult<()> {
        self.components.set_enabled::<C>(index, enabled)
    }

    pub fn is_component_enabled<C: Component>(&self, index: usize) -> EcsResult<bool> {
        self.components.is_enabled::<C>(index)
    }

    pub(crate) fn component_slots(&self) -> Vec<(TypeId, usize)> {
        self.components.slots()
    }

    pub(crate) fn take_component(
        &mut self,
        type_id: TypeId,
        index: usize,
    ) -> Option<(Box<dyn Component>, bool)> {
        self.components.take(type_id, index)
    }

    pub(crate) fn restore_component(&mut self, type_id: TypeId, index: usize, component: Box<dyn Component>) {
        self.components.restore(type_id, index, component);
    }

    // ==================================================================================
    // CHILDREN
    // ==================================================================================

    pub fn add_child(&mut self, mut child: Entity) -> EcsResult<()> {
        if self.children.contains_key(&child.id) {
            return Err(EcsError::DuplicateId(child.id));
        }
        child.parent = Some(self.id);
        self.children.insert(child.id, child);
        Ok(())
    }

    pub fn has_child(&self, id: EntityId) -> bool {
        self.children.contains_key(&id)
    }

    pub fn get_child(&self, id: EntityId) -> EcsResult<&Entity> {
        self.children.get(&id).ok_or(EcsError::NotFound(Missing::Child {
            parent: self.id,
            child: id,
        }))
    }

    pub fn get_child_mut(&mut self, id: EntityId) -> EcsResult<&mut Entity> {
        let parent = self.id;
        self.children
            .get_mut(&id)
            .ok_or(EcsError::NotFound(Missing::Child { parent, child: id }))
    }

    /// Detaches and drops the child with its whole subtree.
    pub fn destroy_child(&mut self, id: EntityId) -> EcsResult<()> {
        self.children
            .remove(&id)
            .map(drop)
            .ok_or(EcsError::NotFound(Missing::Child {
                parent: self.id,
                child: id,
            }))
    }

    /// Ascending, which is also dispatch order.
    pub fn child_ids(&self) -> Vec<EntityId> {
        self.children.keys().copied().collect()
    }

    pub fn children(&self) -> impl Iterator<Item = &Entity> {
        self.children.values()
    }

    /// Depth-first search of this entity's subtree, including itself.
    pub fn find(&self, id: EntityId) -> Option<&Entity> {
        if self.id == id {
            return Some(self);
        }
        self.children.values().find_map(|c| c.find(id))
    }

    pub(crate) fn child_ref(&self, id: EntityId) -> Option<&Entity> {
        self.children.get(&id)
    }

    pub(crate) fn child_ref_mut(&mut self, id: EntityId) -> Option<&mut Entity> {
        self.children.get_mut(&id)
    }
}

fn not_found<C: Component>() -> EcsError {
    EcsError::NotFound(Missing::Component(std::any::type_name::<C>()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug)]
    struct Health(u32);
    impl Component for Health {
        fn is_unique(&self) -> bool {
            true
        }
    }

    #[derive(Debug)]
    struct Tag(&'static str);
    impl Component for Tag {
        fn is_unique(&self) -> bool {
            false
        }
    }

    #[derive(Debug)]
    struct Marker;
    impl Component for Marker {
        fn is_unique(&self) -> bool {
            true
        }
    }

    fn entity(raw: u64) -> Entity {
        Entity::new(EntityId::from_raw(raw))
    }

    #[test]
    fn unique_component_rejected_twice() {
        let mut e = entity(0);
        e.add_component(Health(10)).unwrap();
        let err = e.add_component(Health(20)).unwrap_err();
        assert!(matches!(err, EcsError::DuplicateUniqueComponent { .. }));
        assert_eq!(e.get_single_component::<Health>().unwrap().0, 10);
        assert_eq!(e.component_count::<Health>(), 1);
    }

    #[test]
    fn non_unique_components_keep_attach_order() {
        let mut e = entity(0);
        for name in ["a", "b", "c"] {
            e.add_component(Tag(name)).unwrap();
        }
        let names: Vec<_> = e.get_components::<Tag>().unwrap().iter().map(|t| t.0).collect();
        assert_eq!(names, ["a", "b", "c"]);
        assert_eq!(e.get_single_component::<Tag>().unwrap().0, "a");
    }

    #[test]
    fn missing_component_is_not_found() {
        let mut e = entity(0);
        assert!(e.get_single_component::<Health>().unwrap_err().is_not_found());
        assert!(e.get_components::<Tag>().unwrap_err().is_not_found());
        assert!(e.remove_component::<Health>().unwrap_err().is_not_found());
        assert!(!e.has_component::<Health>());
    }

    #[test]
    fn remove_keeps_other_buckets_addressable() {
        let mut e = entity(0);
        e.add_component(Health(1)).unwrap();
        e.add_component(Tag("x")).unwrap();
        e.add_component(Marker).unwrap();

        e.remove_component::<Health>().unwrap();
        assert!(!e.has_component::<Health>());
        assert_eq!(e.get_single_component::<Tag>().unwrap().0, "x");
        assert!(e.has_component::<Marker>());

        // Re-adding after removal starts a fresh bucket.
        e.add_component(Health(2)).unwrap();
        assert_eq!(e.get_single_component::<Health>().unwrap().0, 2);
    }

    #[test]
    fn component_enable_flag() {
        let mut e = entity(0);
        e.add_component(Tag("a")).unwrap();
        e.add_component(Tag("b")).unwrap();
        e.set_component_enabled::<Tag>(1, false).unwrap();
        assert!(e.is_component_enabled::<Tag>(0).unwrap());
        assert!(!e.is_component_enabled::<Tag>(1).unwrap());
        assert!(e.set_component_enabled::<Tag>(2, false).unwrap_err().is_not_found());
    }

    #[test]
    fn children_and_parent_link() {
        let mut root = entity(0);
        root.add_child(entity(2)).unwrap();
        root.add_child(entity(1)).unwrap();
        assert!(matches!(root.add_child(entity(1)), Err(EcsError::DuplicateId(_))));

        assert_eq!(root.child_ids(), vec![EntityId::from_raw(1), EntityId::from_raw(2)]);
        let child = root.get_child(EntityId::from_raw(1)).unwrap();
        assert_eq!(child.parent_id(), Some(EntityId::from_raw(0)));
        assert!(child.has_parent());
        assert!(!root.has_parent());

        root.destroy_child(EntityId::from_raw(1)).unwrap();
        assert!(!root.has_child(EntityId::from_raw(1)));
        assert!(root.destroy_child(EntityId::from_raw(1)).unwrap_err().is_not_found());
    }

    #[test]
    fn find_searches_subtree() {
        let mut grandchild_parent = entity(1);
        grandchild_parent.add_child(entity(5)).unwrap();
        let mut root = entity(0);
        root.add_child(grandchild_parent).unwrap();

        assert_eq!(root.find(EntityId::from_raw(5)).map(|e| e.id().raw()), Some(5));
        assert!(root.find(EntityId::from_raw(9)).is_none());
    }
}
