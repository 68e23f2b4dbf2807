// crates/engine_ecs/src/game.rs
use std::collections::BTreeMap;

use tracing::debug;

use crate::entity::{Entity, EntityId};
use crate::error::{EcsError, EcsResult, Missing};
use crate::interface::Interface;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Phase {
    Init,
    Update,
}

/// Root of the scene tree.
///
/// Top-level entities are dispatched in ascending id order. Within an entity,
/// components run bucket by bucket (first-attached type first, then attach
/// order), then children recurse depth first. `init` and `update` walk the
/// tree identically.
///
/// Every component sees `init` exactly once, before its first `update`.
/// Components that missed `Game::init` (attached later, disabled at the time,
/// or `update` called first) are initialized by the update pass that reaches
/// them.
#[derive(Debug, Default)]
pub struct Game {
    next_id: u64,
    entities: BTreeMap<EntityId, Entity>,
    initialized: bool,
}

impl Game {
    pub fn new() -> Self {
        Self::default()
    }

    /// A fresh, detached entity. Attach it with `add_entity` or `Entity::add_child`.
    pub fn create_entity(&mut self) -> Entity {
        let id = EntityId::from_raw(self.next_id);
        self.next_id += 1;
        Entity::new(id)
    }

    pub fn add_entity(&mut self, mut entity: Entity) -> EcsResult<EntityId> {
        let id = entity.id();
        if self.entities.contains_key(&id) {
            return Err(EcsError::DuplicateId(id));
        }
        entity.set_parent(None);
        self.entities.insert(id, entity);
        Ok(id)
    }

    pub fn has_entity(&self, id: EntityId) -> bool {
        self.entities.contains_key(&id)
    }

    pub fn get_entity(&self, id: EntityId) -> EcsResult<&Entity> {
        self.entities
            .get(&id)
            .ok_or(EcsError::NotFound(Missing::Entity(id)))
    }

    pub fn get_entity_mut(&mut self, id: EntityId) -> EcsResult<&mut Entity> {
        self.entities
            .get_mut(&id)
            .ok_or(EcsError::NotFound(Missing::Entity(id)))
    }

    /// Drops the entity and its whole subtree.
    pub fn destroy_entity(&mut self, id: EntityId) -> EcsResult<()> {
        self.entities
            .remove(&id)
            .map(drop)
            .ok_or(EcsError::NotFound(Missing::Entity(id)))
    }

    pub fn entity_ids(&self) -> Vec<EntityId> {
        self.entities.keys().copied().collect()
    }

    pub fn entities(&self) -> impl Iterator<Item = &Entity> {
        self.entities.values()
    }

    pub fn len(&self) -> usize {
        self.entities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    /// Finds an entity anywhere in the tree.
    pub fn find_entity(&self, id: EntityId) -> EcsResult<&Entity> {
        if let Some(top) = self.entities.get(&id) {
            return Ok(top);
        }
        self.entities
            .values()
            .find_map(|e| e.find(id))
            .ok_or(EcsError::NotFound(Missing::Entity(id)))
    }

    /// Follows `path` from a top-level entity down through children.
    pub fn entity_at(&self, path: &[EntityId]) -> EcsResult<&Entity> {
        let (first, rest) = path
            .split_first()
            .ok_or(EcsError::MissingCollaborator("owner"))?;
        let mut entity = self.get_entity(*first)?;
        for id in rest {
            entity = entity.get_child(*id)?;
        }
        Ok(entity)
    }

    pub fn entity_at_mut(&mut self, path: &[EntityId]) -> EcsResult<&mut Entity> {
        let (first, rest) = path
            .split_first()
            .ok_or(EcsError::MissingCollaborator("owner"))?;
        let mut entity = self.get_entity_mut(*first)?;
        for id in rest {
            entity = entity.get_child_mut(*id)?;
        }
        Ok(entity)
    }

    fn lookup(&self, path: &[EntityId]) -> Option<&Entity> {
        let (first, rest) = path.split_first()?;
        let mut entity = self.entities.get(first)?;
        for id in rest {
            entity = entity.child_ref(*id)?;
        }
        Some(entity)
    }

    fn lookup_mut(&mut self, path: &[EntityId]) -> Option<&mut Entity> {
        let (first, rest) = path.split_first()?;
        let mut entity = self.entities.get_mut(first)?;
        for id in rest {
            entity = entity.child_ref_mut(*id)?;
        }
        Some(entity)
    }

    // ==================================================================================
    // LIFECYCLE
    // ==================================================================================

    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    /// Runs every component's `init` once. The game counts as initialized even
    /// if a hook fails part way.
    pub fn init(&mut self, iface: &mut Interface<'_>) -> EcsResult<()> {
        if self.initialized {
            return Err(EcsError::AlreadyInitialized);
        }
        self.initialized = true;
        debug!(entities = self.entities.len(), "initializing game");
        self.dispatch(iface, Phase::Init)
    }

    pub fn update(&mut self, iface: &mut Interface<'_>) -> EcsResult<()> {
        self.dispatch(iface, Phase::Update)
    }

    fn dispatch(&mut self, iface: &mut Interface<'_>, phase: Phase) -> EcsResult<()> {
        let mut path = Vec::new();
        for id in self.entity_ids() {
            path.push(id);
            let result = self.dispatch_entity(&mut path, iface, phase);
            path.pop();
            result?;
        }
        Ok(())
    }

    /// Entities or components removed by an earlier hook in the same pass are
    /// skipped, not reported.
    fn dispatch_entity(
        &mut self,
        path: &mut Vec<EntityId>,
        iface: &mut Interface<'_>,
        phase: Phase,
    ) -> EcsResult<()> {
        let slots = match self.lookup(path) {
            Some(entity) if entity.is_enabled() => entity.component_slots(),
            _ => return Ok(()),
        };

        for (type_id, index) in slots {
            let Some(entity) = self.lookup_mut(path) else {
                return Ok(());
            };
            if !entity.is_enabled() {
                return Ok(());
            }
            let Some((mut component, was_initialized)) = entity.take_component(type_id, index)
            else {
                continue;
            };

            let result = {
                let mut scoped = iface.scoped(self, path.as_slice());
                match (phase, was_initialized) {
                    (Phase::Init, true) => Ok(()),
                    (Phase::Init, false) => component.init(&mut scoped),
                    (Phase::Update, true) => component.update(&mut scoped),
                    (Phase::Update, false) => component
                        .init(&mut scoped)
                        .and_then(|()| component.update(&mut scoped)),
                }
            };

            if let Some(entity) = self.lookup_mut(path) {
                entity.restore_component(type_id, index, component);
            }
            result?;
        }

        let children = match self.lookup(path) {
            Some(entity) if entity.is_enabled() => entity.child_ids(),
            _ => return Ok(()),
        };
        for child in children {
            path.push(child);
            let result = self.dispatch_entity(path, iface, phase);
            path.pop();
            result?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::component::Component;

    struct Flag;
    impl Component for Flag {
        fn is_unique(&self) -> bool {
            true
        }
    }

    #[test]
    fn ids_strictly_increase_across_destroys() {
        let mut game = Game::new();
        let mut seen = Vec::new();
        for round in 0..5 {
            let e = game.create_entity();
            let id = game.add_entity(e).unwrap();
            seen.push(id);
            if round % 2 == 0 {
                game.destroy_entity(id).unwrap();
            }
        }
        assert!(seen.windows(2).all(|w| w[0] < w[1]));
        assert_eq!(game.len(), 2);
    }

    #[test]
    fn duplicate_and_missing_ids() {
        let mut game = Game::new();
        let e = game.create_entity();
        let id = e.id();
        game.add_entity(e).unwrap();
        assert!(matches!(
            game.add_entity(Entity::new(id)),
            Err(EcsError::DuplicateId(_))
        ));

        let ghost = EntityId::from_raw(99);
        assert!(game.get_entity(ghost).unwrap_err().is_not_found());
        assert!(game.destroy_entity(ghost).unwrap_err().is_not_found());
        assert!(!game.has_entity(ghost));
    }

    #[test]
    fn init_runs_once() {
        let mut game = Game::new();
        let mut iface = Interface::new();
        game.init(&mut iface).unwrap();
        assert!(game.is_initialized());
        assert!(matches!(game.init(&mut iface), Err(EcsError::AlreadyInitialized)));
    }

    #[test]
    fn paths_resolve_nested_children() {
        let mut game = Game::new();
        let mut parent = game.create_entity();
        let child = game.create_entity().with_component(Flag).unwrap();
        let child_id = child.id();
        parent.add_child(child).unwrap();
        let parent_id = game.add_entity(parent).unwrap();

        let found = game.entity_at(&[parent_id, child_id]).unwrap();
        assert!(found.has_component::<Flag>());
        assert_eq!(found.parent_id(), Some(parent_id));
        assert_eq!(game.find_entity(child_id).unwrap().id(), child_id);
        assert!(game.entity_at(&[child_id]).unwrap_err().is_not_found());
    }
}
