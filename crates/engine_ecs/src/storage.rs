// crates/engine_ecs/src/storage.rs
use std::any::TypeId;
use std::collections::HashMap;

use crate::component::{Component, type_key};
use crate::entity::EntityId;
use crate::error::{EcsError, EcsResult, Missing};

/// One attached component. `component` is `None` only while its own hook runs.
struct Cell {
    component: Option<Box<dyn Component>>,
    enabled: bool,
    initialized: bool,
}

/// All instances of one component type, in attach order.
struct Bucket {
    type_id: TypeId,
    type_name: &'static str,
    cells: Vec<Cell>,
}

/// Per-entity component storage.
///
/// Buckets are kept in the order their type was first attached; `index` maps a
/// type to its bucket.
#[derive(Default)]
pub(crate) struct ComponentStore {
    buckets: Vec<Bucket>,
    index: HashMap<TypeId, usize>,
}

impl ComponentStore {
    pub fn insert(&mut self, owner: EntityId, component: Box<dyn Component>) -> EcsResult<()> {
        let (type_id, type_name, unique) = {
            let c: &dyn Component = &*component;
            (type_key(c), c.type_name(), c.is_unique())
        };
        let cell = Cell {
            component: Some(component),
            enabled: true,
            initialized: false,
        };

        match self.index.get(&type_id) {
            None => {
                self.index.insert(type_id, self.buckets.len());
                self.buckets.push(Bucket {
                    type_id,
                    type_name,
                    cells: vec![cell],
                });
            }
            Some(_) if unique => {
                return Err(EcsError::DuplicateUniqueComponent {
                    entity: owner,
                    component: type_name,
                });
            }
            Some(&b) => self.buckets[b].cells.push(cell),
        }
        Ok(())
    }

    fn bucket<T: Component>(&self) -> Option<&Bucket> {
        self.index
            .get(&TypeId::of::<T>())
            .map(|&b| &self.buckets[b])
    }

    fn bucket_mut<T: Component>(&mut self) -> Option<&mut Bucket> {
        let b = *self.index.get(&TypeId::of::<T>())?;
        Some(&mut self.buckets[b])
    }

    pub fn contains<T: Component>(&self) -> bool {
        self.index.contains_key(&TypeId::of::<T>())
    }

    pub fn count<T: Component>(&self) -> usize {
        self.bucket::<T>().map_or(0, |b| b.cells.len())
    }

    pub fn first<T: Component>(&self) -> Option<&T> {
        self.bucket::<T>()?
            .cells
            .iter()
            .filter_map(|c| c.component.as_deref())
            .find_map(|c| c.as_any().downcast_ref::<T>())
    }

    pub fn first_mut<T: Component>(&mut self) -> Option<&mut T> {
        self.bucket_mut::<T>()?
            .cells
            .iter_mut()
            .filter_map(|c| c.component.as_deref_mut())
            .find_map(|c| c.as_any_mut().downcast_mut::<T>())
    }

    pub fn all<T: Component>(&self) -> Vec<&T> {
        self.bucket::<T>()
            .map(|b| {
                b.cells
                    .iter()
                    .filter_map(|c| c.component.as_deref())
                    .filter_map(|c| c.as_any().downcast_ref::<T>())
                    .collect()
            })
            .unwrap_or_default()
    }

    pub fn all_mut<T: Component>(&mut self) -> Vec<&mut T> {
        self.bucket_mut::<T>()
            .map(|b| {
                b.cells
                    .iter_mut()
                    .filter_map(|c| c.component.as_deref_mut())
                    .filter_map(|c| c.as_any_mut().downcast_mut::<T>())
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Drops the whole bucket for `T`.
    pub fn remove<T: Component>(&mut self) -> EcsResult<()> {
        let b = self
            .index
            .remove(&TypeId::of::<T>())
            .ok_or_else(|| EcsError::NotFound(Missing::Component(std::any::type_name::<T>())))?;
        self.buckets.remove(b);
        for slot in self.index.values_mut() {
            if *slot > b {
                *slot -= 1;
            }
        }
        Ok(())
    }

    fn cell_mut<T: Component>(&mut self, index: usize) -> EcsResult<&mut Cell> {
        let component = std::any::type_name::<T>();
        self.bucket_mut::<T>()
            .ok_or(EcsError::NotFound(Missing::Component(component)))?
            .cells
            .get_mut(index)
            .ok_or(EcsError::NotFound(Missing::ComponentIndex { component, index }))
    }

    pub fn set_enabled<T: Component>(&mut self, index: usize, enabled: bool) -> EcsResult<()> {
        self.cell_mut::<T>(index)?.enabled = enabled;
        Ok(())
    }

    pub fn is_enabled<T: Component>(&self, index: usize) -> EcsResult<bool> {
        let component = std::any::type_name::<T>();
        self.bucket::<T>()
            .ok_or(EcsError::NotFound(Missing::Component(component)))?
            .cells
            .get(index)
            .map(|c| c.enabled)
            .ok_or(EcsError::NotFound(Missing::ComponentIndex { component, index }))
    }

    // --- Dispatch support ---

    /// Every `(type, index)` in dispatch order.
    pub fn slots(&self) -> Vec<(TypeId, usize)> {
        self.buckets
            .iter()
            .flat_map(|b| (0..b.cells.len()).map(move |i| (b.type_id, i)))
            .collect()
    }

    /// Detaches an enabled component for the duration of its hook, along with
    /// whether its `init` had already run. The cell counts as initialized from
    /// here on, so a failed `init` is not retried.
    pub fn take(&mut self, type_id: TypeId, index: usize) -> Option<(Box<dyn Component>, bool)> {
        let b = *self.index.get(&type_id)?;
        let cell = self.buckets[b].cells.get_mut(index)?;
        if !cell.enabled {
            return None;
        }
        let component = cell.component.take()?;
        let was_initialized = std::mem::replace(&mut cell.initialized, true);
        Some((component, was_initialized))
    }

    /// Puts a detached component back if its slot is still there and empty.
    /// Otherwise the hook removed it and it is dropped here.
    pub fn restore(&mut self, type_id: TypeId, index: usize, component: Box<dyn Component>) {
        let Some(&b) = self.index.get(&type_id) else {
            return;
        };
        if let Some(cell) = self.buckets[b].cells.get_mut(index) {
            if cell.component.is_none() {
                cell.component = Some(component);
            }
        }
    }

    pub fn type_names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.buckets.iter().map(|b| b.type_name)
    }
}
