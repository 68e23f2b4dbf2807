// crates/engine_ecs/src/component.rs
use std::any::{Any, TypeId};

use crate::error::EcsResult;
use crate::interface::Interface;

/// Downcasting support for trait objects. Implemented for every `'static` type.
pub trait AsAny: Any {
    fn as_any(&self) -> &dyn Any;
    fn as_any_mut(&mut self) -> &mut dyn Any;
    fn type_name(&self) -> &'static str;
}

impl<T: Any> AsAny for T {
    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }

    fn type_name(&self) -> &'static str {
        std::any::type_name::<T>()
    }
}

/// Behaviour attached to an entity.
///
/// Both hooks get an [`Interface`] whose owner is the entity this component
/// lives on. While a hook runs the component is detached from that entity, so
/// looking itself up through the owner finds nothing.
pub trait Component: AsAny {
    fn init(&mut self, _iface: &mut Interface<'_>) -> EcsResult<()> {
        Ok(())
    }

    fn update(&mut self, _iface: &mut Interface<'_>) -> EcsResult<()> {
        Ok(())
    }

    /// At most one instance per entity when true.
    fn is_unique(&self) -> bool;
}

/// Storage key of a boxed component: its concrete type, not `Box`'s.
pub(crate) fn type_key(component: &dyn Component) -> TypeId {
    component.as_any().type_id()
}
