// crates/engine_ecs/src/error.rs
use std::error::Error;
use std::fmt;

use thiserror::Error;

use crate::entity::EntityId;

/// What a failed lookup was looking for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Missing {
    Entity(EntityId),
    Child { parent: EntityId, child: EntityId },
    Component(&'static str),
    ComponentIndex { component: &'static str, index: usize },
}

impl fmt::Display for Missing {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Missing::Entity(id) => write!(f, "entity {id}"),
            Missing::Child { parent, child } => write!(f, "child {child} of entity {parent}"),
            Missing::Component(name) => write!(f, "component {name}"),
            Missing::ComponentIndex { component, index } => {
                write!(f, "component {component}[{index}]")
            }
        }
    }
}

#[derive(Debug, Error)]
pub enum EcsError {
    #[error("tried to add unique component {component} to entity {entity} twice")]
    DuplicateUniqueComponent {
        entity: EntityId,
        component: &'static str,
    },

    #[error("an entity with id {0} already exists in this container")]
    DuplicateId(EntityId),

    #[error("{0} does not exist")]
    NotFound(Missing),

    #[error("game is already initialized")]
    AlreadyInitialized,

    #[error("interface has no {0}")]
    MissingCollaborator(&'static str),

    #[error(transparent)]
    Component(Box<dyn Error + Send + Sync>),
}

impl EcsError {
    /// Wraps an error raised inside a component hook.
    pub fn component(err: impl Into<Box<dyn Error + Send + Sync>>) -> Self {
        EcsError::Component(err.into())
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, EcsError::NotFound(_))
    }
}

pub type EcsResult<T> = Result<T, EcsError>;
