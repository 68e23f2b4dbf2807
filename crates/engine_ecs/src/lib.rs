// crates/engine_ecs/src/lib.rs
//! Entity tree, typed component storage and hook dispatch.

mod component;
mod entity;
mod error;
mod game;
mod interface;
mod storage;

pub use component::{AsAny, Component};
pub use entity::{Entity, EntityId};
pub use error::{EcsError, EcsResult, Missing};
pub use game::Game;
pub use interface::Interface;
