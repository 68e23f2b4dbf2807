// crates/engine_core/src/input/mod.rs
pub mod poller;

pub use poller::{map_key, InputPoller};
