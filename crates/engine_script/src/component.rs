// crates/engine_script/src/component.rs
use engine_ecs::{Component, EcsResult, Interface};
use engine_shared::Logger;

use crate::error::ScriptResult;
use crate::host::ScriptHost;

/// A script instance the runtime has produced.
pub trait ScriptObject {
    fn init(&mut self, _host: &mut ScriptHost<'_>) -> ScriptResult<()> {
        Ok(())
    }

    fn update(&mut self, host: &mut ScriptHost<'_>) -> ScriptResult<()>;
}

/// Adapts a named [`ScriptObject`] into an entity component.
///
/// Script components are never unique; any number of them can share an
/// entity. When the interface carries no logger, the script logs through its
/// own handle named after the script.
pub struct ScriptComponent {
    name: String,
    object: Box<dyn ScriptObject>,
    fallback_logger: Logger,
}

impl ScriptComponent {
    pub fn new(name: impl Into<String>, object: Box<dyn ScriptObject>) -> Self {
        let name = name.into();
        Self {
            fallback_logger: Logger::new(format!("script:{name}")),
            name,
            object,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    fn call(
        &mut self,
        iface: &mut Interface<'_>,
        hook: fn(&mut dyn ScriptObject, &mut ScriptHost<'_>) -> ScriptResult<()>,
    ) -> EcsResult<()> {
        let logger = iface.logger().unwrap_or(&self.fallback_logger);
        let (delta_time, time) = match iface.clock() {
            Ok(clock) => (clock.delta_time(), clock.current()),
            Err(_) => (0.0, 0.0),
        };
        let mut host = ScriptHost::new(logger, delta_time, time);
        if let Ok(owner) = iface.owner_id() {
            host = host.with_owner(owner);
        }
        if let Ok(renderer) = iface.renderer() {
            host = host.with_renderer(renderer);
        }
        hook(self.object.as_mut(), &mut host)?;
        Ok(())
    }
}

impl Component for ScriptComponent {
    fn init(&mut self, iface: &mut Interface<'_>) -> EcsResult<()> {
        self.call(iface, |object, host| object.init(host))
    }

    fn update(&mut self, iface: &mut Interface<'_>) -> EcsResult<()> {
        self.call(iface, |object, host| object.update(host))
    }

    fn is_unique(&self) -> bool {
        false
    }
}
