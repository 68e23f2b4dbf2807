// crates/engine_script/src/host.rs
use std::ffi::c_void;

use engine_ecs::EntityId;
use engine_shared::script_api::{HostInterface, HostRenderer, ScriptStr, ScriptTexture};
use engine_shared::{LogLevel, Logger, Renderer, Transform3D};

/// What a script sees of the engine during one hook call.
pub struct ScriptHost<'a> {
    logger: &'a Logger,
    delta_time: f32,
    time: f64,
    owner: Option<EntityId>,
    renderer: Option<&'a mut dyn Renderer>,
}

impl<'a> ScriptHost<'a> {
    pub fn new(logger: &'a Logger, delta_time: f32, time: f64) -> Self {
        Self {
            logger,
            delta_time,
            time,
            owner: None,
            renderer: None,
        }
    }

    pub fn with_owner(mut self, owner: EntityId) -> Self {
        self.owner = Some(owner);
        self
    }

    pub fn with_renderer(mut self, renderer: &'a mut dyn Renderer) -> Self {
        self.renderer = Some(renderer);
        self
    }

    pub fn has_renderer(&self) -> bool {
        self.renderer.is_some()
    }

    pub fn renderer(&mut self) -> Option<&mut (dyn Renderer + 'a)> {
        self.renderer.as_deref_mut()
    }

    pub fn logger(&self) -> &Logger {
        self.logger
    }

    pub fn delta_time(&self) -> f32 {
        self.delta_time
    }

    pub fn time(&self) -> f64 {
        self.time
    }

    pub fn owner(&self) -> Option<EntityId> {
        self.owner
    }

    pub fn log(&self, level: LogLevel, message: &str) {
        self.logger.log(level, message);
    }

    pub fn info(&self, message: &str) {
        self.logger.info(message);
    }

    /// C view of this host. Valid until `self` is next used or moved.
    pub(crate) fn as_ffi(&mut self) -> HostInterface {
        let renderer = match self.renderer.as_mut() {
            Some(slot) => slot as *mut &mut dyn Renderer as *mut c_void,
            None => std::ptr::null_mut(),
        };
        HostInterface {
            context: self.logger as *const Logger as *mut c_void,
            log: host_log,
            delta_time: self.delta_time,
            time: self.time,
            renderer: HostRenderer {
                context: renderer,
                clear: render_clear,
                upload_ortho: render_ortho,
                upload_view: render_view,
                upload_transform: render_transform,
                bind_texture: render_bind_texture,
                draw_quad: render_draw_quad,
            },
        }
    }
}

/// `HostInterface::log` implementation. `context` is the host's `Logger`.
pub(crate) extern "C" fn host_log(context: *mut c_void, level: u32, message: ScriptStr) {
    if context.is_null() {
        return;
    }
    let logger = unsafe { &*(context as *const Logger) };
    let level = LogLevel::from_raw(level).unwrap_or(LogLevel::Info);
    match unsafe { message.as_str() } {
        Some(text) => logger.log(level, text),
        None => logger.warn("script sent a log line that is not valid utf-8"),
    }
}

// `HostRenderer` implementations. `context` points at the host's
// `&mut dyn Renderer` slot, or is null when there is none.

fn on_renderer(context: *mut c_void, draw: impl FnOnce(&mut dyn Renderer)) {
    if context.is_null() {
        return;
    }
    let renderer = unsafe { &mut **(context as *mut &mut dyn Renderer) };
    draw(renderer);
}

extern "C" fn render_clear(context: *mut c_void) {
    on_renderer(context, |r| r.clear());
}

extern "C" fn render_ortho(
    context: *mut c_void,
    left: f32,
    right: f32,
    bottom: f32,
    top: f32,
    near: f32,
    far: f32,
) {
    on_renderer(context, |r| r.upload_ortho(left, right, bottom, top, near, far));
}

extern "C" fn render_view(context: *mut c_void, x: f32, y: f32, z: f32, zoom: f32) {
    on_renderer(context, |r| r.upload_view(x, y, z, zoom));
}

extern "C" fn render_transform(context: *mut c_void, matrix: *const [[f32; 4]; 4]) {
    if matrix.is_null() {
        return;
    }
    let transform = Transform3D::from_cols_array_2d(unsafe { &*matrix });
    on_renderer(context, |r| r.upload_transform(&transform));
}

extern "C" fn render_bind_texture(context: *mut c_void, texture: ScriptTexture) {
    on_renderer(context, |r| r.bind_texture(texture.into()));
}

extern "C" fn render_draw_quad(context: *mut c_void) {
    on_renderer(context, |r| r.draw_quad());
}

#[cfg(test)]
mod tests {
    use engine_shared::testing::{RecordingRenderer, RenderCall};
    use engine_shared::{TextureHandle, TextureRef};

    use super::*;

    #[test]
    fn ffi_view_carries_time() {
        let logger = Logger::new("script");
        let mut host = ScriptHost::new(&logger, 0.016, 3.5);
        let ffi = host.as_ffi();
        assert_eq!(ffi.delta_time, 0.016);
        assert_eq!(ffi.time, 3.5);
        assert!(!ffi.context.is_null());
        // Round trip through the callback must not crash on any level.
        for raw in [0, 1, 2, 3, 42] {
            (ffi.log)(ffi.context, raw, ScriptStr::from_static("hello"));
        }
        host_log(std::ptr::null_mut(), 1, ScriptStr::from_static("dropped"));
    }

    #[test]
    fn ffi_renderer_is_null_without_a_renderer() {
        let logger = Logger::new("script");
        let mut host = ScriptHost::new(&logger, 0.0, 0.0);
        let ffi = host.as_ffi();
        assert!(!ffi.renderer.is_available());
        (ffi.renderer.clear)(ffi.renderer.context);
        (ffi.renderer.draw_quad)(ffi.renderer.context);
    }

    #[test]
    fn ffi_renderer_forwards_every_call() {
        let logger = Logger::new("script");
        let mut renderer = RecordingRenderer::new();
        let transform = Transform3D::new().translate(4.0, 2.0, 0.0);
        let texture = TextureRef::region(TextureHandle(9), (0, 16), (16, 16));
        {
            let mut host = ScriptHost::new(&logger, 0.0, 0.0).with_renderer(&mut renderer);
            assert!(host.has_renderer());
            let ffi = host.as_ffi();
            let r = &ffi.renderer;
            assert!(r.is_available());
            (r.clear)(r.context);
            (r.upload_ortho)(r.context, 0.0, 320.0, 0.0, 240.0, -1.0, 1.0);
            (r.upload_view)(r.context, 10.0, 20.0, 0.0, 2.0);
            (r.upload_transform)(r.context, &transform.to_cols_array_2d());
            (r.bind_texture)(r.context, texture.into());
            (r.draw_quad)(r.context);
            (r.upload_transform)(r.context, std::ptr::null());
        }
        assert_eq!(
            renderer.calls,
            [
                RenderCall::Clear,
                RenderCall::Ortho {
                    left: 0.0,
                    right: 320.0,
                    bottom: 0.0,
                    top: 240.0,
                    near: -1.0,
                    far: 1.0,
                },
                RenderCall::View {
                    x: 10.0,
                    y: 20.0,
                    z: 0.0,
                    zoom: 2.0,
                },
                RenderCall::Transform(transform),
                RenderCall::BindTexture(texture),
                RenderCall::DrawQuad,
            ]
        );
    }
}
