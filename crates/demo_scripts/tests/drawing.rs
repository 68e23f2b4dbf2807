// crates/demo_scripts/tests/drawing.rs
//! Runs the library's scripts through the engine's native script host.

use demo_scripts::_create_script;
use engine_script::{NativeScript, ScriptHost, ScriptObject};
use engine_shared::script_api::ScriptStr;
use engine_shared::testing::{RecordingRenderer, RenderCall};
use engine_shared::{Logger, TextureHandle, TextureRef, Transform3D};

fn heartbeat() -> NativeScript {
    let api = _create_script(ScriptStr::from_static("Heartbeat"));
    assert!(!api.state.is_null());
    NativeScript::from_api("Heartbeat", api)
}

#[test]
fn heartbeat_draws_through_the_host_renderer() {
    let logger = Logger::new("demo");
    let mut script = heartbeat();
    script.init(&mut ScriptHost::new(&logger, 0.0, 0.0)).unwrap();

    let mut renderer = RecordingRenderer::new();
    {
        let mut host = ScriptHost::new(&logger, 0.5, 0.5).with_renderer(&mut renderer);
        script.update(&mut host).unwrap();
    }

    // Half way to the next beat the square is 1.125 times its base size.
    assert_eq!(
        renderer.calls,
        [
            RenderCall::Transform(Transform3D::new().scale(18.0, 18.0, 1.0)),
            RenderCall::BindTexture(TextureRef::whole(TextureHandle(0))),
            RenderCall::DrawQuad,
        ]
    );
}

#[test]
fn heartbeat_runs_headless() {
    let logger = Logger::new("demo");
    let mut script = heartbeat();
    let mut host = ScriptHost::new(&logger, 0.5, 0.5);
    script.init(&mut host).unwrap();
    script.update(&mut host).unwrap();
    assert!(!script.is_poisoned());
}
