// crates/demo_scripts/src/shims.rs
use std::ffi::c_void;

use engine_shared::script_api::{FFIResult, HostInterface, ScriptApi};
use engine_shared::LogLevel;

use crate::scripts::{Host, Script};

type ScriptBox = Box<dyn Script>;

fn catch_ffi_panic<F>(f: F) -> FFIResult
where
    F: FnOnce() -> FFIResult + std::panic::UnwindSafe,
{
    match std::panic::catch_unwind(f) {
        Ok(res) => res,
        Err(_) => FFIResult::PanicDetected,
    }
}

pub(crate) fn api_for(script: Option<ScriptBox>) -> ScriptApi {
    let state = match script {
        // Double box so the state pointer is thin.
        Some(script) => Box::into_raw(Box::new(script)) as *mut c_void,
        None => std::ptr::null_mut(),
    };
    ScriptApi {
        state,
        init: on_init,
        update: on_update,
        drop: drop_state,
    }
}

fn dispatch(
    state: *mut c_void,
    iface: *const HostInterface,
    call: fn(&mut dyn Script, &Host<'_>) -> Result<(), String>,
) -> FFIResult {
    if state.is_null() || iface.is_null() {
        return FFIResult::Error;
    }

    let (script, host) = unsafe { (&mut *(state as *mut ScriptBox), Host::new(&*iface)) };
    match call(script.as_mut(), &host) {
        Ok(()) => FFIResult::Success,
        Err(message) => {
            host.log(LogLevel::Error, &message);
            FFIResult::Error
        }
    }
}

pub extern "C" fn on_init(state: *mut c_void, iface: *const HostInterface) -> FFIResult {
    catch_ffi_panic(|| dispatch(state, iface, |script, host| script.init(host)))
}

pub extern "C" fn on_update(state: *mut c_void, iface: *const HostInterface) -> FFIResult {
    catch_ffi_panic(|| dispatch(state, iface, |script, host| script.update(host)))
}

pub extern "C" fn drop_state(state: *mut c_void) {
    if state.is_null() {
        return;
    }
    let _ = std::panic::catch_unwind(|| unsafe {
        drop(Box::from_raw(state as *mut ScriptBox));
    });
}

#[cfg(test)]
mod tests {
    use engine_shared::script_api::{HostRenderer, ScriptStr};

    use super::*;

    struct Panicky;

    impl Script for Panicky {
        fn update(&mut self, _host: &Host<'_>) -> Result<(), String> {
            panic!("boom");
        }
    }

    struct Refuses;

    impl Script for Refuses {
        fn init(&mut self, _host: &Host<'_>) -> Result<(), String> {
            Err("not today".to_string())
        }
    }

    extern "C" fn record(context: *mut c_void, level: u32, message: ScriptStr) {
        let lines = unsafe { &mut *(context as *mut Vec<(u32, String)>) };
        let text = unsafe { message.as_str() }.unwrap_or_default().to_string();
        lines.push((level, text));
    }

    fn host(lines: &mut Vec<(u32, String)>) -> HostInterface {
        HostInterface {
            context: lines as *mut Vec<(u32, String)> as *mut c_void,
            log: record,
            delta_time: 0.016,
            time: 0.0,
            renderer: HostRenderer::detached(),
        }
    }

    #[test]
    fn panic_is_reported_not_propagated() {
        let mut lines = Vec::new();
        let iface = host(&mut lines);
        let api = api_for(Some(Box::new(Panicky)));
        assert_eq!((api.update)(api.state, &iface), FFIResult::PanicDetected);
        (api.drop)(api.state);
    }

    #[test]
    fn script_error_is_logged_and_returned() {
        let mut lines = Vec::new();
        let iface = host(&mut lines);
        let api = api_for(Some(Box::new(Refuses)));
        assert_eq!((api.init)(api.state, &iface), FFIResult::Error);
        (api.drop)(api.state);
        assert_eq!(lines, [(LogLevel::Error as u32, "not today".to_string())]);
    }

    #[test]
    fn null_pointers_are_rejected() {
        let mut lines = Vec::new();
        let iface = host(&mut lines);
        assert_eq!(on_update(std::ptr::null_mut(), &iface), FFIResult::Error);
        drop_state(std::ptr::null_mut());
    }
}
