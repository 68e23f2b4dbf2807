// crates/demo_scripts/src/scripts.rs
use engine_shared::script_api::{HostInterface, HostRenderer, ScriptStr, ScriptTexture};
use engine_shared::{LogLevel, TextureHandle, TextureRef, Transform3D};

pub(crate) const HEARTBEAT: &str = "Heartbeat";
pub(crate) const FRAME_COUNTER: &str = "FrameCounter";

pub(crate) fn create(name: &str) -> Option<Box<dyn Script>> {
    match name {
        HEARTBEAT => Some(Box::new(Heartbeat::default())),
        FRAME_COUNTER => Some(Box::new(FrameCounter::default())),
        _ => None,
    }
}

/// Safe view of the host table for the duration of one call.
pub struct Host<'a> {
    iface: &'a HostInterface,
}

impl<'a> Host<'a> {
    pub fn new(iface: &'a HostInterface) -> Self {
        Self { iface }
    }

    pub fn log(&self, level: LogLevel, message: &str) {
        (self.iface.log)(self.iface.context, level as u32, ScriptStr::borrowed(message));
    }

    pub fn delta_time(&self) -> f32 {
        self.iface.delta_time
    }

    pub fn time(&self) -> f64 {
        self.iface.time
    }

    /// `None` when the host is not drawing this frame.
    pub fn renderer(&self) -> Option<Draw<'a>> {
        let table = &self.iface.renderer;
        table.is_available().then_some(Draw { table })
    }
}

/// Immediate-mode drawing through the host's renderer.
#[derive(Clone, Copy)]
pub struct Draw<'a> {
    table: &'a HostRenderer,
}

impl Draw<'_> {
    pub fn clear(&self) {
        (self.table.clear)(self.table.context);
    }

    pub fn upload_ortho(&self, left: f32, right: f32, bottom: f32, top: f32, near: f32, far: f32) {
        (self.table.upload_ortho)(self.table.context, left, right, bottom, top, near, far);
    }

    pub fn upload_view(&self, x: f32, y: f32, z: f32, zoom: f32) {
        (self.table.upload_view)(self.table.context, x, y, z, zoom);
    }

    pub fn upload_transform(&self, transform: &Transform3D) {
        let cols = transform.to_cols_array_2d();
        (self.table.upload_transform)(self.table.context, &cols);
    }

    pub fn bind_texture(&self, texture: TextureRef) {
        (self.table.bind_texture)(self.table.context, ScriptTexture::from(texture));
    }

    pub fn draw_quad(&self) {
        (self.table.draw_quad)(self.table.context);
    }
}

pub trait Script {
    fn init(&mut self, _host: &Host<'_>) -> Result<(), String> {
        Ok(())
    }

    fn update(&mut self, _host: &Host<'_>) -> Result<(), String> {
        Ok(())
    }
}

// --- Heartbeat ---

/// Logs once per `interval` seconds of game time and, when the host draws,
/// pulses a square that shrinks back between beats.
pub struct Heartbeat {
    interval: f64,
    next_beat: f64,
    beats: u32,
    texture: TextureRef,
    size: f32,
}

impl Default for Heartbeat {
    fn default() -> Self {
        Self {
            interval: 1.0,
            next_beat: 0.0,
            beats: 0,
            texture: TextureRef::whole(TextureHandle(0)),
            size: 16.0,
        }
    }
}

impl Heartbeat {
    fn draw(&self, draw: Draw<'_>, now: f64) {
        let until_next = ((self.next_beat - now) / self.interval).clamp(0.0, 1.0) as f32;
        let side = self.size * (1.0 + 0.5 * until_next * until_next);
        draw.upload_transform(&Transform3D::new().scale(side, side, 1.0));
        draw.bind_texture(self.texture);
        draw.draw_quad();
    }
}

impl Script for Heartbeat {
    fn init(&mut self, host: &Host<'_>) -> Result<(), String> {
        self.next_beat = host.time() + self.interval;
        host.log(LogLevel::Info, "heartbeat started");
        Ok(())
    }

    fn update(&mut self, host: &Host<'_>) -> Result<(), String> {
        let now = host.time();
        if now >= self.next_beat {
            self.beats += 1;
            // Skip beats missed during a long frame instead of replaying them.
            while self.next_beat <= now {
                self.next_beat += self.interval;
            }
            host.log(
                LogLevel::Info,
                &format!("beat {} at {:.1}s", self.beats, now),
            );
        }
        if let Some(draw) = host.renderer() {
            self.draw(draw, now);
        }
        Ok(())
    }
}

// --- Frame counter ---

const REPORT_EVERY: u32 = 300;

/// Averages frame time over fixed windows and reports it at debug level.
#[derive(Default)]
pub struct FrameCounter {
    frames: u32,
    window_time: f32,
}

impl Script for FrameCounter {
    fn init(&mut self, host: &Host<'_>) -> Result<(), String> {
        host.log(LogLevel::Debug, "frame counter ready");
        Ok(())
    }

    fn update(&mut self, host: &Host<'_>) -> Result<(), String> {
        let dt = host.delta_time();
        if dt.is_nan() || dt < 0.0 {
            return Err(format!("bad frame delta {dt}"));
        }
        self.frames += 1;
        self.window_time += dt;
        if self.frames == REPORT_EVERY {
            let fps = if self.window_time > 0.0 {
                self.frames as f32 / self.window_time
            } else {
                0.0
            };
            host.log(LogLevel::Debug, &format!("{fps:.1} fps over {} frames", self.frames));
            self.frames = 0;
            self.window_time = 0.0;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::ffi::c_void;

    use super::*;

    type Lines = Vec<(u32, String)>;

    extern "C" fn record(context: *mut c_void, level: u32, message: ScriptStr) {
        let lines = unsafe { &mut *(context as *mut Lines) };
        let text = unsafe { message.as_str() }.unwrap_or_default().to_string();
        lines.push((level, text));
    }

    fn iface(lines: &mut Lines, delta_time: f32, time: f64) -> HostInterface {
        HostInterface {
            context: lines as *mut Lines as *mut c_void,
            log: record,
            delta_time,
            time,
            renderer: HostRenderer::detached(),
        }
    }

    #[test]
    fn heartbeat_logs_once_per_interval() {
        let mut lines = Lines::new();
        let mut beat = Heartbeat::default();
        beat.init(&Host::new(&iface(&mut lines, 0.0, 0.0))).unwrap();

        for step in 1..=25 {
            let t = step as f64 * 0.1;
            beat.update(&Host::new(&iface(&mut lines, 0.1, t))).unwrap();
        }
        // Started plus beats at 1.0s and 2.0s.
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0], (LogLevel::Info as u32, "heartbeat started".to_string()));
        assert!(lines[2].1.starts_with("beat 2"));
    }

    #[test]
    fn heartbeat_draws_nothing_without_a_renderer() {
        let mut lines = Lines::new();
        let iface = iface(&mut lines, 0.1, 0.1);
        assert!(Host::new(&iface).renderer().is_none());
        Heartbeat::default().update(&Host::new(&iface)).unwrap();
    }

    #[test]
    fn heartbeat_does_not_replay_missed_beats() {
        let mut lines = Lines::new();
        let mut beat = Heartbeat::default();
        beat.init(&Host::new(&iface(&mut lines, 0.0, 0.0))).unwrap();
        beat.update(&Host::new(&iface(&mut lines, 5.0, 5.0))).unwrap();
        beat.update(&Host::new(&iface(&mut lines, 0.1, 5.1))).unwrap();
        assert_eq!(lines.len(), 2);
    }

    #[test]
    fn frame_counter_reports_each_window() {
        let mut lines = Lines::new();
        let mut counter = FrameCounter::default();
        for _ in 0..REPORT_EVERY * 2 {
            counter
                .update(&Host::new(&iface(&mut lines, 0.02, 0.0)))
                .unwrap();
        }
        assert_eq!(lines.len(), 2);
        assert!(lines[0].1.starts_with("50.0 fps"));
    }

    #[test]
    fn frame_counter_rejects_nan_delta() {
        let mut lines = Lines::new();
        let mut counter = FrameCounter::default();
        let err = counter
            .update(&Host::new(&iface(&mut lines, f32::NAN, 0.0)))
            .unwrap_err();
        assert!(err.contains("NaN"));
    }
}
