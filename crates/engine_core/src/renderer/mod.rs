// crates/engine_core/src/renderer/mod.rs
pub mod context;
pub mod draw_list;
pub mod quad_pass;
pub mod texture;
pub mod types;

use std::collections::HashMap;
use std::sync::Arc;

use engine_shared::{Renderer, TextureData, TextureHandle, TextureRef, Transform3D};
use tracing::{debug, warn};
use winit::window::Window;

use self::context::GraphicsContext;
use self::draw_list::{group_batches, DrawList, WHITE_TEXTURE};
use self::quad_pass::QuadPass;
use self::texture::{is_uploadable, GpuTexture};
use self::types::InstanceRaw;
use crate::error::EngineResult;

/// wgpu implementation of the engine's `Renderer` contract.
///
/// Draw calls made during a frame are recorded into a `DrawList`; `present`
/// turns them into one instanced draw per run of equal textures.
pub struct QuadRenderer {
    ctx: GraphicsContext,
    quad_pass: QuadPass,
    texture_layout: wgpu::BindGroupLayout,
    textures: HashMap<TextureHandle, GpuTexture>,
    next_texture: u32,
    draw_list: DrawList,
    clear_color: wgpu::Color,
    instances: Vec<InstanceRaw>,
}

impl QuadRenderer {
    pub async fn new(window: Arc<Window>, vsync: bool, clear_color: wgpu::Color) -> EngineResult<Self> {
        let ctx = GraphicsContext::new(window, vsync).await?;
        let texture_layout = GpuTexture::bind_group_layout(&ctx.device);
        let quad_pass = QuadPass::new(&ctx, &texture_layout);

        let white = TextureData {
            width: 1,
            height: 1,
            channels: 4,
            pixels: &[255; 4],
        };
        let mut textures = HashMap::new();
        textures.insert(WHITE_TEXTURE, GpuTexture::upload(&ctx, &texture_layout, white, false));

        Ok(Self {
            ctx,
            quad_pass,
            texture_layout,
            textures,
            next_texture: WHITE_TEXTURE.0 + 1,
            draw_list: DrawList::new(),
            clear_color,
            instances: Vec::new(),
        })
    }

    pub fn resize(&mut self, new_size: winit::dpi::PhysicalSize<u32>) {
        self.ctx.resize(new_size);
    }

    pub fn size(&self) -> winit::dpi::PhysicalSize<u32> {
        self.ctx.size
    }

    pub fn aspect_ratio(&self) -> f32 {
        self.ctx.aspect_ratio()
    }

    pub fn texture_count(&self) -> usize {
        self.textures.len()
    }

    /// Encodes and submits everything recorded since the last `clear`.
    pub fn present(&mut self) -> Result<(), wgpu::SurfaceError> {
        let output = self.ctx.surface.get_current_texture()?;
        let view = output
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        self.instances.clear();
        let mut handles = Vec::with_capacity(self.draw_list.quads().len());
        for quad in self.draw_list.quads() {
            let (handle, uv_rect) = match self.textures.get(&quad.texture.texture) {
                Some(texture) => (quad.texture.texture, texture.uv_rect(&quad.texture)),
                None => (WHITE_TEXTURE, [0.0, 0.0, 1.0, 1.0]),
            };
            handles.push(handle);
            self.instances.push(InstanceRaw {
                model: quad.model.to_cols_array_2d(),
                uv_rect,
            });
        }
        let batches = group_batches(handles);

        let mut encoder = self.ctx.device.create_command_encoder(&wgpu::CommandEncoderDescriptor {
            label: Some("Render Encoder"),
        });

        self.quad_pass.draw(
            &self.ctx,
            &mut encoder,
            &view,
            self.clear_color,
            self.draw_list.view_proj(),
            &self.instances,
            &batches,
            &self.textures,
        );

        self.ctx.queue.submit(std::iter::once(encoder.finish()));

        // Now it's safe to recall the staging belt memory for next frame
        self.quad_pass.cleanup();

        output.present();
        Ok(())
    }
}

impl Renderer for QuadRenderer {
    fn clear(&mut self) {
        self.draw_list.clear();
    }

    fn upload_ortho(&mut self, left: f32, right: f32, bottom: f32, top: f32, near: f32, far: f32) {
        self.draw_list.set_ortho(left, right, bottom, top, near, far);
    }

    fn upload_view(&mut self, x: f32, y: f32, z: f32, zoom: f32) {
        self.draw_list.set_view(x, y, z, zoom);
    }

    fn create_texture(&mut self, data: TextureData<'_>, interpolate: bool) -> TextureHandle {
        if !is_uploadable(&data) {
            warn!(
                width = data.width,
                height = data.height,
                channels = data.channels,
                bytes = data.pixels.len(),
                "rejecting malformed texture, drawing white instead"
            );
            return WHITE_TEXTURE;
        }
        let handle = TextureHandle(self.next_texture);
        self.next_texture += 1;
        debug!(handle = handle.0, width = data.width, height = data.height, "uploading texture");
        let texture = GpuTexture::upload(&self.ctx, &self.texture_layout, data, interpolate);
        self.textures.insert(handle, texture);
        handle
    }

    fn upload_transform(&mut self, transform: &Transform3D) {
        self.draw_list.set_transform(*transform);
    }

    fn bind_texture(&mut self, texture: TextureRef) {
        self.draw_list.bind(texture);
    }

    fn draw_quad(&mut self) {
        self.draw_list.draw();
    }

    fn batch_begin(&mut self) {
        self.draw_list.begin_batch();
    }

    fn batch_upload_transform(&mut self, transform: &Transform3D) {
        self.draw_list.set_batch_transform(*transform);
    }

    fn batch_bind_texture(&mut self, texture: TextureRef) {
        self.draw_list.bind_batch(texture);
    }

    fn batch_draw_quad(&mut self) {
        self.draw_list.draw_batched();
    }

    fn batch_end(&mut self) {
        self.draw_list.end_batch();
    }
}
