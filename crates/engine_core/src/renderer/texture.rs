// crates/engine_core/src/renderer/texture.rs
use std::borrow::Cow;

use engine_shared::{TextureData, TextureRef};

use super::context::GraphicsContext;
use super::draw_list::uv_rect;

/// An uploaded RGBA texture together with the bind group that samples it.
pub struct GpuTexture {
    _texture: wgpu::Texture,
    pub bind_group: wgpu::BindGroup,
    pub width: u32,
    pub height: u32,
}

impl GpuTexture {
    pub fn bind_group_layout(device: &wgpu::Device) -> wgpu::BindGroupLayout {
        device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("texture_bind_group_layout"),
            entries: &[
                wgpu::BindGroupLayoutEntry {
                    binding: 0,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Texture {
                        multisampled: false,
                        view_dimension: wgpu::TextureViewDimension::D2,
                        sample_type: wgpu::TextureSampleType::Float { filterable: true },
                    },
                    count: None,
                },
                wgpu::BindGroupLayoutEntry {
                    binding: 1,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Sampler(wgpu::SamplerBindingType::Filtering),
                    count: None,
                },
            ],
        })
    }

    /// Caller guarantees non-zero dimensions and a pixel buffer of
    /// `width * height * channels` bytes.
    pub fn upload(
        ctx: &GraphicsContext,
        layout: &wgpu::BindGroupLayout,
        data: TextureData<'_>,
        interpolate: bool,
    ) -> Self {
        let size = wgpu::Extent3d {
            width: data.width,
            height: data.height,
            depth_or_array_layers: 1,
        };
        let texture = ctx.device.create_texture(&wgpu::TextureDescriptor {
            label: Some("Quad Texture"),
            size,
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: wgpu::TextureFormat::Rgba8UnormSrgb,
            usage: wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
            view_formats: &[],
        });

        let rgba = to_rgba(&data);
        ctx.queue.write_texture(
            wgpu::ImageCopyTexture {
                texture: &texture,
                mip_level: 0,
                origin: wgpu::Origin3d::ZERO,
                aspect: wgpu::TextureAspect::All,
            },
            &rgba,
            wgpu::ImageDataLayout {
                offset: 0,
                bytes_per_row: Some(4 * data.width),
                rows_per_image: Some(data.height),
            },
            size,
        );

        let filter = if interpolate {
            wgpu::FilterMode::Linear
        } else {
            wgpu::FilterMode::Nearest
        };
        let sampler = ctx.device.create_sampler(&wgpu::SamplerDescriptor {
            label: Some("Quad Sampler"),
            address_mode_u: wgpu::AddressMode::ClampToEdge,
            address_mode_v: wgpu::AddressMode::ClampToEdge,
            address_mode_w: wgpu::AddressMode::ClampToEdge,
            mag_filter: filter,
            min_filter: filter,
            mipmap_filter: wgpu::FilterMode::Nearest,
            ..Default::default()
        });

        let view = texture.create_view(&wgpu::TextureViewDescriptor::default());
        let bind_group = ctx.device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("texture_bind_group"),
            layout,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: wgpu::BindingResource::TextureView(&view),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: wgpu::BindingResource::Sampler(&sampler),
                },
            ],
        });

        Self {
            _texture: texture,
            bind_group,
            width: data.width,
            height: data.height,
        }
    }

    pub fn uv_rect(&self, texture: &TextureRef) -> [f32; 4] {
        uv_rect(self.width, self.height, texture)
    }
}

/// Whether `data` describes an image the GPU path can take.
pub fn is_uploadable(data: &TextureData<'_>) -> bool {
    let expected = data.width as usize * data.height as usize * data.channels as usize;
    data.width > 0
        && data.height > 0
        && (1..=4).contains(&data.channels)
        && data.pixels.len() == expected
}

/// Expands grey, grey+alpha and RGB pixels to RGBA8.
pub fn to_rgba<'a>(data: &TextureData<'a>) -> Cow<'a, [u8]> {
    let px = data.pixels;
    match data.channels {
        4 => Cow::Borrowed(px),
        3 => Cow::Owned(px.chunks_exact(3).flat_map(|c| [c[0], c[1], c[2], 255]).collect()),
        2 => Cow::Owned(px.chunks_exact(2).flat_map(|c| [c[0], c[0], c[0], c[1]]).collect()),
        _ => Cow::Owned(px.iter().flat_map(|&g| [g, g, g, 255]).collect()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn data(channels: u8, pixels: &[u8]) -> TextureData<'_> {
        TextureData {
            width: 1,
            height: 2,
            channels,
            pixels,
        }
    }

    #[test]
    fn expands_to_rgba() {
        assert_eq!(&*to_rgba(&data(4, &[1, 2, 3, 4, 5, 6, 7, 8])), [1, 2, 3, 4, 5, 6, 7, 8]);
        assert_eq!(&*to_rgba(&data(3, &[1, 2, 3, 4, 5, 6])), [1, 2, 3, 255, 4, 5, 6, 255]);
        assert_eq!(&*to_rgba(&data(2, &[9, 128, 7, 0])), [9, 9, 9, 128, 7, 7, 7, 0]);
        assert_eq!(&*to_rgba(&data(1, &[10, 20])), [10, 10, 10, 255, 20, 20, 20, 255]);
    }

    #[test]
    fn rejects_inconsistent_data() {
        assert!(is_uploadable(&data(4, &[0; 8])));
        assert!(!is_uploadable(&data(4, &[0; 7])));
        assert!(!is_uploadable(&data(5, &[0; 10])));
        let empty = TextureData {
            width: 0,
            height: 0,
            channels: 4,
            pixels: &[],
        };
        assert!(!is_uploadable(&empty));
    }
}
