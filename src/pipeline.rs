use crate::{
    frame::{Presenter, Region},
    software::Raster,
    view::Extent,
};
use anyhow::Context;
use std::sync::Arc;
use winit::window::Window;

const MIDNIGHT_BLUE: wgpu::Color = wgpu::Color {
    r: 0.098,
    g: 0.098,
    b: 0.439,
    a: 1.0,
};

/// GPU copy of one raster and the bind group that samples it.
struct Half {
    texture: wgpu::Texture,
    bind_group: wgpu::BindGroup,
    extent: Extent,
}

/// Uploads the two rasters into textures and draws them into the left and
/// right halves of the window surface.
pub struct Pipeline {
    surface: wgpu::Surface<'static>,
    config: wgpu::SurfaceConfiguration,
    device: wgpu::Device,
    queue: wgpu::Queue,
    //
    pipeline: wgpu::RenderPipeline,
    bind_group_layout: wgpu::BindGroupLayout,
    sampler: wgpu::Sampler,
    mandelbrot: Option<Half>,
    julia: Option<Half>,
}

impl Pipeline {
    pub fn new(window: Arc<Window>) -> anyhow::Result<Self> {
        let size = window.inner_size();

        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor::default());
        let surface = instance
            .create_surface(window)
            .context("Failed to create surface")?;
        let adapter = pollster::block_on(instance.request_adapter(&wgpu::RequestAdapterOptions {
            power_preference: wgpu::PowerPreference::default(),
            compatible_surface: Some(&surface),
            force_fallback_adapter: false,
        }))
        .context("Failed to create adapter")?;
        log::info!("Running on Adapter: {:#?}", adapter.get_info());

        let (device, queue) = pollster::block_on(adapter.request_device(&wgpu::DeviceDescriptor {
            label: None,
            required_features: wgpu::Features::empty(),
            required_limits: wgpu::Limits::downlevel_defaults(),
            experimental_features: wgpu::ExperimentalFeatures::disabled(),
            memory_hints: wgpu::MemoryHints::MemoryUsage,
            trace: wgpu::Trace::Off,
        }))
        .context("Failed to create device")?;

        // Raster colors are shown as computed, so prefer a non-sRGB surface.
        let surface_caps = surface.get_capabilities(&adapter);
        let surface_format = surface_caps
            .formats
            .iter()
            .find(|f| !f.is_srgb())
            .or(surface_caps.formats.first())
            .copied()
            .context("Surface reports no formats")?;
        log::info!("Surface format: {:?}", surface_format);

        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format: surface_format,
            width: size.width.max(1),
            height: size.height.max(1),
            present_mode: wgpu::PresentMode::Fifo,
            alpha_mode: surface_caps.alpha_modes[0],
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        surface.configure(&device, &config);

        let bind_group_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: None,
            entries: &[
                wgpu::BindGroupLayoutEntry {
                    binding: 0,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Texture {
                        sample_type: wgpu::TextureSampleType::Float { filterable: true },
                        view_dimension: wgpu::TextureViewDimension::D2,
                        multisampled: false,
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
        });

        let sampler = device.create_sampler(&wgpu::SamplerDescriptor {
            address_mode_u: wgpu::AddressMode::ClampToEdge,
            address_mode_v: wgpu::AddressMode::ClampToEdge,
            mag_filter: wgpu::FilterMode::Nearest,
            min_filter: wgpu::FilterMode::Nearest,
            ..Default::default()
        });

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: None,
            bind_group_layouts: &[&bind_group_layout],
            immediate_size: 0,
        });

        let shader = device.create_shader_module(wgpu::include_wgsl!("shaders/present.wgsl"));
        let pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: None,
            layout: Some(&pipeline_layout),
            vertex: wgpu::VertexState {
                module: &shader,
                entry_point: Some("vs_main"),
                buffers: &[],
                compilation_options: Default::default(),
            },
            fragment: Some(wgpu::FragmentState {
                module: &shader,
                entry_point: Some("fs_main"),
                targets: &[Some(surface_format.into())],
                compilation_options: Default::default(),
            }),
            primitive: wgpu::PrimitiveState::default(),
            depth_stencil: None,
            multisample: wgpu::MultisampleState::default(),
            cache: None,
            multiview_mask: None,
        });

        Ok(Self {
            surface,
            config,
            device,
            queue,
            //
            pipeline,
            bind_group_layout,
            sampler,
            mandelbrot: None,
            julia: None,
        })
    }

    pub fn resize(&mut self, width: u32, height: u32) {
        if width == 0 || height == 0 {
            return;
        }
        self.config.width = width;
        self.config.height = height;
        self.surface.configure(&self.device, &self.config);
    }

    fn create_half(&self, extent: Extent) -> Half {
        let texture = self.device.create_texture(&wgpu::TextureDescriptor {
            label: None,
            size: wgpu::Extent3d {
                width: extent.width as u32,
                height: extent.height as u32,
                depth_or_array_layers: 1,
            },
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: wgpu::TextureFormat::Rgba8Unorm,
            usage: wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
            view_formats: &[],
        });
        let view = texture.create_view(&Default::default());

        let bind_group = self.device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: None,
            layout: &self.bind_group_layout,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: wgpu::BindingResource::TextureView(&view),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: wgpu::BindingResource::Sampler(&self.sampler),
                },
            ],
        });

        Half {
            texture,
            bind_group,
            extent,
        }
    }

    fn upload(&mut self, raster: &Raster, region: Region) {
        let extent = raster.extent();
        if extent.is_empty() {
            return;
        }

        let stale = match region {
            Region::Mandelbrot => &self.mandelbrot,
            Region::Julia => &self.julia,
        }
        .as_ref()
        .is_none_or(|half| half.extent != extent);
        if stale {
            let half = self.create_half(extent);
            match region {
                Region::Mandelbrot => self.mandelbrot = Some(half),
                Region::Julia => self.julia = Some(half),
            }
        }

        let half = match region {
            Region::Mandelbrot => self.mandelbrot.as_ref(),
            Region::Julia => self.julia.as_ref(),
        };
        let Some(half) = half else {
            return;
        };

        self.queue.write_texture(
            wgpu::TexelCopyTextureInfo {
                texture: &half.texture,
                mip_level: 0,
                origin: wgpu::Origin3d::ZERO,
                aspect: wgpu::TextureAspect::All,
            },
            &raster.to_rgba8(),
            wgpu::TexelCopyBufferLayout {
                offset: 0,
                bytes_per_row: Some(extent.width as u32 * 4),
                rows_per_image: None,
            },
            wgpu::Extent3d {
                width: extent.width as u32,
                height: extent.height as u32,
                depth_or_array_layers: 1,
            },
        );
    }

    /// Clear the surface and draw the uploaded rasters side by side.
    ///
    /// A lost or outdated surface is reconfigured and the frame dropped.
    pub fn draw(&mut self) -> anyhow::Result<()> {
        let surface_texture = match self.surface.get_current_texture() {
            Ok(texture) => texture,
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                log::warn!("Surface lost, reconfiguring");
                self.surface.configure(&self.device, &self.config);
                return Ok(());
            }
            Err(wgpu::SurfaceError::Timeout) => {
                log::warn!("Surface timed out, dropping frame");
                return Ok(());
            }
            Err(err) => return Err(err).context("Failed to acquire surface texture"),
        };
        let view = surface_texture.texture.create_view(&Default::default());

        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor { label: None });
        let mut rpass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: None,
            color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                view: &view,
                resolve_target: None,
                ops: wgpu::Operations {
                    load: wgpu::LoadOp::Clear(MIDNIGHT_BLUE),
                    store: wgpu::StoreOp::Store,
                },
                depth_slice: None,
            })],
            depth_stencil_attachment: None,
            timestamp_writes: None,
            occlusion_query_set: None,
            multiview_mask: None,
        });
        rpass.set_pipeline(&self.pipeline);

        let surface_width = self.config.width as f32;
        let surface_height = self.config.height as f32;
        for (half, column) in [(&self.mandelbrot, 0.0), (&self.julia, 1.0)] {
            let Some(half) = half else {
                continue;
            };
            let x = column * half.extent.width as f32;
            let w = (half.extent.width as f32).min(surface_width - x);
            let h = (half.extent.height as f32).min(surface_height);
            if w > 0.0 && h > 0.0 {
                rpass.set_viewport(x, 0.0, w, h, 0.0, 1.0);
                rpass.set_bind_group(0, &half.bind_group, &[]);
                rpass.draw(0..3, 0..1);
            }
        }
        drop(rpass);

        self.queue.submit([encoder.finish()]);
        surface_texture.present();
        Ok(())
    }
}

impl Presenter for Pipeline {
    fn present(&mut self, raster: &Raster, region: Region) -> anyhow::Result<()> {
        self.upload(raster, region);
        Ok(())
    }
}
