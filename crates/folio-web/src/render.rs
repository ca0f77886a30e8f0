mod helpers;
mod panels;
mod points;

use folio_core::constants::{
    ACCENT_COLOR, BACKGROUND_COLOR, GLOBE_POINT_SIZE, STAR_OPACITY, STAR_SEED, STAR_SIZE,
};
use folio_core::scene::{default_starfield, globe_points, BackgroundMotion, Rgb};
use folio_core::{Camera, PanelId, PanelTransform};
use panels::PanelsResources;
use points::{PointCloud, PointStyle, PointsResources};
use web_sys as web;
use wgpu;

pub static POINTS_WGSL: &str = include_str!("../shaders/points.wgsl");
pub static PANELS_WGSL: &str = include_str!("../shaders/panels.wgsl");

/// Everything the renderer needs from one frame of app state.
pub struct SceneFrame<'s> {
    pub camera: &'s Camera,
    pub panels: &'s [PanelTransform; 4],
    pub hovered: Option<PanelId>,
    pub motion: &'s BackgroundMotion,
}

pub struct GpuState {
    surface: wgpu::Surface<'static>,
    device: wgpu::Device,
    queue: wgpu::Queue,
    config: wgpu::SurfaceConfiguration,
    depth_view: wgpu::TextureView,
    _depth_tex: wgpu::Texture,

    points: PointsResources,
    stars: PointCloud,
    globe: PointCloud,
    panels: PanelsResources,

    width: u32,
    height: u32,
    clear_color: wgpu::Color,
}

impl GpuState {
    pub async fn new(canvas: &web::HtmlCanvasElement) -> anyhow::Result<Self> {
        let width = canvas.width().max(1);
        let height = canvas.height().max(1);

        let instance = wgpu::Instance::default();
        let surface = instance.create_surface(wgpu::SurfaceTarget::Canvas(canvas.clone()))?;
        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::HighPerformance,
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .ok_or_else(|| anyhow::anyhow!("No WebGPU/WebGL adapter"))?;
        let (device, queue) = adapter
            .request_device(
                &wgpu::DeviceDescriptor {
                    required_features: wgpu::Features::empty(),
                    // WebGL2 fallback cannot meet the default limits
                    required_limits: wgpu::Limits::downlevel_webgl2_defaults()
                        .using_resolution(adapter.limits()),
                    memory_hints: wgpu::MemoryHints::Performance,
                    label: None,
                },
                None,
            )
            .await
            .map_err(|e| anyhow::anyhow!(format!("request_device error: {:?}", e)))?;
        let caps = surface.get_capabilities(&adapter);
        let format = caps
            .formats
            .iter()
            .copied()
            .find(|f| {
                matches!(
                    f,
                    wgpu::TextureFormat::Bgra8UnormSrgb | wgpu::TextureFormat::Rgba8UnormSrgb
                )
            })
            .or_else(|| caps.formats.first().copied())
            .ok_or_else(|| anyhow::anyhow!("surface reports no formats"))?;
        let alpha_mode = caps
            .alpha_modes
            .first()
            .copied()
            .unwrap_or(wgpu::CompositeAlphaMode::Auto);
        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format,
            width,
            height,
            present_mode: wgpu::PresentMode::Fifo,
            alpha_mode,
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        surface.configure(&device, &config);
        log::info!("[gpu] surface {}x{} {:?}", width, height, format);

        let (depth_tex, depth_view) = helpers::create_depth_texture(&device, width, height);

        let points = points::create_points_resources(&device, format);
        let accent = Rgb(ACCENT_COLOR).linear();
        let stars = points.cloud(
            &device,
            "stars",
            &default_starfield(STAR_SEED),
            PointStyle {
                color: accent,
                opacity: STAR_OPACITY,
                size: STAR_SIZE,
            },
        );
        let globe = points.cloud(
            &device,
            "globe",
            &globe_points(),
            PointStyle {
                color: accent,
                opacity: 1.0,
                size: GLOBE_POINT_SIZE,
            },
        );
        let panels = panels::create_panels_resources(&device, format);

        let bg = Rgb(BACKGROUND_COLOR).linear();
        Ok(Self {
            surface,
            device,
            queue,
            config,
            depth_view,
            _depth_tex: depth_tex,
            points,
            stars,
            globe,
            panels,
            width,
            height,
            clear_color: wgpu::Color {
                r: bg[0] as f64,
                g: bg[1] as f64,
                b: bg[2] as f64,
                a: 1.0,
            },
        })
    }

    pub fn resize_if_needed(&mut self, width: u32, height: u32) {
        if width == 0 || height == 0 {
            return;
        }
        if width != self.width || height != self.height {
            self.width = width;
            self.height = height;
            self.config.width = width;
            self.config.height = height;
            self.surface.configure(&self.device, &self.config);
            let (tex, view) = helpers::create_depth_texture(&self.device, width, height);
            self._depth_tex = tex;
            self.depth_view = view;
        }
    }

    pub fn render(&mut self, scene: &SceneFrame<'_>) -> Result<(), wgpu::SurfaceError> {
        let view_m = scene.camera.view_matrix();
        let proj_m = scene.camera.projection_matrix();
        let viewport = [self.width as f32, self.height as f32];
        self.stars
            .update(&self.queue, view_m, proj_m, scene.motion.star_model(), viewport);
        self.globe
            .update(&self.queue, view_m, proj_m, scene.motion.globe_model(), viewport);
        self.panels
            .update(&self.queue, proj_m * view_m, scene.panels, scene.hovered);

        let frame = self.surface.get_current_texture()?;
        let view = frame
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());
        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("encoder"),
            });
        {
            let mut rpass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("scene_pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(self.clear_color),
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                    view: &self.depth_view,
                    depth_ops: Some(wgpu::Operations {
                        load: wgpu::LoadOp::Clear(1.0),
                        store: wgpu::StoreOp::Store,
                    }),
                    stencil_ops: None,
                }),
                timestamp_writes: None,
                occlusion_query_set: None,
            });
            // opaque faces, then translucent layers without depth writes
            self.panels.draw_faces(&mut rpass);
            self.points.draw(&mut rpass, &self.globe);
            self.points.draw(&mut rpass, &self.stars);
            self.panels.draw_backings(&mut rpass);
        }
        self.queue.submit(Some(encoder.finish()));
        frame.present();
        Ok(())
    }
}
