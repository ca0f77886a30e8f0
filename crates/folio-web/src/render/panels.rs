use super::helpers;
use folio_core::constants::{
    AMBIENT_INTENSITY, FILL_LIGHT_COLOR, FILL_LIGHT_POSITION, KEY_LIGHT_COLOR, KEY_LIGHT_POSITION,
    PANEL_BACKING_OPACITY, PANEL_COLOR_HOVER, PANEL_COLOR_IDLE, PANEL_EMISSIVE_HOVER,
    PANEL_EMISSIVE_IDLE, PANEL_EMISSIVE_INTENSITY_HOVER, PANEL_EMISSIVE_INTENSITY_IDLE,
    PANEL_FACE_OFFSET, POINT_LIGHT_INTENSITY,
};
use folio_core::scene::Rgb;
use folio_core::{PanelId, PanelTransform};
use glam::{Mat4, Vec3};
use wgpu;

#[repr(C)]
#[derive(Copy, Clone, bytemuck::Pod, bytemuck::Zeroable)]
pub(crate) struct SceneUniforms {
    pub(crate) view_proj: [[f32; 4]; 4],
    pub(crate) ambient: [f32; 4],
    pub(crate) key_pos: [f32; 4],
    pub(crate) key_color: [f32; 4],
    pub(crate) fill_pos: [f32; 4],
    pub(crate) fill_color: [f32; 4],
}

#[repr(C)]
#[derive(Copy, Clone, Debug, bytemuck::Pod, bytemuck::Zeroable)]
pub(crate) struct PanelInstance {
    pub(crate) model: [[f32; 4]; 4],
    pub(crate) color: [f32; 4],
    pub(crate) emissive: [f32; 4],
}

// faces first, then backings
const INSTANCE_COUNT: usize = 2 * PanelId::ALL.len();
const FACES: std::ops::Range<u32> = 0..4;
const BACKINGS: std::ops::Range<u32> = 4..8;

const INSTANCE_ATTRS: [wgpu::VertexAttribute; 6] = wgpu::vertex_attr_array![
    0 => Float32x4, 1 => Float32x4, 2 => Float32x4, 3 => Float32x4,
    4 => Float32x4, 5 => Float32x4
];

pub(crate) struct PanelsResources {
    face_pipeline: wgpu::RenderPipeline,
    backing_pipeline: wgpu::RenderPipeline,
    uniform_buffer: wgpu::Buffer,
    bind_group: wgpu::BindGroup,
    instances: wgpu::Buffer,
}

fn instance_layout() -> wgpu::VertexBufferLayout<'static> {
    wgpu::VertexBufferLayout {
        array_stride: std::mem::size_of::<PanelInstance>() as u64,
        step_mode: wgpu::VertexStepMode::Instance,
        attributes: &INSTANCE_ATTRS,
    }
}

pub(crate) fn create_panels_resources(
    device: &wgpu::Device,
    color_format: wgpu::TextureFormat,
) -> PanelsResources {
    let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
        label: Some("panels_shader"),
        source: wgpu::ShaderSource::Wgsl(super::PANELS_WGSL.into()),
    });
    let layout = helpers::uniform_layout(device, "panels_bgl");
    let pl = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
        label: Some("panels_pl"),
        bind_group_layouts: &[&layout],
        push_constant_ranges: &[],
    });
    let face_pipeline = helpers::make_instanced_pipeline(
        device,
        "panel_face_pipeline",
        &pl,
        &shader,
        instance_layout(),
        color_format,
        Some(wgpu::BlendState::REPLACE),
        true,
    );
    let backing_pipeline = helpers::make_instanced_pipeline(
        device,
        "panel_backing_pipeline",
        &pl,
        &shader,
        instance_layout(),
        color_format,
        Some(wgpu::BlendState::ALPHA_BLENDING),
        false,
    );
    let uniform_buffer = helpers::uniform_buffer::<SceneUniforms>(device, "panels_uniforms");
    let bind_group = helpers::uniform_bind_group(device, "panels_bg", &layout, &uniform_buffer);
    let instances = device.create_buffer(&wgpu::BufferDescriptor {
        label: Some("panel_instances"),
        size: (INSTANCE_COUNT * std::mem::size_of::<PanelInstance>()) as u64,
        usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
        mapped_at_creation: false,
    });
    PanelsResources {
        face_pipeline,
        backing_pipeline,
        uniform_buffer,
        bind_group,
        instances,
    }
}

fn light(color: u32, intensity: f32) -> [f32; 4] {
    let c = Rgb(color).linear();
    [c[0] * intensity, c[1] * intensity, c[2] * intensity, 1.0]
}

fn position(p: Vec3) -> [f32; 4] {
    [p.x, p.y, p.z, 1.0]
}

pub(crate) fn scene_uniforms(view_proj: Mat4) -> SceneUniforms {
    SceneUniforms {
        view_proj: view_proj.to_cols_array_2d(),
        ambient: light(0xffffff, AMBIENT_INTENSITY),
        key_pos: position(KEY_LIGHT_POSITION),
        key_color: light(KEY_LIGHT_COLOR, POINT_LIGHT_INTENSITY),
        fill_pos: position(FILL_LIGHT_POSITION),
        fill_color: light(FILL_LIGHT_COLOR, POINT_LIGHT_INTENSITY),
    }
}

/// Face and backing instances for this frame; the hovered panel lights up.
pub(crate) fn panel_instances(
    transforms: &[PanelTransform; 4],
    hovered: Option<PanelId>,
) -> [PanelInstance; INSTANCE_COUNT] {
    let mut out = [PanelInstance {
        model: Mat4::IDENTITY.to_cols_array_2d(),
        color: [0.0; 4],
        emissive: [0.0; 4],
    }; INSTANCE_COUNT];
    for (i, t) in transforms.iter().enumerate() {
        let hot = hovered == Some(t.id);
        let (emissive, intensity) = if hot {
            (PANEL_EMISSIVE_HOVER, PANEL_EMISSIVE_INTENSITY_HOVER)
        } else {
            (PANEL_EMISSIVE_IDLE, PANEL_EMISSIVE_INTENSITY_IDLE)
        };
        let e = Rgb(emissive).linear();
        out[i] = PanelInstance {
            model: t.model_matrix(PANEL_FACE_OFFSET).to_cols_array_2d(),
            color: [1.0, 1.0, 1.0, 1.0],
            emissive: [e[0] * intensity, e[1] * intensity, e[2] * intensity, 1.0],
        };
        let b = Rgb(if hot { PANEL_COLOR_HOVER } else { PANEL_COLOR_IDLE }).linear();
        out[transforms.len() + i] = PanelInstance {
            model: t.model_matrix(0.0).to_cols_array_2d(),
            color: [b[0], b[1], b[2], PANEL_BACKING_OPACITY],
            emissive: [0.0; 4],
        };
    }
    out
}

impl PanelsResources {
    pub(crate) fn update(
        &self,
        queue: &wgpu::Queue,
        view_proj: Mat4,
        transforms: &[PanelTransform; 4],
        hovered: Option<PanelId>,
    ) {
        let u = scene_uniforms(view_proj);
        queue.write_buffer(&self.uniform_buffer, 0, bytemuck::bytes_of(&u));
        let inst = panel_instances(transforms, hovered);
        queue.write_buffer(&self.instances, 0, bytemuck::cast_slice(&inst));
    }

    pub(crate) fn draw_faces(&self, rpass: &mut wgpu::RenderPass<'_>) {
        rpass.set_pipeline(&self.face_pipeline);
        rpass.set_bind_group(0, &self.bind_group, &[]);
        rpass.set_vertex_buffer(0, self.instances.slice(..));
        rpass.draw(0..6, FACES);
    }

    pub(crate) fn draw_backings(&self, rpass: &mut wgpu::RenderPass<'_>) {
        rpass.set_pipeline(&self.backing_pipeline);
        rpass.set_bind_group(0, &self.bind_group, &[]);
        rpass.set_vertex_buffer(0, self.instances.slice(..));
        rpass.draw(0..6, BACKINGS);
    }
}
