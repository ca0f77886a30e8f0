use super::helpers;
use glam::{Mat4, Vec3};
use wgpu;
use wgpu::util::DeviceExt;

#[repr(C)]
#[derive(Copy, Clone, bytemuck::Pod, bytemuck::Zeroable)]
pub(crate) struct PointUniforms {
    pub(crate) view: [[f32; 4]; 4],
    pub(crate) proj: [[f32; 4]; 4],
    pub(crate) model: [[f32; 4]; 4],
    pub(crate) color: [f32; 4],
    pub(crate) viewport: [f32; 2],
    pub(crate) size: f32,
    pub(crate) _pad: f32,
}

/// Look of one point cloud.
#[derive(Clone, Copy, Debug)]
pub(crate) struct PointStyle {
    pub(crate) color: [f32; 3],
    pub(crate) opacity: f32,
    pub(crate) size: f32,
}

pub(crate) struct PointCloud {
    instances: wgpu::Buffer,
    count: u32,
    uniform_buffer: wgpu::Buffer,
    bind_group: wgpu::BindGroup,
    style: PointStyle,
}

pub(crate) struct PointsResources {
    pipeline: wgpu::RenderPipeline,
    layout: wgpu::BindGroupLayout,
}

const INSTANCE_ATTRS: [wgpu::VertexAttribute; 1] = wgpu::vertex_attr_array![0 => Float32x3];

pub(crate) fn create_points_resources(
    device: &wgpu::Device,
    color_format: wgpu::TextureFormat,
) -> PointsResources {
    let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
        label: Some("points_shader"),
        source: wgpu::ShaderSource::Wgsl(super::POINTS_WGSL.into()),
    });
    let layout = helpers::uniform_layout(device, "points_bgl");
    let pl = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
        label: Some("points_pl"),
        bind_group_layouts: &[&layout],
        push_constant_ranges: &[],
    });
    let pipeline = helpers::make_instanced_pipeline(
        device,
        "points_pipeline",
        &pl,
        &shader,
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<[f32; 3]>() as u64,
            step_mode: wgpu::VertexStepMode::Instance,
            attributes: &INSTANCE_ATTRS,
        },
        color_format,
        Some(wgpu::BlendState::ALPHA_BLENDING),
        false,
    );
    PointsResources { pipeline, layout }
}

impl PointsResources {
    pub(crate) fn cloud(
        &self,
        device: &wgpu::Device,
        label: &str,
        points: &[Vec3],
        style: PointStyle,
    ) -> PointCloud {
        let data: Vec<[f32; 3]> = points.iter().map(|p| p.to_array()).collect();
        let instances = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some(label),
            contents: bytemuck::cast_slice(&data),
            usage: wgpu::BufferUsages::VERTEX,
        });
        let uniform_buffer = helpers::uniform_buffer::<PointUniforms>(device, label);
        let bind_group = helpers::uniform_bind_group(device, label, &self.layout, &uniform_buffer);
        PointCloud {
            instances,
            count: data.len() as u32,
            uniform_buffer,
            bind_group,
            style,
        }
    }

    pub(crate) fn draw(&self, rpass: &mut wgpu::RenderPass<'_>, cloud: &PointCloud) {
        if cloud.count == 0 {
            return;
        }
        rpass.set_pipeline(&self.pipeline);
        rpass.set_bind_group(0, &cloud.bind_group, &[]);
        rpass.set_vertex_buffer(0, cloud.instances.slice(..));
        rpass.draw(0..6, 0..cloud.count);
    }
}

impl PointCloud {
    pub(crate) fn update(
        &self,
        queue: &wgpu::Queue,
        view: Mat4,
        proj: Mat4,
        model: Mat4,
        viewport: [f32; 2],
    ) {
        let s = self.style;
        let u = PointUniforms {
            view: view.to_cols_array_2d(),
            proj: proj.to_cols_array_2d(),
            model: model.to_cols_array_2d(),
            color: [s.color[0], s.color[1], s.color[2], s.opacity],
            viewport,
            size: s.size,
            _pad: 0.0,
        };
        queue.write_buffer(&self.uniform_buffer, 0, bytemuck::bytes_of(&u));
    }
}
