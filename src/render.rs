use crate::feed::RenderFeed;
use std::borrow::Cow;
use wgpu::{util::DeviceExt, PipelineCompilationOptions};

pub const DEPTH_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Depth32Float;

const AXIS_LENGTH: f32 = 1.0;

/// Billboard corners, drawn as a triangle strip and scaled by particle size.
#[rustfmt::skip]
const QUAD_VERTICES: [f32; 8] = [
  -0.5, -0.5,
   0.5, -0.5,
  -0.5,  0.5,
   0.5,  0.5,
];

/// Position and color of each line endpoint for the x, y and z axes.
#[rustfmt::skip]
const AXES_VERTICES: [f32; 36] = [
  0.0, 0.0, 0.0,          1.0, 0.0, 0.0,
  AXIS_LENGTH, 0.0, 0.0,  1.0, 0.0, 0.0,
  0.0, 0.0, 0.0,          0.0, 1.0, 0.0,
  0.0, AXIS_LENGTH, 0.0,  0.0, 1.0, 0.0,
  0.0, 0.0, 0.0,          0.0, 0.0, 1.0,
  0.0, 0.0, AXIS_LENGTH,  0.0, 0.0, 1.0,
];

pub struct Render {
  particle_pipeline: wgpu::RenderPipeline,
  axes_pipeline: wgpu::RenderPipeline,
  quad_buffer: wgpu::Buffer,
  positions_buffer: wgpu::Buffer,
  colors_buffer: wgpu::Buffer,
  axes_buffer: wgpu::Buffer,
  depth_view: wgpu::TextureView,
  capacity: usize,
}

impl Render {
  #[must_use]
  pub fn init(
    config: &wgpu::SurfaceConfiguration,
    device: &wgpu::Device,
    camera_bind_group_layout: &wgpu::BindGroupLayout,
    capacity: usize,
  ) -> Self {
    let particle_shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
      label: Some("particle shader"),
      source: wgpu::ShaderSource::Wgsl(Cow::Borrowed(include_str!("shaders/particle.wgsl"))),
    });
    let axes_shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
      label: Some("axes shader"),
      source: wgpu::ShaderSource::Wgsl(Cow::Borrowed(include_str!("shaders/axes.wgsl"))),
    });

    let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
      label: Some("render"),
      bind_group_layouts: &[camera_bind_group_layout],
      push_constant_ranges: &[],
    });
    let target_format = config.view_formats[0];

    // ========================================================================
    // particle billboards
    // ========================================================================

    let quad_layout = wgpu::VertexBufferLayout {
      array_stride: 2 * 4,
      step_mode: wgpu::VertexStepMode::Vertex,
      attributes: &wgpu::vertex_attr_array![0 => Float32x2],
    };
    let position_layout = wgpu::VertexBufferLayout {
      array_stride: 4 * 4, // xyz + size
      step_mode: wgpu::VertexStepMode::Instance,
      attributes: &wgpu::vertex_attr_array![1 => Float32x4],
    };
    let color_layout = wgpu::VertexBufferLayout {
      array_stride: 4, // rgba bytes
      step_mode: wgpu::VertexStepMode::Instance,
      attributes: &wgpu::vertex_attr_array![2 => Unorm8x4],
    };
    let particle_pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
      label: Some("Particle Pipeline"),
      layout: Some(&pipeline_layout),
      vertex: wgpu::VertexState {
        module: &particle_shader,
        entry_point: "main_vs",
        compilation_options: PipelineCompilationOptions::default(),
        buffers: &[quad_layout, position_layout, color_layout],
      },
      fragment: Some(wgpu::FragmentState {
        module: &particle_shader,
        entry_point: "main_fs",
        compilation_options: PipelineCompilationOptions::default(),
        targets: &[Some(wgpu::ColorTargetState {
          format: target_format,
          blend: Some(wgpu::BlendState::ALPHA_BLENDING),
          write_mask: wgpu::ColorWrites::ALL,
        })],
      }),
      primitive: wgpu::PrimitiveState {
        topology: wgpu::PrimitiveTopology::TriangleStrip,
        ..Default::default()
      },
      depth_stencil: Some(depth_state()),
      multisample: wgpu::MultisampleState::default(),
      multiview: None,
      cache: None,
    });

    // ========================================================================
    // axis gizmo
    // ========================================================================

    let axes_layout = wgpu::VertexBufferLayout {
      array_stride: 6 * 4, // pos3 + color3
      step_mode: wgpu::VertexStepMode::Vertex,
      attributes: &wgpu::vertex_attr_array![0 => Float32x3, 1 => Float32x3],
    };
    let axes_pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
      label: Some("Axes Pipeline"),
      layout: Some(&pipeline_layout),
      vertex: wgpu::VertexState {
        module: &axes_shader,
        entry_point: "main_vs",
        compilation_options: PipelineCompilationOptions::default(),
        buffers: &[axes_layout],
      },
      fragment: Some(wgpu::FragmentState {
        module: &axes_shader,
        entry_point: "main_fs",
        compilation_options: PipelineCompilationOptions::default(),
        targets: &[Some(target_format.into())],
      }),
      primitive: wgpu::PrimitiveState {
        topology: wgpu::PrimitiveTopology::LineList,
        ..Default::default()
      },
      depth_stencil: Some(depth_state()),
      multisample: wgpu::MultisampleState::default(),
      multiview: None,
      cache: None,
    });

    let quad_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
      label: Some("Quad Buffer"),
      contents: bytemuck::cast_slice(&QUAD_VERTICES),
      usage: wgpu::BufferUsages::VERTEX,
    });
    let axes_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
      label: Some("Axes Buffer"),
      contents: bytemuck::cast_slice(&AXES_VERTICES),
      usage: wgpu::BufferUsages::VERTEX,
    });
    let positions_buffer = device.create_buffer(&wgpu::BufferDescriptor {
      label: Some("Particle Position Buffer"),
      size: (capacity * std::mem::size_of::<[f32; 4]>()) as wgpu::BufferAddress,
      usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
      mapped_at_creation: false,
    });
    let colors_buffer = device.create_buffer(&wgpu::BufferDescriptor {
      label: Some("Particle Color Buffer"),
      size: (capacity * std::mem::size_of::<[u8; 4]>()) as wgpu::BufferAddress,
      usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
      mapped_at_creation: false,
    });

    let depth_view = create_depth_view(device, config);

    Render {
      particle_pipeline,
      axes_pipeline,
      quad_buffer,
      positions_buffer,
      colors_buffer,
      axes_buffer,
      depth_view,
      capacity,
    }
  }

  pub fn render(
    &mut self,
    view: &wgpu::TextureView,
    device: &wgpu::Device,
    queue: &wgpu::Queue,
    camera_bind_group: &wgpu::BindGroup,
    feed: &RenderFeed,
  ) {
    let instances = feed.live_count().min(self.capacity);
    if instances > 0 {
      queue.write_buffer(
        &self.positions_buffer,
        0,
        bytemuck::cast_slice(&feed.positions()[..instances]),
      );
      queue.write_buffer(
        &self.colors_buffer,
        0,
        bytemuck::cast_slice(&feed.colors()[..instances]),
      );
    }

    let color_attachments = [Some(wgpu::RenderPassColorAttachment {
      view,
      resolve_target: None,
      ops: wgpu::Operations {
        load: wgpu::LoadOp::Clear(wgpu::Color::BLACK),
        store: wgpu::StoreOp::Store,
      },
    })];
    let render_pass_descriptor = wgpu::RenderPassDescriptor {
      label: None,
      color_attachments: &color_attachments,
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
    };
    let mut command_encoder =
      device.create_command_encoder(&wgpu::CommandEncoderDescriptor { label: None });
    {
      let mut rpass = command_encoder.begin_render_pass(&render_pass_descriptor);
      rpass.set_bind_group(0, camera_bind_group, &[]);

      // instances arrive sorted back to front for blending
      rpass.set_pipeline(&self.particle_pipeline);
      rpass.set_vertex_buffer(0, self.quad_buffer.slice(..));
      rpass.set_vertex_buffer(1, self.positions_buffer.slice(..));
      rpass.set_vertex_buffer(2, self.colors_buffer.slice(..));
      rpass.draw(0..4, 0..instances as u32);

      rpass.set_pipeline(&self.axes_pipeline);
      rpass.set_vertex_buffer(0, self.axes_buffer.slice(..));
      rpass.draw(0..6, 0..1);
    }
    queue.submit(Some(command_encoder.finish()));
  }
}

fn depth_state() -> wgpu::DepthStencilState {
  wgpu::DepthStencilState {
    format: DEPTH_FORMAT,
    depth_write_enabled: true,
    depth_compare: wgpu::CompareFunction::Less,
    stencil: wgpu::StencilState::default(),
    bias: wgpu::DepthBiasState::default(),
  }
}

fn create_depth_view(device: &wgpu::Device, config: &wgpu::SurfaceConfiguration) -> wgpu::TextureView {
  let texture = device.create_texture(&wgpu::TextureDescriptor {
    label: Some("Depth Texture"),
    size: wgpu::Extent3d {
      width: config.width,
      height: config.height,
      depth_or_array_layers: 1,
    },
    mip_level_count: 1,
    sample_count: 1,
    dimension: wgpu::TextureDimension::D2,
    format: DEPTH_FORMAT,
    usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
    view_formats: &[],
  });
  texture.create_view(&wgpu::TextureViewDescriptor::default())
}
