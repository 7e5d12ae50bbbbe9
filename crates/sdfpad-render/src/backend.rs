//! WGPU implementation of the canvas GPU service

use std::mem::size_of;
use std::sync::Arc;

use sdfpad_engine::{BackendError, GpuBackend, QUAD_VERTEX_COUNT, QuadVertex};
use sdfpad_sdf::PreviewUniforms;

const VERTEX_ATTRIBUTES: [wgpu::VertexAttribute; 2] =
    wgpu::vertex_attr_array![0 => Float32x3, 1 => Float32x2];

/// Vertex buffer layout matching `VertexInput` in the preview shader
pub fn quad_vertex_layout() -> wgpu::VertexBufferLayout<'static> {
    wgpu::VertexBufferLayout {
        array_stride: size_of::<QuadVertex>() as wgpu::BufferAddress,
        step_mode: wgpu::VertexStepMode::Vertex,
        attributes: &VERTEX_ATTRIBUTES,
    }
}

/// Shader module and the render pipeline built from it
pub struct PreviewPipeline {
    _module: wgpu::ShaderModule,
    pipeline: wgpu::RenderPipeline,
}

/// Canvas backend on a wgpu device.
///
/// The uniform buffer and its bind group layout are fixed for the lifetime of
/// the backend; only the shader and pipeline are rebuilt.
pub struct WgpuBackend {
    device: Arc<wgpu::Device>,
    queue: Arc<wgpu::Queue>,
    surface_format: wgpu::TextureFormat,
    uniform_buffer: wgpu::Buffer,
    uniform_bind_group: wgpu::BindGroup,
    pipeline_layout: wgpu::PipelineLayout,
}

impl WgpuBackend {
    pub fn new(
        device: Arc<wgpu::Device>,
        queue: Arc<wgpu::Queue>,
        surface_format: wgpu::TextureFormat,
    ) -> Self {
        let uniform_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("Preview Uniform Buffer"),
            size: size_of::<PreviewUniforms>() as wgpu::BufferAddress,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        let bind_group_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("Preview Bind Group Layout"),
            entries: &[wgpu::BindGroupLayoutEntry {
                binding: 0,
                visibility: wgpu::ShaderStages::FRAGMENT,
                ty: wgpu::BindingType::Buffer {
                    ty: wgpu::BufferBindingType::Uniform,
                    has_dynamic_offset: false,
                    min_binding_size: wgpu::BufferSize::new(
                        size_of::<PreviewUniforms>() as wgpu::BufferAddress
                    ),
                },
                count: None,
            }],
        });

        let uniform_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("Preview Bind Group"),
            layout: &bind_group_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: uniform_buffer.as_entire_binding(),
            }],
        });

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("Preview Pipeline Layout"),
            bind_group_layouts: &[&bind_group_layout],
            push_constant_ranges: &[],
        });

        Self {
            device,
            queue,
            surface_format,
            uniform_buffer,
            uniform_bind_group,
            pipeline_layout,
        }
    }

    pub fn surface_format(&self) -> wgpu::TextureFormat {
        self.surface_format
    }

    fn build_pipeline(&self, source: &str) -> PreviewPipeline {
        let module = self
            .device
            .create_shader_module(wgpu::ShaderModuleDescriptor {
                label: Some("Preview Shader"),
                source: wgpu::ShaderSource::Wgsl(source.into()),
            });

        let pipeline = self
            .device
            .create_render_pipeline(&wgpu::RenderPipelineDescriptor {
                label: Some("Preview Pipeline"),
                layout: Some(&self.pipeline_layout),
                vertex: wgpu::VertexState {
                    module: &module,
                    entry_point: Some("vs_main"),
                    buffers: &[quad_vertex_layout()],
                    compilation_options: Default::default(),
                },
                fragment: Some(wgpu::FragmentState {
                    module: &module,
                    entry_point: Some("fs_main"),
                    targets: &[Some(wgpu::ColorTargetState {
                        format: self.surface_format,
                        blend: Some(wgpu::BlendState::ALPHA_BLENDING),
                        write_mask: wgpu::ColorWrites::ALL,
                    })],
                    compilation_options: Default::default(),
                }),
                primitive: wgpu::PrimitiveState {
                    topology: wgpu::PrimitiveTopology::TriangleList,
                    strip_index_format: None,
                    front_face: wgpu::FrontFace::Ccw,
                    cull_mode: None,
                    polygon_mode: wgpu::PolygonMode::Fill,
                    unclipped_depth: false,
                    conservative: false,
                },
                depth_stencil: None,
                multisample: wgpu::MultisampleState {
                    count: 1,
                    mask: !0,
                    alpha_to_coverage_enabled: false,
                },
                multiview: None,
                cache: None,
            });

        PreviewPipeline {
            _module: module,
            pipeline,
        }
    }
}

impl GpuBackend for WgpuBackend {
    type VertexBuffer = wgpu::Buffer;
    type Pipeline = PreviewPipeline;
    type Pass<'pass> = wgpu::RenderPass<'pass>;

    fn create_vertex_buffer(&mut self) -> wgpu::Buffer {
        self.device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("Canvas Vertex Buffer"),
            size: (QUAD_VERTEX_COUNT * size_of::<QuadVertex>()) as wgpu::BufferAddress,
            usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        })
    }

    fn write_vertices(
        &mut self,
        buffer: &wgpu::Buffer,
        vertices: &[QuadVertex; QUAD_VERTEX_COUNT],
    ) {
        self.queue
            .write_buffer(buffer, 0, bytemuck::cast_slice(vertices.as_slice()));
    }

    fn create_pipeline(&mut self, source: &str) -> Result<PreviewPipeline, BackendError> {
        // Validation errors would otherwise reach the uncaptured error handler
        // and abort the process.
        self.device.push_error_scope(wgpu::ErrorFilter::Validation);
        let pipeline = self.build_pipeline(source);
        match pollster::block_on(self.device.pop_error_scope()) {
            Some(error) => Err(BackendError::Pipeline(error.to_string())),
            None => Ok(pipeline),
        }
    }

    fn destroy_pipeline(&mut self, pipeline: PreviewPipeline) {
        drop(pipeline);
    }

    fn destroy_vertex_buffer(&mut self, buffer: wgpu::Buffer) {
        buffer.destroy();
    }

    fn draw(
        &self,
        pass: &mut Self::Pass<'_>,
        pipeline: &PreviewPipeline,
        vertices: &wgpu::Buffer,
        uniforms: &PreviewUniforms,
    ) {
        self.queue
            .write_buffer(&self.uniform_buffer, 0, bytemuck::bytes_of(uniforms));

        pass.set_pipeline(&pipeline.pipeline);
        pass.set_bind_group(0, &self.uniform_bind_group, &[]);
        pass.set_vertex_buffer(0, vertices.slice(..));
        pass.draw(0..QUAD_VERTEX_COUNT as u32, 0..1);
    }
}
