//! Device and surface initialization

use std::sync::Arc;

use sdfpad_engine::BackendError;

/// Device, queue and surface format shared by the canvas and the UI renderer
#[derive(Debug, Clone)]
pub struct GpuContext {
    pub device: Arc<wgpu::Device>,
    pub queue: Arc<wgpu::Queue>,
    pub surface_format: wgpu::TextureFormat,
}

/// Initialize WGPU for windowed rendering
pub async fn init_with_surface(
    instance: &wgpu::Instance,
    surface: &wgpu::Surface<'_>,
) -> Result<GpuContext, BackendError> {
    let adapter = instance
        .request_adapter(&wgpu::RequestAdapterOptions {
            power_preference: wgpu::PowerPreference::default(),
            compatible_surface: Some(surface),
            force_fallback_adapter: false,
        })
        .await
        .map_err(|e| BackendError::Init(format!("No suitable adapter: {}", e)))?;

    let info = adapter.get_info();
    tracing::info!("Using {} ({:?})", info.name, info.backend);

    let (device, queue) = adapter
        .request_device(&wgpu::DeviceDescriptor {
            label: Some("SDFPad Device"),
            required_features: wgpu::Features::empty(),
            required_limits: wgpu::Limits::default(),
            memory_hints: Default::default(),
            trace: wgpu::Trace::Off,
        })
        .await
        .map_err(|e| BackendError::Init(format!("Failed to create device: {}", e)))?;

    let surface_caps = surface.get_capabilities(&adapter);
    let surface_format = surface_caps
        .formats
        .iter()
        .copied()
        .find(|f| f.is_srgb())
        .or_else(|| surface_caps.formats.first().copied())
        .ok_or_else(|| BackendError::Init("Surface reports no formats".to_string()))?;

    Ok(GpuContext {
        device: Arc::new(device),
        queue: Arc::new(queue),
        surface_format,
    })
}
