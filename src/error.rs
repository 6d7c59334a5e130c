//! Startup failures. Every variant is fatal; the simulation itself has no
//! error paths.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum InitError {
  #[error("failed to create event loop: {0}")]
  EventLoop(#[from] winit::error::EventLoopError),

  #[error("failed to open window: {0}")]
  Window(#[from] winit::error::OsError),

  #[error("failed to create GPU surface: {0}")]
  Surface(#[from] wgpu::CreateSurfaceError),

  #[error("no compatible GPU adapter found")]
  NoAdapter,

  #[error("failed to create GPU device: {0}")]
  Device(#[from] wgpu::RequestDeviceError),

  #[error("surface is not supported by the adapter")]
  UnsupportedSurface,

  #[error("failed to install Ctrl-C handler: {0}")]
  SignalHandler(#[from] ctrlc::Error),
}
