use crate::camera::CameraUniform;
use crate::error::InitError;
use crate::feed::RenderFeed;
use crate::input::{InputBatch, InputEvent};
use crate::render::*;
use crate::simulation::Simulation;
use crate::{CameraParams, SimParams};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Instant;
use wgpu::util::DeviceExt;
use winit::event::ElementState;
use winit::keyboard::*;
use winit::{
  dpi::PhysicalSize,
  event::{Event, KeyEvent, StartCause, WindowEvent},
  event_loop::{EventLoop, EventLoopWindowTarget},
  window::Window,
};

const WINDOW_WIDTH: u32 = 1024;
const WINDOW_HEIGHT: u32 = 768;
const LOG_INTERVAL: u64 = 60;

pub struct RunOptions {
  pub sim: SimParams,
  pub camera: CameraParams,
  pub seed: Option<u64>,
  pub headless: Option<HeadlessOptions>,
}

#[derive(Copy, Clone, Debug)]
pub struct HeadlessOptions {
  pub frames: u64,
  /// Frame on which the start trigger is pressed.
  pub release_frame: u64,
  /// Simulated wall-clock seconds per frame, before time scaling.
  pub frame_time: f32,
}

struct EventLoopWrapper {
  event_loop: EventLoop<()>,
  window: Arc<Window>,
}

impl EventLoopWrapper {
  pub fn new(title: &str) -> Result<Self, InitError> {
    let event_loop = EventLoop::new()?;
    let mut builder = winit::window::WindowBuilder::new();
    builder = builder
      .with_title(title)
      .with_inner_size(PhysicalSize::new(WINDOW_WIDTH, WINDOW_HEIGHT))
      .with_resizable(false);
    let window = Arc::new(builder.build(&event_loop)?);

    Ok(Self { event_loop, window })
  }
}

struct SurfaceWrapper {
  surface: wgpu::Surface<'static>,
  config: wgpu::SurfaceConfiguration,
}

impl SurfaceWrapper {
  fn configure(
    surface: wgpu::Surface<'static>,
    adapter: &wgpu::Adapter,
    device: &wgpu::Device,
    size: PhysicalSize<u32>,
  ) -> Result<Self, InitError> {
    let width = size.width.max(1);
    let height = size.height.max(1);
    let mut config = surface
      .get_default_config(adapter, width, height)
      .ok_or(InitError::UnsupportedSurface)?;
    let view_format = config.format.add_srgb_suffix();
    config.view_formats.push(view_format);
    surface.configure(device, &config);
    Ok(Self { surface, config })
  }

  fn acquire(&mut self, device: &wgpu::Device) -> Option<wgpu::SurfaceTexture> {
    match self.surface.get_current_texture() {
      Ok(frame) => Some(frame),
      Err(wgpu::SurfaceError::Timeout) => {
        log::warn!("surface timed out, skipping frame");
        None
      }
      Err(
        wgpu::SurfaceError::Outdated | wgpu::SurfaceError::Lost | wgpu::SurfaceError::OutOfMemory,
      ) => {
        self.surface.configure(device, &self.config);
        match self.surface.get_current_texture() {
          Ok(frame) => Some(frame),
          Err(err) => {
            log::warn!("failed to reacquire surface: {err}");
            None
          }
        }
      }
    }
  }

  fn config(&self) -> &wgpu::SurfaceConfiguration {
    &self.config
  }
}

struct State {
  device: wgpu::Device,
  queue: wgpu::Queue,
  surface: SurfaceWrapper,
  camera_uniform: CameraUniform,
  camera_buffer: wgpu::Buffer,
  camera_bind_group: wgpu::BindGroup,
  camera_bind_group_layout: wgpu::BindGroupLayout,
}

impl State {
  async fn init(window: Arc<Window>) -> Result<Self, InitError> {
    let size = window.inner_size();
    let instance = wgpu::Instance::new(wgpu::InstanceDescriptor {
      #[cfg(not(target_arch = "wasm32"))]
      backends: wgpu::Backends::PRIMARY,
      ..Default::default()
    });
    let surface = instance.create_surface(window)?;

    let adapter = instance
      .request_adapter(&wgpu::RequestAdapterOptions {
        power_preference: wgpu::PowerPreference::default(),
        compatible_surface: Some(&surface),
        force_fallback_adapter: false,
      })
      .await
      .ok_or(InitError::NoAdapter)?;
    log::info!("using adapter: {}", adapter.get_info().name);

    let (device, queue) = adapter
      .request_device(
        &wgpu::DeviceDescriptor {
          label: None,
          required_features: wgpu::Features::empty(),
          required_limits: wgpu::Limits::default(),
          memory_hints: Default::default(),
        },
        None,
      )
      .await?;
    let surface = SurfaceWrapper::configure(surface, &adapter, &device, size)?;

    let camera_uniform = CameraUniform::new();
    let camera_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
      label: Some("Camera Buffer"),
      contents: bytemuck::cast_slice(&[camera_uniform]),
      usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
    });
    let camera_bind_group_layout =
      device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
        entries: &[wgpu::BindGroupLayoutEntry {
          binding: 0,
          visibility: wgpu::ShaderStages::VERTEX,
          ty: wgpu::BindingType::Buffer {
            ty: wgpu::BufferBindingType::Uniform,
            has_dynamic_offset: false,
            min_binding_size: None,
          },
          count: None,
        }],
        label: Some("camera_bind_group_layout"),
      });
    let camera_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
      layout: &camera_bind_group_layout,
      entries: &[wgpu::BindGroupEntry {
        binding: 0,
        resource: camera_buffer.as_entire_binding(),
      }],
      label: Some("camera_bind_group"),
    });

    Ok(Self {
      device,
      queue,
      surface,
      camera_uniform,
      camera_buffer,
      camera_bind_group,
      camera_bind_group_layout,
    })
  }

  fn update(&mut self, sim: &Simulation) {
    self.camera_uniform.update_view_proj(sim.camera());
    self.queue.write_buffer(
      &self.camera_buffer,
      0,
      bytemuck::cast_slice(&[self.camera_uniform]),
    );
  }
}

fn install_quit_flag() -> Result<Arc<AtomicBool>, InitError> {
  let quit = Arc::new(AtomicBool::new(false));
  let flag = quit.clone();
  ctrlc::set_handler(move || flag.store(true, Ordering::SeqCst))?;
  Ok(quit)
}

async fn start(mut sim: Simulation, quit: Arc<AtomicBool>) -> Result<(), InitError> {
  let EventLoopWrapper { event_loop, window } = EventLoopWrapper::new("Centrifuge")?;
  let mut context = State::init(window.clone()).await?;
  let size = window.inner_size();
  sim
    .camera_mut()
    .set_aspect(size.width.max(1) as f32 / size.height.max(1) as f32);

  let mut renderer = Render::init(
    context.surface.config(),
    &context.device,
    &context.camera_bind_group_layout,
    sim.pool().capacity(),
  );
  let mut batch = InputBatch::new();
  let mut feed = RenderFeed::with_capacity(sim.pool().capacity());
  let mut last_frame = Instant::now();
  let mut frame_num: u64 = 0;

  event_loop.run(move |event, target: &EventLoopWindowTarget<()>| match event {
    Event::NewEvents(StartCause::Init) => {
      last_frame = Instant::now();
      window.request_redraw();
    }
    Event::AboutToWait => {
      if quit.load(Ordering::SeqCst) {
        log::info!("interrupted, shutting down");
        target.exit();
      }
    }
    Event::WindowEvent { event, window_id } if window_id == window.id() => {
      if !batch.process_events(&event) {
        match event {
          WindowEvent::CloseRequested
          | WindowEvent::KeyboardInput {
            event:
              KeyEvent {
                state: ElementState::Pressed,
                physical_key: PhysicalKey::Code(KeyCode::Escape),
                ..
              },
            ..
          } => target.exit(),
          WindowEvent::RedrawRequested => {
            window.request_redraw();
            let now = Instant::now();
            let wall_dt = now.duration_since(last_frame).as_secs_f32();
            last_frame = now;

            sim.frame(&batch.take(), wall_dt);
            sim.fill_feed(&mut feed);
            context.update(&sim);

            frame_num += 1;
            if frame_num % LOG_INTERVAL == 0 {
              log::debug!("frame {frame_num}: {} live particles", feed.live_count());
            }

            let Some(frame) = context.surface.acquire(&context.device) else {
              return;
            };
            let view = frame.texture.create_view(&wgpu::TextureViewDescriptor {
              format: Some(context.surface.config().view_formats[0]),
              ..wgpu::TextureViewDescriptor::default()
            });
            renderer.render(
              &view,
              &context.device,
              &context.queue,
              &context.camera_bind_group,
              &feed,
            );
            frame.present();
          }
          _ => {}
        }
      }
    }
    _ => {}
  })?;
  Ok(())
}

/// Runs the frame loop without a window, pressing the start trigger on
/// `release_frame`.
pub fn run_headless(sim: &mut Simulation, options: HeadlessOptions, quit: &AtomicBool) {
  let mut feed = RenderFeed::with_capacity(sim.pool().capacity());
  for frame in 0..options.frames {
    if quit.load(Ordering::SeqCst) {
      log::info!("interrupted at frame {frame}");
      break;
    }
    let mut batch = InputBatch::new();
    if frame == options.release_frame {
      batch.push(InputEvent::ToggleStart);
    }
    sim.frame(&batch, options.frame_time);
    sim.fill_feed(&mut feed);
    if frame % LOG_INTERVAL == 0 {
      log::debug!("frame {frame}: {} live particles", feed.live_count());
    }
  }
}

pub fn run(options: RunOptions) -> Result<(), InitError> {
  let quit = install_quit_flag()?;
  let mut sim = Simulation::new(options.sim, options.camera, options.seed);

  match options.headless {
    Some(headless) => {
      run_headless(&mut sim, headless, &quit);
      let summary = sim.summary();
      log::info!("headless run finished");
      println!("{summary}");
      Ok(())
    }
    None => pollster::block_on(start(sim, quit)),
  }
}
