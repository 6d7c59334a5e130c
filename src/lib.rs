pub mod camera;
pub mod centrifuge;
pub mod error;
pub mod feed;
pub mod initialize;
pub mod input;
pub mod particles;
pub mod render;
pub mod simulation;
pub mod state;

#[derive(Copy, Clone, Debug)]
pub struct SimParams {
  pub max_particles: usize,
  /// Multiplier applied to wall-clock frame time before stepping.
  pub time_scale: f32,
  pub centrifuge_radius: f32,
  /// Angular speed of the centrifuge in rad/s.
  pub angular_speed: f32,
  /// Upper bound of the release impulse magnitude (m/s).
  pub boom_speed: f32,
  /// Exponent (< 1) applied to the uniform sample, biasing impulses toward `boom_speed`.
  pub boom_exponent: f32,
  pub gravity: f32,
  pub friction_coefficient: f32,
  pub particle_size: f32,
  pub initial_life: f32,
}

impl Default for SimParams {
  fn default() -> Self {
    Self {
      max_particles: 5000,
      time_scale: 0.1,
      centrifuge_radius: 5.0,
      angular_speed: 8.0,
      boom_speed: 20.0,
      boom_exponent: 0.3,
      gravity: 9.81,
      friction_coefficient: 0.0,
      particle_size: 0.2,
      initial_life: 1000.0,
    }
  }
}

#[derive(Copy, Clone, Debug)]
pub struct CameraParams {
  pub rotate_speed: f32,
  pub move_speed: f32,
  pub distance_speed: f32,
  pub horizontal_angle: f32,
  pub vertical_angle: f32,
  pub view_distance: f32,
  /// Vertical field of view in degrees.
  pub fovy: f32,
  pub aspect: f32,
  pub znear: f32,
  pub zfar: f32,
}

impl Default for CameraParams {
  fn default() -> Self {
    Self {
      rotate_speed: 0.005,
      move_speed: 0.001,
      distance_speed: 0.3,
      // looking toward -z
      horizontal_angle: 3.14,
      vertical_angle: 0.0,
      view_distance: 30.0,
      fovy: 45.0,
      aspect: 4.0 / 3.0,
      znear: 0.1,
      zfar: 1000.0,
    }
  }
}
