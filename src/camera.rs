use crate::centrifuge::Centrifuge;
use crate::CameraParams;
use cgmath::{InnerSpace, Matrix4, Point2, Point3, Vector2, Vector3, Zero};
use std::f32::consts::FRAC_PI_2;

#[rustfmt::skip]
pub const OPENGL_TO_WGPU_MATRIX: cgmath::Matrix4<f32> = cgmath::Matrix4::new(
    1.0, 0.0, 0.0, 0.0,
    0.0, 1.0, 0.0, 0.0,
    0.0, 0.0, 0.5, 0.5,
    0.0, 0.0, 0.0, 1.0,
);

/// Orbit camera driven by pointer drags and scrolling, with an optional
/// ride-along mode that pins the view center to the centrifuge rim.
pub struct Camera {
  params: CameraParams,
  pub horizontal_angle: f32,
  pub vertical_angle: f32,
  pub center: Point3<f32>,
  /// Not clamped; scrolling far enough flips the camera through its center.
  pub view_distance: f32,
  pub rotating: bool,
  pub panning: bool,
  pub riding_along: bool,
  last_cursor: Option<Point2<f32>>,
  eye: Point3<f32>,
  up: Vector3<f32>,
  view: Matrix4<f32>,
  projection: Matrix4<f32>,
}

impl Camera {
  pub fn new(params: CameraParams) -> Self {
    let mut camera = Self {
      params,
      horizontal_angle: params.horizontal_angle,
      vertical_angle: params.vertical_angle,
      center: Point3::new(0.0, 0.0, 0.0),
      view_distance: params.view_distance,
      rotating: false,
      panning: false,
      riding_along: false,
      last_cursor: None,
      eye: Point3::new(0.0, 0.0, 0.0),
      up: Vector3::unit_y(),
      view: Matrix4::from_scale(1.0),
      projection: Matrix4::from_scale(1.0),
    };
    let direction = camera.direction();
    camera.up = camera.right().cross(direction);
    camera.rebuild(direction);
    camera
  }

  pub fn set_aspect(&mut self, aspect: f32) {
    self.params.aspect = aspect;
    self.rebuild(self.direction());
  }

  /// Delta between the previously seen cursor and `cursor`, as
  /// `last - current`. The first observed position yields no movement.
  pub fn pointer_delta(&mut self, cursor: Option<Point2<f32>>) -> Vector2<f32> {
    let Some(cursor) = cursor else {
      return Vector2::zero();
    };
    let delta = match self.last_cursor {
      Some(last) => last - cursor,
      None => Vector2::zero(),
    };
    self.last_cursor = Some(cursor);
    delta
  }

  pub fn update(&mut self, pointer_delta: Vector2<f32>, scroll_delta: f32, centrifuge: &Centrifuge) {
    if self.rotating {
      self.horizontal_angle += self.params.rotate_speed * pointer_delta.x;
      self.vertical_angle += self.params.rotate_speed * pointer_delta.y;
    }

    let direction = self.direction();
    let right = self.right();
    let up = right.cross(direction);

    if self.panning {
      let offset = up * -pointer_delta.y + right * pointer_delta.x;
      self.center += offset * (self.params.move_speed * self.view_distance);
    }

    self.view_distance -= self.params.distance_speed * scroll_delta;

    if self.riding_along {
      let rim = centrifuge.rim_position();
      self.center = Point3::new(rim.x, rim.y, rim.z);
      self.up = centrifuge.rim_up();
    } else {
      self.up = up;
    }

    self.rebuild(direction);
  }

  fn direction(&self) -> Vector3<f32> {
    let (h, v) = (self.horizontal_angle, self.vertical_angle);
    Vector3::new(v.cos() * h.sin(), v.sin(), v.cos() * h.cos())
  }

  fn right(&self) -> Vector3<f32> {
    let h = self.horizontal_angle - FRAC_PI_2;
    Vector3::new(h.sin(), 0.0, h.cos())
  }

  fn rebuild(&mut self, direction: Vector3<f32>) {
    self.eye = self.center - direction * self.view_distance;
    self.view = Matrix4::look_at_rh(self.eye, self.center, self.up);
    self.projection = cgmath::perspective(
      cgmath::Deg(self.params.fovy),
      self.params.aspect,
      self.params.znear,
      self.params.zfar,
    );
  }

  pub fn eye(&self) -> Point3<f32> {
    self.eye
  }

  pub fn up(&self) -> Vector3<f32> {
    self.up
  }

  pub fn view_matrix(&self) -> Matrix4<f32> {
    self.view
  }

  pub fn projection_matrix(&self) -> Matrix4<f32> {
    self.projection
  }

  fn build_view_projection_matrix(&self) -> Matrix4<f32> {
    OPENGL_TO_WGPU_MATRIX * self.projection * self.view
  }

  /// World-space right vector of the view, used to orient billboards.
  pub fn billboard_right(&self) -> Vector3<f32> {
    Vector3::new(self.view.x.x, self.view.y.x, self.view.z.x).normalize()
  }

  /// World-space up vector of the view, used to orient billboards.
  pub fn billboard_up(&self) -> Vector3<f32> {
    Vector3::new(self.view.x.y, self.view.y.y, self.view.z.y).normalize()
  }
}

#[repr(C)]
#[derive(Debug, Copy, Clone, bytemuck::Pod, bytemuck::Zeroable)]
pub struct CameraUniform {
  view_proj: [[f32; 4]; 4],
  camera_right: [f32; 4],
  camera_up: [f32; 4],
}

impl CameraUniform {
  pub fn new() -> Self {
    Self {
      view_proj: Matrix4::from_scale(1.0).into(),
      camera_right: [1.0, 0.0, 0.0, 0.0],
      camera_up: [0.0, 1.0, 0.0, 0.0],
    }
  }

  pub fn update_view_proj(&mut self, camera: &Camera) {
    self.view_proj = camera.build_view_projection_matrix().into();
    self.camera_right = camera.billboard_right().extend(0.0).into();
    self.camera_up = camera.billboard_up().extend(0.0).into();
  }
}

impl Default for CameraUniform {
  fn default() -> Self {
    Self::new()
  }
}
