use cgmath::Vector3;

/// The spinning drum. Only its angle evolves; radius and speed are fixed.
#[derive(Copy, Clone, Debug)]
pub struct Centrifuge {
  pub angle: f32,
  pub radius: f32,
  pub angular_speed: f32,
}

impl Centrifuge {
  pub fn new(radius: f32, angular_speed: f32) -> Self {
    Self {
      angle: 0.0,
      radius,
      angular_speed,
    }
  }

  pub fn advance(&mut self, dt: f32) {
    self.angle += self.angular_speed * dt;
  }

  /// Point on the rim at the current angle.
  pub fn rim_position(&self) -> Vector3<f32> {
    Vector3::new(
      self.radius * self.angle.sin(),
      self.radius * self.angle.cos(),
      0.0,
    )
  }

  /// Velocity of a point rigidly attached to the rim.
  pub fn rim_velocity(&self) -> Vector3<f32> {
    Vector3::new(self.angle.cos(), -self.angle.sin(), 0.0) * (self.angular_speed * self.radius)
  }

  /// Up vector for a viewer standing on the rim, pointing toward the axis.
  pub fn rim_up(&self) -> Vector3<f32> {
    Vector3::new(-self.angle.sin(), -self.angle.cos(), 0.0)
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use cgmath::InnerSpace;

  #[test]
  fn advance_accumulates_angle() {
    let mut c = Centrifuge::new(5.0, 8.0);
    c.advance(0.1);
    c.advance(0.1);
    assert!((c.angle - 1.6).abs() < 1e-5);
  }

  #[test]
  fn rim_velocity_is_tangent() {
    let mut c = Centrifuge::new(5.0, 8.0);
    c.advance(0.37);
    let p = c.rim_position();
    let v = c.rim_velocity();
    assert!(p.dot(v).abs() < 1e-3);
    assert!((v.magnitude() - 40.0).abs() < 1e-3);
    assert!((p.magnitude() - 5.0).abs() < 1e-4);
  }
}
