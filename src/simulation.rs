//! Frame stepper for the centrifuge.
//!
//! All mutable state lives in [`Simulation`]: the particle pool, the
//! centrifuge, the camera and the RNG. A frame applies the latched input,
//! moves the camera, advances physics and re-sorts the pool.
//!
//! Particles start in the orbiting regime, where position and velocity are
//! recomputed from the centrifuge angle every step. The first step that sees
//! the start flag set gives every live particle one random kick and switches
//! the whole pool to free flight under gravity and drag for good.

use crate::{
  camera::Camera,
  centrifuge::Centrifuge,
  feed::RenderFeed,
  initialize::{boom_velocity, create_ring},
  input::{InputBatch, InputEvent},
  particles::{ParticlePool, DEAD_DISTANCE},
  CameraParams, SimParams,
};
use cgmath::{InnerSpace, Vector3};
use rand::{rngs::SmallRng, SeedableRng};
use std::fmt;

pub struct Simulation {
  params: SimParams,
  pool: ParticlePool,
  centrifuge: Centrifuge,
  camera: Camera,
  rng: SmallRng,
  /// Flipped by every trigger press.
  start: bool,
  /// Latched once the release impulse has been applied.
  released: bool,
}

impl Simulation {
  pub fn new(params: SimParams, camera_params: CameraParams, seed: Option<u64>) -> Self {
    let mut rng = match seed {
      Some(seed) => SmallRng::seed_from_u64(seed),
      None => SmallRng::from_entropy(),
    };
    let centrifuge = Centrifuge::new(params.centrifuge_radius, params.angular_speed);
    let pool = create_ring(&mut rng, &params, &centrifuge);
    log::info!(
      "centrifuge: {} particles, radius {}, {} rad/s",
      pool.capacity(),
      centrifuge.radius,
      centrifuge.angular_speed
    );
    Self {
      params,
      pool,
      centrifuge,
      camera: Camera::new(camera_params),
      rng,
      start: false,
      released: false,
    }
  }

  pub fn pool(&self) -> &ParticlePool {
    &self.pool
  }

  pub fn centrifuge(&self) -> &Centrifuge {
    &self.centrifuge
  }

  pub fn camera(&self) -> &Camera {
    &self.camera
  }

  pub fn camera_mut(&mut self) -> &mut Camera {
    &mut self.camera
  }

  pub fn is_released(&self) -> bool {
    self.released
  }

  /// One full frame: input, camera, physics for `wall_dt * time_scale`, sort.
  pub fn frame(&mut self, batch: &InputBatch, wall_dt: f32) {
    self.apply_input(batch);
    self.step(wall_dt * self.params.time_scale);
    self.sort();
  }

  pub fn apply_input(&mut self, batch: &InputBatch) {
    let mut scroll = 0.0;
    for event in batch.events() {
      match *event {
        InputEvent::Rotate(on) => self.camera.rotating = on,
        InputEvent::Pan(on) => self.camera.panning = on,
        InputEvent::Scroll(amount) => scroll += amount,
        InputEvent::ToggleStart => self.start = !self.start,
        InputEvent::ToggleRideAlong => {
          self.camera.riding_along = !self.camera.riding_along;
          log::info!("ride-along view: {}", self.camera.riding_along);
        }
      }
    }
    let delta = self.camera.pointer_delta(batch.cursor());
    self.camera.update(delta, scroll, &self.centrifuge);
  }

  pub fn step(&mut self, dt: f32) {
    self.centrifuge.advance(dt);

    if self.start && !self.released {
      self.release();
    }

    let eye = self.camera.eye();
    let marker = self.pool.marker_index();
    let rim_pos = self.centrifuge.rim_position();
    let rim_vel = self.centrifuge.rim_velocity();
    let released = self.released;
    let gravity = Vector3::new(0.0, 0.0, -self.params.gravity);
    let k = self.params.friction_coefficient;

    for (i, p) in self.pool.iter_mut().enumerate() {
      if !p.is_alive() {
        continue;
      }
      p.life -= dt;
      if !p.is_alive() {
        p.camera_distance = DEAD_DISTANCE;
        continue;
      }

      if i != marker {
        if released {
          let start_vel = p.vel;
          // drag is measured against the wall the particle was flung from
          let relative_speed = (start_vel - rim_vel).magnitude();
          // negative on purpose: a positive term here would accelerate the particle
          let friction = start_vel * (-k * relative_speed / p.size);
          let end_vel = start_vel + (gravity + friction) * dt;
          p.pos += (start_vel + end_vel) * (0.5 * dt);
          p.vel = end_vel;
        } else {
          p.vel = rim_vel;
          p.pos = rim_pos;
        }
      }

      p.update_camera_distance(eye);
    }
  }

  pub fn sort(&mut self) {
    self.pool.sort_by_depth();
  }

  fn release(&mut self) {
    let marker = self.pool.marker_index();
    let mut kicked = 0;
    for (i, p) in self.pool.iter_mut().enumerate() {
      if i == marker || !p.is_alive() {
        continue;
      }
      p.vel += boom_velocity(&mut self.rng, self.params.boom_speed, self.params.boom_exponent);
      kicked += 1;
    }
    self.released = true;
    log::info!(
      "released {kicked} particles at angle {:.3} rad",
      self.centrifuge.angle
    );
  }

  pub fn fill_feed(&self, feed: &mut RenderFeed) {
    feed.fill(&self.pool);
  }

  pub fn summary(&self) -> Summary {
    let marker = self.pool.marker_index();
    let live: Vec<_> = self
      .pool
      .iter()
      .enumerate()
      .filter(|(i, p)| *i != marker && p.is_alive())
      .map(|(_, p)| p.pos)
      .collect();
    let n = live.len().max(1) as f32;
    Summary {
      live: self.pool.live_count(),
      angle: self.centrifuge.angle,
      released: self.released,
      mean_height: live.iter().map(|p| p.z).sum::<f32>() / n,
      mean_axis_distance: live.iter().map(|p| p.x.hypot(p.y)).sum::<f32>() / n,
    }
  }
}

#[derive(Copy, Clone, Debug)]
pub struct Summary {
  pub live: usize,
  pub angle: f32,
  pub released: bool,
  pub mean_height: f32,
  pub mean_axis_distance: f32,
}

impl fmt::Display for Summary {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(
      f,
      "live: {}, angle: {:.3} rad, released: {}, mean height: {:.3}, mean axis distance: {:.3}",
      self.live, self.angle, self.released, self.mean_height, self.mean_axis_distance
    )
  }
}
