use cgmath::{InnerSpace, Point3, Vector3};
use rand::Rng;

/// Sort key assigned to dead particles; sorts after every live distance.
pub const DEAD_DISTANCE: f32 = -1.0;

#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Particle {
  pub pos: Vector3<f32>,
  pub vel: Vector3<f32>,
  pub color: [u8; 4],
  pub size: f32,
  /// Live while positive. Never refilled once it runs out.
  pub life: f32,
  /// Squared distance to the camera eye, or [`DEAD_DISTANCE`].
  pub camera_distance: f32,
}

impl Particle {
  pub fn is_alive(&self) -> bool {
    self.life > 0.0
  }

  pub fn update_camera_distance(&mut self, eye: Point3<f32>) {
    self.camera_distance = (self.pos - Vector3::new(eye.x, eye.y, eye.z)).magnitude2();
  }
}

impl Default for Particle {
  fn default() -> Self {
    Self {
      pos: Vector3::new(0.0, 0.0, 0.0),
      vel: Vector3::new(0.0, 0.0, 0.0),
      color: [0; 4],
      size: 0.0,
      life: 0.0,
      camera_distance: DEAD_DISTANCE,
    }
  }
}

/// Fixed-capacity particle store. The last slot is the marker at the origin.
pub struct ParticlePool {
  particles: Vec<Particle>,
  /// Back-to-front permutation of `particles`, rebuilt by [`ParticlePool::sort_by_depth`].
  order: Vec<usize>,
}

impl ParticlePool {
  /// Allocates `capacity` dead particles. A capacity of zero is bumped to one
  /// so the marker slot always exists.
  pub fn new(capacity: usize) -> Self {
    let capacity = capacity.max(1);
    Self {
      particles: vec![Particle::default(); capacity],
      order: (0..capacity).collect(),
    }
  }

  pub fn capacity(&self) -> usize {
    self.particles.len()
  }

  pub fn marker_index(&self) -> usize {
    self.particles.len() - 1
  }

  pub fn is_marker(&self, index: usize) -> bool {
    index == self.marker_index()
  }

  /// Puts every ring particle at the rim point for `angle`, all in the same
  /// spot, with random colors. The marker goes to the origin in white.
  pub fn initialize_ring<R: Rng>(&mut self, rng: &mut R, radius: f32, angle: f32, size: f32, life: f32) {
    let rim = Vector3::new(radius * angle.sin(), radius * angle.cos(), 0.0);
    let marker = self.marker_index();
    for (i, p) in self.particles.iter_mut().enumerate() {
      if i == marker {
        *p = Particle {
          pos: Vector3::new(0.0, 0.0, 0.0),
          vel: Vector3::new(0.0, 0.0, 0.0),
          color: [255; 4],
          size,
          life,
          camera_distance: 0.0,
        };
      } else {
        *p = Particle {
          pos: rim,
          vel: Vector3::new(0.0, 0.0, 0.0),
          color: rng.gen(),
          size,
          life,
          camera_distance: 0.0,
        };
      }
    }
    self.order = (0..self.particles.len()).collect();
  }

  pub fn get(&self, index: usize) -> Option<&Particle> {
    self.particles.get(index)
  }

  pub fn iter(&self) -> impl Iterator<Item = &Particle> {
    self.particles.iter()
  }

  pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut Particle> {
    self.particles.iter_mut()
  }

  pub fn live_count(&self) -> usize {
    self.particles.iter().filter(|p| p.is_alive()).count()
  }

  /// Orders the whole pool by descending camera distance (farthest first).
  /// The sort is stable, so ties keep slot order, and dead particles with
  /// the negative sentinel end up in the suffix.
  pub fn sort_by_depth(&mut self) {
    let particles = &self.particles;
    self.order.clear();
    self.order.extend(0..particles.len());
    self
      .order
      .sort_by(|&a, &b| particles[b].camera_distance.total_cmp(&particles[a].camera_distance));
  }

  /// Particles in the most recent back-to-front order.
  pub fn sorted(&self) -> impl Iterator<Item = &Particle> {
    self.order.iter().map(|&i| &self.particles[i])
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use rand::{rngs::SmallRng, SeedableRng};

  fn ring(capacity: usize) -> ParticlePool {
    let mut rng = SmallRng::seed_from_u64(7);
    let mut pool = ParticlePool::new(capacity);
    pool.initialize_ring(&mut rng, 5.0, 0.0, 0.2, 1000.0);
    pool
  }

  #[test]
  fn ring_particles_share_the_rim_point() {
    let pool = ring(3);
    assert_eq!(pool.get(0).map(|p| p.pos), Some(Vector3::new(0.0, 5.0, 0.0)));
    assert_eq!(pool.get(1).map(|p| p.pos), Some(Vector3::new(0.0, 5.0, 0.0)));
    let marker = pool.get(pool.marker_index()).unwrap();
    assert_eq!(marker.pos, Vector3::new(0.0, 0.0, 0.0));
    assert_eq!(marker.color, [255; 4]);
    assert_eq!(pool.live_count(), 3);
  }

  #[test]
  fn zero_capacity_keeps_marker_slot() {
    let pool = ParticlePool::new(0);
    assert_eq!(pool.capacity(), 1);
    assert!(pool.is_marker(0));
  }

  #[test]
  fn sort_puts_far_first_and_dead_last() {
    let mut pool = ring(5);
    let distances = [4.0, DEAD_DISTANCE, 9.0, 1.0, 9.0];
    for (p, d) in pool.iter_mut().zip(distances) {
      p.camera_distance = d;
    }
    pool.iter_mut().nth(1).unwrap().life = 0.0;
    pool.sort_by_depth();

    let sorted: Vec<f32> = pool.sorted().map(|p| p.camera_distance).collect();
    assert_eq!(sorted, vec![9.0, 9.0, 4.0, 1.0, DEAD_DISTANCE]);
    assert!(!pool.sorted().last().unwrap().is_alive());
    // marker keeps its slot regardless of order
    assert_eq!(pool.get(4).unwrap().color, [255; 4]);
  }
}
