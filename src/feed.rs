use crate::particles::ParticlePool;

/// Flat per-instance buffers handed to the rasterizer each frame.
///
/// Entries follow the pool's back-to-front order and only cover live
/// particles, so the first `live_count` instances are drawn.
pub struct RenderFeed {
  positions: Vec<[f32; 4]>,
  colors: Vec<[u8; 4]>,
}

impl RenderFeed {
  pub fn with_capacity(capacity: usize) -> Self {
    Self {
      positions: Vec::with_capacity(capacity),
      colors: Vec::with_capacity(capacity),
    }
  }

  pub fn fill(&mut self, pool: &ParticlePool) {
    self.positions.clear();
    self.colors.clear();
    for p in pool.sorted().filter(|p| p.is_alive()) {
      self.positions.push([p.pos.x, p.pos.y, p.pos.z, p.size]);
      self.colors.push(p.color);
    }
  }

  /// `[x, y, z, size]` per live particle.
  pub fn positions(&self) -> &[[f32; 4]] {
    &self.positions
  }

  /// `[r, g, b, a]` per live particle.
  pub fn colors(&self) -> &[[u8; 4]] {
    &self.colors
  }

  pub fn live_count(&self) -> usize {
    self.positions.len()
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use rand::{rngs::SmallRng, SeedableRng};

  #[test]
  fn skips_dead_particles() {
    let mut rng = SmallRng::seed_from_u64(1);
    let mut pool = ParticlePool::new(4);
    pool.initialize_ring(&mut rng, 5.0, 0.0, 0.2, 1000.0);
    pool.iter_mut().next().unwrap().life = 0.0;
    pool.sort_by_depth();

    let mut feed = RenderFeed::with_capacity(pool.capacity());
    feed.fill(&pool);
    assert_eq!(feed.live_count(), 3);
    assert_eq!(feed.colors().len(), 3);
    assert!(feed.positions().iter().all(|p| p[3] == 0.2));
  }
}
