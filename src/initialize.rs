use crate::{centrifuge::Centrifuge, particles::ParticlePool, SimParams};
use cgmath::Vector3;
use rand::Rng;
use rand_distr::{Distribution, Uniform};
use std::f32::consts::PI;

#[must_use]
pub fn create_ring<R: Rng>(rng: &mut R, sim_params: &SimParams, centrifuge: &Centrifuge) -> ParticlePool {
  let mut pool = ParticlePool::new(sim_params.max_particles);
  pool.initialize_ring(
    rng,
    centrifuge.radius,
    centrifuge.angle,
    sim_params.particle_size,
    sim_params.initial_life,
  );
  pool
}

/// Random explosion kick: magnitude `boom_speed * u^exponent` with `u` uniform
/// in [0, 1), direction uniform over the sphere.
pub fn boom_velocity<R: Rng>(rng: &mut R, boom_speed: f32, exponent: f32) -> Vector3<f32> {
  let speed = boom_speed * rng.gen::<f32>().powf(exponent);
  speed * unit_sphere_direction(rng)
}

/// Azimuth uniform in [0, 2pi), polar angle from the arc cosine of a uniform
/// sample in [-1, 1].
pub fn unit_sphere_direction<R: Rng>(rng: &mut R) -> Vector3<f32> {
  let longitude = Uniform::new(0.0, 2.0 * PI).sample(rng);
  let latitude = Uniform::new_inclusive(-1.0f32, 1.0).sample(rng).acos();
  Vector3::new(
    longitude.sin() * latitude.sin(),
    longitude.cos() * latitude.sin(),
    latitude.cos(),
  )
}

#[cfg(test)]
mod tests {
  use super::*;
  use cgmath::InnerSpace;
  use rand::{rngs::SmallRng, SeedableRng};

  #[test]
  fn boom_magnitude_within_bounds() {
    let mut rng = SmallRng::seed_from_u64(42);
    for _ in 0..5000 {
      let v = boom_velocity(&mut rng, 20.0, 0.3);
      assert!(v.magnitude() <= 20.0 + 1e-3);
    }
  }

  #[test]
  fn boom_magnitude_biased_toward_max() {
    let mut rng = SmallRng::seed_from_u64(3);
    let n = 10_000;
    let mean = (0..n)
      .map(|_| boom_velocity(&mut rng, 20.0, 0.3).magnitude())
      .sum::<f32>()
      / n as f32;
    // E[u^0.3] = 1 / 1.3
    assert!((mean - 20.0 / 1.3).abs() < 0.3, "mean {mean}");
  }

  #[test]
  fn directions_cover_the_sphere() {
    let mut rng = SmallRng::seed_from_u64(11);
    let n = 20_000;
    let mut sum = Vector3::new(0.0f32, 0.0, 0.0);
    let mut z2 = 0.0f32;
    let mut octants = [0usize; 8];
    for _ in 0..n {
      let d = unit_sphere_direction(&mut rng);
      assert!((d.magnitude() - 1.0).abs() < 1e-4);
      sum += d;
      z2 += d.z * d.z;
      let idx = (d.x > 0.0) as usize | ((d.y > 0.0) as usize) << 1 | ((d.z > 0.0) as usize) << 2;
      octants[idx] += 1;
    }
    let mean = sum / n as f32;
    assert!(mean.magnitude() < 0.03, "mean {mean:?}");
    assert!((z2 / n as f32 - 1.0 / 3.0).abs() < 0.02);
    for count in octants {
      let frac = count as f32 / n as f32;
      assert!((frac - 0.125).abs() < 0.02, "octant fraction {frac}");
    }
  }

  #[test]
  fn ring_starts_at_centrifuge_angle() {
    let mut rng = SmallRng::seed_from_u64(0);
    let params = SimParams {
      max_particles: 10,
      ..Default::default()
    };
    let mut centrifuge = Centrifuge::new(params.centrifuge_radius, params.angular_speed);
    centrifuge.angle = 0.5;
    let pool = create_ring(&mut rng, &params, &centrifuge);
    assert_eq!(pool.capacity(), 10);
    let p = pool.get(3).unwrap();
    assert!((p.pos - centrifuge.rim_position()).magnitude() < 1e-5);
  }
}
