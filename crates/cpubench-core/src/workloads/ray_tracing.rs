//! Recursive reflection ray tracer over a fixed three-sphere scene.

use super::WorkloadOutcome;
use crate::error::BenchResult;
use crate::metrics::MetricsBuilder;
use crate::params::BenchmarkParams;
use std::ops::{Add, Mul, Sub};

/// Contribution of each reflected bounce to the surface colour.
const REFLECTIVITY: f64 = 0.3;
/// Offset along the normal that keeps a reflected ray off its own surface.
const SURFACE_BIAS: f64 = 1e-4;
const SKY: Vec3 = Vec3::new(0.5, 0.7, 1.0);

/// Upper bound of r+g+b for one pixel: every term is at most 1 per channel,
/// so the geometric series gives 3 / (1 - 0.3) ≈ 4.286.
const MAX_PIXEL_ENERGY: f64 = 4.3;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Vec3 {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Vec3 {
    pub const fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    pub fn dot(self, other: Vec3) -> f64 {
        self.x * other.x + self.y * other.y + self.z * other.z
    }

    pub fn length(self) -> f64 {
        self.dot(self).sqrt()
    }

    pub fn normalized(self) -> Vec3 {
        self * (1.0 / self.length())
    }

    fn sum(self) -> f64 {
        self.x + self.y + self.z
    }
}

impl Add for Vec3 {
    type Output = Vec3;
    fn add(self, o: Vec3) -> Vec3 {
        Vec3::new(self.x + o.x, self.y + o.y, self.z + o.z)
    }
}

impl Sub for Vec3 {
    type Output = Vec3;
    fn sub(self, o: Vec3) -> Vec3 {
        Vec3::new(self.x - o.x, self.y - o.y, self.z - o.z)
    }
}

impl Mul<f64> for Vec3 {
    type Output = Vec3;
    fn mul(self, s: f64) -> Vec3 {
        Vec3::new(self.x * s, self.y * s, self.z * s)
    }
}

#[derive(Debug, Clone, Copy)]
pub struct Ray {
    pub origin: Vec3,
    /// Unit length
    pub direction: Vec3,
}

#[derive(Debug, Clone, Copy)]
pub struct Sphere {
    pub center: Vec3,
    pub radius: f64,
}

impl Sphere {
    /// Distance along `ray` to the nearest intersection in front of its origin.
    pub fn intersect(&self, ray: &Ray) -> Option<f64> {
        let oc = ray.origin - self.center;
        let a = ray.direction.dot(ray.direction);
        let b = 2.0 * oc.dot(ray.direction);
        let c = oc.dot(oc) - self.radius * self.radius;
        let discriminant = b * b - 4.0 * a * c;
        if discriminant < 0.0 {
            return None;
        }
        let root = discriminant.sqrt();
        let near = (-b - root) / (2.0 * a);
        let far = (-b + root) / (2.0 * a);
        if near > 0.0 {
            Some(near)
        } else if far > 0.0 {
            Some(far)
        } else {
            None
        }
    }
}

pub const SCENE: [Sphere; 3] = [
    Sphere {
        center: Vec3::new(0.0, 0.0, -1.0),
        radius: 0.5,
    },
    Sphere {
        center: Vec3::new(1.0, 0.0, -1.5),
        radius: 0.3,
    },
    Sphere {
        center: Vec3::new(-1.0, -0.5, -1.2),
        radius: 0.4,
    },
];

struct Tracer {
    rays_traced: u64,
}

impl Tracer {
    fn trace(&mut self, ray: &Ray, depth: u32) -> Vec3 {
        self.rays_traced += 1;

        let hit = SCENE
            .iter()
            .filter_map(|s| s.intersect(ray).map(|t| (t, s)))
            .min_by(|a, b| a.0.total_cmp(&b.0));

        let Some((t, sphere)) = hit else {
            return SKY;
        };

        let point = ray.origin + ray.direction * t;
        let normal = (point - sphere.center).normalized();
        let base = (normal + Vec3::new(1.0, 1.0, 1.0)) * 0.5;

        if depth == 0 {
            return base;
        }

        let d = ray.direction;
        let reflected = Ray {
            origin: point + normal * SURFACE_BIAS,
            direction: (d - normal * (2.0 * d.dot(normal))).normalized(),
        };
        base + self.trace(&reflected, depth - 1) * REFLECTIVITY
    }
}

fn primary_ray(x: u32, y: u32, width: u32, height: u32) -> Ray {
    let aspect = f64::from(width) / f64::from(height);
    let u = ((f64::from(x) + 0.5) / f64::from(width) * 2.0 - 1.0) * aspect;
    let v = 1.0 - (f64::from(y) + 0.5) / f64::from(height) * 2.0;
    Ray {
        origin: Vec3::new(0.0, 0.0, 0.0),
        direction: Vec3::new(u, v, -1.0).normalized(),
    }
}

pub fn run(params: &BenchmarkParams) -> BenchResult<WorkloadOutcome> {
    let (width, height) = params.ray_tracing_resolution;
    let depth = params.ray_tracing_depth;
    let pixels = u64::from(width) * u64::from(height);

    let mut tracer = Tracer { rays_traced: 0 };
    let mut total_energy = 0.0;
    for y in 0..height {
        for x in 0..width {
            let color = tracer.trace(&primary_ray(x, y, width, height), depth);
            total_energy += color.sum();
        }
    }

    let is_valid = canonical_ray_hits()
        && total_energy.is_finite()
        && total_energy > 0.0
        && total_energy <= MAX_PIXEL_ENERGY * pixels as f64
        && tracer.rays_traced >= pixels;

    let metrics = MetricsBuilder::new()
        .with("pixels", pixels)
        .with("rays_traced", tracer.rays_traced)
        .with("total_energy", total_energy)
        .build();

    Ok(WorkloadOutcome {
        operations: tracer.rays_traced,
        is_valid,
        metrics,
    })
}

/// The ray straight down -z must hit the centre sphere's front face at t = 0.5.
fn canonical_ray_hits() -> bool {
    let ray = Ray {
        origin: Vec3::new(0.0, 0.0, 0.0),
        direction: Vec3::new(0.0, 0.0, -1.0),
    };
    SCENE[0]
        .intersect(&ray)
        .is_some_and(|t| (t - 0.5).abs() < 1e-9)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::params::DeviceTier;

    fn params(w: u32, h: u32, depth: u32) -> BenchmarkParams {
        BenchmarkParams {
            ray_tracing_resolution: (w, h),
            ray_tracing_depth: depth,
            ..BenchmarkParams::for_tier(DeviceTier::Slow)
        }
    }

    #[test]
    fn test_canonical_intersection() {
        assert!(canonical_ray_hits());
    }

    #[test]
    fn test_miss_behind_origin() {
        let ray = Ray {
            origin: Vec3::new(0.0, 0.0, 0.0),
            direction: Vec3::new(0.0, 0.0, 1.0),
        };
        assert!(SCENE.iter().all(|s| s.intersect(&ray).is_none()));
    }

    #[test]
    fn test_sky_pixel_energy() {
        let mut tracer = Tracer { rays_traced: 0 };
        let ray = Ray {
            origin: Vec3::new(0.0, 0.0, 0.0),
            direction: Vec3::new(0.0, 1.0, 0.0),
        };
        assert_eq!(tracer.trace(&ray, 3), SKY);
        assert_eq!(tracer.rays_traced, 1);
    }

    #[test]
    fn test_small_image_is_valid() {
        let outcome = run(&params(32, 24, 3)).unwrap();
        assert!(outcome.is_valid);
        assert_eq!(outcome.metrics["pixels"].as_i64(), Some(32 * 24));
        assert!(outcome.operations >= 32 * 24);
        assert!(outcome.operations <= 32 * 24 * 4);
    }

    #[test]
    fn test_single_pixel_hits_centre_sphere() {
        let outcome = run(&params(1, 1, 1)).unwrap();
        assert!(outcome.is_valid);
        // The centre ray hits and reflects once.
        assert_eq!(outcome.operations, 2);
    }
}
