use super::{Shape, ShapeHit, ShapeSample};
use crate::{
    math::{Bounds3, Normal, Point2, Point3, Ray, Vec3},
    sampling::uniform_sample_sphere,
};

use std::f32::consts::PI;

// Based on Physically Based Rendering 3rd ed.
// http://www.pbr-book.org/3ed-2018/Shapes/Spheres.html

/// A sphere object.
pub struct Sphere {
    center: Point3<f32>,
    radius: f32,
}

impl Sphere {
    /// Creates a new `Sphere`.
    pub fn new(center: Point3<f32>, radius: f32) -> Self {
        assert!(radius > 0.0, "Sphere radius has to be positive");
        Self { center, radius }
    }

    pub fn center(&self) -> Point3<f32> {
        self.center
    }

    pub fn radius(&self) -> f32 {
        self.radius
    }

    /// Returns the parametric distances of the two intersections, nearest first.
    fn solve(&self, ray: &Ray<f32>) -> Option<(f32, f32)> {
        let o = ray.o - self.center;
        let d = ray.d;

        // Quadratic coefficients
        let a = d.len_sqr();
        let b = 2.0 * d.dot(o);
        let c = o.len_sqr() - self.radius * self.radius;

        // Solve quadratic equation for ts
        let discrim = b * b - 4.0 * a * c;
        if discrim < 0.0 || a == 0.0 {
            return None;
        }
        let rd = discrim.sqrt();

        let q = if b < 0.0 {
            -0.5 * (b - rd)
        } else {
            -0.5 * (b + rd)
        };

        let (mut t0, mut t1) = if q == 0.0 {
            // Ray grazes the center plane, both roots are at the same distance
            let t = -b / (2.0 * a);
            (t, t)
        } else {
            (q / a, c / q)
        };
        if t0 > t1 {
            std::mem::swap(&mut t0, &mut t1);
        }
        Some((t0, t1))
    }
}

impl Shape for Sphere {
    fn intersect(&self, ray: &Ray<f32>) -> Option<ShapeHit> {
        let (t0, t1) = self.solve(ray)?;

        if t0 >= ray.t_max || t1 <= ray.t_min {
            return None;
        }
        let mut t = t0;
        if t <= ray.t_min {
            t = t1;
            if t >= ray.t_max {
                return None;
            }
        };

        let p = ray.point(t);
        let local = p - self.center;
        let n = Normal::from(local / self.radius);

        let mut phi = local.y.atan2(local.x);
        if phi < 0.0 {
            phi += 2.0 * PI;
        }
        let theta = (local.z / self.radius).clamp(-1.0, 1.0).acos();
        let uv = Point2::new(phi / (2.0 * PI), theta / PI);
        let dpdu = Vec3::new(-2.0 * PI * local.y, 2.0 * PI * local.x, 0.0);

        Some(ShapeHit { t, p, n, uv, dpdu })
    }

    fn intersect_p(&self, ray: &Ray<f32>) -> bool {
        match self.solve(ray) {
            Some((t0, t1)) => {
                (t0 > ray.t_min && t0 < ray.t_max) || (t1 > ray.t_min && t1 < ray.t_max)
            }
            None => false,
        }
    }

    fn world_bound(&self) -> Bounds3<f32> {
        Bounds3::new(
            self.center - Vec3::from(self.radius),
            self.center + Vec3::from(self.radius),
        )
    }

    fn area(&self) -> f32 {
        4.0 * PI * self.radius * self.radius
    }

    fn sample(&self, u: Point2<f32>) -> ShapeSample {
        let d = uniform_sample_sphere(u);
        ShapeSample {
            p: self.center + d * self.radius,
            n: Normal::from(d),
        }
    }
}
