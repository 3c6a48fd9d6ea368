use super::{Shape, ShapeHit, ShapeSample};
use crate::{
    math::{Bounds3, Normal, Point2, Point3, Ray},
    sampling::uniform_sample_triangle,
};

// Möller-Trumbore
// https://www.graphics.cornell.edu/pubs/1997/MT97.pdf

/// A single triangle in world space. Front face is counter-clockwise.
pub struct Triangle {
    p0: Point3<f32>,
    p1: Point3<f32>,
    p2: Point3<f32>,
}

impl Triangle {
    /// Creates a new `Triangle` from world space vertices.
    pub fn new(p0: Point3<f32>, p1: Point3<f32>, p2: Point3<f32>) -> Self {
        Self { p0, p1, p2 }
    }

    pub fn vertices(&self) -> [Point3<f32>; 3] {
        [self.p0, self.p1, self.p2]
    }

    /// Returns `(t, b1, b2)` of a hit within the ray's interval
    fn solve(&self, ray: &Ray<f32>) -> Option<(f32, f32, f32)> {
        let e1 = self.p1 - self.p0;
        let e2 = self.p2 - self.p0;

        let pvec = ray.d.cross(e2);
        let det = e1.dot(pvec);
        if det.abs() < f32::EPSILON * e1.len() * e2.len() || det == 0.0 {
            return None;
        }
        let inv_det = 1.0 / det;

        let tvec = ray.o - self.p0;
        let b1 = tvec.dot(pvec) * inv_det;
        if !(0.0..=1.0).contains(&b1) {
            return None;
        }

        let qvec = tvec.cross(e1);
        let b2 = ray.d.dot(qvec) * inv_det;
        if b2 < 0.0 || b1 + b2 > 1.0 {
            return None;
        }

        let t = e2.dot(qvec) * inv_det;
        if t <= ray.t_min || t >= ray.t_max {
            return None;
        }

        Some((t, b1, b2))
    }
}

impl Shape for Triangle {
    fn intersect(&self, ray: &Ray<f32>) -> Option<ShapeHit> {
        let (t, b1, b2) = self.solve(ray)?;

        let e1 = self.p1 - self.p0;
        let e2 = self.p2 - self.p0;
        let n = Normal::from(e1.cross(e2).normalized());

        Some(ShapeHit {
            t,
            p: self.p0 + e1 * b1 + e2 * b2,
            n,
            uv: Point2::new(b1, b2),
            dpdu: e1,
        })
    }

    fn intersect_p(&self, ray: &Ray<f32>) -> bool {
        self.solve(ray).is_some()
    }

    fn world_bound(&self) -> Bounds3<f32> {
        Bounds3::new(self.p0, self.p1).union_p(self.p2)
    }

    fn area(&self) -> f32 {
        0.5 * (self.p1 - self.p0).cross(self.p2 - self.p0).len()
    }

    fn sample(&self, u: Point2<f32>) -> ShapeSample {
        let (b0, b1) = uniform_sample_triangle(u);
        let p = self.p0 * b0 + self.p1 * b1 + self.p2 * (1.0 - b0 - b1);
        let e1 = self.p1 - self.p0;
        let e2 = self.p2 - self.p0;
        ShapeSample {
            p,
            n: Normal::from(e1.cross(e2).normalized()),
        }
    }
}
