use super::{point::Normal, vector::Vec3};

/// An orthonormal basis with `n` as the local z-axis.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Frame {
    pub s: Vec3<f32>,
    pub t: Vec3<f32>,
    pub n: Vec3<f32>,
}

impl Frame {
    /// Builds a frame around the unit normal `n` with an arbitrary tangent.
    // Duff et al. 2017, Building an Orthonormal Basis, Revisited
    pub fn from_normal(n: Normal<f32>) -> Self {
        let n = Vec3::from(n);
        let sign = 1.0f32.copysign(n.z);
        let a = -1.0 / (sign + n.z);
        let b = n.x * n.y * a;
        Self {
            s: Vec3::new(1.0 + sign * n.x * n.x * a, sign * b, -sign * n.x),
            t: Vec3::new(b, sign + n.y * n.y * a, -n.y),
            n,
        }
    }

    /// Builds a frame around the unit normal `n` with `s` aligned to `tangent` projected on the
    /// tangent plane. Falls back to [Frame::from_normal] for degenerate tangents.
    pub fn from_normal_tangent(n: Normal<f32>, tangent: Vec3<f32>) -> Self {
        let nv = Vec3::from(n);
        let s = tangent - nv * nv.dot(tangent);
        let len_sqr = s.len_sqr();
        if !(len_sqr > 1e-12) || !len_sqr.is_finite() {
            return Self::from_normal(n);
        }
        let s = s / len_sqr.sqrt();
        Self {
            s,
            t: nv.cross(s),
            n: nv,
        }
    }

    /// Transforms world space `v` into this frame.
    #[inline]
    pub fn to_local(&self, v: Vec3<f32>) -> Vec3<f32> {
        Vec3::new(v.dot(self.s), v.dot(self.t), v.dot(self.n))
    }

    /// Transforms `v` in this frame into world space.
    #[inline]
    pub fn to_world(&self, v: Vec3<f32>) -> Vec3<f32> {
        self.s * v.x + self.t * v.y + self.n * v.z
    }
}
