use std::ops::Mul;

use super::{
    bounds::Bounds3,
    common::{cast, FloatValueType},
    point::{Normal, Point3},
    ray::Ray,
    vector::Vec3,
};

// Based on Physically Based Rendering 3rd ed.
// http://www.pbr-book.org/3ed-2018/Geometry_and_Transformations/Transformations.html

/// A row-major 4x4 matrix.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Matrix4x4<T>
where
    T: FloatValueType,
{
    pub m: [[T; 4]; 4],
}

impl<T> Matrix4x4<T>
where
    T: FloatValueType,
{
    pub fn new(m: [[T; 4]; 4]) -> Self {
        Self { m }
    }

    pub fn identity() -> Self {
        let mut m = [[T::zero(); 4]; 4];
        for (i, row) in m.iter_mut().enumerate() {
            row[i] = T::one();
        }
        Self { m }
    }

    pub fn transposed(&self) -> Self {
        let mut m = [[T::zero(); 4]; 4];
        for (r, row) in m.iter_mut().enumerate() {
            for (c, v) in row.iter_mut().enumerate() {
                *v = self.m[c][r];
            }
        }
        Self { m }
    }

    /// Returns the inverse of this matrix, `None` if it is singular.
    // Gauss-Jordan elimination with partial pivoting
    pub fn inverted(&self) -> Option<Self> {
        let mut a = self.m;
        let mut inv = Self::identity().m;

        // Pivots are compared against the magnitude of their input column, so rounding residue
        // left by a rank-deficient matrix is rejected at any scale and small scales next to
        // large translations still invert
        let mut col_scale = [T::zero(); 4];
        for (col, scale) in col_scale.iter_mut().enumerate() {
            *scale = self.m.iter().fold(T::zero(), |acc, row| acc.maxi(row[col].abs()));
        }
        let tolerance = T::epsilon() * cast::<T>(16.0);

        for col in 0..4 {
            let pivot = (col..4)
                .max_by(|&i, &j| {
                    a[i][col]
                        .abs()
                        .partial_cmp(&a[j][col].abs())
                        .unwrap_or(std::cmp::Ordering::Equal)
                })
                .unwrap_or(col);
            if a[pivot][col].abs() <= tolerance * col_scale[col] {
                return None;
            }
            a.swap(col, pivot);
            inv.swap(col, pivot);

            let scale = T::one() / a[col][col];
            for c in 0..4 {
                a[col][c] = a[col][c] * scale;
                inv[col][c] = inv[col][c] * scale;
            }

            for row in 0..4 {
                if row != col {
                    let factor = a[row][col];
                    if factor != T::zero() {
                        for c in 0..4 {
                            a[row][c] = a[row][c] - factor * a[col][c];
                            inv[row][c] = inv[row][c] - factor * inv[col][c];
                        }
                    }
                }
            }
        }

        Some(Self { m: inv })
    }
}

impl<'a, 'b, T> Mul<&'b Matrix4x4<T>> for &'a Matrix4x4<T>
where
    T: FloatValueType,
{
    type Output = Matrix4x4<T>;

    fn mul(self, other: &Matrix4x4<T>) -> Matrix4x4<T> {
        let mut m = [[T::zero(); 4]; 4];
        for (r, row) in m.iter_mut().enumerate() {
            for (c, v) in row.iter_mut().enumerate() {
                *v = (0..4).fold(T::zero(), |acc, k| acc + self.m[r][k] * other.m[k][c]);
            }
        }
        Matrix4x4 { m }
    }
}

/// An affine transformation that also stores its inverse.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Transform<T>
where
    T: FloatValueType,
{
    m: Matrix4x4<T>,
    m_inv: Matrix4x4<T>,
}

impl<T> Transform<T>
where
    T: FloatValueType,
{
    /// Creates a new `Transform` from a row-major matrix. Returns `None` if the matrix can't be
    /// inverted.
    pub fn new(m: [[T; 4]; 4]) -> Option<Self> {
        let m = Matrix4x4::new(m);
        m.inverted().map(|m_inv| Self { m, m_inv })
    }

    pub fn identity() -> Self {
        Self {
            m: Matrix4x4::identity(),
            m_inv: Matrix4x4::identity(),
        }
    }

    pub fn m(&self) -> &Matrix4x4<T> {
        &self.m
    }

    pub fn inverted(&self) -> Self {
        Self {
            m: self.m_inv,
            m_inv: self.m,
        }
    }

    fn apply_point(m: &Matrix4x4<T>, p: Point3<T>) -> Point3<T> {
        let m = &m.m;
        let x = m[0][0] * p.x + m[0][1] * p.y + m[0][2] * p.z + m[0][3];
        let y = m[1][0] * p.x + m[1][1] * p.y + m[1][2] * p.z + m[1][3];
        let z = m[2][0] * p.x + m[2][1] * p.y + m[2][2] * p.z + m[2][3];
        let w = m[3][0] * p.x + m[3][1] * p.y + m[3][2] * p.z + m[3][3];
        if w == T::one() {
            Point3::new(x, y, z)
        } else {
            Point3::new(x, y, z) / w
        }
    }

    fn apply_vector(m: &Matrix4x4<T>, v: Vec3<T>) -> Vec3<T> {
        let m = &m.m;
        Vec3::new(
            m[0][0] * v.x + m[0][1] * v.y + m[0][2] * v.z,
            m[1][0] * v.x + m[1][1] * v.y + m[1][2] * v.z,
            m[2][0] * v.x + m[2][1] * v.y + m[2][2] * v.z,
        )
    }
}

impl<'a, 'b, T> Mul<&'b Transform<T>> for &'a Transform<T>
where
    T: FloatValueType,
{
    type Output = Transform<T>;

    fn mul(self, other: &Transform<T>) -> Transform<T> {
        Transform {
            m: &self.m * &other.m,
            m_inv: &other.m_inv * &self.m_inv,
        }
    }
}

impl<'a, T> Mul<Point3<T>> for &'a Transform<T>
where
    T: FloatValueType,
{
    type Output = Point3<T>;

    fn mul(self, p: Point3<T>) -> Point3<T> {
        Transform::apply_point(&self.m, p)
    }
}

impl<'a, T> Mul<Vec3<T>> for &'a Transform<T>
where
    T: FloatValueType,
{
    type Output = Vec3<T>;

    fn mul(self, v: Vec3<T>) -> Vec3<T> {
        Transform::apply_vector(&self.m, v)
    }
}

impl<'a, T> Mul<Normal<T>> for &'a Transform<T>
where
    T: FloatValueType,
{
    type Output = Normal<T>;

    /// Normals transform with the inverse transpose.
    fn mul(self, n: Normal<T>) -> Normal<T> {
        let m = &self.m_inv.m;
        Normal::new(
            m[0][0] * n.x + m[1][0] * n.y + m[2][0] * n.z,
            m[0][1] * n.x + m[1][1] * n.y + m[2][1] * n.z,
            m[0][2] * n.x + m[1][2] * n.y + m[2][2] * n.z,
        )
    }
}

impl<'a, T> Mul<Ray<T>> for &'a Transform<T>
where
    T: FloatValueType,
{
    type Output = Ray<T>;

    /// The direction is not renormalized so `t` values stay valid in both spaces.
    fn mul(self, r: Ray<T>) -> Ray<T> {
        Ray::segment(self * r.o, self * r.d, r.t_min, r.t_max)
    }
}

impl<'a, T> Mul<Bounds3<T>> for &'a Transform<T>
where
    T: FloatValueType,
{
    type Output = Bounds3<T>;

    fn mul(self, b: Bounds3<T>) -> Bounds3<T> {
        if !b.is_valid() {
            return b;
        }
        (0..8).fold(Bounds3::default(), |acc, corner| {
            let p = Point3::new(
                b[corner & 1].x,
                b[(corner >> 1) & 1].y,
                b[(corner >> 2) & 1].z,
            );
            acc.union_p(self * p)
        })
    }
}

/// Returns a translation by `delta`.
pub fn translation<T: FloatValueType>(delta: Vec3<T>) -> Transform<T> {
    let (o, z) = (T::one(), T::zero());
    Transform {
        m: Matrix4x4::new([
            [o, z, z, delta.x],
            [z, o, z, delta.y],
            [z, z, o, delta.z],
            [z, z, z, o],
        ]),
        m_inv: Matrix4x4::new([
            [o, z, z, -delta.x],
            [z, o, z, -delta.y],
            [z, z, o, -delta.z],
            [z, z, z, o],
        ]),
    }
}

/// Returns a scaling by the given factors. Zero factors produce a singular transform.
pub fn scale<T: FloatValueType>(x: T, y: T, z: T) -> Transform<T> {
    let (o, n) = (T::one(), T::zero());
    Transform {
        m: Matrix4x4::new([
            [x, n, n, n],
            [n, y, n, n],
            [n, n, z, n],
            [n, n, n, o],
        ]),
        m_inv: Matrix4x4::new([
            [o / x, n, n, n],
            [n, o / y, n, n],
            [n, n, o / z, n],
            [n, n, n, o],
        ]),
    }
}

/// Returns a rotation by `theta` degrees around `axis`.
pub fn rotation<T: FloatValueType>(theta: T, axis: Vec3<T>) -> Transform<T> {
    let a = axis.normalized();
    let (sin_theta, cos_theta) = theta.to_radians().sin_cos();
    let (o, z) = (T::one(), T::zero());
    let m = Matrix4x4::new([
        [
            a.x * a.x + (o - a.x * a.x) * cos_theta,
            a.x * a.y * (o - cos_theta) - a.z * sin_theta,
            a.x * a.z * (o - cos_theta) + a.y * sin_theta,
            z,
        ],
        [
            a.x * a.y * (o - cos_theta) + a.z * sin_theta,
            a.y * a.y + (o - a.y * a.y) * cos_theta,
            a.y * a.z * (o - cos_theta) - a.x * sin_theta,
            z,
        ],
        [
            a.x * a.z * (o - cos_theta) - a.y * sin_theta,
            a.y * a.z * (o - cos_theta) + a.x * sin_theta,
            a.z * a.z + (o - a.z * a.z) * cos_theta,
            z,
        ],
        [z, z, z, o],
    ]);
    // Rotations are orthonormal
    Transform {
        m,
        m_inv: m.transposed(),
    }
}

/// Returns the world-to-camera transform for a camera at `pos` looking at `target`.
/// Returns `None` if `up` is parallel to the view direction.
pub fn look_at<T: FloatValueType>(
    pos: Point3<T>,
    target: Point3<T>,
    up: Vec3<T>,
) -> Option<Transform<T>> {
    let dir = (target - pos).normalized();
    let right = up.normalized().cross(dir);
    if right.len() == T::zero() {
        return None;
    }
    let right = right.normalized();
    let new_up = dir.cross(right);
    let (o, z) = (T::one(), T::zero());
    let camera_to_world = Matrix4x4::new([
        [right.x, new_up.x, dir.x, pos.x],
        [right.y, new_up.y, dir.y, pos.y],
        [right.z, new_up.z, dir.z, pos.z],
        [z, z, z, o],
    ]);
    camera_to_world.inverted().map(|world_to_camera| Transform {
        m: world_to_camera,
        m_inv: camera_to_world,
    })
}
