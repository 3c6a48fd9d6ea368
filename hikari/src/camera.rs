use serde::{Deserialize, Serialize};

use crate::{
    math::{
        transforms::{look_at, scale, translation},
        Point2, Point3, Ray, Transform, Vec2, Vec3,
    },
    Error, Result,
};

// Based on Physically Based Rendering 3rd ed.
// http://www.pbr-book.org/3ed-2018/Camera_Models.html

/// Values needed to specify a camera ray
pub struct CameraSample {
    pub p_film: Point2<f32>,
}

/// A simple pinhole camera
#[derive(Clone)]
pub struct Camera {
    camera_to_world: Transform<f32>,
    raster_to_camera: Transform<f32>,
    res: Vec2<u16>,
}

#[derive(Copy, Clone, Debug, Deserialize, Serialize)]
pub struct CameraParameters {
    pub position: Point3<f32>,
    pub target: Point3<f32>,
    pub up: Vec3<f32>,
    pub fov: FoV,
}

impl Default for CameraParameters {
    fn default() -> Self {
        Self {
            position: Point3::new(0.0, 0.0, -5.0),
            target: Point3::new(0.0, 0.0, 0.0),
            up: Vec3::new(0.0, 1.0, 0.0),
            fov: FoV::Y(40.0),
        }
    }
}

// Angle in degrees
#[derive(Copy, Clone, Debug, Deserialize, Serialize)]
pub enum FoV {
    X(f32),
    Y(f32),
}

impl Camera {
    /// Creates a new `Camera` rendering an image of `res` pixels.
    pub fn new(params: CameraParameters, res: Vec2<u16>) -> Result<Self> {
        if res.x == 0 || res.y == 0 {
            return Err(Error::InvalidSettings(format!(
                "Camera resolution {}x{} has no pixels",
                res.x, res.y
            )));
        }
        let fov_angle = match params.fov {
            FoV::X(v) | FoV::Y(v) => v,
        };
        if !(fov_angle > 0.0 && fov_angle < 180.0) {
            return Err(Error::InvalidSettings(format!(
                "Camera field of view {} is not in (0, 180)",
                fov_angle
            )));
        }

        let camera_to_world = look_at(params.position, params.target, params.up)
            .ok_or_else(|| {
                Error::InvalidSettings("Camera up is parallel to the view direction".into())
            })?
            .inverted();

        // Only the ray directions matter so there's no depth mapping
        let inv_tan = 1.0 / ((fov_angle.to_radians() / 2.0).tan());
        let screen_to_camera = scale(1.0 / inv_tan, 1.0 / inv_tan, 1.0);

        let (screen_min, screen_max) = screen_window(params.fov, res);
        let film = Vec2::new(res.x as f32, res.y as f32);
        // Raster y grows downwards, screen y upwards
        let raster_to_screen = &translation(Vec3::new(screen_min.x, screen_max.y, 0.0))
            * &scale(
                (screen_max.x - screen_min.x) / film.x,
                (screen_min.y - screen_max.y) / film.y,
                1.0,
            );
        let raster_to_camera = &screen_to_camera * &raster_to_screen;

        Ok(Self {
            camera_to_world,
            raster_to_camera,
            res,
        })
    }

    /// Returns the resolution of the image this `Camera` renders.
    pub fn res(&self) -> Vec2<u16> {
        self.res
    }

    /// Creates a new [Ray] at the camera sample with this `Camera`.
    pub fn ray(&self, sample: &CameraSample) -> Ray<f32> {
        let p_film = Point3::new(sample.p_film.x, sample.p_film.y, 0.0);
        let p_camera = &self.raster_to_camera * p_film;
        // Points on the screen plane sit at z = 0, push them to the image plane at z = 1
        let d = Vec3::new(p_camera.x, p_camera.y, 1.0).normalized();
        let r = Ray::new(Point3::zeros(), d, f32::INFINITY);
        &self.camera_to_world * r
    }
}

/// Returns the screen window corners. The axis the field of view is given for spans `[-1, 1]`
/// and the other one follows the aspect ratio.
fn screen_window(fov: FoV, res: Vec2<u16>) -> (Vec2<f32>, Vec2<f32>) {
    let aspect = (res.x as f32) / (res.y as f32);
    let half = match fov {
        FoV::X(_) => Vec2::new(1.0, 1.0 / aspect),
        FoV::Y(_) => Vec2::new(aspect, 1.0),
    };
    (-half, half)
}
