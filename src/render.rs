use std::f64::consts::TAU;

use fastrand::Rng;
use wasm_bindgen::JsCast;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement};

use crate::dom;
use crate::error::{Result, SiteError};

/// The combined rotation `Rx * Ry` (y applied first), multiplied out.
pub fn rotation_matrix(x: f64, y: f64) -> [[f64; 3]; 3] {
    let (sx, cx) = x.sin_cos();
    let (sy, cy) = y.sin_cos();
    [
        [cy, 0.0, sy],
        [sx * sy, cx, -sx * cy],
        [-cx * sy, sx, cx * cy],
    ]
}

pub fn rotate_point(matrix: &[[f64; 3]; 3], [x, y, z]: [f64; 3]) -> [f64; 3] {
    matrix.map(|[a, b, c]| a * x + b * y + c * z)
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Rotation {
    pub x: f64,
    pub y: f64,
}

impl Rotation {
    /// Adds `step` and wraps both axes into `[0, 2π)`.
    pub fn advance(&mut self, step: Rotation) {
        self.x = (self.x + step.x).rem_euclid(TAU);
        self.y = (self.y + step.y).rem_euclid(TAU);
    }
}

/// A fixed set of points sharing a single rotation.
#[derive(Debug, Clone)]
pub struct ParticleCloud {
    positions: Vec<[f32; 3]>,
    rotation: Rotation,
}

impl ParticleCloud {
    /// Samples `count` points uniformly inside a cube of side `spread`
    /// centered on the origin.
    pub fn generate(count: usize, spread: f32, rng: &mut Rng) -> Self {
        let mut coordinate = || (rng.f32() - 0.5) * spread;
        let positions = (0..count)
            .map(|_| [coordinate(), coordinate(), coordinate()])
            .collect();
        Self {
            positions,
            rotation: Rotation::default(),
        }
    }

    pub fn len(&self) -> usize {
        self.positions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    pub fn positions(&self) -> &[[f32; 3]] {
        &self.positions
    }

    pub fn rotation(&self) -> Rotation {
        self.rotation
    }

    pub fn rotate(&mut self, step: Rotation) {
        self.rotation.advance(step);
    }

    /// Point positions with the cloud's rotation applied.
    pub fn world_positions(&self) -> impl Iterator<Item = [f64; 3]> + '_ {
        let matrix = rotation_matrix(self.rotation.x, self.rotation.y);
        self.positions.iter().map(move |p| {
            rotate_point(&matrix, [f64::from(p[0]), f64::from(p[1]), f64::from(p[2])])
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Projected {
    /// Viewport coordinates in CSS pixels, origin top-left.
    pub x: f64,
    pub y: f64,
    /// Distance in front of the camera.
    pub depth: f64,
}

/// Camera on the z axis looking towards the origin.
#[derive(Debug, Clone)]
pub struct PerspectiveCamera {
    fov_degrees: f64,
    aspect: f64,
    near: f64,
    far: f64,
    z: f64,
    focal: f64,
}

impl PerspectiveCamera {
    pub fn new(fov_degrees: f64, aspect: f64, near: f64, far: f64, z: f64) -> Self {
        let mut camera = Self {
            fov_degrees,
            aspect,
            near,
            far,
            z,
            focal: 1.0,
        };
        camera.update_projection();
        camera
    }

    pub fn aspect(&self) -> f64 {
        self.aspect
    }

    pub fn set_aspect(&mut self, width: f64, height: f64) {
        if width > 0.0 && height > 0.0 {
            self.aspect = width / height;
        }
        self.update_projection();
    }

    pub fn update_projection(&mut self) {
        self.focal = 1.0 / (self.fov_degrees.to_radians() / 2.0).tan();
    }

    /// Projects a world point onto a `width` x `height` viewport, or `None`
    /// when it falls outside the view frustum.
    pub fn project(&self, point: [f64; 3], width: f64, height: f64) -> Option<Projected> {
        let depth = self.z - point[2];
        if depth < self.near || depth > self.far {
            return None;
        }

        let ndc_x = point[0] * self.focal / (depth * self.aspect);
        let ndc_y = point[1] * self.focal / depth;
        if ndc_x.abs() > 1.0 || ndc_y.abs() > 1.0 {
            return None;
        }

        Some(Projected {
            x: (ndc_x + 1.0) * 0.5 * width,
            y: (1.0 - ndc_y) * 0.5 * height,
            depth,
        })
    }
}

/// Whatever draws a cloud as seen through a camera.
pub trait PointRenderer {
    fn set_size(&mut self, width: f64, height: f64);
    fn render(&mut self, cloud: &ParticleCloud, camera: &PerspectiveCamera);
}

#[derive(Debug, Clone, PartialEq)]
pub struct PointStyle {
    pub color: String,
    /// World-space size, attenuated by depth.
    pub size: f64,
    pub opacity: f64,
}

impl PointStyle {
    /// On-screen edge length of a point at `depth` for a viewport `height`
    /// CSS pixels tall.
    pub fn pixel_size(&self, depth: f64, height: f64) -> f64 {
        self.size * height * 0.5 / depth
    }
}

pub struct CanvasRenderer {
    canvas: HtmlCanvasElement,
    context: CanvasRenderingContext2d,
    style: PointStyle,
    pixel_ratio: f64,
    width: f64,
    height: f64,
}

impl CanvasRenderer {
    pub fn new(canvas: HtmlCanvasElement, style: PointStyle, pixel_ratio: f64) -> Result<Self> {
        let context = canvas
            .get_context("2d")?
            .ok_or(SiteError::Unavailable("2d canvas context"))?
            .dyn_into::<CanvasRenderingContext2d>()
            .map_err(|_| SiteError::Unavailable("2d canvas context"))?;

        Ok(Self {
            canvas,
            context,
            style,
            pixel_ratio,
            width: 0.0,
            height: 0.0,
        })
    }
}

impl PointRenderer for CanvasRenderer {
    fn set_size(&mut self, width: f64, height: f64) {
        self.width = width;
        self.height = height;
        self.canvas.set_width((width * self.pixel_ratio).round() as u32);
        self.canvas.set_height((height * self.pixel_ratio).round() as u32);
        dom::set_style(&self.canvas, "width", &format!("{}px", width));
        dom::set_style(&self.canvas, "height", &format!("{}px", height));
    }

    fn render(&mut self, cloud: &ParticleCloud, camera: &PerspectiveCamera) {
        let ratio = self.pixel_ratio;
        let ctx = &self.context;
        ctx.clear_rect(
            0.0,
            0.0,
            f64::from(self.canvas.width()),
            f64::from(self.canvas.height()),
        );
        ctx.set_global_alpha(self.style.opacity);
        ctx.set_fill_style_str(&self.style.color);

        for point in cloud.world_positions() {
            let Some(p) = camera.project(point, self.width, self.height) else {
                continue;
            };
            let edge = (self.style.pixel_size(p.depth, self.height) * ratio).max(1.0);
            ctx.fill_rect(
                p.x * ratio - edge / 2.0,
                p.y * ratio - edge / 2.0,
                edge,
                edge,
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPSILON: f64 = 1e-9;

    fn camera() -> PerspectiveCamera {
        PerspectiveCamera::new(75.0, 16.0 / 9.0, 0.1, 1000.0, 5.0)
    }

    #[test]
    fn generated_cloud_fills_the_cube() {
        let mut rng = Rng::with_seed(1500);
        let cloud = ParticleCloud::generate(1500, 15.0, &mut rng);

        assert_eq!(cloud.len(), 1500);
        for p in cloud.positions() {
            for c in p {
                assert!((-7.5..=7.5).contains(c), "{c} outside cube");
            }
        }
        // Uniform sampling should reach well into every octant.
        assert!(cloud.positions().iter().any(|p| p[0] > 5.0));
        assert!(cloud.positions().iter().any(|p| p[2] < -5.0));
    }

    #[test]
    fn rotation_accumulates_modulo_tau() {
        let step = Rotation { x: 0.0002, y: 0.0005 };
        let mut rotation = Rotation::default();
        for _ in 0..20_000 {
            rotation.advance(step);
        }

        assert!((rotation.x - (20_000.0 * 0.0002f64).rem_euclid(TAU)).abs() < 1e-6);
        assert!((rotation.y - (20_000.0 * 0.0005f64).rem_euclid(TAU)).abs() < 1e-6);
        assert!(rotation.y < TAU);
    }

    #[test]
    fn identity_rotation_leaves_points_alone() {
        let m = rotation_matrix(0.0, 0.0);
        let v = rotate_point(&m, [1.0, -2.0, 3.0]);
        assert!((v[0] - 1.0).abs() < EPSILON);
        assert!((v[1] + 2.0).abs() < EPSILON);
        assert!((v[2] - 3.0).abs() < EPSILON);
    }

    #[test]
    fn quarter_turn_about_y_maps_x_to_minus_z() {
        let m = rotation_matrix(0.0, std::f64::consts::FRAC_PI_2);
        let v = rotate_point(&m, [1.0, 0.0, 0.0]);
        assert!(v[0].abs() < EPSILON);
        assert!((v[2] + 1.0).abs() < EPSILON);
    }

    #[test]
    fn combined_matrix_applies_y_then_x() {
        let (x, y) = (0.7, -1.3);
        let (sx, cx) = f64::sin_cos(x);
        let (sy, cy) = f64::sin_cos(y);
        let point = [0.4, -2.5, 1.1];

        let about_y = [
            cy * point[0] + sy * point[2],
            point[1],
            -sy * point[0] + cy * point[2],
        ];
        let then_x = [
            about_y[0],
            cx * about_y[1] - sx * about_y[2],
            sx * about_y[1] + cx * about_y[2],
        ];

        let v = rotate_point(&rotation_matrix(x, y), point);
        for axis in 0..3 {
            assert!((v[axis] - then_x[axis]).abs() < EPSILON, "axis {axis}");
        }
    }

    #[test]
    fn origin_projects_to_viewport_center() {
        let p = camera().project([0.0, 0.0, 0.0], 1600.0, 900.0).unwrap();
        assert!((p.x - 800.0).abs() < EPSILON);
        assert!((p.y - 450.0).abs() < EPSILON);
        assert!((p.depth - 5.0).abs() < EPSILON);
    }

    #[test]
    fn points_behind_the_camera_are_culled() {
        let camera = camera();
        assert!(camera.project([0.0, 0.0, 5.0], 800.0, 600.0).is_none());
        assert!(camera.project([0.0, 0.0, 6.0], 800.0, 600.0).is_none());
        assert!(camera.project([0.0, 0.0, 4.95], 800.0, 600.0).is_none());
    }

    #[test]
    fn points_outside_the_frustum_are_culled() {
        assert!(camera().project([50.0, 0.0, 0.0], 800.0, 600.0).is_none());
    }

    #[test]
    fn positive_y_is_drawn_above_center() {
        let p = camera().project([0.0, 1.0, 0.0], 800.0, 600.0).unwrap();
        assert!(p.y < 300.0);
    }

    #[test]
    fn resize_updates_aspect() {
        let mut camera = camera();
        camera.set_aspect(1000.0, 500.0);
        assert!((camera.aspect() - 2.0).abs() < EPSILON);

        // A zero-height viewport keeps the previous aspect.
        camera.set_aspect(1000.0, 0.0);
        assert!((camera.aspect() - 2.0).abs() < EPSILON);
    }

    #[test]
    fn wider_aspect_pulls_points_towards_center() {
        let mut camera = camera();
        camera.set_aspect(800.0, 800.0);
        let square = camera.project([1.0, 0.0, 0.0], 800.0, 800.0).unwrap();
        camera.set_aspect(1600.0, 800.0);
        let wide = camera.project([1.0, 0.0, 0.0], 800.0, 800.0).unwrap();
        assert!(wide.x < square.x);
    }

    #[test]
    fn point_size_shrinks_with_depth() {
        let style = PointStyle {
            color: "#e0c110".to_string(),
            size: 0.02,
            opacity: 0.6,
        };
        assert!((style.pixel_size(5.0, 1000.0) - 2.0).abs() < EPSILON);
        assert!(style.pixel_size(10.0, 1000.0) < style.pixel_size(5.0, 1000.0));
    }
}
