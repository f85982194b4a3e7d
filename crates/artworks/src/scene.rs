use glam::{Mat4, Vec3};

use crate::canvas::Color;
use crate::Viewport;

/// Perspective camera looking at the origin.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Camera {
    pub position: Vec3,
    pub target: Vec3,
    /// Vertical field of view in degrees.
    pub fov: f32,
    pub near: f32,
    pub far: f32,
    aspect: f32,
}

/// A world point mapped onto the canvas.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Projected {
    pub x: f32,
    pub y: f32,
    /// Distance from the camera eye.
    pub distance: f32,
    /// Pixels per world unit at this distance.
    pub scale: f32,
}

impl Camera {
    pub fn gallery(viewport: Viewport) -> Self {
        Self {
            position: Vec3::new(0.0, 0.0, 10.0),
            target: Vec3::ZERO,
            fov: 45.0,
            near: 0.1,
            far: 1000.0,
            aspect: viewport.aspect(),
        }
    }

    pub fn aspect(&self) -> f32 {
        self.aspect
    }

    pub fn set_viewport(&mut self, viewport: Viewport) {
        if !viewport.is_empty() {
            self.aspect = viewport.aspect();
        }
    }

    pub fn view_projection(&self) -> Mat4 {
        let projection = Mat4::perspective_rh(self.fov.to_radians(), self.aspect, self.near, self.far);
        projection * Mat4::look_at_rh(self.position, self.target, Vec3::Y)
    }

    /// Projects `point` onto a canvas of `viewport` size, or `None` when it
    /// falls outside the near/far range.
    pub fn project(&self, point: Vec3, viewport: Viewport) -> Option<Projected> {
        let clip = self.view_projection() * point.extend(1.0);
        if clip.w <= f32::EPSILON {
            return None;
        }
        let ndc = clip.truncate() / clip.w;
        if !(0.0..=1.0).contains(&ndc.z) {
            return None;
        }
        let distance = self.position.distance(point);
        let half_fov = (self.fov.to_radians() * 0.5).tan();
        Some(Projected {
            x: (ndc.x + 1.0) * 0.5 * viewport.width as f32,
            y: (1.0 - ndc.y) * 0.5 * viewport.height as f32,
            distance,
            scale: viewport.height as f32 / (2.0 * half_fov * distance.max(self.near)),
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LightRig {
    pub ambient: f32,
    /// Direction the directional light travels in.
    pub direction: Vec3,
    pub intensity: f32,
}

impl Default for LightRig {
    fn default() -> Self {
        Self {
            ambient: 0.35,
            direction: Vec3::new(-10.0, -10.0, -5.0).normalize(),
            intensity: 0.9,
        }
    }
}

impl LightRig {
    /// Lambert term for a surface with the given normal, in `0..=1`.
    pub fn shade(&self, normal: Vec3) -> f32 {
        let normal = normal.normalize_or_zero();
        let diffuse = normal.dot(-self.direction).max(0.0) * self.intensity;
        (self.ambient + diffuse).clamp(0.0, 1.0)
    }
}

/// Linear distance fog.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Fog {
    pub color: Color,
    pub near: f32,
    pub far: f32,
}

impl Default for Fog {
    fn default() -> Self {
        Self {
            color: Color::VOID,
            near: 10.0,
            far: 100.0,
        }
    }
}

impl Fog {
    pub fn factor(&self, distance: f32) -> f32 {
        if self.far <= self.near {
            return if distance >= self.far { 1.0 } else { 0.0 };
        }
        ((distance - self.near) / (self.far - self.near)).clamp(0.0, 1.0)
    }

    pub fn apply(&self, color: Color, distance: f32) -> Color {
        let alpha = color.a;
        Color {
            a: alpha,
            ..color.lerp(self.color, self.factor(distance))
        }
    }
}

/// Everything a 3D artwork draws through.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Scene {
    pub camera: Camera,
    pub lights: LightRig,
    pub fog: Fog,
    pub background: Color,
}

impl Scene {
    pub fn new(viewport: Viewport) -> Self {
        Self {
            camera: Camera::gallery(viewport),
            lights: LightRig::default(),
            fog: Fog::default(),
            background: Color::VOID,
        }
    }

    pub fn resize(&mut self, viewport: Viewport) {
        self.camera.set_viewport(viewport);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const VIEW: Viewport = Viewport {
        width: 800,
        height: 600,
    };

    #[test]
    fn origin_projects_to_center() {
        let camera = Camera::gallery(VIEW);
        let p = camera.project(Vec3::ZERO, VIEW).expect("visible");
        assert!((p.x - 400.0).abs() < 0.01);
        assert!((p.y - 300.0).abs() < 0.01);
        assert!((p.distance - 10.0).abs() < 1e-4);
    }

    #[test]
    fn up_is_up_on_screen() {
        let camera = Camera::gallery(VIEW);
        let p = camera.project(Vec3::new(0.0, 1.0, 0.0), VIEW).unwrap();
        assert!(p.y < 300.0);
    }

    #[test]
    fn points_behind_camera_are_culled() {
        let camera = Camera::gallery(VIEW);
        assert!(camera.project(Vec3::new(0.0, 0.0, 20.0), VIEW).is_none());
        assert!(camera.project(Vec3::new(0.0, 0.0, -2000.0), VIEW).is_none());
    }

    #[test]
    fn resize_updates_aspect_and_skips_empty() {
        let mut scene = Scene::new(VIEW);
        scene.resize(Viewport::new(1000, 500));
        assert!((scene.camera.aspect() - 2.0).abs() < f32::EPSILON);
        scene.resize(Viewport::new(0, 500));
        assert!((scene.camera.aspect() - 2.0).abs() < f32::EPSILON);
    }

    #[test]
    fn fog_ramps_between_near_and_far() {
        let fog = Fog::default();
        assert_eq!(fog.factor(5.0), 0.0);
        assert!((fog.factor(55.0) - 0.5).abs() < 1e-6);
        assert_eq!(fog.factor(500.0), 1.0);
        assert_eq!(fog.apply(Color::WHITE, 200.0), Color::VOID);
    }

    #[test]
    fn light_facing_surface_is_brighter() {
        let rig = LightRig::default();
        let lit = rig.shade(-rig.direction);
        let unlit = rig.shade(rig.direction);
        assert!(lit > unlit);
        assert!((unlit - rig.ambient).abs() < 1e-6);
    }
}
