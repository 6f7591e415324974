use crate::car::Garage;
use crate::color::Color;
use crate::math::{deg_to_rad, from_srt_euler, look_at, perspective, Mat4, Vec3};
use crate::model::Mesh;
use crate::overlay::{self, OverlayItem};
use crate::state::{Lighting, ShowcaseState};

/// Dark gray backdrop
pub const CLEAR_COLOR: Color = Color::rgb8(20, 20, 20);
pub const MODEL_SCALE: Vec3 = [1.0, 1.0, 1.0];
/// Turntable sits at the origin
pub const MODEL_POSITION: Vec3 = [0.0, 0.0, 0.0];

/// Fixed showcase camera
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Camera {
    pub position: Vec3,
    pub target: Vec3,
    pub up: Vec3,
    /// Vertical field of view in degrees
    pub fov_y: f64,
    pub near: f64,
    pub far: f64,
}

impl Default for Camera {
    fn default() -> Self {
        Camera {
            position: [0.0, 65.0, 200.0],
            target: [0.0, 0.0, 0.0],
            up: [0.0, 1.0, 0.0],
            fov_y: 60.0,
            near: 5.0,
            far: 200.0,
        }
    }
}

impl Camera {
    pub fn view(&self) -> Mat4 {
        look_at(&self.position, &self.target, &self.up)
    }

    pub fn projection(&self, aspect: f64) -> Mat4 {
        perspective(deg_to_rad(self.fov_y), aspect, self.near, self.far)
    }
}

/// The one model submitted for a frame
#[derive(Debug, Clone, Copy)]
pub struct DrawModel<'a> {
    pub mesh: &'a Mesh,
    pub transform: Mat4,
    pub paint: Color,
}

/// Everything a renderer needs to draw one frame
#[derive(Debug, Clone)]
pub struct Frame<'a> {
    pub clear: Color,
    pub camera: Camera,
    pub lighting: Lighting,
    /// Active car, `None` when it has no model
    pub model: Option<DrawModel<'a>>,
    pub overlay: Vec<OverlayItem>,
}

/// Model matrix for the turntable at `rotation_y`
pub fn model_transform(rotation_y: f64) -> Mat4 {
    from_srt_euler(&MODEL_SCALE, &[0.0, rotation_y, 0.0], &MODEL_POSITION)
}

/// Composes the frame for the active car only
pub fn compose<'a>(state: &ShowcaseState, garage: &'a Garage, camera: &Camera) -> Frame<'a> {
    let car = garage.get(state.current_car);
    let model = car.and_then(|car| {
        car.model.as_ref().map(|mesh| DrawModel {
            mesh,
            transform: model_transform(state.rotation_y),
            paint: car.pars.paint.into(),
        })
    });

    Frame {
        clear: CLEAR_COLOR,
        camera: *camera,
        lighting: state.lighting,
        model,
        overlay: overlay::build(state, car.map(|car| &car.pars)),
    }
}
