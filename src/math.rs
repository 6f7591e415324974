use crate::color::Color;

pub type Vec3 = [f64; 3];
pub type Mat4 = [[f64; 4]; 4];

/// Edge function used in rasterization
pub fn edge_function(a: &[f64; 2], b: &[f64; 2], c: &[f64; 2]) -> f64 {
    (c[0] - a[0]) * (b[1] - a[1]) - (c[1] - a[1]) * (b[0] - a[0])
}

pub fn deg_to_rad(degrees: f64) -> f64 {
    degrees * std::f64::consts::PI / 180.0
}

pub fn subtract(a: &Vec3, b: &Vec3) -> Vec3 {
    [a[0] - b[0], a[1] - b[1], a[2] - b[2]]
}

pub fn dot(a: &Vec3, b: &Vec3) -> f64 {
    a[0] * b[0] + a[1] * b[1] + a[2] * b[2]
}

pub fn cross(u: &Vec3, v: &Vec3) -> Vec3 {
    [
        u[1] * v[2] - u[2] * v[1],
        u[2] * v[0] - u[0] * v[2],
        u[0] * v[1] - u[1] * v[0],
    ]
}

/// Normalizes a vector; the zero vector is returned unchanged
pub fn normalize(v: &Vec3) -> Vec3 {
    let length = dot(v, v).sqrt();
    if length == 0.0 {
        return *v;
    }
    [v[0] / length, v[1] / length, v[2] / length]
}

/// Multiplies two 4x4 matrices
pub fn multiply_matrices(a: &Mat4, b: &Mat4) -> Mat4 {
    let mut result = [[0.0; 4]; 4];
    for i in 0..4 {
        for j in 0..4 {
            for k in 0..4 {
                result[i][j] += a[i][k] * b[k][j];
            }
        }
    }
    result
}

/// Multiplies a 4x4 matrix by a point (w = 1), returning homogeneous coordinates
pub fn multiply_matrix_point(matrix: &Mat4, point: &Vec3) -> [f64; 4] {
    let vector = [point[0], point[1], point[2], 1.0];
    let mut result = [0.0; 4];
    for i in 0..4 {
        for j in 0..4 {
            result[i] += matrix[i][j] * vector[j];
        }
    }
    result
}

/// Builds a model matrix from scale, euler rotation (radians, applied X then Y then Z) and
/// translation
pub fn from_srt_euler(scale: &Vec3, rotation: &Vec3, position: &Vec3) -> Mat4 {
    let (sin_x, cos_x) = rotation[0].sin_cos();
    let (sin_y, cos_y) = rotation[1].sin_cos();
    let (sin_z, cos_z) = rotation[2].sin_cos();
    let rotation_x = [
        [1.0, 0.0, 0.0, 0.0],
        [0.0, cos_x, -sin_x, 0.0],
        [0.0, sin_x, cos_x, 0.0],
        [0.0, 0.0, 0.0, 1.0],
    ];
    let rotation_y = [
        [cos_y, 0.0, sin_y, 0.0],
        [0.0, 1.0, 0.0, 0.0],
        [-sin_y, 0.0, cos_y, 0.0],
        [0.0, 0.0, 0.0, 1.0],
    ];
    let rotation_z = [
        [cos_z, -sin_z, 0.0, 0.0],
        [sin_z, cos_z, 0.0, 0.0],
        [0.0, 0.0, 1.0, 0.0],
        [0.0, 0.0, 0.0, 1.0],
    ];
    let scaling = [
        [scale[0], 0.0, 0.0, 0.0],
        [0.0, scale[1], 0.0, 0.0],
        [0.0, 0.0, scale[2], 0.0],
        [0.0, 0.0, 0.0, 1.0],
    ];

    let rotation = multiply_matrices(&rotation_z, &multiply_matrices(&rotation_y, &rotation_x));
    let mut result = multiply_matrices(&rotation, &scaling);
    result[0][3] = position[0];
    result[1][3] = position[1];
    result[2][3] = position[2];
    result
}

/// Right-handed view matrix looking from `eye` towards `target`
pub fn look_at(eye: &Vec3, target: &Vec3, up: &Vec3) -> Mat4 {
    let forward = normalize(&subtract(target, eye));
    let side = normalize(&cross(&forward, up));
    let up = cross(&side, &forward);
    [
        [side[0], side[1], side[2], -dot(&side, eye)],
        [up[0], up[1], up[2], -dot(&up, eye)],
        [-forward[0], -forward[1], -forward[2], dot(&forward, eye)],
        [0.0, 0.0, 0.0, 1.0],
    ]
}

/// Perspective projection; clip-space w holds the view depth
pub fn perspective(fov_y: f64, aspect: f64, near: f64, far: f64) -> Mat4 {
    let f = 1.0 / (fov_y / 2.0).tan();
    [
        [f / aspect, 0.0, 0.0, 0.0],
        [0.0, f, 0.0, 0.0],
        [
            0.0,
            0.0,
            (far + near) / (near - far),
            2.0 * far * near / (near - far),
        ],
        [0.0, 0.0, -1.0, 0.0],
    ]
}

/// Calculates the normal vector of a triangle
pub fn calculate_normal(a: &Vec3, b: &Vec3, c: &Vec3) -> Vec3 {
    let u = subtract(b, a);
    let v = subtract(c, a);
    normalize(&cross(&u, &v))
}

/// Lambert term for a directional light travelling along `light_dir`
pub fn calculate_light_intensity(normal: &Vec3, light_dir: &Vec3) -> f64 {
    let towards_light = [-light_dir[0], -light_dir[1], -light_dir[2]];
    dot(normal, &towards_light).max(0.0)
}

/// Applies ambient plus one directional light to a color
pub fn apply_lighting(color: Color, ambient: Color, directional: Color, intensity: f64) -> Color {
    let channel = |base: u8, amb: u8, dir: u8| {
        let light = amb as f64 + dir as f64 * intensity;
        (base as f64 * light / 255.0).min(255.0) as u8
    };
    Color::rgb8(
        channel(color.r, ambient.r, directional.r),
        channel(color.g, ambient.g, directional.g),
        channel(color.b, ambient.b, directional.b),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use std::f64::consts::FRAC_PI_2;

    #[test]
    fn quarter_turn_about_y_maps_x_to_minus_z() {
        let m = from_srt_euler(&[1.0; 3], &[0.0, FRAC_PI_2, 0.0], &[0.0; 3]);
        let p = multiply_matrix_point(&m, &[1.0, 0.0, 0.0]);
        assert_abs_diff_eq!(p[0], 0.0, epsilon = 1e-9);
        assert_abs_diff_eq!(p[2], -1.0, epsilon = 1e-9);
    }

    #[test]
    fn srt_applies_scale_before_translation() {
        let m = from_srt_euler(&[2.0, 2.0, 2.0], &[0.0; 3], &[1.0, 0.0, -3.0]);
        let p = multiply_matrix_point(&m, &[1.0, 1.0, 1.0]);
        assert_eq!(&p[..3], &[3.0, 2.0, -1.0]);
        assert_eq!(p[3], 1.0);
    }

    #[test]
    fn look_at_puts_target_in_front_of_camera() {
        let view = look_at(&[0.0, 65.0, 200.0], &[0.0; 3], &[0.0, 1.0, 0.0]);
        let target = multiply_matrix_point(&view, &[0.0; 3]);
        let distance = (65.0f64 * 65.0 + 200.0 * 200.0).sqrt();
        assert_abs_diff_eq!(target[0], 0.0, epsilon = 1e-9);
        assert_abs_diff_eq!(target[1], 0.0, epsilon = 1e-9);
        assert_abs_diff_eq!(target[2], -distance, epsilon = 1e-9);
    }

    #[test]
    fn perspective_w_is_view_depth() {
        let projection = perspective(deg_to_rad(60.0), 1.0, 5.0, 200.0);
        let clip = multiply_matrix_point(&projection, &[0.0, 0.0, -50.0]);
        assert_abs_diff_eq!(clip[3], 50.0);
        let near = multiply_matrix_point(&projection, &[0.0, 0.0, -5.0]);
        assert_abs_diff_eq!(near[2] / near[3], -1.0, epsilon = 1e-9);
    }

    #[test]
    fn light_from_above_lights_upward_faces_only() {
        let down = normalize(&[0.0, -1.0, 0.0]);
        assert_abs_diff_eq!(calculate_light_intensity(&[0.0, 1.0, 0.0], &down), 1.0);
        assert_eq!(calculate_light_intensity(&[0.0, -1.0, 0.0], &down), 0.0);
    }

    #[test]
    fn lighting_saturates_at_full_channel() {
        let lit = apply_lighting(
            Color::WHITE,
            Color::rgb8(80, 80, 80),
            Color::rgb8(220, 220, 220),
            1.0,
        );
        assert_eq!(lit, Color::WHITE);
        let unlit = apply_lighting(
            Color::WHITE,
            Color::rgb8(80, 80, 80),
            Color::rgb8(220, 220, 220),
            0.0,
        );
        assert_eq!(unlit, Color::rgb8(80, 80, 80));
    }

    #[test]
    fn normalize_leaves_zero_vector() {
        assert_eq!(normalize(&[0.0; 3]), [0.0; 3]);
    }
}
