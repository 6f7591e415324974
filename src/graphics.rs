use crate::color::Color;
use crate::math::{
    apply_lighting, calculate_light_intensity, calculate_normal, edge_function, multiply_matrices,
    multiply_matrix_point, Mat4, Vec3,
};
use crate::scene::DrawModel;
use crate::state::Lighting;
use crate::vertex::Vertex;

/// Color buffer with a matching depth buffer
#[derive(Debug, Clone)]
pub struct Framebuffer {
    width: usize,
    height: usize,
    pixels: Vec<Color>,
    z_buffer: Vec<f64>,
}

impl Framebuffer {
    pub fn new(width: usize, height: usize) -> Self {
        Framebuffer {
            width,
            height,
            pixels: vec![Color::BLACK; width * height],
            z_buffer: vec![f64::INFINITY; width * height],
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// Reallocates when the size changed
    pub fn resize(&mut self, width: usize, height: usize) {
        if width != self.width || height != self.height {
            *self = Framebuffer::new(width, height);
        }
    }

    /// Clears color and depth
    pub fn clear(&mut self, color: Color) {
        self.pixels.fill(color);
        self.z_buffer.fill(f64::INFINITY);
    }

    pub fn pixel(&self, x: usize, y: usize) -> Color {
        self.pixels[y * self.width + x]
    }

    /// Bounding box of a screen-space triangle, clamped to the buffer
    fn bounds(&self, points: [&[f64; 2]; 3]) -> Option<(usize, usize, usize, usize)> {
        if self.width == 0 || self.height == 0 {
            return None;
        }
        let min_x = points[0][0].min(points[1][0]).min(points[2][0]).floor();
        let max_x = points[0][0].max(points[1][0]).max(points[2][0]).ceil();
        let min_y = points[0][1].min(points[1][1]).min(points[2][1]).floor();
        let max_y = points[0][1].max(points[1][1]).max(points[2][1]).ceil();
        if max_x < 0.0 || max_y < 0.0 || min_x >= self.width as f64 || min_y >= self.height as f64
        {
            return None;
        }
        Some((
            min_x.max(0.0) as usize,
            max_x.min(self.width as f64 - 1.0) as usize,
            min_y.max(0.0) as usize,
            max_y.min(self.height as f64 - 1.0) as usize,
        ))
    }
}

/// Normalized barycentric weights of `p`, `None` outside the triangle.
/// Both windings are accepted.
fn barycentric(a: &[f64; 2], b: &[f64; 2], c: &[f64; 2], p: &[f64; 2]) -> Option<[f64; 3]> {
    let area = edge_function(a, b, c);
    if area == 0.0 {
        return None;
    }
    let w0 = edge_function(b, c, p) / area;
    let w1 = edge_function(c, a, p) / area;
    let w2 = edge_function(a, b, p) / area;
    if w0 >= 0.0 && w1 >= 0.0 && w2 >= 0.0 {
        Some([w0, w1, w2])
    } else {
        None
    }
}

/// Draws a depth-tested, flat-colored triangle
pub fn draw_triangle(v0: &Vertex, v1: &Vertex, v2: &Vertex, fb: &mut Framebuffer, color: Color) {
    let Some((min_x, max_x, min_y, max_y)) =
        fb.bounds([&v0.screen_position, &v1.screen_position, &v2.screen_position])
    else {
        return;
    };

    for y in min_y..=max_y {
        for x in min_x..=max_x {
            let p = [x as f64 + 0.5, y as f64 + 0.5];
            let Some([w0, w1, w2]) =
                barycentric(&v0.screen_position, &v1.screen_position, &v2.screen_position, &p)
            else {
                continue;
            };

            // Depth test
            let depth = v0.depth * w0 + v1.depth * w1 + v2.depth * w2;
            let offset = y * fb.width + x;
            if depth < fb.z_buffer[offset] {
                fb.z_buffer[offset] = depth;
                fb.pixels[offset] = color;
            }
        }
    }
}

/// Fills a screen-space triangle, blending by the color's alpha. Ignores depth.
pub fn fill_triangle(points: &[[f64; 2]; 3], fb: &mut Framebuffer, color: Color) {
    let Some((min_x, max_x, min_y, max_y)) = fb.bounds([&points[0], &points[1], &points[2]])
    else {
        return;
    };

    for y in min_y..=max_y {
        for x in min_x..=max_x {
            let p = [x as f64 + 0.5, y as f64 + 0.5];
            if barycentric(&points[0], &points[1], &points[2], &p).is_some() {
                let offset = y * fb.width + x;
                fb.pixels[offset] = color.over(fb.pixels[offset]);
            }
        }
    }
}

/// Transforms, lights and rasterizes a model. Triangles reaching in front of
/// the near plane are dropped.
pub fn draw_model(
    model: &DrawModel<'_>,
    view: &Mat4,
    projection: &Mat4,
    near: f64,
    lighting: &Lighting,
    fb: &mut Framebuffer,
) {
    let width = fb.width() as f64;
    let height = fb.height() as f64;
    let view_projection = multiply_matrices(projection, view);

    let world: Vec<Vec3> = model
        .mesh
        .positions
        .iter()
        .map(|p| {
            let [x, y, z, _] = multiply_matrix_point(&model.transform, p);
            [x, y, z]
        })
        .collect();
    let projected: Vec<Option<Vertex>> = world
        .iter()
        .map(|p| {
            let [x, y, _, w] = multiply_matrix_point(&view_projection, p);
            (w >= near).then(|| Vertex {
                depth: w,
                screen_position: [
                    (x / w + 1.0) * 0.5 * width,
                    (1.0 - y / w) * 0.5 * height,
                ],
            })
        })
        .collect();

    for &[a, b, c] in &model.mesh.triangles {
        let (Some(v0), Some(v1), Some(v2)) = (projected[a], projected[b], projected[c]) else {
            continue;
        };
        let normal = calculate_normal(&world[a], &world[b], &world[c]);
        let intensity = calculate_light_intensity(&normal, &lighting.direction);
        let shaded = apply_lighting(
            model.paint,
            lighting.ambient,
            lighting.directional,
            intensity,
        );
        draw_triangle(&v0, &v1, &v2, fb, shaded);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Mesh;
    use crate::scene::{model_transform, Camera, CLEAR_COLOR};

    fn vertex(x: f64, y: f64, depth: f64) -> Vertex {
        Vertex {
            depth,
            screen_position: [x, y],
        }
    }

    #[test]
    fn nearer_triangle_wins_regardless_of_order() {
        let red = Color::rgb8(255, 0, 0);
        let blue = Color::rgb8(0, 0, 255);
        let mut fb = Framebuffer::new(8, 8);
        let far = [vertex(0.0, 0.0, 10.0), vertex(8.0, 0.0, 10.0), vertex(0.0, 8.0, 10.0)];
        let close = [vertex(0.0, 0.0, 1.0), vertex(0.0, 8.0, 1.0), vertex(8.0, 0.0, 1.0)];
        draw_triangle(&close[0], &close[1], &close[2], &mut fb, blue);
        draw_triangle(&far[0], &far[1], &far[2], &mut fb, red);
        assert_eq!(fb.pixel(1, 1), blue);
        assert_eq!(fb.pixel(7, 7), Color::BLACK);
    }

    #[test]
    fn offscreen_triangle_is_ignored() {
        let mut fb = Framebuffer::new(4, 4);
        let points = [[-10.0, -10.0], [-5.0, -10.0], [-10.0, -5.0]];
        fill_triangle(&points, &mut fb, Color::WHITE);
        assert!((0..4).all(|x| (0..4).all(|y| fb.pixel(x, y) == Color::BLACK)));
    }

    #[test]
    fn translucent_fill_blends() {
        let mut fb = Framebuffer::new(4, 4);
        fb.clear(Color::BLACK);
        let points = [[0.0, 0.0], [4.0, 0.0], [0.0, 4.0]];
        fill_triangle(&points, &mut fb, Color::rgba8(200, 100, 0, 128));
        assert_eq!(fb.pixel(0, 0), Color::rgb8(100, 50, 0));
    }

    #[test]
    fn clear_resets_depth() {
        let mut fb = Framebuffer::new(2, 2);
        let tri = [vertex(0.0, 0.0, 1.0), vertex(2.0, 0.0, 1.0), vertex(0.0, 2.0, 1.0)];
        draw_triangle(&tri[0], &tri[1], &tri[2], &mut fb, Color::WHITE);
        fb.clear(CLEAR_COLOR);
        let deeper = [vertex(0.0, 0.0, 5.0), vertex(2.0, 0.0, 5.0), vertex(0.0, 2.0, 5.0)];
        draw_triangle(&deeper[0], &deeper[1], &deeper[2], &mut fb, Color::WHITE);
        assert_eq!(fb.pixel(0, 0), Color::WHITE);
    }

    #[test]
    fn model_at_origin_lands_in_the_middle() {
        let mesh = Mesh::parse("v -60 0 -60\nv 60 0 -60\nv 60 0 60\nv -60 0 60\nf 4 3 2 1\n")
            .unwrap();
        let model = DrawModel {
            mesh: &mesh,
            transform: model_transform(0.3),
            paint: Color::WHITE,
        };
        let camera = Camera::default();
        let mut fb = Framebuffer::new(40, 40);
        fb.clear(CLEAR_COLOR);
        draw_model(
            &model,
            &camera.view(),
            &camera.projection(1.0),
            camera.near,
            &Lighting::default(),
            &mut fb,
        );
        let center = fb.pixel(20, 20);
        assert_ne!(center, CLEAR_COLOR);
        // Upward facing floor under an overhead light is lit above ambient
        assert!(center.r > 80);
        assert_eq!(fb.pixel(0, 0), CLEAR_COLOR);
    }

    #[test]
    fn geometry_behind_camera_is_dropped() {
        let mesh = Mesh::parse("v -5 60 210\nv 5 60 210\nv 0 70 210\nf 1 2 3\n").unwrap();
        let model = DrawModel {
            mesh: &mesh,
            transform: model_transform(0.0),
            paint: Color::WHITE,
        };
        let camera = Camera::default();
        let mut fb = Framebuffer::new(10, 10);
        fb.clear(CLEAR_COLOR);
        draw_model(
            &model,
            &camera.view(),
            &camera.projection(1.0),
            camera.near,
            &Lighting::default(),
            &mut fb,
        );
        assert!((0..10).all(|x| (0..10).all(|y| fb.pixel(x, y) == CLEAR_COLOR)));
    }
}
