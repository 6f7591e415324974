/// Projected vertex: view-space depth and framebuffer position
#[derive(Debug, Clone, Copy)]
pub struct Vertex {
    pub depth: f64,
    pub screen_position: [f64; 2],
}
