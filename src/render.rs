use crate::scene::Frame;

/// Display backend: draws and presents one composed frame
pub trait Renderer {
    fn draw_frame(&mut self, frame: &Frame<'_>) -> anyhow::Result<()>;
}
