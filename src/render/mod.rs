//! Frame rendering on the CPU: the owned drawing surface, backdrop paints and the caption
//! compositor.

pub(crate) mod backdrop;
/// Caption scene compositor.
pub mod compositor;
/// Drawing surface, caption font and frame buffers.
pub mod surface;
