pub mod linear;
pub mod playground;

pub use linear::History;
pub use playground::{EditorState, Offset, Playground};
