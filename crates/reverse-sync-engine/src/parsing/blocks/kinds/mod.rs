pub mod code_fence;
pub mod list_marker;

pub use code_fence::{CodeFence, Frontmatter};
pub use list_marker::{ListMarker, MarkerKind};
