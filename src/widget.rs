/// The flow engine that wraps elements into positioned lines.
pub mod flow;
/// The rich text container and its mutation API.
pub mod rich_text;

pub use flow::{Fragment, FragmentKind, Line, WrapMode};
pub use rich_text::{DEFAULT_FONT_NAME, DEFAULT_FONT_SIZE, LayoutState, RichText};
