/// The element variants and their payloads.
pub mod data;
/// Structured style record and the wire bitmask.
pub mod style;

pub use data::{
    CustomNodeElement, ElementKind, ImageElement, NewLineElement, RichElement, TextElement,
    TextureKind,
};
pub use style::{StyleFlags, TextStyle};
