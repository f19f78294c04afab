//! # Tanzaku
//!
//! A rich-text layout widget for 2D UI toolkits.
//!
//! ## Overview
//!
//! `Tanzaku` models a document as an ordered sequence of inline elements
//! (styled text runs, inline images, embedded custom nodes, forced line
//! breaks) and flows them into wrapped lines inside a container. The output
//! is a set of positioned fragments the host attaches to its own render
//! tree; rendering itself stays on the host side.
//!
//! ## Usage
//!
//! ```rust
//! use tanzaku::{
//!     Color, FixedMeasurer, RichText, TextElement, TextStyle,
//!     euclid::default::Size2D,
//! };
//!
//! // 1. Build the document.
//! let mut rich_text = RichText::new();
//! rich_text.set_container_size(Size2D::new(200.0, 100.0));
//! rich_text.push_back_element(TextElement::new(
//!     0, Color::WHITE, 255, "The quick brown fox", "sans-serif", 12.0,
//!     TextStyle::default(),
//! ));
//!
//! // 2. Reflow against a measurer (use FontMeasurer for real font metrics).
//! let measurer = FixedMeasurer::default();
//! rich_text.reflow_if_needed(&measurer);
//!
//! // 3. Hand the fragments to the renderer.
//! for fragment in rich_text.fragments() {
//!     let _ = (fragment.origin, fragment.size);
//! }
//! ```
//!
//! ## Features
//!
//! *   **Closed element model**: four element kinds, with custom nodes as
//!     the escape hatch for arbitrary host content.
//! *   **Two wrap modes**: per-word breaking with per-character fallback for
//!     oversized words, or per-character breaking throughout.
//! *   **Content adaptation**: fixed-size wrapping, or auto-sizing the
//!     container to the laid-out content.
//! *   **Markup construction**: an HTML-like XML dialect builds element
//!     sequences directly.

pub mod color;
pub mod element;
pub mod font_cache;
pub mod font_measurer;
pub mod markup;
pub mod measure;
pub mod node;
pub mod widget;

// common re-exports
pub use color::Color;
pub use element::{
    CustomNodeElement, ElementKind, ImageElement, NewLineElement, RichElement, StyleFlags,
    TextElement, TextStyle, TextureKind,
};
pub use font_cache::FontCache;
pub use font_measurer::FontMeasurer;
pub use markup::parse_markup;
pub use measure::{FixedMeasurer, TextMeasurer};
pub use node::{InlineNode, SizedNode};
pub use widget::{Fragment, FragmentKind, LayoutState, Line, RichText, WrapMode};

// re-export dependencies
pub use euclid;
pub use fontdb;
pub use fontdue;
pub use parking_lot;
