use std::fmt;
use std::sync::Arc;

use euclid::default::Rect;

use crate::color::Color;
use crate::node::InlineNode;

use super::style::TextStyle;

/// Discriminant of the element variants.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ElementKind {
    Text,
    Image,
    CustomNode,
    NewLine,
}

/// One inline unit of rich content.
///
/// The set is closed: the layout engine pattern-matches over these four
/// variants and nothing else. `CustomNode` is the designed escape hatch for
/// content the widget does not know about.
#[derive(Clone, Debug)]
pub enum RichElement {
    Text(TextElement),
    Image(ImageElement),
    CustomNode(CustomNodeElement),
    NewLine(NewLineElement),
}

impl RichElement {
    pub fn kind(&self) -> ElementKind {
        match self {
            RichElement::Text(_) => ElementKind::Text,
            RichElement::Image(_) => ElementKind::Image,
            RichElement::CustomNode(_) => ElementKind::CustomNode,
            RichElement::NewLine(_) => ElementKind::NewLine,
        }
    }

    /// Caller-assigned identifier. Not required to be unique.
    pub fn tag(&self) -> i32 {
        match self {
            RichElement::Text(e) => e.tag,
            RichElement::Image(e) => e.tag,
            RichElement::CustomNode(e) => e.tag,
            RichElement::NewLine(e) => e.tag,
        }
    }

    pub fn color(&self) -> Color {
        match self {
            RichElement::Text(e) => e.color,
            RichElement::Image(e) => e.color,
            RichElement::CustomNode(e) => e.color,
            RichElement::NewLine(e) => e.color,
        }
    }

    pub fn opacity(&self) -> u8 {
        match self {
            RichElement::Text(e) => e.opacity,
            RichElement::Image(e) => e.opacity,
            RichElement::CustomNode(e) => e.opacity,
            RichElement::NewLine(e) => e.opacity,
        }
    }
}

/// Styled text run.
#[derive(Clone, Debug, PartialEq)]
pub struct TextElement {
    pub tag: i32,
    pub color: Color,
    pub opacity: u8,
    pub text: String,
    pub font_name: String,
    pub font_size: f32,
    pub style: TextStyle,
    /// Attached link target. Fragments produced from this run carry the URL
    /// so the host can wire click-through; interaction is not handled here.
    pub url: Option<String>,
}

impl TextElement {
    pub fn new(
        tag: i32,
        color: Color,
        opacity: u8,
        text: impl Into<String>,
        font_name: impl Into<String>,
        font_size: f32,
        style: TextStyle,
    ) -> Self {
        Self {
            tag,
            color,
            opacity,
            text: text.into(),
            font_name: font_name.into(),
            font_size,
            style,
            url: None,
        }
    }

    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.url = Some(url.into());
        self
    }
}

/// Texture source discriminant for image elements.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum TextureKind {
    /// A standalone image file.
    #[default]
    Local,
    /// A sprite-sheet entry resolved by the host's sprite cache.
    PlistSprite,
}

/// Inline image, treated by layout as an atomic box.
#[derive(Clone, Debug, PartialEq)]
pub struct ImageElement {
    pub tag: i32,
    pub color: Color,
    pub opacity: u8,
    pub file_path: String,
    /// Sub-rectangle within the source image, for atlas use. `None` means
    /// the full image.
    pub source_rect: Option<Rect<f32>>,
    pub texture_kind: TextureKind,
    width: f32,
    height: f32,
}

impl ImageElement {
    pub fn new(
        tag: i32,
        color: Color,
        opacity: u8,
        file_path: impl Into<String>,
        width: f32,
        height: f32,
    ) -> Self {
        Self {
            tag,
            color,
            opacity,
            file_path: file_path.into(),
            source_rect: None,
            texture_kind: TextureKind::Local,
            width,
            height,
        }
    }

    pub fn with_source_rect(mut self, rect: Rect<f32>) -> Self {
        self.source_rect = Some(rect);
        self
    }

    pub fn with_texture_kind(mut self, kind: TextureKind) -> Self {
        self.texture_kind = kind;
        self
    }

    pub fn width(&self) -> f32 {
        self.width
    }

    pub fn height(&self) -> f32 {
        self.height
    }

    /// Changes the target display width. The source rect is untouched.
    ///
    /// Once the element lives inside a container, reach it through
    /// `RichText::element_mut` so the layout cache is invalidated.
    pub fn set_width(&mut self, width: f32) {
        self.width = width;
    }

    /// Changes the target display height. See [`Self::set_width`].
    pub fn set_height(&mut self, height: f32) {
        self.height = height;
    }
}

/// Embedded scene-graph node.
///
/// The node is shared: the element holds one counted reference and every
/// fragment produced for it holds another, so attach/detach/destroy cycles
/// cannot double-release it.
#[derive(Clone)]
pub struct CustomNodeElement {
    pub tag: i32,
    pub color: Color,
    pub opacity: u8,
    pub node: Arc<dyn InlineNode>,
}

impl CustomNodeElement {
    pub fn new(tag: i32, color: Color, opacity: u8, node: Arc<dyn InlineNode>) -> Self {
        Self {
            tag,
            color,
            opacity,
            node,
        }
    }
}

impl fmt::Debug for CustomNodeElement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CustomNodeElement")
            .field("tag", &self.tag)
            .field("color", &self.color)
            .field("opacity", &self.opacity)
            .field("node_size", &self.node.size())
            .finish()
    }
}

/// Forced line break.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct NewLineElement {
    pub tag: i32,
    pub color: Color,
    pub opacity: u8,
}

impl NewLineElement {
    pub fn new(tag: i32, color: Color, opacity: u8) -> Self {
        Self {
            tag,
            color,
            opacity,
        }
    }
}

impl From<TextElement> for RichElement {
    fn from(e: TextElement) -> Self {
        RichElement::Text(e)
    }
}

impl From<ImageElement> for RichElement {
    fn from(e: ImageElement) -> Self {
        RichElement::Image(e)
    }
}

impl From<CustomNodeElement> for RichElement {
    fn from(e: CustomNodeElement) -> Self {
        RichElement::CustomNode(e)
    }
}

impl From<NewLineElement> for RichElement {
    fn from(e: NewLineElement) -> Self {
        RichElement::NewLine(e)
    }
}
