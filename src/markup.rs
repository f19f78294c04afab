//! XML markup dialect for building element sequences.
//!
//! Tags map onto the element model: style tags (`b`/`strong`, `i`/`em`,
//! `u`, `del`/`s`, `a href`, `font face size color`) accumulate onto the
//! active style as flags, `br` inserts a line break, `img src width height`
//! inserts an image, and text nodes become text elements under whatever
//! style is active. Flags are flags, not a style tree: nesting simply ORs
//! them.
//!
//! The grammar is forgiving. Unknown tags are transparent (their children
//! still parse), bad attribute values fall back to the inherited value, and
//! both are logged. Only a malformed document aborts, surfacing as `None`.

use crate::color::Color;
use crate::element::{ImageElement, NewLineElement, RichElement, TextElement, TextStyle};
use crate::widget::{DEFAULT_FONT_NAME, DEFAULT_FONT_SIZE, RichText};

/// Style context inherited down the markup tree.
#[derive(Clone)]
struct StyleState {
    color: Color,
    opacity: u8,
    font_name: String,
    font_size: f32,
    style: TextStyle,
    url: Option<String>,
}

impl Default for StyleState {
    fn default() -> Self {
        Self {
            color: Color::WHITE,
            opacity: 255,
            font_name: DEFAULT_FONT_NAME.to_string(),
            font_size: DEFAULT_FONT_SIZE,
            style: TextStyle::default(),
            url: None,
        }
    }
}

/// Parses markup into an element sequence.
///
/// The input does not need a single root; it is wrapped before parsing.
/// Returns `None` when the XML itself is malformed.
pub fn parse_markup(xml: &str) -> Option<Vec<RichElement>> {
    let wrapped = format!("<tanzaku>{xml}</tanzaku>");
    let doc = match roxmltree::Document::parse(&wrapped) {
        Ok(doc) => doc,
        Err(e) => {
            log::error!("Failed to parse rich text markup: {}", e);
            return None;
        }
    };

    let mut elements = Vec::new();
    let base = StyleState::default();
    for child in doc.root_element().children() {
        walk(child, &base, &mut elements);
    }
    Some(elements)
}

fn walk(node: roxmltree::Node<'_, '_>, style: &StyleState, out: &mut Vec<RichElement>) {
    if node.is_text() {
        let text = node.text().unwrap_or("");
        if !text.is_empty() {
            let mut element = TextElement::new(
                0,
                style.color,
                style.opacity,
                text,
                style.font_name.clone(),
                style.font_size,
                style.style,
            );
            element.url = style.url.clone();
            out.push(element.into());
        }
        return;
    }
    if !node.is_element() {
        return;
    }

    match node.tag_name().name() {
        "br" => {
            out.push(NewLineElement::new(0, style.color, style.opacity).into());
        }
        "img" => {
            let Some(src) = node.attribute("src") else {
                log::warn!("<img> without src attribute, skipping");
                return;
            };
            let width = attr_f32(&node, "width", 0.0);
            let height = attr_f32(&node, "height", 0.0);
            out.push(ImageElement::new(0, style.color, style.opacity, src, width, height).into());
        }
        name => {
            let mut inner = style.clone();
            match name {
                "b" | "strong" => inner.style.bold = true,
                "i" | "em" => inner.style.italic = true,
                "u" => inner.style.underline = true,
                "del" | "s" => inner.style.strikethrough = true,
                "a" => inner.url = node.attribute("href").map(str::to_string),
                "font" => {
                    if let Some(face) = node.attribute("face") {
                        inner.font_name = face.to_string();
                    }
                    if node.has_attribute("size") {
                        inner.font_size = attr_f32(&node, "size", inner.font_size);
                    }
                    if let Some(color) = node.attribute("color") {
                        match Color::from_hex(color) {
                            Some(parsed) => inner.color = parsed,
                            None => log::warn!("Bad color '{}' in <font>, keeping inherited", color),
                        }
                    }
                }
                other => {
                    log::warn!("Unknown markup tag <{}>, treating as transparent", other);
                }
            }
            for child in node.children() {
                walk(child, &inner, out);
            }
        }
    }
}

fn attr_f32(node: &roxmltree::Node<'_, '_>, name: &str, fallback: f32) -> f32 {
    match node.attribute(name) {
        None => fallback,
        Some(raw) => match raw.parse::<f32>() {
            Ok(value) => value,
            Err(_) => {
                log::warn!(
                    "Bad {} value '{}' on <{}>, using {}",
                    name,
                    raw,
                    node.tag_name().name(),
                    fallback
                );
                fallback
            }
        },
    }
}

impl RichText {
    /// Builds a container from markup. `None` when the markup is malformed.
    pub fn from_markup(xml: &str) -> Option<RichText> {
        let elements = parse_markup(xml)?;
        let mut rich_text = RichText::new();
        for element in elements {
            rich_text.push_back_element(element);
        }
        Some(rich_text)
    }
}
