use std::fmt;
use std::mem;
use std::sync::Arc;

use euclid::default::{Point2D, Rect, Size2D};

use crate::color::Color;
use crate::element::{
    CustomNodeElement, ImageElement, RichElement, TextElement, TextStyle, TextureKind,
};
use crate::measure::TextMeasurer;
use crate::node::InlineNode;

/// Where a text run may break across lines.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum WrapMode {
    /// Break at word boundaries; a word wider than the whole line degrades
    /// to per-character splitting.
    #[default]
    PerWord,
    /// Break at any character.
    PerChar,
}

/// A positioned renderable produced from an element (or a wrapped piece of
/// a text element).
///
/// Coordinates are top-left with the Y axis pointing down, relative to the
/// container's top-left corner.
#[derive(Clone, Debug)]
pub struct Fragment {
    pub origin: Point2D<f32>,
    pub size: Size2D<f32>,
    pub tag: i32,
    pub color: Color,
    pub opacity: u8,
    pub kind: FragmentKind,
}

/// Variant payload of a fragment.
#[derive(Clone)]
pub enum FragmentKind {
    Text {
        text: String,
        font_name: String,
        font_size: f32,
        style: TextStyle,
        /// Present when the source run carried a URL; the host makes these
        /// fragments interactable.
        url: Option<String>,
    },
    Image {
        file_path: String,
        source_rect: Option<Rect<f32>>,
        texture_kind: TextureKind,
    },
    Node {
        node: Arc<dyn InlineNode>,
    },
}

impl fmt::Debug for FragmentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FragmentKind::Text { text, .. } => f.debug_struct("Text").field("text", text).finish(),
            FragmentKind::Image { file_path, .. } => {
                f.debug_struct("Image").field("file_path", file_path).finish()
            }
            FragmentKind::Node { node } => {
                f.debug_struct("Node").field("size", &node.size()).finish()
            }
        }
    }
}

/// One visual line: a group of fragments sharing a vertical slot.
///
/// `height` is the max fragment height on the line (an empty line uses the
/// container's default line metric); fragments sit on the line floor.
#[derive(Clone, Debug, Default)]
pub struct Line {
    pub fragments: Vec<Fragment>,
    pub width: f32,
    pub height: f32,
    /// Y of the line's top edge within the container.
    pub top: f32,
}

/// Result of one flow pass.
pub(crate) struct FlowOutput {
    pub lines: Vec<Line>,
    /// Max line width by total vertical extent (line heights plus vertical
    /// space between lines).
    pub content_size: Size2D<f32>,
}

/// Flows the element sequence into wrapped lines.
///
/// `wrap_width` of `None` disables wrapping entirely (the content-adapt
/// path); explicit NewLine elements still break. The walk keeps exactly one
/// line open at all times: a NewLine closes it and opens the next, so
/// consecutive NewLines produce empty line slots, and a trailing NewLine
/// leaves an empty final slot.
pub(crate) fn flow(
    elements: &[RichElement],
    measurer: &dyn TextMeasurer,
    wrap_width: Option<f32>,
    wrap_mode: WrapMode,
    vertical_space: f32,
    default_line_height: f32,
) -> FlowOutput {
    let mut state = FlowState {
        measurer,
        wrap_width,
        wrap_mode,
        left_space: wrap_width.unwrap_or(f32::INFINITY),
        cursor_x: 0.0,
        current: Vec::new(),
        lines: Vec::new(),
        trailing_forced_break: false,
    };

    for element in elements {
        match element {
            RichElement::Text(text) => state.handle_text(text),
            RichElement::Image(image) => state.handle_image(image),
            RichElement::CustomNode(custom) => state.handle_custom(custom),
            RichElement::NewLine(_) => state.handle_newline(),
        }
    }

    state.finish(vertical_space, default_line_height)
}

struct FlowState<'a> {
    measurer: &'a dyn TextMeasurer,
    wrap_width: Option<f32>,
    wrap_mode: WrapMode,
    /// Width still available on the line being packed.
    left_space: f32,
    cursor_x: f32,
    current: Vec<Fragment>,
    lines: Vec<Line>,
    /// True when the last closed break came from a NewLine element; the
    /// final flush then emits the trailing empty slot.
    trailing_forced_break: bool,
}

impl FlowState<'_> {
    fn line_is_empty(&self) -> bool {
        self.current.is_empty()
    }

    /// Places a fragment at the cursor and advances it. Vertical placement
    /// happens in `finish` once the line height is known.
    fn place(&mut self, size: Size2D<f32>, tag: i32, color: Color, opacity: u8, kind: FragmentKind) {
        self.current.push(Fragment {
            origin: Point2D::new(self.cursor_x, 0.0),
            size,
            tag,
            color,
            opacity,
            kind,
        });
        self.cursor_x += size.width;
        self.left_space -= size.width;
        self.trailing_forced_break = false;
    }

    /// Closes the open line and starts the next one.
    fn break_line(&mut self) {
        self.lines.push(Line {
            fragments: mem::take(&mut self.current),
            width: self.cursor_x,
            height: 0.0,
            top: 0.0,
        });
        self.cursor_x = 0.0;
        self.left_space = self.wrap_width.unwrap_or(f32::INFINITY);
    }

    fn handle_newline(&mut self) {
        self.break_line();
        self.trailing_forced_break = true;
    }

    fn handle_text(&mut self, element: &TextElement) {
        // An empty run has zero measured size: no fragment, no break.
        let mut rest: &str = &element.text;
        if rest.is_empty() {
            return;
        }

        loop {
            let size = self
                .measurer
                .measure_text(rest, &element.font_name, element.font_size);
            if self.wrap_width.is_none() || size.width <= self.left_space {
                self.place_text(element, rest, size);
                return;
            }

            let line_empty = self.line_is_empty();
            let split = match self.wrap_mode {
                WrapMode::PerChar => {
                    find_split_position_for_char(
                        self.measurer,
                        element,
                        rest,
                        self.left_space,
                        line_empty,
                    )
                }
                WrapMode::PerWord => {
                    let at = find_split_position_for_word(
                        self.measurer,
                        element,
                        rest,
                        self.left_space,
                    );
                    if at == 0 && line_empty {
                        // A single word wider than the whole line: degrade
                        // to character granularity.
                        find_split_position_for_char(
                            self.measurer,
                            element,
                            rest,
                            self.left_space,
                            true,
                        )
                    } else {
                        at
                    }
                }
            };

            if split == 0 {
                // Nothing fits on the partially filled line; wrap and retry
                // against the full width.
                self.break_line();
                continue;
            }

            let (head, tail) = rest.split_at(split);
            let head_size =
                self.measurer
                    .measure_text(head, &element.font_name, element.font_size);
            self.place_text(element, head, head_size);
            self.break_line();

            // Leading whitespace would otherwise reappear at the start of
            // the wrapped line.
            rest = tail.trim_start();
            if rest.is_empty() {
                return;
            }
        }
    }

    fn place_text(&mut self, element: &TextElement, text: &str, size: Size2D<f32>) {
        if size.width == 0.0 && size.height == 0.0 {
            return;
        }
        self.place(
            size,
            element.tag,
            element.color,
            element.opacity,
            FragmentKind::Text {
                text: text.to_string(),
                font_name: element.font_name.clone(),
                font_size: element.font_size,
                style: element.style,
                url: element.url.clone(),
            },
        );
    }

    fn handle_image(&mut self, element: &ImageElement) {
        let size = Size2D::new(element.width(), element.height());
        self.place_atomic(
            size,
            element.tag,
            element.color,
            element.opacity,
            FragmentKind::Image {
                file_path: element.file_path.clone(),
                source_rect: element.source_rect,
                texture_kind: element.texture_kind,
            },
        );
    }

    fn handle_custom(&mut self, element: &CustomNodeElement) {
        let size = element.node.size();
        self.place_atomic(
            size,
            element.tag,
            element.color,
            element.opacity,
            FragmentKind::Node {
                node: Arc::clone(&element.node),
            },
        );
    }

    /// Fit-or-wrap placement for boxes that are never split (images, custom
    /// nodes). A box wider than the whole line still goes onto its own line.
    fn place_atomic(
        &mut self,
        size: Size2D<f32>,
        tag: i32,
        color: Color,
        opacity: u8,
        kind: FragmentKind,
    ) {
        if size.width == 0.0 && size.height == 0.0 {
            return;
        }
        if self.wrap_width.is_some() && size.width > self.left_space && !self.line_is_empty() {
            self.break_line();
        }
        self.place(size, tag, color, opacity, kind);
    }

    /// Closes the final line and resolves vertical geometry.
    fn finish(mut self, vertical_space: f32, default_line_height: f32) -> FlowOutput {
        if !self.current.is_empty() || self.trailing_forced_break {
            self.break_line();
        }

        let mut top = 0.0;
        let mut max_width: f32 = 0.0;
        let line_count = self.lines.len();
        for (index, line) in self.lines.iter_mut().enumerate() {
            let height = if line.fragments.is_empty() {
                default_line_height
            } else {
                line.fragments
                    .iter()
                    .map(|f| f.size.height)
                    .fold(0.0, f32::max)
            };
            line.height = height;
            line.top = top;
            // Fragments rest on the line floor so a short run next to a
            // tall image sits at its bottom edge.
            for fragment in &mut line.fragments {
                fragment.origin.y = top + (height - fragment.size.height);
            }
            max_width = max_width.max(line.width);
            top += height;
            if index + 1 < line_count {
                top += vertical_space;
            }
        }

        FlowOutput {
            lines: self.lines,
            content_size: Size2D::new(max_width, top),
        }
    }
}

/// Returns the byte length of the longest prefix of `text` that ends at a
/// word boundary and fits in `available`, or 0 when not even the first word
/// fits. The separator run stays with the line it follows.
fn find_split_position_for_word(
    measurer: &dyn TextMeasurer,
    element: &TextElement,
    text: &str,
    available: f32,
) -> usize {
    let mut best = 0;
    let mut prev_was_separator = false;
    for (index, ch) in text.char_indices() {
        if prev_was_separator && !ch.is_whitespace() {
            let width = measurer
                .measure_text(&text[..index], &element.font_name, element.font_size)
                .width;
            if width <= available {
                best = index;
            } else {
                break;
            }
        }
        prev_was_separator = ch.is_whitespace();
    }
    best
}

/// Returns the byte length of the longest char prefix of `text` that fits in
/// `available`. On an empty line at least one character is consumed so
/// degenerate widths still make progress.
fn find_split_position_for_char(
    measurer: &dyn TextMeasurer,
    element: &TextElement,
    text: &str,
    available: f32,
    line_empty: bool,
) -> usize {
    let mut best = 0;
    for (index, ch) in text.char_indices() {
        let end = index + ch.len_utf8();
        let width = measurer
            .measure_text(&text[..end], &element.font_name, element.font_size)
            .width;
        if width <= available {
            best = end;
        } else {
            break;
        }
    }
    if best == 0 && line_empty {
        text.chars().next().map(char::len_utf8).unwrap_or(0)
    } else {
        best
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::element::NewLineElement;
    use crate::measure::FixedMeasurer;
    use crate::node::SizedNode;

    fn text(s: &str) -> RichElement {
        TextElement::new(0, Color::WHITE, 255, s, "test", 10.0, TextStyle::default()).into()
    }

    fn image(w: f32, h: f32) -> RichElement {
        ImageElement::new(0, Color::WHITE, 255, "img.png", w, h).into()
    }

    fn newline() -> RichElement {
        NewLineElement::new(0, Color::WHITE, 255).into()
    }

    fn run(
        elements: &[RichElement],
        wrap_width: Option<f32>,
        wrap_mode: WrapMode,
        vertical_space: f32,
    ) -> FlowOutput {
        let measurer = FixedMeasurer::new(10.0);
        flow(elements, &measurer, wrap_width, wrap_mode, vertical_space, 10.0)
    }

    fn line_texts(line: &Line) -> Vec<String> {
        line.fragments
            .iter()
            .map(|f| match &f.kind {
                FragmentKind::Text { text, .. } => text.clone(),
                FragmentKind::Image { file_path, .. } => format!("[{file_path}]"),
                FragmentKind::Node { .. } => "[node]".to_string(),
            })
            .collect()
    }

    #[test]
    fn fitting_sequence_stays_on_one_line() {
        // 3 + 1 + 5 chars at advance 10 plus a 40-wide image: 130 <= 200.
        let out = run(
            &[text("abc"), image(40.0, 10.0), text("defgh")],
            Some(200.0),
            WrapMode::PerWord,
            0.0,
        );
        assert_eq!(out.lines.len(), 1);
        assert_eq!(out.lines[0].fragments.len(), 3);
        // Left-to-right in sequence order.
        assert_eq!(out.lines[0].fragments[0].origin.x, 0.0);
        assert_eq!(out.lines[0].fragments[1].origin.x, 30.0);
        assert_eq!(out.lines[0].fragments[2].origin.x, 70.0);
        assert_eq!(out.content_size.width, 120.0);
    }

    #[test]
    fn quick_brown_fox_wraps_per_word() {
        // 19 chars * 10 = 190... widen the advance so the run overflows 200.
        let measurer = FixedMeasurer::new(12.0);
        let out = flow(
            &[text("The quick brown fox")],
            &measurer,
            Some(200.0),
            WrapMode::PerWord,
            0.0,
            10.0,
        );
        assert!(out.lines.len() >= 2);
        for line in &out.lines {
            assert!(line.width <= 200.0);
        }
        let joined: Vec<String> = out
            .lines
            .iter()
            .flat_map(|l| line_texts(l))
            .collect();
        let rebuilt = joined.join(" ").split_whitespace().collect::<Vec<_>>().join(" ");
        assert_eq!(rebuilt, "The quick brown fox");
    }

    #[test]
    fn long_word_degrades_to_char_breaks() {
        let word = "abcdefghijklmnop";
        let per_word = run(&[text(word)], Some(50.0), WrapMode::PerWord, 0.0);
        let per_char = run(&[text(word)], Some(50.0), WrapMode::PerChar, 0.0);
        assert_eq!(per_word.lines.len(), per_char.lines.len());
        for (a, b) in per_word.lines.iter().zip(per_char.lines.iter()) {
            assert_eq!(line_texts(a), line_texts(b));
        }
        // 5 chars of width 10 per line.
        assert_eq!(line_texts(&per_word.lines[0]), vec!["abcde"]);
    }

    #[test]
    fn wide_image_wraps_to_its_own_line() {
        let out = run(
            &[image(50.0, 50.0), image(180.0, 50.0)],
            Some(200.0),
            WrapMode::PerWord,
            0.0,
        );
        assert_eq!(out.lines.len(), 2);
        assert_eq!(out.lines[0].fragments.len(), 1);
        assert_eq!(out.lines[1].fragments.len(), 1);
        assert_eq!(out.lines[1].fragments[0].origin.x, 0.0);
        assert_eq!(out.lines[1].fragments[0].size.width, 180.0);
    }

    #[test]
    fn oversized_image_is_never_split() {
        let out = run(&[image(500.0, 20.0)], Some(200.0), WrapMode::PerWord, 0.0);
        assert_eq!(out.lines.len(), 1);
        assert_eq!(out.lines[0].width, 500.0);
    }

    #[test]
    fn custom_node_is_an_atomic_box() {
        let node: RichElement =
            CustomNodeElement::new(7, Color::WHITE, 255, Arc::new(SizedNode::new(180.0, 30.0)))
                .into();
        let out = run(&[text("abcde"), node], Some(200.0), WrapMode::PerWord, 0.0);
        // 50 + 180 > 200, the node wraps.
        assert_eq!(out.lines.len(), 2);
        assert_eq!(out.lines[1].fragments[0].tag, 7);
        assert!(matches!(
            out.lines[1].fragments[0].kind,
            FragmentKind::Node { .. }
        ));
    }

    #[test]
    fn consecutive_newlines_make_empty_slots() {
        let out = run(&[newline(), newline()], Some(200.0), WrapMode::PerWord, 5.0);
        // Two breaks make three line slots, all empty, at the default line
        // metric, with vertical space between each pair.
        assert_eq!(out.lines.len(), 3);
        for line in &out.lines {
            assert!(line.fragments.is_empty());
            assert_eq!(line.height, 10.0);
        }
        assert_eq!(out.lines[0].top, 0.0);
        assert_eq!(out.lines[1].top, 15.0);
        assert_eq!(out.lines[2].top, 30.0);
        assert_eq!(out.content_size.height, 40.0);
    }

    #[test]
    fn trailing_newline_leaves_an_empty_slot() {
        let out = run(&[text("ab"), newline()], Some(200.0), WrapMode::PerWord, 0.0);
        assert_eq!(out.lines.len(), 2);
        assert_eq!(out.lines[0].fragments.len(), 1);
        assert!(out.lines[1].fragments.is_empty());
    }

    #[test]
    fn empty_sequence_produces_no_lines() {
        let out = run(&[], Some(200.0), WrapMode::PerWord, 0.0);
        assert!(out.lines.is_empty());
        assert_eq!(out.content_size, Size2D::new(0.0, 0.0));
    }

    #[test]
    fn empty_text_run_is_invisible_but_harmless() {
        let out = run(
            &[text("ab"), text(""), text("cd")],
            Some(200.0),
            WrapMode::PerWord,
            0.0,
        );
        assert_eq!(out.lines.len(), 1);
        assert_eq!(line_texts(&out.lines[0]), vec!["ab", "cd"]);
    }

    #[test]
    fn zero_width_container_degenerates_to_single_column() {
        let out = run(&[text("abcd")], Some(0.0), WrapMode::PerWord, 0.0);
        assert_eq!(out.lines.len(), 4);
        for (line, expected) in out.lines.iter().zip(["a", "b", "c", "d"]) {
            assert_eq!(line_texts(line), vec![expected]);
        }
    }

    #[test]
    fn line_height_is_max_fragment_height_with_floor_alignment() {
        let out = run(
            &[text("ab"), image(30.0, 40.0)],
            Some(200.0),
            WrapMode::PerWord,
            0.0,
        );
        assert_eq!(out.lines.len(), 1);
        let line = &out.lines[0];
        assert_eq!(line.height, 40.0);
        // Text (height 10) sits on the line floor next to the tall image.
        assert_eq!(line.fragments[0].origin.y, 30.0);
        assert_eq!(line.fragments[1].origin.y, 0.0);
        assert_eq!(out.content_size.height, 40.0);
    }

    #[test]
    fn no_wrap_mode_only_breaks_on_newline() {
        let out = run(
            &[text("abcdefghijklmnopqrstuvwxyz"), newline(), text("ab")],
            None,
            WrapMode::PerWord,
            0.0,
        );
        assert_eq!(out.lines.len(), 2);
        assert_eq!(out.lines[0].width, 260.0);
        assert_eq!(out.content_size.width, 260.0);
    }

    #[test]
    fn wrapped_remainder_drops_leading_space() {
        let out = run(&[text("abcde fghij")], Some(60.0), WrapMode::PerWord, 0.0);
        assert_eq!(out.lines.len(), 2);
        assert_eq!(line_texts(&out.lines[1]), vec!["fghij"]);
    }

    #[test]
    fn vertical_space_applies_between_lines_only() {
        let out = run(
            &[text("ab"), newline(), text("cd")],
            Some(200.0),
            WrapMode::PerWord,
            4.0,
        );
        assert_eq!(out.lines.len(), 2);
        assert_eq!(out.lines[0].top, 0.0);
        assert_eq!(out.lines[1].top, 14.0);
        // 10 + 4 + 10, no trailing space.
        assert_eq!(out.content_size.height, 24.0);
    }
}
