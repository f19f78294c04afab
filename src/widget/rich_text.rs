use euclid::default::Size2D;

use crate::element::RichElement;
use crate::measure::TextMeasurer;

use super::flow::{self, Fragment, Line, WrapMode};

/// Font used for empty-line metrics and markup defaults until
/// [`RichText::set_default_font`] overrides it.
pub const DEFAULT_FONT_NAME: &str = "sans-serif";
pub const DEFAULT_FONT_SIZE: f32 = 12.0;

/// Layout cache state.
///
/// Every mutating call moves to `Dirty`; only a completed
/// [`RichText::format_text`] moves back to `Clean`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LayoutState {
    Clean,
    Dirty,
}

/// Container for a sequence of rich elements flowed into wrapped lines.
///
/// The element sequence is the source of truth; the line/fragment collection
/// is a cache rebuilt by [`Self::format_text`] from (elements, container
/// width, wrap mode, vertical space) and nothing else. Mutations are cheap:
/// they only flip the dirty flag, so a batch of edits costs one reflow.
///
/// All access is single-threaded; `format_text` is synchronous and
/// non-reentrant, intended to run on the host's update pass.
pub struct RichText {
    elements: Vec<RichElement>,
    lines: Vec<Line>,
    state: LayoutState,
    vertical_space: f32,
    wrap_mode: WrapMode,
    /// True: the container sizes itself to its content and no wrapping
    /// occurs. False: content wraps inside the fixed container width.
    adapt_to_content: bool,
    /// True: keep the fixed height even when content overflows.
    ignore_height_adapt: bool,
    container_size: Size2D<f32>,
    content_size: Size2D<f32>,
    default_font_name: String,
    default_font_size: f32,
}

impl Default for RichText {
    fn default() -> Self {
        Self::new()
    }
}

impl RichText {
    /// Creates an empty container with zero fixed size and per-word
    /// wrapping. The layout starts dirty.
    pub fn new() -> Self {
        Self {
            elements: Vec::new(),
            lines: Vec::new(),
            state: LayoutState::Dirty,
            vertical_space: 0.0,
            wrap_mode: WrapMode::PerWord,
            adapt_to_content: false,
            ignore_height_adapt: false,
            container_size: Size2D::new(0.0, 0.0),
            content_size: Size2D::new(0.0, 0.0),
            default_font_name: DEFAULT_FONT_NAME.to_string(),
            default_font_size: DEFAULT_FONT_SIZE,
        }
    }
}

/// Element sequence mutation. Every method here marks the layout dirty and
/// none of them reflows.
impl RichText {
    /// Inserts an element; `index` is clamped to `[0, len]`. Subsequent
    /// elements shift by one.
    pub fn insert_element(&mut self, element: impl Into<RichElement>, index: usize) {
        let index = index.min(self.elements.len());
        self.elements.insert(index, element.into());
        self.mark_dirty();
    }

    /// Appends an element at the end of the sequence.
    pub fn push_back_element(&mut self, element: impl Into<RichElement>) {
        self.elements.push(element.into());
        self.mark_dirty();
    }

    /// Removes and returns the element at `index`, or `None` when out of
    /// range.
    pub fn remove_element(&mut self, index: usize) -> Option<RichElement> {
        if index >= self.elements.len() {
            return None;
        }
        let element = self.elements.remove(index);
        self.mark_dirty();
        Some(element)
    }

    /// Removes the first element carrying `tag`. Returns whether anything
    /// was removed.
    pub fn remove_element_by_tag(&mut self, tag: i32) -> bool {
        let Some(index) = self.elements.iter().position(|e| e.tag() == tag) else {
            return false;
        };
        self.elements.remove(index);
        self.mark_dirty();
        true
    }

    /// Clears the whole sequence.
    pub fn remove_all_elements(&mut self) {
        self.elements.clear();
        self.mark_dirty();
    }

    pub fn element(&self, index: usize) -> Option<&RichElement> {
        self.elements.get(index)
    }

    /// Mutable access to an element. This is the one legal way to mutate an
    /// already-inserted element (resizing an image, say); taking the
    /// reference marks the layout dirty.
    pub fn element_mut(&mut self, index: usize) -> Option<&mut RichElement> {
        let element = self.elements.get_mut(index);
        if element.is_some() {
            self.state = LayoutState::Dirty;
        }
        element
    }

    pub fn elements(&self) -> &[RichElement] {
        &self.elements
    }

    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }
}

/// Configuration. These also mark the layout dirty.
impl RichText {
    /// Sets the vertical spacing between lines.
    pub fn set_vertical_space(&mut self, space: f32) {
        self.vertical_space = space;
        self.mark_dirty();
    }

    pub fn vertical_space(&self) -> f32 {
        self.vertical_space
    }

    /// Switches between per-word and per-char wrapping.
    pub fn set_wrap_mode(&mut self, mode: WrapMode) {
        self.wrap_mode = mode;
        self.mark_dirty();
    }

    pub fn wrap_mode(&self) -> WrapMode {
        self.wrap_mode
    }

    /// `true`: the container resizes to fit its content and no wrapping
    /// happens. `false`: content wraps within the fixed container width.
    pub fn ignore_content_adapt_with_size(&mut self, ignore: bool) {
        self.adapt_to_content = ignore;
        self.mark_dirty();
    }

    pub fn is_ignore_content_adapt_with_size(&self) -> bool {
        self.adapt_to_content
    }

    /// `true`: keep the fixed height instead of growing to the content's
    /// vertical extent. Only meaningful in fixed-size mode.
    pub fn ignore_height_adapt_with_size(&mut self, ignore: bool) {
        self.ignore_height_adapt = ignore;
        self.mark_dirty();
    }

    pub fn is_ignore_height_adapt_with_size(&self) -> bool {
        self.ignore_height_adapt
    }

    /// Host resize notification. Sets the fixed container size and requires
    /// a reflow.
    pub fn set_container_size(&mut self, size: Size2D<f32>) {
        self.container_size = size;
        self.mark_dirty();
    }

    pub fn container_size(&self) -> Size2D<f32> {
        self.container_size
    }

    /// Sets the font used for empty-line metrics (and inherited by markup
    /// text that names no font).
    pub fn set_default_font(&mut self, name: impl Into<String>, size: f32) {
        self.default_font_name = name.into();
        self.default_font_size = size;
        self.mark_dirty();
    }

    pub fn default_font(&self) -> (&str, f32) {
        (&self.default_font_name, self.default_font_size)
    }

    fn mark_dirty(&mut self) {
        self.state = LayoutState::Dirty;
    }
}

/// Reflow and read access.
impl RichText {
    /// Recomputes all lines and fragments from the current element
    /// sequence, replacing the previous cache, and updates the content size
    /// per the adaptation flags.
    pub fn format_text(&mut self, measurer: &dyn TextMeasurer) {
        let wrap_width = if self.adapt_to_content {
            None
        } else {
            Some(self.container_size.width)
        };
        let default_line_height =
            measurer.line_height(&self.default_font_name, self.default_font_size);

        let out = flow::flow(
            &self.elements,
            measurer,
            wrap_width,
            self.wrap_mode,
            self.vertical_space,
            default_line_height,
        );

        self.lines = out.lines;
        self.content_size = if self.adapt_to_content {
            out.content_size
        } else {
            let height = if self.ignore_height_adapt {
                self.container_size.height
            } else {
                out.content_size.height
            };
            Size2D::new(self.container_size.width, height)
        };
        self.state = LayoutState::Clean;
    }

    /// Reflows only when a mutation happened since the last
    /// [`Self::format_text`].
    pub fn reflow_if_needed(&mut self, measurer: &dyn TextMeasurer) {
        if self.is_dirty() {
            self.format_text(measurer);
        }
    }

    pub fn is_dirty(&self) -> bool {
        self.state == LayoutState::Dirty
    }

    pub fn layout_state(&self) -> LayoutState {
        self.state
    }

    /// The laid-out lines. Stale while [`Self::is_dirty`] returns true.
    pub fn lines(&self) -> &[Line] {
        &self.lines
    }

    /// All fragments in document order, for the host to attach to its
    /// render tree.
    pub fn fragments(&self) -> impl Iterator<Item = &Fragment> {
        self.lines.iter().flat_map(|line| line.fragments.iter())
    }

    /// Content size after the last reflow, honoring the adaptation flags.
    pub fn content_size(&self) -> Size2D<f32> {
        self.content_size
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::Color;
    use crate::element::{
        ElementKind, ImageElement, NewLineElement, RichElement, TextElement, TextStyle,
    };
    use crate::measure::FixedMeasurer;

    fn text(tag: i32, s: &str) -> TextElement {
        TextElement::new(tag, Color::WHITE, 255, s, "test", 10.0, TextStyle::default())
    }

    fn fixed_rich_text(width: f32) -> RichText {
        let mut rt = RichText::new();
        rt.set_container_size(Size2D::new(width, 100.0));
        rt
    }

    #[test]
    fn insertion_preserves_order_and_shifts() {
        let mut rt = RichText::new();
        rt.push_back_element(text(1, "a"));
        rt.push_back_element(text(3, "c"));
        rt.insert_element(text(2, "b"), 1);

        let tags: Vec<i32> = rt.elements().iter().map(RichElement::tag).collect();
        assert_eq!(tags, vec![1, 2, 3]);

        // Out-of-range indices clamp to the end.
        rt.insert_element(text(4, "d"), 99);
        assert_eq!(rt.element(3).map(RichElement::tag), Some(4));
    }

    #[test]
    fn removal_by_index_and_tag() {
        let mut rt = RichText::new();
        rt.push_back_element(text(1, "a"));
        rt.push_back_element(text(2, "b"));
        rt.push_back_element(text(2, "b2"));

        assert!(rt.remove_element(5).is_none());
        assert!(!rt.remove_element_by_tag(9));

        assert!(rt.remove_element_by_tag(2));
        assert_eq!(rt.len(), 2);
        // Only the first match goes.
        assert_eq!(rt.element(1).map(RichElement::tag), Some(2));

        let removed = rt.remove_element(0);
        assert_eq!(removed.map(|e| e.tag()), Some(1));
    }

    #[test]
    fn remove_all_round_trip() {
        let measurer = FixedMeasurer::new(10.0);
        let mut rt = fixed_rich_text(200.0);
        for i in 0..5 {
            rt.push_back_element(text(i, "hello"));
        }
        rt.format_text(&measurer);
        assert!(rt.fragments().count() > 0);

        rt.remove_all_elements();
        assert_eq!(rt.len(), 0);
        rt.reflow_if_needed(&measurer);
        assert_eq!(rt.fragments().count(), 0);
        assert!(rt.lines().is_empty());
    }

    #[test]
    fn dirty_state_machine() {
        let measurer = FixedMeasurer::new(10.0);
        let mut rt = fixed_rich_text(200.0);
        assert!(rt.is_dirty());

        rt.format_text(&measurer);
        assert_eq!(rt.layout_state(), LayoutState::Clean);

        rt.push_back_element(text(0, "a"));
        assert!(rt.is_dirty());
        rt.reflow_if_needed(&measurer);
        assert!(!rt.is_dirty());

        rt.set_vertical_space(2.0);
        assert!(rt.is_dirty());
        rt.set_wrap_mode(WrapMode::PerChar);
        rt.set_container_size(Size2D::new(100.0, 100.0));
        rt.ignore_content_adapt_with_size(true);
        rt.ignore_height_adapt_with_size(true);
        assert!(rt.is_dirty());
    }

    #[test]
    fn element_mut_marks_dirty() {
        let measurer = FixedMeasurer::new(10.0);
        let mut rt = fixed_rich_text(200.0);
        rt.push_back_element(ImageElement::new(0, Color::WHITE, 255, "a.png", 20.0, 20.0));
        rt.format_text(&measurer);
        assert!(!rt.is_dirty());

        if let Some(RichElement::Image(image)) = rt.element_mut(0) {
            image.set_width(60.0);
            image.set_height(30.0);
        }
        assert!(rt.is_dirty());

        rt.reflow_if_needed(&measurer);
        let fragment = rt.fragments().next().expect("image fragment");
        assert_eq!(fragment.size, Size2D::new(60.0, 30.0));

        // Peeking out of range does not dirty the layout.
        assert!(rt.element_mut(9).is_none());
        assert!(!rt.is_dirty());
    }

    #[test]
    fn format_text_is_idempotent() {
        let measurer = FixedMeasurer::new(12.0);
        let mut rt = fixed_rich_text(200.0);
        rt.push_back_element(text(0, "The quick brown fox"));
        rt.push_back_element(NewLineElement::new(0, Color::WHITE, 255));
        rt.push_back_element(ImageElement::new(0, Color::WHITE, 255, "a.png", 50.0, 50.0));

        rt.format_text(&measurer);
        let first: Vec<(f32, f32, f32, f32)> = rt
            .fragments()
            .map(|f| (f.origin.x, f.origin.y, f.size.width, f.size.height))
            .collect();
        let first_lines = rt.lines().len();

        rt.format_text(&measurer);
        let second: Vec<(f32, f32, f32, f32)> = rt
            .fragments()
            .map(|f| (f.origin.x, f.origin.y, f.size.width, f.size.height))
            .collect();

        assert_eq!(first, second);
        assert_eq!(rt.lines().len(), first_lines);
    }

    #[test]
    fn fixed_size_adapts_height_by_default() {
        let measurer = FixedMeasurer::new(10.0);
        let mut rt = fixed_rich_text(200.0);
        rt.set_vertical_space(5.0);
        rt.push_back_element(text(0, "ab"));
        rt.push_back_element(NewLineElement::new(0, Color::WHITE, 255));
        rt.push_back_element(text(0, "cd"));

        rt.format_text(&measurer);
        assert_eq!(rt.content_size(), Size2D::new(200.0, 25.0));

        rt.ignore_height_adapt_with_size(true);
        rt.format_text(&measurer);
        assert_eq!(rt.content_size(), Size2D::new(200.0, 100.0));
    }

    #[test]
    fn content_adapt_shrinks_to_content() {
        let measurer = FixedMeasurer::new(10.0);
        let mut rt = fixed_rich_text(200.0);
        rt.ignore_content_adapt_with_size(true);
        rt.push_back_element(text(0, "abc"));
        rt.format_text(&measurer);
        assert_eq!(rt.content_size(), Size2D::new(30.0, 10.0));
        // One line, nothing wrapped.
        assert_eq!(rt.lines().len(), 1);
    }

    #[test]
    fn default_font_drives_empty_line_metric() {
        let measurer = FixedMeasurer::new(10.0);
        let mut rt = fixed_rich_text(200.0);
        rt.set_default_font("test", 30.0);
        rt.push_back_element(NewLineElement::new(0, Color::WHITE, 255));
        rt.format_text(&measurer);
        assert_eq!(rt.lines().len(), 2);
        assert_eq!(rt.lines()[0].height, 30.0);
        assert_eq!(rt.content_size().height, 60.0);
    }

    #[test]
    fn mutation_does_not_reflow_eagerly() {
        let measurer = FixedMeasurer::new(10.0);
        let mut rt = fixed_rich_text(200.0);
        rt.push_back_element(text(0, "ab"));
        rt.format_text(&measurer);
        let before = rt.fragments().count();

        // A batch of mutations leaves the stale cache in place...
        rt.push_back_element(text(1, "cd"));
        rt.push_back_element(text(2, "ef"));
        assert_eq!(rt.fragments().count(), before);
        assert_eq!(rt.element(2).map(|e| e.kind()), Some(ElementKind::Text));

        // ...until one reflow picks all of it up.
        rt.reflow_if_needed(&measurer);
        assert_eq!(rt.fragments().count(), 3);
    }
}
