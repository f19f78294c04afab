use euclid::default::Size2D;

/// Seam between the widget and the host scene graph.
///
/// A custom element carries an `Arc<dyn InlineNode>`; the layout engine only
/// needs its bounds to treat it as an atomic inline box. The same `Arc` is
/// handed back on the produced fragment, so the element and the render tree
/// share ownership and release independently.
pub trait InlineNode {
    /// Bounding box the node occupies inside a line.
    fn size(&self) -> Size2D<f32>;
}

/// Minimal node with fixed bounds.
///
/// Useful for hosts that only need a placeholder box, and for tests.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SizedNode {
    pub size: Size2D<f32>,
}

impl SizedNode {
    pub fn new(width: f32, height: f32) -> Self {
        Self {
            size: Size2D::new(width, height),
        }
    }
}

impl InlineNode for SizedNode {
    fn size(&self) -> Size2D<f32> {
        self.size
    }
}
