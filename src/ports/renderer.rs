use serde::Serialize;

use crate::domain::TooltipPayload;

/// Page coordinates for the tooltip's top-left corner.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct Anchor {
    pub x: f64,
    pub y: f64,
}

impl Anchor {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Shift both axes by `offset` pixels.
    pub fn offset(self, offset: f64) -> Self {
        Self {
            x: self.x + offset,
            y: self.y + offset,
        }
    }
}

/// Port for the tooltip layer.
///
/// The renderer owns layout and is responsible for flipping the tooltip so it
/// never overflows the viewport; the core only supplies payloads and anchors.
pub trait TooltipRenderer: Send + Sync {
    fn show(&self, payload: TooltipPayload, anchor: Anchor);

    fn reposition(&self, anchor: Anchor);

    fn hide(&self);
}
