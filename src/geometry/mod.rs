/// Image placement and zoom math
///
/// Pure functions and small value types, no I/O:
/// - `fit.rs` - fit-mode scale and render geometry
/// - `zoom.rs` - multiplicative zoom, fixed-point anchoring, zoom slider, visible part

pub mod fit;
pub mod zoom;

pub use fit::{compute_fit_scale, compute_render_geometry, FitMode, RenderGeometry};
pub use zoom::{apply_zoom_delta, FixedPoint, VisiblePart, ZoomSlider, ZoomState};

use serde::{Deserialize, Serialize};

/// Width/height pair in px
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Default)]
pub struct Size {
    pub width: f64,
    pub height: f64,
}

impl Size {
    pub const ZERO: Size = Size {
        width: 0.0,
        height: 0.0,
    };

    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    /// True when either side is zero (nothing laid out yet)
    pub fn is_empty(&self) -> bool {
        self.width <= 0.0 || self.height <= 0.0
    }
}
