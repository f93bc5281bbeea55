//! Fit-mode scale and render geometry
//!
//! Scales are percentages (100.0 = natural size). A scrollbar only appears on
//! an axis the image overflows, and when it does it eats `scrollbar_width` px
//! of the opposite axis; both functions account for that so "fit width" never
//! produces a horizontal scrollbar just because a vertical one appeared.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::Size;

/// How the image is scaled into the viewer
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum FitMode {
    /// Whole image visible, never upscaled
    #[default]
    Best,
    /// Fill the width, never upscaled
    Width,
    /// Fill the height, never upscaled
    Height,
    /// Always 100%
    Original,
    /// User-controlled zoom percent
    Manual,
}

impl FitMode {
    pub const ALL: [FitMode; 5] = [
        FitMode::Best,
        FitMode::Width,
        FitMode::Height,
        FitMode::Original,
        FitMode::Manual,
    ];
}

impl fmt::Display for FitMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            FitMode::Best => "Best Fit",
            FitMode::Width => "Fit Width",
            FitMode::Height => "Fit Height",
            FitMode::Original => "Original Size",
            FitMode::Manual => "Manual Zoom",
        };
        f.write_str(label)
    }
}

/// Scale percent for `mode`
///
/// Returns `None` while either size is unknown or zero; callers must not
/// render anything in that case.
pub fn compute_fit_scale(
    mode: FitMode,
    natural: Size,
    container: Size,
    scrollbar_width: f64,
    manual_zoom: f64,
) -> Option<f64> {
    if natural.is_empty() || container.is_empty() {
        return None;
    }

    let Size {
        width: nw,
        height: nh,
    } = natural;
    let Size {
        width: cw,
        height: ch,
    } = container;

    let scale = match mode {
        FitMode::Best => {
            let horizontal = if nw > cw { cw / nw } else { 1.0 };
            let vertical = if nh > ch { ch / nh } else { 1.0 };
            horizontal.min(vertical)
        }
        FitMode::Width => {
            let mut scale = if nw > cw { cw / nw } else { 1.0 };
            // A vertical scrollbar will appear: fit into the width it leaves
            if nh * scale > ch && cw > scrollbar_width {
                scale = scale.min((cw - scrollbar_width) / nw);
            }
            scale
        }
        FitMode::Height => {
            let mut scale = if nh > ch { ch / nh } else { 1.0 };
            if nw * scale > cw && ch > scrollbar_width {
                scale = scale.min((ch - scrollbar_width) / nh);
            }
            scale
        }
        FitMode::Original => 1.0,
        FitMode::Manual => return Some(manual_zoom),
    };

    Some(scale * 100.0)
}

/// Where and how large the image is drawn inside the container
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct RenderGeometry {
    /// Rendered width in px (rounded)
    pub render_width: f64,
    /// Rendered height in px (rounded)
    pub render_height: f64,
    /// Left offset that centers a narrower-than-viewport image
    pub center_offset_left: f64,
    /// Top offset that centers a shorter-than-viewport image
    pub center_offset_top: f64,
    /// The image overflows horizontally (a horizontal scrollbar is shown)
    pub horizontal_scroll: bool,
    /// The image overflows vertically (a vertical scrollbar is shown)
    pub vertical_scroll: bool,
}

impl RenderGeometry {
    /// Horizontal overflow disables wheel page turns and swipe paging
    pub fn is_overflow(&self) -> bool {
        self.horizontal_scroll
    }
}

/// Render size and centering offsets for `natural` at `scale` percent
pub fn compute_render_geometry(
    natural: Size,
    scale: f64,
    container: Size,
    scrollbar_width: f64,
) -> RenderGeometry {
    if natural.is_empty() || container.is_empty() || scale <= 0.0 {
        return RenderGeometry::default();
    }

    let render_width = (natural.width * scale / 100.0).round();
    let render_height = (natural.height * scale / 100.0).round();

    let horizontal_scroll = render_width > container.width;
    let vertical_scroll = render_height > container.height;

    let client_width = if vertical_scroll {
        container.width - scrollbar_width
    } else {
        container.width
    };
    let client_height = if horizontal_scroll {
        container.height - scrollbar_width
    } else {
        container.height
    };

    RenderGeometry {
        render_width,
        render_height,
        center_offset_left: ((client_width - render_width) / 2.0).max(0.0),
        center_offset_top: ((client_height - render_height) / 2.0).max(0.0),
        horizontal_scroll,
        vertical_scroll,
    }
}
