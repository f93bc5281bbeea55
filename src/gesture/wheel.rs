//! Page turning by scrolling past the ends of the image
//!
//! Wheel deltas follow the browser convention: positive `delta_y` scrolls
//! down. A page turn fires after `threshold` consecutive notches against an
//! edge, or on the first notch when the image does not scroll at all.

/// Vertical scroll position of the viewer
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ScrollMetrics {
    /// Current scroll offset
    pub offset: f64,
    /// Height of the scrolled content
    pub content: f64,
    /// Height of the visible area
    pub viewport: f64,
}

impl ScrollMetrics {
    pub fn max_offset(&self) -> f64 {
        self.content - self.viewport
    }

    pub fn is_scrollable(&self) -> bool {
        self.max_offset() > 0.0
    }

    pub fn at_top(&self) -> bool {
        self.offset <= 0.0
    }

    pub fn at_bottom(&self) -> bool {
        self.offset >= self.max_offset()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageTurn {
    Prev,
    Next,
}

#[derive(Debug, Clone)]
pub struct WheelPager {
    threshold: u32,
    over_top: u32,
    below_bottom: u32,
}

impl WheelPager {
    pub fn new(threshold: u32) -> Self {
        Self {
            threshold: threshold.max(1),
            over_top: 0,
            below_bottom: 0,
        }
    }

    /// Feed one wheel event
    ///
    /// Modified events (shift scrolls sideways, ctrl zooms) and events over a
    /// horizontally overflowing image never count.
    pub fn on_wheel(
        &mut self,
        delta_y: f64,
        metrics: ScrollMetrics,
        overflow: bool,
        shift: bool,
        ctrl: bool,
    ) -> Option<PageTurn> {
        if overflow || shift || ctrl {
            return None;
        }

        if delta_y < 0.0 {
            self.below_bottom = 0;
            if metrics.at_top() {
                self.over_top += 1;
            }
            if !metrics.is_scrollable() || self.over_top >= self.threshold {
                self.over_top = 0;
                return Some(PageTurn::Prev);
            }
        } else if delta_y > 0.0 {
            self.over_top = 0;
            if metrics.at_bottom() {
                self.below_bottom += 1;
            }
            if !metrics.is_scrollable() || self.below_bottom >= self.threshold {
                self.below_bottom = 0;
                return Some(PageTurn::Next);
            }
        }
        None
    }

    pub fn reset(&mut self) {
        self.over_top = 0;
        self.below_bottom = 0;
    }
}
