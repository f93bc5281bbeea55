//! Interactive zoom: multiplicative steps, anchoring, slider mapping
//!
//! Zoom values are percentages, same as [`super::fit`]. Outside `Manual` mode
//! the displayed scale starts at the fit scale and may be zoomed between that
//! and 100%; in `Manual` mode the slider owns the value.

use cgmath::Vector2;

use super::fit::{compute_fit_scale, FitMode};
use super::Size;

/// Base of the slider's exponential mapping (slider -1..1 -> 20%..500%)
const SLIDER_BASE: f64 = 5.0;

/// Multiply `current` by `1 + step` (direction > 0) or `1 - step` (direction < 0)
///
/// The result is clamped to `[min, max]`; a zero direction leaves the scale
/// unchanged.
pub fn apply_zoom_delta(current: f64, direction: f64, min: f64, max: f64, step: f64) -> f64 {
    if direction > 0.0 {
        max.min(current * (1.0 + step))
    } else if direction < 0.0 {
        min.max(current * (1.0 - step))
    } else {
        current
    }
}

/// Anchor recorded before a zoom step so the point under the pointer stays put
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FixedPoint {
    pub scale_before: f64,
    /// Pointer position in rendered-image pixels
    pub pointer: Vector2<f64>,
    /// Scroll offset of the viewer at the time of the event
    pub scroll: Vector2<f64>,
}

impl FixedPoint {
    /// Scroll offset that keeps the anchored pixel under the pointer at `scale_after`
    pub fn scroll_after(&self, scale_after: f64) -> Vector2<f64> {
        let pointer_after = self.pointer * (scale_after / self.scale_before);
        self.scroll - self.pointer + pointer_after
    }
}

/// Manual zoom slider, value in `[-1, 1]`
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ZoomSlider {
    value: f64,
}

impl ZoomSlider {
    pub const MIN: f64 = -1.0;
    pub const MAX: f64 = 1.0;
    pub const STEP: f64 = 1.0 / SLIDER_BASE;

    pub fn value(&self) -> f64 {
        self.value
    }

    pub fn set_value(&mut self, value: f64) {
        self.value = value.clamp(Self::MIN, Self::MAX);
    }

    /// Zoom percent shown for the current slider value
    pub fn zoom(&self) -> f64 {
        Self::zoom_for(self.value)
    }

    pub fn zoom_for(value: f64) -> f64 {
        (100.0 * SLIDER_BASE.powf(value)).round()
    }

    pub fn minus(&mut self) {
        self.value = (self.value - Self::STEP).max(Self::MIN);
    }

    pub fn plus(&mut self) {
        self.value = (self.value + Self::STEP).min(Self::MAX);
    }

    /// Move the slider to the position matching `zoom` percent
    pub fn set_zoom(&mut self, zoom: f64) {
        let value = (zoom / 100.0).ln() / SLIDER_BASE.ln();
        if value.is_nan() {
            return;
        }
        self.value = if value > self.value {
            value.min(Self::MAX)
        } else {
            value.max(Self::MIN)
        };
    }
}

/// Zoom state of one viewer
#[derive(Debug, Clone)]
pub struct ZoomState {
    fit_mode: FitMode,
    slider: ZoomSlider,
    step: f64,
    /// Scale derived from the fit mode; the zoom-out floor outside `Manual`
    mode_scale: f64,
    /// Scale actually displayed, 0 until the first fit
    scale: f64,
    fixed_point: Option<FixedPoint>,
}

impl ZoomState {
    pub fn new(step: f64) -> Self {
        Self {
            fit_mode: FitMode::default(),
            slider: ZoomSlider::default(),
            step,
            mode_scale: 0.0,
            scale: 0.0,
            fixed_point: None,
        }
    }

    pub fn fit_mode(&self) -> FitMode {
        self.fit_mode
    }

    /// Changing the mode drops the displayed scale until the next `refit`
    pub fn set_fit_mode(&mut self, mode: FitMode) {
        if self.fit_mode != mode {
            self.fit_mode = mode;
            self.scale = 0.0;
            self.fixed_point = None;
        }
    }

    pub fn slider(&self) -> &ZoomSlider {
        &self.slider
    }

    pub fn slider_mut(&mut self) -> &mut ZoomSlider {
        &mut self.slider
    }

    /// Zoom percent fed to `compute_fit_scale` in `Manual` mode
    pub fn manual_zoom(&self) -> f64 {
        self.slider.zoom()
    }

    pub fn scale(&self) -> f64 {
        self.scale
    }

    pub fn mode_scale(&self) -> f64 {
        self.mode_scale
    }

    /// Recompute the mode scale and reset the displayed scale to it
    ///
    /// Returns `None` (and keeps the previous values) while either size is
    /// not known.
    pub fn refit(&mut self, natural: Size, container: Size, scrollbar_width: f64) -> Option<f64> {
        let mode_scale = compute_fit_scale(
            self.fit_mode,
            natural,
            container,
            scrollbar_width,
            self.manual_zoom(),
        )?;
        self.mode_scale = mode_scale;
        self.scale = mode_scale;
        Some(mode_scale)
    }

    /// Allowed range for wheel and pinch zoom
    pub fn bounds(&self) -> (f64, f64) {
        match self.fit_mode {
            FitMode::Manual => (0.0, f64::INFINITY),
            _ => (self.mode_scale, self.mode_scale.max(100.0)),
        }
    }

    fn current(&self) -> f64 {
        match self.fit_mode {
            FitMode::Manual => self.slider.zoom(),
            _ => self.scale,
        }
    }

    fn commit(&mut self, new_scale: f64, pointer: Vector2<f64>, scroll: Vector2<f64>) -> bool {
        let current = self.current();
        if new_scale == current || self.scale <= 0.0 {
            return false;
        }

        self.fixed_point = Some(FixedPoint {
            scale_before: self.scale,
            pointer,
            scroll,
        });

        match self.fit_mode {
            FitMode::Manual => {
                self.slider.set_zoom(new_scale);
                self.mode_scale = self.slider.zoom();
                self.scale = self.mode_scale;
            }
            _ => self.scale = new_scale,
        }
        true
    }

    /// One ctrl+wheel notch; `direction > 0` zooms in
    ///
    /// Returns whether the scale changed. The anchor is kept until
    /// [`ZoomState::take_fixed_point_scroll`] is called.
    pub fn wheel_zoom(&mut self, direction: f64, pointer: Vector2<f64>, scroll: Vector2<f64>) -> bool {
        let (min, max) = self.bounds();
        let new_scale = apply_zoom_delta(self.current(), direction, min, max, self.step);
        self.commit(new_scale, pointer, scroll)
    }

    /// Pinch step: `ratio` is new pointer distance over old, anchored at the midpoint
    pub fn pinch_zoom(&mut self, ratio: f64, midpoint: Vector2<f64>, scroll: Vector2<f64>) -> bool {
        if !ratio.is_finite() || ratio <= 0.0 {
            return false;
        }
        let (min, max) = self.bounds();
        let current = self.current();
        let target = current * ratio;
        let new_scale = if ratio > 1.0 {
            max.min(target)
        } else {
            min.max(target)
        };
        self.commit(new_scale, midpoint, scroll)
    }

    /// Scroll offset restoring the last anchor; the anchor is consumed
    pub fn take_fixed_point_scroll(&mut self) -> Option<Vector2<f64>> {
        let fixed_point = self.fixed_point.take()?;
        if fixed_point.scale_before <= 0.0 || self.scale <= 0.0 {
            return None;
        }
        Some(fixed_point.scroll_after(self.scale))
    }
}

/// Fraction of the scrolled image currently on screen, for the minimap
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VisiblePart {
    pub width: f64,
    pub height: f64,
    pub left: f64,
    pub top: f64,
}

impl VisiblePart {
    pub fn compute(viewport: Size, content: Size, scroll: Vector2<f64>) -> Self {
        let fraction = |view: f64, total: f64| {
            if total <= view && total > 0.0 {
                1.0
            } else if total > 0.0 {
                view / total
            } else {
                1.0
            }
        };
        let offset = |pos: f64, total: f64| if total > 0.0 { pos / total } else { 0.0 };

        Self {
            width: fraction(viewport.width, content.width),
            height: fraction(viewport.height, content.height),
            left: offset(scroll.x, content.width),
            top: offset(scroll.y, content.height),
        }
    }

    /// Scroll offset that puts the visible window at the given fractions
    pub fn scroll_visible_to(left: f64, top: f64, content: Size) -> Vector2<f64> {
        Vector2::new(left * content.width, top * content.height)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn v(x: f64, y: f64) -> Vector2<f64> {
        Vector2::new(x, y)
    }

    #[test]
    fn test_zoom_delta_is_multiplicative_and_clamped() {
        assert!((apply_zoom_delta(50.0, 1.0, 10.0, 100.0, 0.4) - 70.0).abs() < 1e-9);
        assert!((apply_zoom_delta(50.0, -1.0, 10.0, 100.0, 0.4) - 30.0).abs() < 1e-9);
        assert_eq!(apply_zoom_delta(90.0, 1.0, 10.0, 100.0, 0.4), 100.0);
        assert_eq!(apply_zoom_delta(12.0, -1.0, 10.0, 100.0, 0.4), 10.0);
        assert_eq!(apply_zoom_delta(42.0, 0.0, 10.0, 100.0, 0.4), 42.0);
    }

    #[test]
    fn test_fixed_point_keeps_anchor_in_place() {
        let pairs = [(50.0, 70.0), (70.0, 42.0), (25.0, 100.0), (100.0, 33.3)];
        for &(before, after) in &pairs {
            let fixed_point = FixedPoint {
                scale_before: before,
                pointer: v(321.0, 123.0),
                scroll: v(40.0, 300.0),
            };
            let scroll = fixed_point.scroll_after(after);
            let pointer_after = fixed_point.pointer * (after / before);

            // Same natural-image pixel under the pointer
            let natural_before = fixed_point.pointer / before;
            let natural_after = pointer_after / after;
            assert!((natural_before.x - natural_after.x).abs() < 1e-9);
            assert!((natural_before.y - natural_after.y).abs() < 1e-9);

            // And it sits at the same viewport position
            let screen_before = fixed_point.pointer - fixed_point.scroll;
            let screen_after = pointer_after - scroll;
            assert!((screen_before.x - screen_after.x).abs() < 1.0);
            assert!((screen_before.y - screen_after.y).abs() < 1.0);
        }
    }

    #[test]
    fn test_slider_mapping() {
        let mut slider = ZoomSlider::default();
        assert_eq!(slider.zoom(), 100.0);

        slider.set_value(-1.0);
        assert_eq!(slider.zoom(), 20.0);
        slider.set_value(1.0);
        assert_eq!(slider.zoom(), 500.0);

        slider.plus();
        assert_eq!(slider.value(), 1.0);

        slider.set_value(0.0);
        slider.minus();
        assert!((slider.value() + 0.2).abs() < 1e-12);
        assert_eq!(slider.zoom(), (100.0 * 5f64.powf(-0.2)).round());

        slider.set_zoom(250.0);
        assert!((ZoomSlider::zoom_for(slider.value()) - 250.0).abs() < 1.0);

        slider.set_zoom(10_000.0);
        assert_eq!(slider.value(), 1.0);
        slider.set_zoom(0.0);
        assert_eq!(slider.value(), -1.0);
    }

    #[test]
    fn test_wheel_zoom_bounds_outside_manual() {
        let mut zoom = ZoomState::new(0.4);
        let natural = Size::new(4000.0, 3000.0);
        let container = Size::new(800.0, 600.0);
        assert_eq!(zoom.refit(natural, container, 17.0), Some(20.0));

        // Cannot zoom out below the fit scale
        assert!(!zoom.wheel_zoom(-1.0, v(10.0, 10.0), v(0.0, 0.0)));
        assert_eq!(zoom.scale(), 20.0);

        let mut steps = 0;
        while zoom.wheel_zoom(1.0, v(10.0, 10.0), v(0.0, 0.0)) {
            steps += 1;
        }
        assert!(steps > 0);
        assert_eq!(zoom.scale(), 100.0);
    }

    #[test]
    fn test_wheel_zoom_records_one_shot_anchor() {
        let mut zoom = ZoomState::new(0.4);
        zoom.refit(Size::new(4000.0, 3000.0), Size::new(800.0, 600.0), 17.0);

        assert!(zoom.wheel_zoom(1.0, v(400.0, 300.0), v(0.0, 0.0)));
        let scroll = zoom.take_fixed_point_scroll().unwrap();
        // 20% -> 28%: pointer moves from 400 to 560 in image space
        assert!((scroll.x - 160.0).abs() < 1e-9);
        assert!((scroll.y - 120.0).abs() < 1e-9);
        assert_eq!(zoom.take_fixed_point_scroll(), None);
    }

    #[test]
    fn test_manual_mode_zoom_moves_slider() {
        let mut zoom = ZoomState::new(0.4);
        zoom.set_fit_mode(FitMode::Manual);
        assert_eq!(zoom.refit(Size::new(400.0, 300.0), Size::new(800.0, 600.0), 17.0), Some(100.0));

        assert!(zoom.wheel_zoom(1.0, v(0.0, 0.0), v(0.0, 0.0)));
        assert_eq!(zoom.scale(), 140.0);
        assert_eq!(zoom.slider().zoom(), 140.0);
        assert_eq!(zoom.bounds(), (0.0, f64::INFINITY));
    }

    #[test]
    fn test_pinch_zoom_uses_distance_ratio() {
        let mut zoom = ZoomState::new(0.4);
        zoom.refit(Size::new(4000.0, 3000.0), Size::new(800.0, 600.0), 17.0);
        assert!(zoom.pinch_zoom(1.5, v(100.0, 100.0), v(0.0, 0.0)));
        assert!((zoom.scale() - 30.0).abs() < 1e-9);
        assert!(zoom.pinch_zoom(0.1, v(100.0, 100.0), v(0.0, 0.0)));
        assert_eq!(zoom.scale(), 20.0);
        assert!(!zoom.pinch_zoom(f64::NAN, v(0.0, 0.0), v(0.0, 0.0)));
    }

    #[test]
    fn test_set_fit_mode_requires_refit() {
        let mut zoom = ZoomState::new(0.4);
        zoom.refit(Size::new(400.0, 300.0), Size::new(800.0, 600.0), 17.0);
        zoom.set_fit_mode(FitMode::Width);
        assert_eq!(zoom.scale(), 0.0);
        assert!(!zoom.wheel_zoom(1.0, v(0.0, 0.0), v(0.0, 0.0)));
    }

    #[test]
    fn test_visible_part() {
        let part = VisiblePart::compute(
            Size::new(400.0, 300.0),
            Size::new(1600.0, 300.0),
            v(400.0, 0.0),
        );
        assert_eq!(part.width, 0.25);
        assert_eq!(part.height, 1.0);
        assert_eq!(part.left, 0.25);
        assert_eq!(part.top, 0.0);

        let scroll = VisiblePart::scroll_visible_to(part.left, part.top, Size::new(1600.0, 300.0));
        assert_eq!(scroll, v(400.0, 0.0));
    }
}
