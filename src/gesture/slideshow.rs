//! Slideshow auto-advance
//!
//! Every tick scrolls a tall image down by about one screen, and moves to the
//! next image once the bottom has been reached.

use std::time::Duration;

use super::wheel::ScrollMetrics;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SlideStep {
    /// Scroll the viewer to this vertical offset
    ScrollTo(f64),
    /// Show the next image
    Next,
}

#[derive(Debug, Clone)]
pub struct Slideshow {
    playing: bool,
    interval: Duration,
    overlap: f64,
}

impl Slideshow {
    pub fn new(interval: Duration, overlap: f64) -> Self {
        Self {
            playing: false,
            interval,
            overlap,
        }
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    pub fn is_playing(&self) -> bool {
        self.playing
    }

    /// Start or stop; cannot start while `enabled` is false
    pub fn toggle(&mut self, enabled: bool) {
        self.playing = !self.playing && enabled;
    }

    pub fn stop(&mut self) {
        self.playing = false;
    }

    /// Stop a running slideshow once there is nothing left to show
    ///
    /// Returns true when this call stopped it.
    pub fn sync(&mut self, enabled: bool) -> bool {
        if self.playing && !enabled {
            log::debug!("Slideshow stopped: no next image");
            self.playing = false;
            return true;
        }
        false
    }

    /// What one tick does given the viewer's scroll position
    pub fn step(&self, metrics: ScrollMetrics) -> SlideStep {
        if metrics.offset >= metrics.max_offset() {
            SlideStep::Next
        } else {
            let slide = (metrics.viewport - self.overlap).max(self.overlap);
            SlideStep::ScrollTo(metrics.offset + slide)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn slideshow() -> Slideshow {
        Slideshow::new(Duration::from_millis(5000), 50.0)
    }

    #[test]
    fn test_toggle_respects_enabled() {
        let mut show = slideshow();
        show.toggle(false);
        assert!(!show.is_playing());
        show.toggle(true);
        assert!(show.is_playing());
        show.toggle(true);
        assert!(!show.is_playing());
    }

    #[test]
    fn test_sync_stops_when_disabled() {
        let mut show = slideshow();
        show.toggle(true);
        assert!(!show.sync(true));
        assert!(show.sync(false));
        assert!(!show.is_playing());
        assert!(!show.sync(false));
    }

    #[test]
    fn test_step_scrolls_then_advances() {
        let show = slideshow();
        let tall = ScrollMetrics {
            offset: 0.0,
            content: 2000.0,
            viewport: 600.0,
        };
        assert_eq!(show.step(tall), SlideStep::ScrollTo(550.0));

        let bottom = ScrollMetrics {
            offset: 1400.0,
            ..tall
        };
        assert_eq!(show.step(bottom), SlideStep::Next);

        let fits = ScrollMetrics {
            offset: 0.0,
            content: 300.0,
            viewport: 600.0,
        };
        assert_eq!(show.step(fits), SlideStep::Next);
    }

    #[test]
    fn test_tiny_viewport_still_moves() {
        let show = slideshow();
        let metrics = ScrollMetrics {
            offset: 0.0,
            content: 1000.0,
            viewport: 60.0,
        };
        assert_eq!(show.step(metrics), SlideStep::ScrollTo(50.0));
    }
}
