//! Horizontal swipe to the next or previous image

use cgmath::Vector2;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Swipe {
    /// Finger moved left: show the next image
    Left,
    /// Finger moved right: show the previous image
    Right,
}

#[derive(Debug, Clone, Copy)]
struct TouchStart {
    finger: u64,
    position: Vector2<f64>,
    scroll_left: f64,
    max_scroll_left: f64,
}

/// Tracks one single-finger touch from press to release
#[derive(Debug, Clone)]
pub struct SwipeTracker {
    threshold: f64,
    edge_tolerance: f64,
    fingers: usize,
    start: Option<TouchStart>,
}

impl SwipeTracker {
    pub fn new(threshold: f64, edge_tolerance: f64) -> Self {
        Self {
            threshold,
            edge_tolerance,
            fingers: 0,
            start: None,
        }
    }

    /// A finger touched down; `scroll_left`/`max_scroll_left` describe the
    /// viewer's horizontal scroll at that moment
    pub fn finger_pressed(
        &mut self,
        finger: u64,
        position: Vector2<f64>,
        scroll_left: f64,
        max_scroll_left: f64,
    ) {
        self.fingers += 1;
        if self.fingers == 1 && self.start.is_none() {
            self.start = Some(TouchStart {
                finger,
                position,
                scroll_left,
                max_scroll_left,
            });
        } else {
            // Multi-touch is a pinch, not a swipe
            self.start = None;
        }
    }

    pub fn finger_lifted(&mut self, finger: u64, position: Vector2<f64>) -> Option<Swipe> {
        self.fingers = self.fingers.saturating_sub(1);
        let start = self.start.take()?;
        if start.finger != finger {
            return None;
        }

        let delta = position - start.position;
        if delta.x.abs() <= delta.y.abs() {
            return None;
        }

        if delta.x < -self.threshold && start.scroll_left >= start.max_scroll_left - self.edge_tolerance {
            Some(Swipe::Left)
        } else if delta.x > self.threshold && start.scroll_left <= 0.0 {
            Some(Swipe::Right)
        } else {
            None
        }
    }

    /// Touch interrupted by the system
    pub fn cancel(&mut self) {
        self.fingers = 0;
        self.start = None;
    }
}
