//! Two-finger pinch tracking
//!
//! Each move of either pointer yields the ratio between the new and the
//! previous pointer distance, anchored at the pointers' midpoint. The ratio
//! feeds `ZoomState::pinch_zoom`.

use cgmath::{MetricSpace, Vector2};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PinchStep {
    pub ratio: f64,
    pub midpoint: Vector2<f64>,
}

#[derive(Debug, Clone, Default)]
pub struct PinchTracker {
    pointers: Vec<(u64, Vector2<f64>)>,
    last_distance: Option<f64>,
}

impl PinchTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn pointer_down(&mut self, id: u64, position: Vector2<f64>) {
        if let Some(pointer) = self.pointers.iter_mut().find(|(p, _)| *p == id) {
            pointer.1 = position;
        } else {
            self.pointers.push((id, position));
        }
    }

    pub fn pointer_move(&mut self, id: u64, position: Vector2<f64>) -> Option<PinchStep> {
        let pointer = self.pointers.iter_mut().find(|(p, _)| *p == id)?;
        pointer.1 = position;

        let [(_, a), (_, b)] = self.pointers[..] else {
            return None;
        };
        let distance = a.distance(b);
        let previous = self.last_distance.replace(distance);

        match previous {
            Some(previous) if previous > 0.0 && distance != previous => Some(PinchStep {
                ratio: distance / previous,
                midpoint: (a + b) / 2.0,
            }),
            _ => None,
        }
    }

    pub fn pointer_up(&mut self, id: u64) {
        self.pointers.retain(|(p, _)| *p != id);
        if self.pointers.len() < 2 {
            self.last_distance = None;
        }
    }

    pub fn is_pinching(&self) -> bool {
        self.pointers.len() == 2
    }
}
