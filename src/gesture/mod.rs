/// Input interpretation for the viewer
///
/// Turns raw wheel, touch and timer events into navigation and zoom intents:
/// - `wheel.rs` - page turn after scrolling past either end
/// - `swipe.rs` - horizontal swipe to next/previous
/// - `pinch.rs` - two-finger pinch distance ratio
/// - `slideshow.rs` - timed scroll-then-advance

pub mod pinch;
pub mod slideshow;
pub mod swipe;
pub mod wheel;

pub use pinch::{PinchStep, PinchTracker};
pub use slideshow::{SlideStep, Slideshow};
pub use swipe::{Swipe, SwipeTracker};
pub use wheel::{PageTurn, ScrollMetrics, WheelPager};
