/// Virtualized thumbnail grid
///
/// - `layout.rs` - visible range, spacer height, scroll-to-index
/// - `debounce.rs` - resize debounce and per-frame scroll coalescing
/// - `follow.rs` - keeping the active item in view

pub mod debounce;
pub mod follow;
pub mod layout;

pub use debounce::{Debounced, FrameCoalescer};
pub use follow::ActiveFollow;
pub use layout::{Align, GridConfig, GridLayout, ViewportState, VisibleRange};
