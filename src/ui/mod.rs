/// Widgets of the viewer window
///
/// - `viewer.rs` - scrollable image area and preload strip
/// - `thumbnails.rs` - virtualized thumbnail column
/// - `minimap.rs` - canvas showing which part of a zoomed image is on screen

pub mod minimap;
pub mod thumbnails;
pub mod viewer;
