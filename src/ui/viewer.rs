//! Main image area
//!
//! The image is laid out at its computed render size inside a two-way
//! scrollable; padding centers it when it is smaller than the viewport.

use iced::widget::scrollable::{Direction, Scrollbar};
use iced::widget::{container, image, scrollable, Row};
use iced::{ContentFit, Element, Length, Padding};

use drive_photos::drive::FileRecord;
use drive_photos::geometry::RenderGeometry;
use drive_photos::preload::PreloadSet;

use crate::Message;

/// Width of the viewer's scrollbars in px
pub const SCROLLBAR_WIDTH: f64 = 10.0;

pub fn viewer_id() -> scrollable::Id {
    scrollable::Id::new("viewer")
}

pub fn view<'a>(file: &'a FileRecord, geometry: &RenderGeometry) -> Element<'a, Message> {
    let handle = image::Handle::from_path(&file.content_url);

    if geometry.render_width <= 0.0 || geometry.render_height <= 0.0 {
        // Size not known from the drive; let the widget scale it down
        return container(image(handle).content_fit(ContentFit::ScaleDown))
            .width(Length::Fill)
            .height(Length::Fill)
            .center_x(Length::Fill)
            .center_y(Length::Fill)
            .into();
    }

    let picture = image(handle)
        .width(Length::Fixed(geometry.render_width as f32))
        .height(Length::Fixed(geometry.render_height as f32))
        .content_fit(ContentFit::Fill);

    let placed = container(picture).padding(Padding {
        top: geometry.center_offset_top as f32,
        right: 0.0,
        bottom: 0.0,
        left: geometry.center_offset_left as f32,
    });

    let bar = || {
        Scrollbar::new()
            .width(SCROLLBAR_WIDTH as f32)
            .scroller_width(SCROLLBAR_WIDTH as f32)
    };

    scrollable(placed)
        .id(viewer_id())
        .direction(Direction::Both {
            vertical: bar(),
            horizontal: bar(),
        })
        .on_scroll(Message::ViewerScrolled)
        .width(Length::Fill)
        .height(Length::Fill)
        .into()
}

/// One-pixel copies of the warm files so they are decoded before they are needed
pub fn preload_strip<'a>(preload: &PreloadSet<'a>) -> Element<'a, Message> {
    Row::with_children(preload.warm.iter().map(|file| {
        image(image::Handle::from_path(&file.content_url))
            .width(Length::Fixed(1.0))
            .height(Length::Fixed(1.0))
            .into()
    }))
    .height(Length::Fixed(1.0))
    .into()
}
