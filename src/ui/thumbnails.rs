//! Thumbnail column of the active folder
//!
//! Only the rows `GridLayout` reports as visible are built; two spacers stand
//! in for everything above and below them.

use iced::widget::{button, column, image, scrollable, Column, Row, Space};
use iced::{ContentFit, Element, Length, Theme};

use drive_photos::drive::FileRecord;
use drive_photos::grid::GridLayout;

use crate::Message;

pub fn grid_id() -> scrollable::Id {
    scrollable::Id::new("thumbnails")
}

pub fn view<'a>(
    files: &'a [FileRecord],
    active: Option<usize>,
    layout: &GridLayout,
) -> Element<'a, Message> {
    let config = layout.config();
    let per_row = layout.items_per_row().max(1);
    let range = layout.visible_range().unwrap_or_default();
    let shown = files.get(range.indices()).unwrap_or(&[]);

    let rows = shown.chunks(per_row).enumerate().map(|(r, chunk)| {
        let cells = chunk.iter().enumerate().map(|(c, file)| {
            let index = range.start_index + r * per_row + c;
            thumbnail(file, Some(index) == active, config.item_height)
        });
        Row::with_children(cells)
            .spacing(config.column_gap as f32)
            .height(Length::Fixed(config.item_height as f32))
            .into()
    });

    let row_count = shown.len().div_ceil(per_row);
    let rows_height = row_count as f64 * config.item_height
        + row_count.saturating_sub(1) as f64 * config.row_gap;
    let top = range.offset_y as f64;
    let bottom = (layout.total_height() - top - rows_height).max(0.0);

    let content = column![
        Space::with_height(Length::Fixed(top as f32)),
        Column::with_children(rows).spacing(config.row_gap as f32),
        Space::with_height(Length::Fixed(bottom as f32)),
    ]
    .width(Length::Fill);

    scrollable(content)
        .id(grid_id())
        .on_scroll(Message::GridScrolled)
        .width(Length::Fill)
        .height(Length::Fill)
        .into()
}

fn thumbnail(file: &FileRecord, active: bool, height: f64) -> Element<'_, Message> {
    let style: fn(&Theme, button::Status) -> button::Style = if active {
        button::primary
    } else {
        button::text
    };

    button(
        image(image::Handle::from_path(&file.thumbnail_url))
            .width(Length::Fill)
            .height(Length::Fill)
            .content_fit(ContentFit::Cover),
    )
    .on_press(Message::Select(file.id.clone()))
    .padding(3)
    .width(Length::Fill)
    .height(Length::Fixed(height as f32))
    .style(style)
    .into()
}
