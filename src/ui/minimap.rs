use iced::mouse::{self, Cursor};
use iced::widget::canvas::{self, Path, Program, Stroke};
use iced::{Point, Rectangle, Renderer, Size, Theme};

use drive_photos::geometry::VisiblePart;

use crate::Message;

/// Overview of a zoomed image with the on-screen part outlined
///
/// Clicking or dragging moves the outline, which scrolls the viewer.
pub struct Minimap {
    pub part: VisiblePart,
}

impl Minimap {
    /// Message centering the visible window on `position`
    fn jump(&self, position: Point, bounds: Rectangle) -> Message {
        let x = position.x as f64 / bounds.width as f64;
        let y = position.y as f64 / bounds.height as f64;
        let left = (x - self.part.width / 2.0).clamp(0.0, (1.0 - self.part.width).max(0.0));
        let top = (y - self.part.height / 2.0).clamp(0.0, (1.0 - self.part.height).max(0.0));
        Message::MinimapJump { left, top }
    }
}

impl Program<Message> for Minimap {
    /// Whether the left button is held inside the minimap
    type State = bool;

    fn draw(
        &self,
        _state: &Self::State,
        renderer: &Renderer,
        theme: &Theme,
        bounds: Rectangle,
        _cursor: Cursor,
    ) -> Vec<canvas::Geometry> {
        let palette = theme.extended_palette();
        let mut frame = canvas::Frame::new(renderer, bounds.size());

        frame.fill_rectangle(Point::ORIGIN, bounds.size(), palette.background.weak.color);

        let window = Path::rectangle(
            Point::new(
                self.part.left as f32 * bounds.width,
                self.part.top as f32 * bounds.height,
            ),
            Size::new(
                self.part.width as f32 * bounds.width,
                self.part.height as f32 * bounds.height,
            ),
        );
        frame.stroke(
            &window,
            Stroke::default()
                .with_color(palette.primary.strong.color)
                .with_width(2.0),
        );

        vec![frame.into_geometry()]
    }

    fn update(
        &self,
        state: &mut Self::State,
        event: canvas::Event,
        bounds: Rectangle,
        cursor: Cursor,
    ) -> (canvas::event::Status, Option<Message>) {
        match event {
            canvas::Event::Mouse(mouse::Event::ButtonPressed(mouse::Button::Left)) => {
                if let Some(position) = cursor.position_in(bounds) {
                    *state = true;
                    return (canvas::event::Status::Captured, Some(self.jump(position, bounds)));
                }
            }
            canvas::Event::Mouse(mouse::Event::CursorMoved { .. }) if *state => {
                if let Some(position) = cursor.position_in(bounds) {
                    return (canvas::event::Status::Captured, Some(self.jump(position, bounds)));
                }
            }
            canvas::Event::Mouse(mouse::Event::ButtonReleased(mouse::Button::Left)) => {
                *state = false;
            }
            _ => {}
        }

        (canvas::event::Status::Ignored, None)
    }
}
