use super::layout::{Align, GridLayout};

/// Keeps a grid scrolled to the active item
///
/// Follows the active *index*, not the active file: a file opened from its
/// own metadata or reached across a folder boundary only gets an index once
/// its folder listing lands, and that is when the grid has to move.
#[derive(Debug, Clone)]
pub struct ActiveFollow {
    followed: Option<usize>,
    align: Align,
}

impl ActiveFollow {
    pub fn new() -> Self {
        Self {
            followed: None,
            align: Align::Center,
        }
    }

    /// Scroll minimally on the next change, for items picked in the grid itself
    pub fn smart_once(&mut self) {
        self.align = Align::Smart;
    }

    /// New scroll offset when `active` differs from the last followed index
    ///
    /// The offset is already applied to `grid`; the caller only has to move
    /// the widget.
    pub fn follow(&mut self, grid: &mut GridLayout, active: Option<usize>) -> Option<f64> {
        let align = std::mem::replace(&mut self.align, Align::Center);
        if active == self.followed {
            return None;
        }
        self.followed = active;

        let offset = grid.scroll_to_index(active?, align)?;
        grid.set_scroll_offset(offset);
        Some(offset)
    }
}

impl Default for ActiveFollow {
    fn default() -> Self {
        Self::new()
    }
}
