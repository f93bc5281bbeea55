//! Windowed layout of a thumbnail grid
//!
//! Only the rows around the viewport are materialized; the rest of the list is
//! represented by spacers so the scrollbar keeps its real proportions.

use std::ops::{Range, RangeInclusive};

use crate::config::ViewerConfig;
use crate::geometry::Size;

/// Geometry of one grid
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GridConfig {
    pub item_height: f64,
    pub item_width: Option<f64>,
    pub columns: Option<usize>,
    pub row_gap: f64,
    pub column_gap: f64,
    pub scrollbar_width: f64,
    pub rows_ahead: usize,
}

impl GridConfig {
    pub fn thumbnails(config: &ViewerConfig) -> Self {
        Self {
            item_height: config.thumbnail_height.max(0.0),
            item_width: config.thumbnail_width,
            columns: config.columns,
            row_gap: config.row_gap.max(0.0),
            column_gap: config.column_gap,
            scrollbar_width: config.grid_scrollbar_width,
            // Zero look-ahead can leave the bottom row of the viewport unmaterialized
            rows_ahead: config.rows_ahead.max(1),
        }
    }
}

impl Default for GridConfig {
    fn default() -> Self {
        Self::thumbnails(&ViewerConfig::default())
    }
}

/// How `scroll_to_index` positions the target row
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Align {
    /// Row in the vertical middle of the viewport
    Center,
    /// Minimal scroll, nothing if the row is already fully visible
    Smart,
}

/// Contiguous slice of items to materialize
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct VisibleRange {
    pub start_index: usize,
    pub count: usize,
    /// Top of the first materialized row, in content px
    pub offset_y: u64,
}

impl VisibleRange {
    pub fn indices(&self) -> Range<usize> {
        self.start_index..self.start_index + self.count
    }

    pub fn contains(&self, index: usize) -> bool {
        self.indices().contains(&index)
    }

    pub fn is_empty(&self) -> bool {
        self.count == 0
    }
}

/// Snapshot of one scrolling surface
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewportState {
    pub scroll_offset: f64,
    pub container: Size,
    pub visible: Option<VisibleRange>,
}

#[derive(Debug, Clone)]
pub struct GridLayout {
    config: GridConfig,
    item_count: usize,
    container: Size,
    scroll_offset: f64,
    reported_rows: Option<RangeInclusive<usize>>,
}

impl GridLayout {
    pub fn new(config: GridConfig) -> Self {
        Self {
            config,
            item_count: 0,
            container: Size::ZERO,
            scroll_offset: 0.0,
            reported_rows: None,
        }
    }

    pub fn config(&self) -> &GridConfig {
        &self.config
    }

    pub fn item_count(&self) -> usize {
        self.item_count
    }

    pub fn set_item_count(&mut self, count: usize) {
        self.item_count = count;
    }

    pub fn container(&self) -> Size {
        self.container
    }

    pub fn set_container(&mut self, container: Size) {
        self.container = container;
    }

    pub fn scroll_offset(&self) -> f64 {
        self.scroll_offset
    }

    pub fn set_scroll_offset(&mut self, offset: f64) {
        self.scroll_offset = offset.max(0.0);
    }

    /// Distance between row tops, never below one pixel
    fn stride(&self) -> f64 {
        (self.config.item_height + self.config.row_gap).max(1.0)
    }

    pub fn items_per_row(&self) -> usize {
        if let Some(columns) = self.config.columns {
            return columns.max(1);
        }
        match self.config.item_width {
            Some(item_width) if self.container.width > 0.0 => {
                let fits = (self.container.width + self.config.column_gap - self.config.scrollbar_width)
                    / (item_width + self.config.column_gap);
                (fits.floor().max(1.0)) as usize
            }
            _ => 1,
        }
    }

    pub fn row_count(&self) -> usize {
        self.item_count.div_ceil(self.items_per_row())
    }

    /// Height of the whole list, used for the spacer
    pub fn total_height(&self) -> f64 {
        let rows = self.row_count();
        if rows == 0 {
            return 0.0;
        }
        rows as f64 * self.config.item_height + (rows - 1) as f64 * self.config.row_gap
    }

    pub fn max_scroll(&self) -> f64 {
        (self.total_height() - self.container.height).max(0.0)
    }

    /// Items to materialize; `None` until the container has been laid out
    pub fn visible_range(&self) -> Option<VisibleRange> {
        if self.container.is_empty() {
            return None;
        }
        if self.item_count == 0 {
            return Some(VisibleRange::default());
        }

        let stride = self.stride();
        let per_row = self.items_per_row();
        let ahead = self.config.rows_ahead;

        let start_row = ((self.scroll_offset / stride).floor() as usize).saturating_sub(ahead);
        let start_index = (start_row * per_row).min(self.item_count);
        let rows = (self.container.height / stride).ceil() as usize + 2 * ahead;
        let count = (self.item_count - start_index).min(rows * per_row);

        Some(VisibleRange {
            start_index,
            count,
            offset_y: (start_row as f64 * stride) as u64,
        })
    }

    /// Rows geometrically intersecting the viewport
    pub fn visible_rows(&self) -> Option<RangeInclusive<usize>> {
        let rows = self.row_count();
        if self.container.is_empty() || rows == 0 {
            return None;
        }
        let stride = self.stride();
        let first = ((self.scroll_offset / stride).floor() as usize).min(rows - 1);
        let last = (((self.scroll_offset + self.container.height) / stride).floor() as usize).min(rows - 1);
        Some(first..=last)
    }

    /// Item indices of the visible rows
    pub fn visible_indices(&self) -> Vec<usize> {
        let per_row = self.items_per_row();
        self.visible_rows()
            .map(|rows| {
                let start = rows.start() * per_row;
                let end = ((rows.end() + 1) * per_row).min(self.item_count);
                (start..end).collect()
            })
            .unwrap_or_default()
    }

    /// Visible rows, only when they differ from the last reported ones
    pub fn take_visible_rows_change(&mut self) -> Option<RangeInclusive<usize>> {
        let rows = self.visible_rows();
        if rows == self.reported_rows {
            return None;
        }
        self.reported_rows = rows.clone();
        rows
    }

    fn row_top(&self, row: usize) -> f64 {
        (row as f64 * self.stride()).ceil()
    }

    /// Scroll offset bringing `index` into view, `None` when no scroll is needed
    pub fn scroll_to_index(&self, index: usize, align: Align) -> Option<f64> {
        if index >= self.item_count || self.container.is_empty() {
            return None;
        }

        let row = index / self.items_per_row();
        let row_top = self.row_top(row);
        let item_height = self.config.item_height;
        let height = self.container.height;

        let target = match align {
            Align::Center => row_top - (height / 2.0 - item_height / 2.0).ceil(),
            Align::Smart => {
                let row_bottom = row_top + item_height;
                let view_bottom = self.scroll_offset + height;
                if row_top >= self.scroll_offset && row_bottom <= view_bottom {
                    return None;
                } else if row_top < self.scroll_offset {
                    row_top
                } else {
                    row_top - (height - item_height)
                }
            }
        };

        Some(target.clamp(0.0, self.max_scroll()))
    }

    pub fn viewport_state(&self) -> ViewportState {
        ViewportState {
            scroll_offset: self.scroll_offset,
            container: self.container,
            visible: self.visible_range(),
        }
    }
}
