//! Files kept warm around the active one
//!
//! The viewer renders the active image plus a handful of hidden ones so the
//! browser-style image cache already holds them when the user moves: the
//! neighbours on both sides, both ends of the folder, and whatever thumbnails
//! are on screen.

use std::collections::HashSet;

use crate::drive::FileRecord;

/// Active file plus the hidden preload set, in insertion order
#[derive(Debug, Clone, PartialEq, Default)]
pub struct PreloadSet<'a> {
    pub active: Option<&'a FileRecord>,
    pub warm: Vec<&'a FileRecord>,
}

impl<'a> PreloadSet<'a> {
    /// Active first, then the warm files
    pub fn iter(&self) -> impl Iterator<Item = &'a FileRecord> + '_ {
        self.active.into_iter().chain(self.warm.iter().copied())
    }
}

/// Select the files to preload around `active_index`
///
/// `count` files after and before the active one, the first and last `count`
/// files, and the files at `visible`. Duplicates (by id) and the active file
/// itself are removed from `warm`.
pub fn select_preload<'a>(
    files: &'a [FileRecord],
    active_index: Option<usize>,
    count: usize,
    visible: &[usize],
) -> PreloadSet<'a> {
    let Some((index, active)) = active_index.and_then(|i| files.get(i).map(|f| (i, f))) else {
        return PreloadSet::default();
    };
    let len = files.len();

    let after = (1..=count).map(|i| index.checked_add(i));
    let before = (1..=count).map(|i| index.checked_sub(i));
    let head = (0..count.min(len)).map(Some);
    let tail = (0..count.min(len)).map(|i| Some(len - 1 - i));
    let shown = visible.iter().map(|&i| Some(i));

    let mut seen = HashSet::new();
    seen.insert(active.id.as_str());

    let warm = after
        .chain(before)
        .chain(head)
        .chain(tail)
        .chain(shown)
        .flatten()
        .filter_map(|i| files.get(i))
        .filter(|&f| seen.insert(f.id.as_str()))
        .collect();

    PreloadSet {
        active: Some(active),
        warm,
    }
}
