//! Rebuilds an outline tree from flat bookmark records.
//!
//! Levels only steer nesting direction relative to the previous record:
//!
//! - same level: the next record is a sibling;
//! - higher level, by any amount: the next record is a child of the record
//!   just added (`[1, 3]` nests the level-3 record directly under the
//!   level-1 record);
//! - lower level: open levels are closed until one is no deeper than the
//!   next record, and the two rules above are applied again from there.
//!
//! The walk keeps its open levels on an explicit stack instead of recursing.

use crate::bookmark::Bookmark;
use crate::error::BookmarkError;
use crate::outline::{ItemId, Outline, OutlineItem};
use crate::zoom::to_destination;

/// An open nesting level.
#[derive(Debug, Clone, Copy)]
struct Frame {
    /// Item receiving new children, `None` for the outline root.
    parent: Option<ItemId>,
    /// Level of the records added at this depth.
    level: usize,
    /// Most recent item added at this depth.
    last: Option<ItemId>,
}

/// Build an outline from records in their original order.
///
/// # Errors
///
/// Returns [`BookmarkError::Structural`] when `records` is empty or the first
/// record is not at level 1. No partial outline is produced.
pub fn build_outline(records: &[Bookmark]) -> Result<Outline, BookmarkError> {
    let Some(first) = records.first() else {
        return Err(BookmarkError::Structural(
            "no bookmarks found to import".to_string(),
        ));
    };
    if first.level != 1 {
        return Err(BookmarkError::Structural(format!(
            "root bookmark must start at level 1, not {}",
            first.level
        )));
    }

    let mut outline = Outline::new();
    let mut open: Vec<Frame> = Vec::new();
    let mut current = Frame {
        parent: None,
        level: 1,
        last: None,
    };

    for (pos, record) in records.iter().enumerate() {
        let id = outline.add_under(current.parent, item_from_record(record));
        current.last = Some(id);

        let Some(next) = records.get(pos + 1) else {
            break;
        };

        while next.level < current.level {
            match open.pop() {
                Some(frame) => current = frame,
                None => break,
            }
        }

        if next.level > current.level {
            open.push(current);
            current = Frame {
                parent: current.last,
                level: next.level,
                last: None,
            };
        }
    }

    tracing::debug!(count = outline.len(), "rebuilt outline");
    Ok(outline)
}

fn item_from_record(record: &Bookmark) -> OutlineItem {
    let page_index = record
        .page_number
        .filter(|&page| page > 0)
        .map(|page| page - 1);
    let destination = to_destination(
        record.zoom_type,
        record.zoom.as_deref(),
        record.y_offset,
        page_index,
    );
    OutlineItem::new(record.title.clone(), Some(destination))
}
