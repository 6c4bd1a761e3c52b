//! Arena-backed outline tree.
//!
//! [`Outline`] stores every [`OutlineItem`] in one vector and links children
//! by [`ItemId`]. The outline root itself is implicit: its children are
//! [`Outline::roots`]. Traversal uses explicit stacks so deeply nested
//! outlines cannot overflow the call stack.

use crate::destination::Destination;

/// Index of an item inside an [`Outline`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ItemId(usize);

impl ItemId {
    /// Position of the item in the arena.
    pub fn index(self) -> usize {
        self.0
    }
}

/// One bookmark in the tree.
#[derive(Debug, Clone, PartialEq)]
pub struct OutlineItem {
    /// The bookmark title.
    pub title: String,
    /// Where the bookmark navigates to, `None` for non-navigation actions.
    pub destination: Option<Destination>,
    children: Vec<ItemId>,
}

impl OutlineItem {
    /// Create a childless item.
    pub fn new(title: impl Into<String>, destination: Option<Destination>) -> Self {
        Self {
            title: title.into(),
            destination,
            children: Vec::new(),
        }
    }

    /// Child items in display order.
    pub fn children(&self) -> &[ItemId] {
        &self.children
    }
}

/// An ordered forest of outline items.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Outline {
    items: Vec<OutlineItem>,
    roots: Vec<ItemId>,
}

impl Outline {
    /// Create an empty outline.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a top-level item.
    pub fn add_root(&mut self, item: OutlineItem) -> ItemId {
        let id = self.push(item);
        self.roots.push(id);
        id
    }

    /// Append `item` as the last child of `parent`.
    ///
    /// # Panics
    ///
    /// Panics if `parent` does not belong to this outline.
    pub fn add_child(&mut self, parent: ItemId, item: OutlineItem) -> ItemId {
        let id = self.push(item);
        self.items[parent.0].children.push(id);
        id
    }

    /// Append `item` under `parent`, or at the top level when `parent` is `None`.
    pub fn add_under(&mut self, parent: Option<ItemId>, item: OutlineItem) -> ItemId {
        match parent {
            Some(parent) => self.add_child(parent, item),
            None => self.add_root(item),
        }
    }

    fn push(&mut self, item: OutlineItem) -> ItemId {
        let id = ItemId(self.items.len());
        self.items.push(item);
        id
    }

    /// Look up an item.
    pub fn get(&self, id: ItemId) -> Option<&OutlineItem> {
        self.items.get(id.0)
    }

    /// Top-level items in display order.
    pub fn roots(&self) -> &[ItemId] {
        &self.roots
    }

    /// Children of `id` in display order (empty for unknown ids).
    pub fn children(&self, id: ItemId) -> &[ItemId] {
        self.items
            .get(id.0)
            .map(|item| item.children.as_slice())
            .unwrap_or(&[])
    }

    /// Total number of items.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Returns true if the outline has no items.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Pre-order walk: each item before its children, children before the
    /// next sibling. Yields `(id, level)` with level 1 for top-level items.
    pub fn walk(&self) -> Walk<'_> {
        Walk {
            outline: self,
            stack: self.roots.iter().rev().map(|&id| (id, 1)).collect(),
        }
    }
}

/// Iterator returned by [`Outline::walk`].
#[derive(Debug)]
pub struct Walk<'a> {
    outline: &'a Outline,
    stack: Vec<(ItemId, usize)>,
}

impl Iterator for Walk<'_> {
    type Item = (ItemId, usize);

    fn next(&mut self) -> Option<Self::Item> {
        let (id, level) = self.stack.pop()?;
        self.stack.extend(
            self.outline
                .children(id)
                .iter()
                .rev()
                .map(|&child| (child, level + 1)),
        );
        Some((id, level))
    }
}
