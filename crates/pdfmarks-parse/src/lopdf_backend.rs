//! lopdf-based PDF outline backend.
//!
//! Implements [`OutlineBackend`] using the [lopdf](https://crates.io/crates/lopdf)
//! crate. Reading walks the `/Outlines` tree through `/First` and `/Next`
//! links; writing replaces `/Outlines` in the catalog with freshly allocated
//! outline item dictionaries.

use std::collections::HashSet;

use lopdf::encryption::DecryptionError;
use lopdf::{Dictionary, Object, ObjectId, StringFormat, dictionary};
use pdfmarks_core::{BookmarkError, Destination, DestinationKind, ItemId, Outline, OutlineItem};

use crate::backend::OutlineBackend;
use crate::error::BackendError;

/// Name trees deeper than this are treated as damaged.
const MAX_NAME_TREE_DEPTH: usize = 32;

/// A parsed PDF document backed by lopdf.
pub struct LopdfDocument {
    /// The underlying lopdf document.
    inner: lopdf::Document,
    /// Cached ordered list of page ObjectIds (indexed by 0-based page number).
    page_ids: Vec<ObjectId>,
}

impl LopdfDocument {
    fn new(inner: lopdf::Document) -> Self {
        // get_pages returns BTreeMap<u32, ObjectId> with 1-based keys
        let page_ids = inner.get_pages().values().copied().collect();
        Self { inner, page_ids }
    }

    /// Access the underlying lopdf document.
    pub fn inner(&self) -> &lopdf::Document {
        &self.inner
    }

    /// 0-based index of the page with object id `id`.
    fn page_index_of(&self, id: ObjectId) -> Option<usize> {
        self.page_ids.iter().position(|&page_id| page_id == id)
    }
}

impl std::fmt::Debug for LopdfDocument {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LopdfDocument")
            .field("page_count", &self.page_ids.len())
            .finish_non_exhaustive()
    }
}

/// The lopdf-based outline backend.
///
/// # Example
///
/// ```ignore
/// use pdfmarks_parse::{LopdfBackend, OutlineBackend};
///
/// let doc = LopdfBackend::open(pdf_bytes)?;
/// let outline = LopdfBackend::outline(&doc)?;
/// ```
pub struct LopdfBackend;

impl OutlineBackend for LopdfBackend {
    type Document = LopdfDocument;
    type Error = BackendError;

    fn open(bytes: &[u8]) -> Result<Self::Document, Self::Error> {
        let inner = lopdf::Document::load_mem(bytes)
            .map_err(|e| BackendError::Parse(format!("failed to parse PDF: {e}")))?;

        // Reject encrypted PDFs when no password is provided
        if inner.is_encrypted() {
            return Err(BackendError::Core(BookmarkError::PasswordRequired));
        }

        Ok(LopdfDocument::new(inner))
    }

    fn open_with_password(bytes: &[u8], password: &[u8]) -> Result<Self::Document, Self::Error> {
        let inner = match std::str::from_utf8(password) {
            // Objects of a protected file are only parsed when the password
            // is known at load time; an unencrypted file ignores it.
            Ok(password) => lopdf::Document::load_mem_with_password(bytes, password)
                .map_err(|e| match e {
                    lopdf::Error::InvalidPassword
                    | lopdf::Error::Decryption(DecryptionError::IncorrectPassword) => {
                        BackendError::Core(BookmarkError::InvalidPassword)
                    }
                    e => BackendError::Parse(format!("failed to parse PDF: {e}")),
                })?,
            Err(_) => {
                let inner = lopdf::Document::load_mem(bytes)
                    .map_err(|e| BackendError::Parse(format!("failed to parse PDF: {e}")))?;
                // No password that is not UTF-8 opens an encrypted file.
                if inner.is_encrypted() {
                    return Err(BackendError::Core(BookmarkError::InvalidPassword));
                }
                inner
            }
        };

        // Decrypted on load, so the document is written back unencrypted.
        Ok(LopdfDocument::new(inner))
    }

    fn page_count(doc: &Self::Document) -> usize {
        doc.page_ids.len()
    }

    fn outline(doc: &Self::Document) -> Result<Option<Outline>, Self::Error> {
        Ok(extract_outline(doc))
    }

    fn set_outline(doc: &mut Self::Document, outline: &Outline) -> Result<(), Self::Error> {
        write_outline(doc, outline)
    }

    fn save(doc: &mut Self::Document) -> Result<Vec<u8>, Self::Error> {
        // Drops the item dictionaries of any replaced outline.
        let pruned = doc.inner.prune_objects();
        tracing::debug!(pruned = pruned.len(), "pruned unreferenced objects");

        let mut buf = Vec::new();
        doc.inner
            .save_to(&mut buf)
            .map_err(|e| BackendError::Parse(format!("failed to write PDF: {e}")))?;
        Ok(buf)
    }
}

/// Get the catalog dictionary from the document.
fn get_catalog_dict(doc: &lopdf::Document) -> Option<&Dictionary> {
    let root_obj = doc.trailer.get(b"Root").ok()?;
    match root_obj {
        Object::Reference(id) => {
            let obj = doc.get_object(*id).ok()?;
            obj.as_dict().ok()
        }
        Object::Dictionary(dict) => Some(dict),
        _ => None,
    }
}

/// Resolve a potentially indirect object reference.
fn resolve_object<'a>(doc: &'a lopdf::Document, obj: &'a Object) -> &'a Object {
    match obj {
        Object::Reference(id) => doc.get_object(*id).unwrap_or(obj),
        _ => obj,
    }
}

/// Decode a PDF text string, handling UTF-16 BE BOM, UTF-8 and Latin-1.
fn decode_text_string(bytes: &[u8]) -> String {
    if bytes.len() >= 2 && bytes[0] == 0xFE && bytes[1] == 0xFF {
        let units: Vec<u16> = bytes[2..]
            .chunks_exact(2)
            .map(|c| u16::from_be_bytes([c[0], c[1]]))
            .collect();
        String::from_utf16_lossy(&units)
    } else {
        match std::str::from_utf8(bytes) {
            Ok(s) => s.to_string(),
            Err(_) => bytes.iter().map(|&b| b as char).collect(),
        }
    }
}

/// Encode `text` as a PDF text string.
///
/// ASCII stays a literal string; anything else is written as UTF-16 BE with
/// a byte order mark.
fn encode_text_string(text: &str) -> Object {
    if text.is_ascii() {
        return Object::string_literal(text);
    }
    let mut bytes = vec![0xFE, 0xFF];
    for unit in text.encode_utf16() {
        bytes.extend_from_slice(&unit.to_be_bytes());
    }
    Object::String(bytes, StringFormat::Hexadecimal)
}

/// Extract a string value from a dictionary, handling both String and Name types.
fn extract_string_from_dict(doc: &lopdf::Document, dict: &Dictionary, key: &[u8]) -> Option<String> {
    let obj = resolve_object(doc, dict.get(key).ok()?);
    match obj {
        Object::String(bytes, _) => Some(decode_text_string(bytes)),
        Object::Name(name) => Some(String::from_utf8_lossy(name).into_owned()),
        _ => None,
    }
}

/// Convert a lopdf Object to f64 (handles Integer, Real, and Null).
fn obj_to_f64(obj: &Object) -> Option<f64> {
    match obj {
        Object::Integer(i) => Some(*i as f64),
        Object::Real(f) => Some((*f).into()),
        _ => None, // null keeps the viewer's current value
    }
}

/// Read the document outline, or `None` if the catalog has no `/Outlines`.
///
/// The tree is followed to any depth; an item reached a second time ends its
/// sibling chain, which is what stops circular `/First` or `/Next` links.
fn extract_outline(doc: &LopdfDocument) -> Option<Outline> {
    let inner = &doc.inner;
    let catalog = get_catalog_dict(inner)?;
    let outlines_dict = resolve_object(inner, catalog.get(b"Outlines").ok()?)
        .as_dict()
        .ok()?;

    let mut outline = Outline::new();
    let Ok(Object::Reference(first_id)) = outlines_dict.get(b"First") else {
        return Some(outline);
    };

    // Each entry is a sibling chain: (first item, parent in the arena).
    let mut chains = vec![(*first_id, None)];
    let mut visited = HashSet::new();

    while let Some((chain_start, parent)) = chains.pop() {
        let mut current_id = Some(chain_start);
        while let Some(node_id) = current_id {
            // Circular reference protection
            if !visited.insert(node_id) {
                tracing::warn!(object = ?node_id, "outline item visited twice, stopping chain");
                break;
            }

            let Some(node_dict) = inner.get_object(node_id).ok().and_then(|o| o.as_dict().ok())
            else {
                tracing::warn!(object = ?node_id, "outline item is not a dictionary");
                break;
            };

            let title = extract_string_from_dict(inner, node_dict, b"Title").unwrap_or_default();
            let destination = resolve_action(doc, node_dict);
            let item_id = outline.add_under(parent, OutlineItem::new(title, destination));

            if let Ok(Object::Reference(child_id)) = node_dict.get(b"First") {
                chains.push((*child_id, Some(item_id)));
            }

            current_id = match node_dict.get(b"Next") {
                Ok(Object::Reference(next_id)) => Some(*next_id),
                _ => None,
            };
        }
    }

    tracing::debug!(items = outline.len(), "read document outline");
    Some(outline)
}

/// Resolve where an outline item navigates to.
///
/// Checks `/Dest` first, then a `/GoTo` action's `/D`. Any other action
/// (URI, JavaScript, Launch, ...) yields `None`.
pub fn resolve_action(doc: &LopdfDocument, item: &Dictionary) -> Option<Destination> {
    let inner = &doc.inner;

    if let Ok(dest_obj) = item.get(b"Dest") {
        if let Some(dest) = resolve_dest(doc, dest_obj) {
            return Some(dest);
        }
    }

    let action = resolve_object(inner, item.get(b"A").ok()?).as_dict().ok()?;
    match action.get(b"S") {
        Ok(Object::Name(kind)) if kind.as_slice() == b"GoTo" => {
            resolve_dest(doc, action.get(b"D").ok()?)
        }
        Ok(Object::Name(kind)) => {
            tracing::debug!(action = %String::from_utf8_lossy(kind), "non-navigation outline action");
            None
        }
        _ => None,
    }
}

/// Resolve an explicit or named destination.
fn resolve_dest(doc: &LopdfDocument, dest_obj: &Object) -> Option<Destination> {
    match resolve_object(&doc.inner, dest_obj) {
        Object::Array(arr) => parse_dest_array(doc, arr),
        Object::String(bytes, _) => resolve_named_dest(doc, &decode_text_string(bytes)),
        Object::Name(name) => resolve_named_dest(doc, &String::from_utf8_lossy(name)),
        _ => None,
    }
}

/// Parse an explicit destination array `[page /Kind operands...]`.
fn parse_dest_array(doc: &LopdfDocument, arr: &[Object]) -> Option<Destination> {
    let page_index = match arr.first()? {
        Object::Reference(page_ref) => {
            let index = doc.page_index_of(*page_ref);
            if index.is_none() {
                tracing::warn!(object = ?page_ref, "destination page is not in the page tree");
            }
            index
        }
        // Integer operands are page indices (used by remote go-to actions).
        Object::Integer(n) => usize::try_from(*n).ok(),
        _ => None,
    };

    let operand = |i: usize| arr.get(i).and_then(obj_to_f64);
    let kind = match arr.get(1) {
        Some(Object::Name(name)) => match name.as_slice() {
            b"XYZ" => DestinationKind::Xyz {
                left: operand(2),
                top: operand(3),
                zoom: operand(4),
            },
            b"Fit" => DestinationKind::Fit,
            b"FitH" => DestinationKind::FitWidth { top: operand(2) },
            b"FitV" => DestinationKind::FitHeight { left: operand(2) },
            other => DestinationKind::Unsupported(String::from_utf8_lossy(other).into_owned()),
        },
        _ => DestinationKind::Unsupported("(missing)".to_string()),
    };

    Some(Destination::new(page_index, kind))
}

/// Resolve a named destination.
///
/// Looks up the name in the catalog's /Names → /Dests name tree,
/// or in the catalog's /Dests dictionary.
fn resolve_named_dest(doc: &LopdfDocument, name: &str) -> Option<Destination> {
    let inner = &doc.inner;
    let catalog = get_catalog_dict(inner)?;

    // Try /Names → /Dests name tree first
    let tree = catalog
        .get(b"Names")
        .ok()
        .and_then(|names| resolve_object(inner, names).as_dict().ok())
        .and_then(|names| names.get(b"Dests").ok())
        .and_then(|dests| resolve_object(inner, dests).as_dict().ok());
    if let Some(tree) = tree {
        if let Some(value) = lookup_name_tree(inner, tree, name, 0) {
            if let Some(dest) = dest_from_named_value(doc, value) {
                return Some(dest);
            }
        }
    }

    // Try the catalog /Dests dictionary (PDF 1.1 style)
    let dests = resolve_object(inner, catalog.get(b"Dests").ok()?).as_dict().ok()?;
    let value = resolve_object(inner, dests.get(name.as_bytes()).ok()?);
    let dest = dest_from_named_value(doc, value);
    if dest.is_none() {
        tracing::warn!(name, "named destination could not be resolved");
    }
    dest
}

/// A named destination value is an array or a dictionary with `/D`.
fn dest_from_named_value(doc: &LopdfDocument, value: &Object) -> Option<Destination> {
    match resolve_object(&doc.inner, value) {
        Object::Array(arr) => parse_dest_array(doc, arr),
        Object::Dictionary(d) => match resolve_object(&doc.inner, d.get(b"D").ok()?) {
            Object::Array(arr) => parse_dest_array(doc, arr),
            _ => None,
        },
        _ => None,
    }
}

/// Look up a name in a PDF name tree (/Names array with key-value pairs).
fn lookup_name_tree<'a>(
    doc: &'a lopdf::Document,
    tree_dict: &'a Dictionary,
    name: &str,
    depth: usize,
) -> Option<&'a Object> {
    if depth > MAX_NAME_TREE_DEPTH {
        return None;
    }

    // Leaf node: [key1 value1 key2 value2 ...]
    if let Ok(names) = tree_dict.get(b"Names") {
        if let Ok(names) = resolve_object(doc, names).as_array() {
            for pair in names.chunks_exact(2) {
                if let Object::String(key, _) = resolve_object(doc, &pair[0]) {
                    if decode_text_string(key) == name {
                        return Some(&pair[1]);
                    }
                }
            }
        }
    }

    // Intermediate node: recurse into /Kids
    let kids = resolve_object(doc, tree_dict.get(b"Kids").ok()?).as_array().ok()?;
    kids.iter().find_map(|kid| {
        let kid = resolve_object(doc, kid).as_dict().ok()?;
        lookup_name_tree(doc, kid, name, depth + 1)
    })
}

/// Replace the catalog's `/Outlines` with `outline`.
///
/// Items with children are written closed (negative `/Count`), so the root
/// `/Count` is the number of top-level items.
fn write_outline(doc: &mut LopdfDocument, outline: &Outline) -> Result<(), BackendError> {
    let catalog_id = match doc.inner.trailer.get(b"Root") {
        Ok(Object::Reference(id)) => *id,
        _ => {
            return Err(BackendError::Parse(
                "document catalog is not an indirect object".to_string(),
            ));
        }
    };
    // Nothing is allocated until the catalog is known to be writable.
    doc.inner
        .get_dictionary(catalog_id)
        .map_err(|e| BackendError::Parse(format!("failed to get catalog dictionary: {e}")))?;

    let root_id = doc.inner.new_object_id();
    let item_ids: Vec<ObjectId> = (0..outline.len())
        .map(|_| doc.inner.new_object_id())
        .collect();

    let mut root = dictionary! { "Type" => "Outlines" };
    link_children(&mut root, outline.roots(), &item_ids);
    root.set("Count", outline.roots().len() as i64);
    doc.inner.objects.insert(root_id, Object::Dictionary(root));

    // Each entry is a parent object and the arena ids of its children.
    let mut pending = vec![(root_id, outline.roots())];
    while let Some((parent_obj, children)) = pending.pop() {
        for (i, &child) in children.iter().enumerate() {
            let Some(item) = outline.get(child) else {
                continue;
            };
            let mut dict = dictionary! {
                "Title" => encode_text_string(&item.title),
                "Parent" => parent_obj,
            };
            if i > 0 {
                dict.set("Prev", item_ids[children[i - 1].index()]);
            }
            if let Some(next) = children.get(i + 1) {
                dict.set("Next", item_ids[next.index()]);
            }
            let grandchildren = outline.children(child);
            if !grandchildren.is_empty() {
                link_children(&mut dict, grandchildren, &item_ids);
                dict.set("Count", -(grandchildren.len() as i64));
                pending.push((item_ids[child.index()], grandchildren));
            }
            if let Some(dest) = &item.destination {
                dict.set("Dest", dest_array(&doc.page_ids, dest));
            }
            doc.inner
                .objects
                .insert(item_ids[child.index()], Object::Dictionary(dict));
        }
    }

    let catalog = doc
        .inner
        .get_object_mut(catalog_id)
        .and_then(|o| o.as_dict_mut())
        .map_err(|e| BackendError::Parse(format!("failed to get catalog dictionary: {e}")))?;
    catalog.set("Outlines", root_id);

    tracing::debug!(items = outline.len(), "wrote document outline");
    Ok(())
}

fn link_children(dict: &mut Dictionary, children: &[ItemId], item_ids: &[ObjectId]) {
    if let (Some(first), Some(last)) = (children.first(), children.last()) {
        dict.set("First", item_ids[first.index()]);
        dict.set("Last", item_ids[last.index()]);
    }
}

/// Build an explicit destination array for `dest`.
fn dest_array(page_ids: &[ObjectId], dest: &Destination) -> Vec<Object> {
    let page = match dest.page_index {
        Some(index) => match page_ids.get(index) {
            Some(&id) => Object::Reference(id),
            None => {
                tracing::warn!(
                    page = index + 1,
                    page_count = page_ids.len(),
                    "bookmark page is outside the document, writing page index"
                );
                Object::Integer(index as i64)
            }
        },
        None => Object::Null,
    };

    let number = |value: Option<f64>| match value {
        Some(v) if v.fract() == 0.0 && v.abs() < i64::MAX as f64 => Object::Integer(v as i64),
        Some(v) => Object::Real(v as f32),
        None => Object::Null,
    };

    match &dest.kind {
        DestinationKind::Xyz { left, top, zoom } => vec![
            page,
            Object::Name(b"XYZ".to_vec()),
            number(*left),
            number(*top),
            number(*zoom),
        ],
        DestinationKind::Fit => vec![page, Object::Name(b"Fit".to_vec())],
        DestinationKind::FitWidth { top } => {
            vec![page, Object::Name(b"FitH".to_vec()), number(*top)]
        }
        DestinationKind::FitHeight { left } => {
            vec![page, Object::Name(b"FitV".to_vec()), number(*left)]
        }
        DestinationKind::Unsupported(kind) => {
            tracing::warn!(kind = %kind, "cannot write destination kind, using Fit");
            vec![page, Object::Name(b"Fit".to_vec())]
        }
    }
}

/// Create a minimal valid PDF document with the given number of pages.
///
/// Each page is US Letter size (612 x 792 points) with no content.
#[cfg(test)]
fn create_test_document(page_count: usize) -> (lopdf::Document, Vec<ObjectId>) {
    let mut doc = lopdf::Document::with_version("1.5");
    let pages_id: ObjectId = doc.new_object_id();

    let mut page_ids = Vec::new();
    for _ in 0..page_count {
        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "MediaBox" => vec![0.into(), 0.into(), 612.into(), 792.into()],
        });
        page_ids.push(page_id);
    }

    doc.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => page_ids.iter().map(|&id| Object::Reference(id)).collect::<Vec<_>>(),
            "Count" => page_count as i64,
        }),
    );

    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);
    (doc, page_ids)
}

#[cfg(test)]
fn save_test_document(doc: &mut lopdf::Document) -> Vec<u8> {
    let mut buf = Vec::new();
    doc.save_to(&mut buf).expect("failed to save test PDF");
    buf
}

/// Attach a flat outline whose items use the given dictionaries.
#[cfg(test)]
fn attach_outline(doc: &mut lopdf::Document, items: Vec<Dictionary>) {
    let outlines_id = doc.new_object_id();
    let ids: Vec<ObjectId> = items.iter().map(|_| doc.new_object_id()).collect();
    for (i, mut dict) in items.into_iter().enumerate() {
        dict.set("Parent", outlines_id);
        if i > 0 {
            dict.set("Prev", ids[i - 1]);
        }
        if i + 1 < ids.len() {
            dict.set("Next", ids[i + 1]);
        }
        doc.objects.insert(ids[i], Object::Dictionary(dict));
    }
    let mut root = dictionary! { "Type" => "Outlines", "Count" => ids.len() as i64 };
    if let (Some(first), Some(last)) = (ids.first(), ids.last()) {
        root.set("First", *first);
        root.set("Last", *last);
    }
    doc.objects.insert(outlines_id, Object::Dictionary(root));
    set_catalog_entry(doc, "Outlines", Object::Reference(outlines_id));
}

#[cfg(test)]
fn set_catalog_entry(doc: &mut lopdf::Document, key: &str, value: Object) {
    let catalog_id = doc.trailer.get(b"Root").unwrap().as_reference().unwrap();
    doc.get_object_mut(catalog_id)
        .unwrap()
        .as_dict_mut()
        .unwrap()
        .set(key, value);
}
