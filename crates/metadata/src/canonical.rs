//! Canonical text form of a metadata document.
//!
//! Keys follow struct declaration order and nesting is indented by two
//! spaces, so the same document always produces the same bytes. The same
//! encoding is used for change detection and for the file on disk.

use serde::Serialize;

use crate::error::{Result, StoreError};
use crate::model::{DocumentContent, MetadataDocument, StateEntry};

/// The part of a document that counts as its content.
#[derive(Serialize)]
struct Comparable<'a> {
    source: &'a str,
    states: &'a [StateEntry],
}

fn render(source: &str, states: &[StateEntry]) -> Result<String> {
    serde_json::to_string_pretty(&Comparable { source, states }).map_err(StoreError::Serialization)
}

/// Canonical form of `{source, states}`, ignoring `lastSyncedAt`.
pub fn comparable_form(doc: &MetadataDocument) -> Result<String> {
    render(&doc.source, &doc.states)
}

/// Canonical form of content read back from a store.
pub fn content_form(content: &DocumentContent) -> Result<String> {
    render(&content.source, &content.states)
}

/// Returns true when `fresh` carries the same content as `stored`.
pub fn same_content(fresh: &MetadataDocument, stored: &DocumentContent) -> Result<bool> {
    Ok(comparable_form(fresh)? == content_form(stored)?)
}

/// Full document as persisted, with exactly one trailing newline.
pub fn to_canonical_json(doc: &MetadataDocument) -> Result<String> {
    let mut out = serde_json::to_string_pretty(doc).map_err(StoreError::Serialization)?;
    out.push('\n');
    Ok(out)
}
