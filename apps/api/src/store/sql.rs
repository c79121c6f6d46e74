//! SQL helpers for the PostgreSQL gateway
//!
//! Column lists are qualified with the `doc` alias every gateway query uses,
//! so they stay unambiguous once the creator join is added.

/// Escape special characters in ILIKE patterns to prevent pattern injection.
///
/// ILIKE uses `%` for any sequence and `_` for single character wildcards.
/// User input containing these characters must be escaped to match literally.
///
/// # Example
/// ```
/// use mixtape_api::store::escape_ilike;
///
/// assert_eq!(escape_ilike("100%"), r"100\%");
/// ```
pub fn escape_ilike(pattern: &str) -> String {
    pattern
        .replace('\\', r"\\")
        .replace('%', r"\%")
        .replace('_', r"\_")
}

/// `%term%` pattern for a case-insensitive substring match
pub(crate) fn contains_pattern(term: &str) -> String {
    format!("%{}%", escape_ilike(term))
}

pub(crate) const ACCOUNT_COLUMNS: &str = r#"
    doc.id, doc.name, doc.email, doc.password_hash, doc.role,
    doc.created_at, doc.updated_at
"#;

pub(crate) const MEDIA_ITEM_COLUMNS: &str = r#"
    doc.id, doc.name, doc.genre, doc.creator_id,
    doc.created_at, doc.updated_at
"#;

pub(crate) const COLLECTION_COLUMNS: &str = r#"
    doc.id, doc.name, doc.creator_id, doc.media_item_ids, doc.collaborator_ids,
    doc.created_at, doc.updated_at
"#;
