// Canonical identity derivation.
//
// Precedence: DOI, then URL, then a source-qualified local id. Two records
// describing the same work must produce the same key regardless of which
// provider reported it or how it capitalized the identifier.

use litscout_common::{CanonicalKey, RawRecord};

/// Derive the permanent dedup key for a record. `None` means the record has
/// no usable identity and must be dropped rather than guessed at.
pub fn canonicalize(record: &RawRecord) -> Option<CanonicalKey> {
    if let Some(doi) = record.doi.as_deref() {
        let doi = normalize_doi(doi);
        if !doi.is_empty() {
            return Some(CanonicalKey::new(doi));
        }
    }

    if let Some(url) = record.url.as_deref() {
        let url = url.trim().to_lowercase();
        if !url.is_empty() {
            return Some(CanonicalKey::new(url));
        }
    }

    if let Some(id) = record.source_id.as_deref() {
        let id = id.trim();
        if !id.is_empty() {
            return Some(CanonicalKey::new(format!("{}:{}", record.source, id)));
        }
    }

    None
}

/// Lowercase, trim, and strip resolver prefixes so `10.1/ABC`,
/// `doi:10.1/abc`, and `https://doi.org/10.1/abc` all collide.
fn normalize_doi(raw: &str) -> String {
    let lowered = raw.trim().to_lowercase();
    for prefix in ["https://doi.org/", "http://doi.org/", "https://dx.doi.org/", "doi:"] {
        if let Some(rest) = lowered.strip_prefix(prefix) {
            return rest.trim().to_string();
        }
    }
    lowered
}
