// Digest rendering: structured items to Markdown text. Kept apart from the
// pipeline so the notification format can change without touching
// classification or ranking.

use chrono::NaiveDate;

use litscout_common::{CanonicalKey, ClassifiedItem, Tier};

/// One Markdown line per item: tier tag, title, venue/date, link.
pub fn digest_line(item: &ClassifiedItem) -> String {
    let mut line = format!("*{}* {}", item.tier, item.title);

    let mut meta = Vec::new();
    if let Some(venue) = &item.venue {
        meta.push(venue.clone());
    }
    if let Some(date) = item.published {
        meta.push(date.to_string());
    }
    if !meta.is_empty() {
        line.push_str(" (");
        line.push_str(&meta.join(", "));
        line.push(')');
    }

    if let Some(link) = link_for(&item.key) {
        line.push(' ');
        line.push_str(&link);
    }
    line
}

/// Reconstruct a clickable link from the canonical key where possible.
/// Source-qualified keys (`arxiv:2403.01234v1`) have no stable URL form.
pub(crate) fn link_for(key: &CanonicalKey) -> Option<String> {
    let k = key.as_str();
    if k.starts_with("http://") || k.starts_with("https://") {
        Some(k.to_string())
    } else if k.starts_with("10.") {
        Some(format!("https://doi.org/{k}"))
    } else {
        None
    }
}

/// The digest is sent even when nothing matched: silence is
/// indistinguishable from a broken monitor.
pub fn render_digest(items: &[ClassifiedItem], run_date: NaiveDate) -> String {
    let mut out = format!("*LitScout digest {run_date}*\n");

    if items.is_empty() {
        out.push_str("No new publications matched the taxonomy.\n");
        return out;
    }

    let primary = items.iter().filter(|i| i.tier == Tier::Primary).count();
    let secondary = items.len() - primary;
    out.push_str(&format!(
        "{} new ({primary} primary, {secondary} secondary)\n\n",
        items.len()
    ));

    for item in items {
        out.push_str(&digest_line(item));
        out.push('\n');
    }
    out
}
