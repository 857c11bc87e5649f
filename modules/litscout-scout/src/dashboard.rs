// Static HTML dashboard over the archive. A read-only view written next to
// the state files; nothing here feeds back into the pipeline.

use chrono::NaiveDate;

use litscout_common::{ClassifiedItem, Tier};

use crate::archive::Archive;
use crate::digest::link_for;

/// Render the archive as a self-contained page, Primary items first,
/// newest first within each tier.
pub fn render_dashboard(archive: &Archive, generated: NaiveDate) -> String {
    let mut items: Vec<&ClassifiedItem> = archive.items().iter().collect();
    items.sort_by(|a, b| {
        b.tier
            .cmp(&a.tier)
            .then_with(|| b.published.cmp(&a.published))
    });

    let primary = items.iter().filter(|i| i.tier == Tier::Primary).count();
    let secondary = items.len() - primary;

    let mut rows = String::new();
    if items.is_empty() {
        rows.push_str(r#"<tr><td colspan="5" class="empty">Archive is empty. Run the scout to populate it.</td></tr>"#);
    }
    for item in items {
        let title = match link_for(&item.key) {
            Some(url) => format!(
                r#"<a href="{}" target="_blank" rel="noopener">{}</a>"#,
                html_escape(&url),
                html_escape(&item.title)
            ),
            None => html_escape(&item.title),
        };
        let badge = match item.tier {
            Tier::Primary => r#"<span class="badge badge-primary">primary</span>"#,
            Tier::Secondary => r#"<span class="badge badge-secondary">secondary</span>"#,
        };
        let published = item
            .published
            .map(|d| d.to_string())
            .unwrap_or_else(|| "-".to_string());
        let venue = item.venue.as_deref().unwrap_or("-");

        rows.push_str(&format!(
            r#"<tr>
    <td>{badge}</td>
    <td>{title}</td>
    <td>{venue}</td>
    <td>{published}</td>
    <td class="score">{score}</td>
</tr>"#,
            venue = html_escape(venue),
            score = item.score,
        ));
    }

    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<meta name="viewport" content="width=device-width, initial-scale=1">
<title>LitScout archive</title>
<style>
*{{margin:0;padding:0;box-sizing:border-box;}}
body{{font-family:-apple-system,BlinkMacSystemFont,"Segoe UI",Roboto,sans-serif;color:#1a1a1a;background:#fafafa;}}
.header{{background:#1a1a1a;color:#fff;padding:12px 24px;}}
.header h1{{font-size:18px;font-weight:600;}}
.container{{max-width:960px;margin:0 auto;padding:24px;}}
.summary{{color:#555;font-size:14px;margin-bottom:16px;}}
table{{width:100%;border-collapse:collapse;background:#fff;border:1px solid #e0e0e0;border-radius:8px;}}
th,td{{text-align:left;padding:8px 12px;border-bottom:1px solid #eee;font-size:14px;}}
th{{color:#888;font-size:12px;text-transform:uppercase;}}
td a{{color:#0066cc;text-decoration:none;}}
td a:hover{{text-decoration:underline;}}
.badge{{display:inline-block;padding:2px 8px;border-radius:12px;font-size:11px;font-weight:600;text-transform:uppercase;}}
.badge-primary{{background:#e3f2fd;color:#1565c0;}}
.badge-secondary{{background:#f3e5f5;color:#7b1fa2;}}
.score{{color:#888;}}
.empty{{color:#888;text-align:center;padding:40px;}}
</style>
</head>
<body>
<div class="header"><h1>LitScout archive</h1></div>
<div class="container">
<p class="summary">{total} publications ({primary} primary, {secondary} secondary). Generated {generated}.</p>
<table>
<thead><tr><th>Tier</th><th>Title</th><th>Venue</th><th>Published</th><th>Score</th></tr></thead>
<tbody>{rows}</tbody>
</table>
</div>
</body>
</html>"#,
        total = archive.len(),
    )
}

fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}
