//! HTML rendering of snapshots and diffs.

use serde_json::{Map, Value};

use crate::models::ResourceType;
use crate::pipeline::diff::{DiffSummary, RecordDiff};
use crate::utils::html_escape;

const PURE_CSS: &str = r#"<link rel="stylesheet" href="https://unpkg.com/purecss@2.1.0/build/pure-min.css" integrity="sha384-yHIFVG6ClnONEA5yB5DJXfW2/KC173DIQrYoZMEtBvGzmf0PKiGyNEqe9N6BNDBH" crossorigin="anonymous">"#;

const TABLE_STYLES: &str = r#"
table {
    table-layout: fixed;
    width: 100%;
}
td {
    word-wrap: break-word;
}
"#;

const DIFF_STYLES: &str = r#"
pre.diff {
    font-family: ui-monospace, SFMono-Regular, Menlo, Consolas, monospace;
    font-size: 0.85rem;
    white-space: pre-wrap;
    word-break: break-all;
    border: 1px solid #ddd;
    padding: 0.5rem;
}
pre.diff span {
    display: block;
}
.diff-add { background: #e6ffec; }
.diff-del { background: #ffebe9; }
.diff-hunk { background: #ddf4ff; color: #57606a; }
.diff-file { font-weight: bold; }
.summary li { font-family: ui-monospace, monospace; }
"#;

/// Base HTML template wrapper.
fn html_page(title: &str, styles: &str, content: &str) -> String {
    let mut html = String::with_capacity(content.len() + 1024);
    html.push_str("<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n");
    html.push_str("    <meta charset=\"UTF-8\">\n");
    html.push_str("    <title>");
    html.push_str(&html_escape(title));
    html.push_str("</title>\n    ");
    html.push_str(PURE_CSS);
    html.push_str("\n    <style>");
    html.push_str(styles);
    html.push_str("</style>\n</head>\n<body>\n<div class=\"pure-g\">\n");
    html.push_str("<div class=\"pure-u-1\"><h2>");
    html.push_str(&html_escape(title));
    html.push_str("</h2></div>\n");
    html.push_str(content);
    html.push_str("</div>\n</body>\n</html>\n");
    html
}

/// Cell text for a JSON value: strings verbatim, anything else as compact JSON.
fn cell_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Render a snapshot as an HTML table.
///
/// Columns are the type's fields that occur in at least one record.
pub fn render_snapshot(
    title: &str,
    resource_type: ResourceType,
    records: &[Map<String, Value>],
) -> String {
    let columns: Vec<&str> = resource_type
        .fields()
        .iter()
        .copied()
        .filter(|field| records.iter().any(|r| r.contains_key(*field)))
        .collect();

    let mut content = String::with_capacity(records.len() * 256 + 512);
    content.push_str("<div class=\"pure-u-1\">\n");

    if records.is_empty() {
        content.push_str("<p><i>No resources</i></p>\n");
    } else {
        content.push_str("<p>");
        content.push_str(&records.len().to_string());
        content.push_str(" resources</p>\n");
        content.push_str(
            "<table class=\"pure-table pure-table-striped pure-table-bordered\">\n<thead>\n<tr>",
        );
        for column in &columns {
            content.push_str("<td><b><i>");
            content.push_str(&html_escape(column));
            content.push_str("</i></b></td>");
        }
        content.push_str("</tr>\n</thead>\n<tbody>\n");
        for record in records {
            content.push_str("<tr>");
            for column in &columns {
                content.push_str("<td>");
                if let Some(value) = record.get(*column) {
                    content.push_str(&html_escape(&cell_text(value)));
                }
                content.push_str("</td>");
            }
            content.push_str("</tr>\n");
        }
        content.push_str("</tbody>\n</table>\n");
    }

    content.push_str("</div>\n");
    html_page(title, TABLE_STYLES, &content)
}

fn push_key_list(content: &mut String, label: &str, keys: &[String]) {
    if keys.is_empty() {
        return;
    }
    content.push_str("<li>");
    content.push_str(label);
    content.push_str(" (");
    content.push_str(&keys.len().to_string());
    content.push_str(")<ul>");
    for key in keys {
        content.push_str("<li>");
        content.push_str(&html_escape(key));
        content.push_str("</li>");
    }
    content.push_str("</ul></li>\n");
}

/// CSS class for one line of unified diff output.
fn diff_line_class(line: &str) -> &'static str {
    if line.starts_with("+++") || line.starts_with("---") {
        "diff-file"
    } else if line.starts_with("@@") {
        "diff-hunk"
    } else if line.starts_with('+') {
        "diff-add"
    } else if line.starts_with('-') {
        "diff-del"
    } else {
        "diff-ctx"
    }
}

/// Render a unified diff for review.
pub fn render_diff(
    title: &str,
    diff_text: &str,
    summary: DiffSummary,
    records: &RecordDiff,
) -> String {
    let mut content = String::with_capacity(diff_text.len() * 2 + 1024);
    content.push_str("<div class=\"pure-u-1\">\n");

    if !summary.has_changes() {
        content.push_str("<p><i>No changes</i></p>\n");
    } else {
        content.push_str("<p>");
        content.push_str(&format!(
            "{} lines added, {} lines removed",
            summary.inserted, summary.deleted
        ));
        content.push_str("</p>\n<ul class=\"summary\">\n");
        push_key_list(&mut content, "Added", &records.added);
        push_key_list(&mut content, "Updated", &records.updated);
        push_key_list(&mut content, "Removed", &records.removed);
        content.push_str("</ul>\n");
    }

    content.push_str("<pre class=\"diff\">");
    for line in diff_text.lines() {
        content.push_str("<span class=\"");
        content.push_str(diff_line_class(line));
        content.push_str("\">");
        content.push_str(&html_escape(line));
        content.push_str("</span>");
    }
    content.push_str("</pre>\n</div>\n");

    html_page(title, DIFF_STYLES, &content)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::project::parse_ndjson;

    #[test]
    fn test_render_snapshot_columns() {
        let records = parse_ndjson(
            "{\"url\":\"http://a\",\"name\":\"A\"}\n{\"url\":\"http://b\",\"valueSet\":\"http://vs\"}\n",
        )
        .unwrap();
        let html = render_snapshot("CodeSystem 2026-01-02", ResourceType::CodeSystem, &records);
        assert!(html.contains("<h2>CodeSystem 2026-01-02</h2>"));
        assert!(html.contains("<td><b><i>url</i></b></td><td><b><i>name</i></b></td><td><b><i>valueSet</i></b></td>"));
        assert!(!html.contains("<i>version</i>"));
        assert!(html.contains("<tr><td>http://a</td><td>A</td><td></td></tr>"));
        assert!(html.contains("2 resources"));
    }

    #[test]
    fn test_render_snapshot_non_string_value() {
        let records = parse_ndjson("{\"url\":\"http://a\",\"title\":[\"x\",1]}\n").unwrap();
        let html = render_snapshot("t", ResourceType::ValueSet, &records);
        assert!(html.contains("<td>[&quot;x&quot;,1]</td>"));
    }

    #[test]
    fn test_render_snapshot_empty() {
        let html = render_snapshot("ValueSet", ResourceType::ValueSet, &[]);
        assert!(html.contains("No resources"));
        assert!(!html.contains("<table"));
    }

    #[test]
    fn test_render_snapshot_escapes() {
        let records = parse_ndjson("{\"url\":\"http://a\",\"title\":\"<b>x</b>\"}\n").unwrap();
        let html = render_snapshot("t", ResourceType::ValueSet, &records);
        assert!(html.contains("&lt;b&gt;x&lt;/b&gt;"));
    }

    #[test]
    fn test_render_diff_no_changes() {
        let html = render_diff("Diff", "", DiffSummary::default(), &RecordDiff::default());
        assert!(html.contains("No changes"));
        assert!(html.contains("<pre class=\"diff\"></pre>"));
    }

    #[test]
    fn test_render_diff_line_classes() {
        let text = "--- a\n+++ b\n@@ -1,2 +1,2 @@\n-{\"url\":\"x\"}\n+{\"url\":\"y\"}\n {\"url\":\"z\"}\n";
        let summary = DiffSummary {
            inserted: 1,
            deleted: 1,
        };
        let records = RecordDiff {
            added: vec!["y".into()],
            updated: vec![],
            removed: vec!["x".into()],
        };
        let html = render_diff("Diff", text, summary, &records);
        assert!(html.contains("<span class=\"diff-file\">--- a</span>"));
        assert!(html.contains("<span class=\"diff-hunk\">@@ -1,2 +1,2 @@</span>"));
        assert!(html.contains("<span class=\"diff-del\">-{&quot;url&quot;:&quot;x&quot;}</span>"));
        assert!(html.contains("<span class=\"diff-add\">+{&quot;url&quot;:&quot;y&quot;}</span>"));
        assert!(html.contains("<span class=\"diff-ctx\">"));
        assert!(html.contains("Added (1)"));
        assert!(html.contains("Removed (1)"));
        assert!(!html.contains("Updated"));
        assert!(html.contains("1 lines added, 1 lines removed"));
    }
}
