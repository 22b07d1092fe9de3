// HTML rendering for the upload portal
use crate::portal::form::FormValues;
use crate::report::TableRow;

#[derive(Debug, Default)]
pub struct PageView<'a> {
    pub error: Option<&'a str>,
    pub success: Option<&'a str>,
    pub rows: Option<&'a [TableRow]>,
    pub csv_payload: Option<&'a str>,
    pub download_href: Option<&'a str>,
}

pub fn escape_html(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#x27;"),
            _ => out.push(c),
        }
    }
    out
}

pub fn render_page(values: &FormValues, view: &PageView<'_>) -> String {
    let message_html = match (view.error, view.success) {
        (Some(error), _) => format!(r#"<div class="message error">{}</div>"#, escape_html(error)),
        (None, Some(success)) => format!(r#"<div class="message success">{}</div>"#, escape_html(success)),
        (None, None) => String::new(),
    };

    let mut table_html = String::new();
    let mut download_html = String::new();
    let mut csv_preview_html = String::new();
    if let Some(rows) = view.rows.filter(|rows| !rows.is_empty()) {
        let body: Vec<String> = rows
            .iter()
            .map(|row| {
                format!(
                    "<tr><td>{}</td><td>{}</td><td>{}</td></tr>",
                    escape_html(&row.brand),
                    escape_html(&row.title),
                    escape_html(&row.price)
                )
            })
            .collect();
        table_html = format!(
            r#"<table class="results"><thead><tr><th>Brand</th><th>Title</th><th>Price</th></tr></thead><tbody>{}</tbody></table>"#,
            body.join("\n")
        );
        if let Some(href) = view.download_href {
            download_html = format!(
                r#"<a class="button" download="pricing-results.csv" href="{}">Download CSV</a>"#,
                escape_html(href)
            );
        }
        if let Some(csv) = view.csv_payload.filter(|csv| !csv.is_empty()) {
            csv_preview_html = format!(
                r#"<h2>CSV Preview</h2><textarea readonly rows="8">{}</textarea>"#,
                escape_html(csv)
            );
        }
    }

    format!(
        r##"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="utf-8" />
  <title>Clothing Price Lookup Portal</title>
  <style>
    body {{ font-family: Arial, sans-serif; margin: 2rem auto; max-width: 900px; color: #1f2933; }}
    h1 {{ margin-bottom: 1rem; }}
    form {{ background: #f8fafc; border: 1px solid #d2d6dc; padding: 1.5rem; border-radius: 8px; }}
    label {{ display: block; margin-bottom: 0.5rem; font-weight: 600; }}
    input[type="text"], input[type="number"] {{ width: 100%; padding: 0.5rem; border: 1px solid #cbd5e0; border-radius: 4px; margin-bottom: 1rem; }}
    input[type="file"] {{ margin-bottom: 1rem; }}
    button {{ background: #2563eb; color: white; border: none; padding: 0.75rem 1.5rem; border-radius: 4px; cursor: pointer; }}
    .message {{ margin: 1rem 0; padding: 0.75rem 1rem; border-radius: 4px; }}
    .message.error {{ background: #fee2e2; color: #991b1b; border: 1px solid #fecaca; }}
    .message.success {{ background: #dcfce7; color: #166534; border: 1px solid #bbf7d0; }}
    table.results {{ width: 100%; border-collapse: collapse; margin-top: 1.5rem; }}
    table.results th, table.results td {{ border: 1px solid #e5e7eb; padding: 0.75rem; text-align: left; }}
    .button {{ display: inline-block; margin-top: 1rem; padding: 0.75rem 1.5rem; background: #059669; color: white; text-decoration: none; border-radius: 4px; }}
    textarea {{ width: 100%; font-family: monospace; margin-top: 0.5rem; }}
  </style>
</head>
<body>
  <h1>Clothing Price Lookup Portal</h1>
  <p>Upload a CSV containing <code>brand</code> and <code>title</code> columns to fetch live pricing data.</p>
  {message_html}
  <form method="post" enctype="multipart/form-data" action="/upload">
    <label for="base_url">Product search API URL</label>
    <input id="base_url" name="base_url" type="text" value="{base_url}" />
    <label for="limit">Results per request</label>
    <input id="limit" name="limit" type="number" min="1" value="{limit}" />
    <label for="timeout">Request timeout (seconds)</label>
    <input id="timeout" name="timeout" type="number" min="0.1" step="0.1" value="{timeout}" />
    <label for="min_score">Minimum match score (0-1)</label>
    <input id="min_score" name="min_score" type="number" min="0" max="1" step="0.05" value="{min_score}" />
    <label for="queries">Upload CSV file</label>
    <input id="queries" name="queries" type="file" accept=".csv,text/csv" required />
    <button type="submit">Find Prices</button>
  </form>
  {table_html}
  {download_html}
  {csv_preview_html}
</body>
</html>
"##,
        base_url = escape_html(&values.base_url),
        limit = escape_html(&values.limit),
        timeout = escape_html(&values.timeout),
        min_score = escape_html(&values.min_score),
    )
}
