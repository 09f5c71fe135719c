use crate::core::storage::MetricsSnapshot;
use std::fmt::Write;

fn escape(raw: &str) -> String {
    let mut escaped = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

fn render_section<K, V, I>(page: &mut String, title: &str, entries: I)
where
    K: AsRef<str>,
    V: std::fmt::Display,
    I: Iterator<Item = (K, V)>,
{
    let _ = writeln!(page, "<h2>{}</h2>", title);
    page.push_str("<ul>\n");
    for (name, value) in entries {
        let _ = writeln!(page, "<li>{}: {}</li>", escape(name.as_ref()), value);
    }
    page.push_str("</ul>\n");
}

/// Html page listing every counter then every gauge, sorted by name
pub fn render_listing(snapshot: &MetricsSnapshot) -> String {
    let mut page = String::from(
        "<!DOCTYPE html>\n<html>\n<head>\n<title>Metric List</title>\n</head>\n<body>\n<h1>Metric List</h1>\n",
    );

    render_section(&mut page, "Counter Metrics", snapshot.counters.iter());
    render_section(&mut page, "Gauge Metrics", snapshot.gauges.iter());

    page.push_str("</body>\n</html>\n");
    page
}
