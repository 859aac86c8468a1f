use axum::response::Html;

const INDEX_HTML: &str = include_str!("../../../templates/index.html");

/// Render the upload page, listing the entities the server recognizes.
pub fn render_index(entities: &[&str]) -> Html<String> {
    let html = INDEX_HTML.replace("{{ entities }}", &escape_html(&entities.join(", ")));
    Html(html)
}

fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(ch),
        }
    }
    escaped
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn entity_names_are_escaped() {
        let Html(html) = render_index(&["<b>A&B</b>", "O'Neil \"Mill\""]);
        assert!(html.contains("&lt;b&gt;A&amp;B&lt;/b&gt;, O&#39;Neil &quot;Mill&quot;"));
        assert!(!html.contains("<b>A&B</b>"));
    }
}
