use serde_json::Value;

use super::{escape, Page};

fn field<'a>(item: &'a Value, key: &str) -> Option<&'a str> {
    item.get(key)
        .and_then(Value::as_str)
        .filter(|v| !v.is_empty() && *v != "N/A")
}

fn movie_card(item: &Value) -> String {
    let title = escape(field(item, "Title").unwrap_or("Untitled"));
    let year = field(item, "Year").map(escape).unwrap_or_default();
    let kind = field(item, "Type").map(escape).unwrap_or_default();
    let poster = field(item, "Poster")
        .filter(|p| p.starts_with("http://") || p.starts_with("https://"))
        .map(|p| format!(r#"<img class="poster" src="{}" alt="{title} poster">"#, escape(p)))
        .unwrap_or_default();
    let link = field(item, "imdbID")
        .map(|id| {
            format!(
                r#"<a href="https://www.imdb.com/title/{}/" target="_blank" rel="noopener">IMDb</a>"#,
                escape(id)
            )
        })
        .unwrap_or_default();

    format!(
        r#"<li class="movie-card">
    {poster}
    <h3>{title}</h3>
    <p class="meta">{year} {kind}</p>
    {link}
</li>"#
    )
}

/// Renders whatever OMDb returned: the `Search` list, its `Error`, or the raw JSON.
pub fn render_results(response: &Value) -> String {
    if let Some(items) = response.get("Search").and_then(Value::as_array) {
        let cards: String = items.iter().map(movie_card).collect();
        return format!(r#"<ul class="movie-list">{cards}</ul>"#);
    }
    if let Some(error) = response.get("Error").and_then(Value::as_str) {
        return format!(r#"<p class="no-results">{}</p>"#, escape(error));
    }
    let raw = serde_json::to_string_pretty(response).unwrap_or_default();
    format!(r#"<pre class="raw-results">{}</pre>"#, escape(&raw))
}

pub fn results(term: &str, response: &Value) -> Page {
    let body = format!(
        r#"<section class="search-results">
    <h2>Results for &ldquo;{term}&rdquo;</h2>
    {results}
</section>"#,
        term = escape(term),
        results = render_results(response),
    );
    Page::new(format!("Search: {term}"), body)
}
