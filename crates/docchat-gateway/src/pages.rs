//! Static pages and assets compiled into the binary.

use axum::http::header;
use axum::response::{Html, IntoResponse};

const INDEX_HTML: &str = include_str!("../assets/index.html");
const HISTORY_HTML: &str = include_str!("../assets/history.html");
const SETTINGS_HTML: &str = include_str!("../assets/settings.html");
const SCRIPT_JS: &str = include_str!("../assets/script.js");
const STYLE_CSS: &str = include_str!("../assets/style.css");

/// Chat page.
pub async fn index() -> Html<&'static str> {
    Html(INDEX_HTML)
}

/// Conversation history page.
pub async fn history() -> Html<&'static str> {
    Html(HISTORY_HTML)
}

/// Uploaded files page.
pub async fn settings() -> Html<&'static str> {
    Html(SETTINGS_HTML)
}

/// Page script.
pub async fn script() -> impl IntoResponse {
    ([(header::CONTENT_TYPE, "application/javascript; charset=utf-8")], SCRIPT_JS)
}

/// Page stylesheet.
pub async fn style() -> impl IntoResponse {
    ([(header::CONTENT_TYPE, "text/css; charset=utf-8")], STYLE_CSS)
}
