use axum::response::Html;

const LANDING_PAGE: &str = r#"<!doctype html>
<html lang="en">
  <head>
    <meta charset="utf-8">
    <meta name="viewport" content="width=device-width,initial-scale=1">
    <title>WayLook API</title>
  </head>
  <body>
    <h1>WayLook</h1>
    <p>The API is available at <a href="/api/scan">/api/scan</a>.</p>
    <p>Query parameters: <code>domain</code>, <code>keyword</code>, optional <code>year</code> and <code>limit</code>.</p>
  </body>
</html>
"#;

/// Landing page so the root path doesn't 404 on hosts.
pub async fn index_handler() -> Html<&'static str> {
    Html(LANDING_PAGE)
}
