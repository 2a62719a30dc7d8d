//! Server-rendered HTML pages
//!
//! Pages are plain strings assembled with `format!` around a shared layout.
//! Every value that comes from the database or a form goes through
//! [`escape`] before it is interpolated.

pub mod playlists;
pub mod songs;

use crate::flash::Flash;
use crate::forms::{FormErrors, CSRF_FIELD};

const STYLE: &str = r#"
        body {
            font-family: system-ui, -apple-system, sans-serif;
            max-width: 800px;
            margin: 40px auto;
            padding: 20px;
            line-height: 1.6;
        }
        nav a { margin-right: 15px; }
        h1 {
            color: #333;
            border-bottom: 2px solid #0066cc;
            padding-bottom: 10px;
        }
        .flash { padding: 10px 15px; border-radius: 4px; margin: 15px 0; }
        .flash.success { background: #e6f4ea; color: #1e6b34; }
        .flash.error { background: #fdecea; color: #a12622; }
        .field { margin: 10px 0; }
        .field label { display: block; font-weight: 600; }
        .field-error { color: #a12622; font-size: 0.9em; }
        .button {
            display: inline-block;
            padding: 8px 16px;
            background: #0066cc;
            color: white;
            text-decoration: none;
            border: none;
            border-radius: 4px;
        }
"#;

/// Escape text for use in HTML element content and quoted attributes
pub fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
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

/// Wrap page content in the shared layout; `title` is escaped here
pub fn layout(title: &str, flash: Option<&Flash>, content: &str) -> String {
    let flash_html = flash
        .map(|f| {
            format!(
                r#"<div class="flash {}">{}</div>"#,
                f.category.as_str(),
                escape(&f.message)
            )
        })
        .unwrap_or_default();

    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>{title} - Playlist App</title>
    <style>{style}</style>
</head>
<body>
    <nav>
        <a href="/playlists">Playlists</a>
        <a href="/songs">Songs</a>
    </nav>
    {flash_html}
    {content}
</body>
</html>
"#,
        title = escape(title),
        style = STYLE,
        flash_html = flash_html,
        content = content,
    )
}

/// Text input with its label, current value and any errors
pub(crate) fn text_field(name: &'static str, label: &str, value: &str, errors: &FormErrors) -> String {
    format!(
        r#"<div class="field">
        <label for="{name}">{label}</label>
        <input type="text" id="{name}" name="{name}" value="{value}">
        {errors}
    </div>"#,
        name = name,
        label = escape(label),
        value = escape(value),
        errors = field_errors(errors, name),
    )
}

/// Hidden CSRF token input, followed by any token errors
pub(crate) fn csrf_field(token: &str, errors: &FormErrors) -> String {
    format!(
        r#"<input type="hidden" name="{name}" value="{token}">
    {errors}"#,
        name = CSRF_FIELD,
        token = escape(token),
        errors = field_errors(errors, CSRF_FIELD),
    )
}

/// Error list for one field, or nothing when it is valid
pub(crate) fn field_errors(errors: &FormErrors, field: &str) -> String {
    errors
        .get(field)
        .iter()
        .map(|message| format!(r#"<span class="field-error">{}</span>"#, escape(message)))
        .collect::<Vec<_>>()
        .join("\n")
}

/// 404 page
pub fn not_found_page(detail: &str) -> String {
    layout(
        "Not Found",
        None,
        &format!(
            r#"<h1>Not Found</h1>
    <p>The requested page could not be found.</p>
    <p><small>{}</small></p>"#,
            escape(detail)
        ),
    )
}

/// 500 page; internal details are not shown
pub fn server_error_page() -> String {
    layout(
        "Error",
        None,
        r#"<h1>Something went wrong</h1>
    <p>The request could not be completed.</p>"#,
    )
}
