// src/ports/html.rs
use crate::domain::Note;
use html_escape::{encode_double_quoted_attribute, encode_text};
use tracing::instrument;

#[derive(Debug, Default)]
pub struct HtmlPresenter;

impl HtmlPresenter {
    pub fn new() -> Self {
        Self
    }

    /// One card per note. Only resolved images are shown.
    fn render_note(&self, note: &Note) -> String {
        let image = match note.image.resolved_url() {
            Some(url) => format!(
                r#"
            <img src="{src}" alt="{alt}" style="width: 400px">"#,
                src = encode_double_quoted_attribute(url),
                alt = encode_double_quoted_attribute(&format!("{}-display", note.name)),
            ),
            None => String::new(),
        };

        format!(
            r#"        <div class="note" data-key="{key}">
            <h2>{name}</h2>
            <p>{description}</p>{image}
        </div>
"#,
            key = encode_double_quoted_attribute(note.display_key()),
            name = encode_text(&note.name),
            description = encode_text(&note.description),
            image = image,
        )
    }

    #[instrument(level = "debug", skip_all, fields(count = notes.len()))]
    pub fn render(&self, notes: &[Note]) -> String {
        let body: String = if notes.is_empty() {
            "        <p class=\"empty\">No notes yet</p>\n".to_string()
        } else {
            notes.iter().map(|n| self.render_note(n)).collect()
        };

        format!(
            r#"<!DOCTYPE html>
<html>
<head>
    <meta charset="UTF-8">
    <title>My Notes</title>
    <style>
        body {{
            font-family: -apple-system, BlinkMacSystemFont, "Segoe UI", Roboto, sans-serif;
            line-height: 1.6;
            max-width: 800px;
            margin: 2rem auto;
            padding: 0 1rem;
            background-color: #f5f5f5;
        }}
        .note {{
            background: white;
            border-radius: 8px;
            padding: 1rem 2rem;
            margin-bottom: 30px;
            box-shadow: 0 2px 4px rgba(0,0,0,0.1);
        }}
        .empty {{
            color: #666;
        }}
    </style>
</head>
<body>
    <h1>My Notes</h1>
    <div class="notes">
{body}    </div>
</body>
</html>"#
        )
    }
}
