//! Markup for the form view. Every user-supplied value goes through `escape_html`.

pub mod form;
pub mod items;

pub use form::render_form;

use serde::Serialize;

/// Rendered markup destined for one container element.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Fragment {
    pub target: &'static str,
    pub html: String,
}

impl Fragment {
    pub fn new(target: &'static str, html: String) -> Self {
        Fragment { target, html }
    }
}

/// Neutralizes the five HTML metacharacters.
pub fn escape_html(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#039;"),
            _ => out.push(c),
        }
    }
    out
}
