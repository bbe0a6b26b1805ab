//! YAML metadata header for generated pages.

use std::fmt::Write;

/// Metadata block rendered at the top of every generated page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frontmatter {
    /// Page title shown by the site.
    pub title: String,
    /// One-line description used in listings and meta tags.
    pub description: String,
}

impl Frontmatter {
    /// Create frontmatter for a page.
    pub fn new(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            description: description.into(),
        }
    }

    /// Append a sentence to the description.
    pub fn with_note(mut self, note: &str) -> Self {
        self.description.push(' ');
        self.description.push_str(note);
        self
    }

    /// Render the block, closing delimiter included, followed by a newline.
    pub fn render(&self) -> String {
        let mut output = String::new();
        output.push_str("---\n");
        writeln!(output, "title: {}", self.title).expect("write frontmatter title");
        writeln!(output, "description: {}", self.description)
            .expect("write frontmatter description");
        output.push_str("---\n");
        output
    }
}
