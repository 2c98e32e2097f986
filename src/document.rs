use crate::constant::DEFAULT_FILE_NAME;
use std::path::{Path, PathBuf};

/// Shown when there is neither a file to open nor a stored draft
pub const WELCOME_DOCUMENT: &str = r#"# Welcome to Reddown

This is a Markdown editor with live preview, designed for Redmine syntax.

## Features

- **Bold text** and *italic text*
- _Underlined text_ (Redmine-specific)
- `Inline code`
- Lists and tables
- Live preview

### Example List

1. First item
2. Second item
   - Nested item
   - Another nested item

### Example Table

| Header 1 | Header 2 |
|----------|----------|
| Cell 1   | Cell 2   |
| Cell 3   | Cell 4   |

### Code Block

```javascript
function hello() {
    console.log("Hello, Reddown!");
}
```

Try editing this content to see the live preview in action!"#;

/// The text being edited and where it lives on disk
#[derive(Debug, Clone, Default)]
pub struct Document {
    pub content: String,
    path: Option<PathBuf>,
    /// Content as of the last load or save, if the document has a file
    saved: Option<String>,
}

impl Document {
    pub fn welcome() -> Self {
        Self::unsaved(WELCOME_DOCUMENT.to_string())
    }

    pub fn unsaved(content: String) -> Self {
        Self {
            content,
            path: None,
            saved: None,
        }
    }

    pub fn from_file(path: PathBuf, content: String) -> Self {
        Self {
            saved: Some(content.clone()),
            content,
            path: Some(path),
        }
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Text of the file as it is on disk, as far as this document knows
    pub fn saved_content(&self) -> Option<&str> {
        self.saved.as_deref()
    }

    pub fn file_name(&self) -> String {
        self.path
            .as_deref()
            .and_then(Path::file_name)
            .and_then(|name| name.to_str())
            .unwrap_or(DEFAULT_FILE_NAME)
            .to_string()
    }

    pub fn is_dirty(&self) -> bool {
        self.saved.as_deref() != Some(self.content.as_str())
    }

    /// Record a successful write of `content` to `path`
    pub fn mark_saved(&mut self, path: PathBuf, content: String) {
        self.path = Some(path);
        self.saved = Some(content);
    }

    pub fn clear(&mut self) {
        self.content.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn welcome_is_unsaved() {
        let doc = Document::welcome();
        assert!(doc.is_dirty());
        assert_eq!(doc.file_name(), DEFAULT_FILE_NAME);
        assert!(doc.saved_content().is_none());
    }

    #[test]
    fn file_tracks_edits() {
        let mut doc = Document::from_file(PathBuf::from("/tmp/notes.md"), "a".to_string());
        assert!(!doc.is_dirty());
        assert_eq!(doc.file_name(), "notes.md");

        doc.content.push('b');
        assert!(doc.is_dirty());
        assert_eq!(doc.saved_content(), Some("a"));

        doc.mark_saved(PathBuf::from("/tmp/other.md"), doc.content.clone());
        assert!(!doc.is_dirty());
        assert_eq!(doc.path(), Some(Path::new("/tmp/other.md")));
    }

    #[test]
    fn welcome_document_uses_underline() {
        let html = crate::markdown::MarkdownProcessor::default().render(WELCOME_DOCUMENT);
        assert!(html.contains("<li><u>Underlined text</u> (Redmine-specific)</li>"));
        assert!(html.contains("<td>Cell 4</td>"));
        assert!(html.contains("<pre><code class=\"language-javascript\">"));
        assert!(html.contains("<ol>\n<li>First item</li>\n<li>Second item\n<ul>"));
    }
}
