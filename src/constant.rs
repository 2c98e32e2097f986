// Window size constants
pub const DEFAULT_WINDOW_WIDTH: f32 = 1100.0;
pub const DEFAULT_WINDOW_HEIGHT: f32 = 700.0;
pub const DEFAULT_WINDOW_TITLE: &str = "Reddown";
pub const REVIEW_WINDOW_WIDTH: f32 = 960.0;
pub const REVIEW_WINDOW_HEIGHT: f32 = 640.0;

/// Application name and metadata constants
pub const APP_QUALIFIER: &str = "com";
pub const APP_ORGANIZATION: &str = "Reddown";
pub const APP_NAME: &str = "Reddown";

/// App related Magic Numbers
pub const MAX_RECENT_FILES: usize = 10;
/// Minimum seconds between two background draft writes while typing
pub const DRAFT_INTERVAL_SECS: u64 = 2;

/// File names and dialog filters
pub const DEFAULT_FILE_NAME: &str = "document.md";
pub const DRAFT_FILE_NAME: &str = "draft.md";
pub const MARKDOWN_EXTENSIONS: &[&str] = &["md", "markdown", "txt"];
