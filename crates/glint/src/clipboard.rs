//! Clipboard seam between the context and platform backends

/// Text clipboard access provided by a platform backend or the embedding
/// application.
pub trait ClipboardBackend {
    /// Current clipboard contents, `None` when empty or unavailable.
    fn get(&mut self) -> Option<String>;

    /// Replaces the clipboard contents.
    fn set(&mut self, text: &str);
}

/// In-process clipboard used when no platform backend registered one.
#[derive(Debug, Default)]
pub struct LocalClipboard {
    text: Option<String>,
}

impl ClipboardBackend for LocalClipboard {
    fn get(&mut self) -> Option<String> {
        self.text.clone()
    }

    fn set(&mut self, text: &str) {
        self.text = Some(text.to_owned());
    }
}
