//! Editor surface capability
//!
//! The markdown widget is an external collaborator. The engine needs exactly
//! four things from it: render markdown, read the buffer, replace the buffer,
//! and switch between raw editing and rendered preview.

use pulldown_cmark::{html, Options, Parser};

/// Which face of the editor is visible
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SurfaceMode {
    /// Rendered HTML preview, read-only
    #[default]
    Preview,
    /// Raw markdown input
    Edit,
}

/// Markdown to HTML
pub trait MarkdownRenderer {
    fn render(&self, text: &str) -> String;
}

/// The single shared editor surface
pub trait EditorSurface: MarkdownRenderer {
    /// Current raw buffer
    fn buffer(&self) -> String;

    /// Replace the raw buffer
    fn set_buffer(&mut self, text: &str);

    /// Toggle edit/preview visibility
    fn set_mode(&mut self, mode: SurfaceMode);
}

/// CommonMark renderer backed by pulldown-cmark
#[derive(Debug, Clone, Copy, Default)]
pub struct CmarkRenderer;

impl MarkdownRenderer for CmarkRenderer {
    fn render(&self, text: &str) -> String {
        let mut options = Options::empty();
        options.insert(Options::ENABLE_TABLES);
        options.insert(Options::ENABLE_STRIKETHROUGH);
        options.insert(Options::ENABLE_TASKLISTS);

        let parser = Parser::new_ext(text, options);
        let mut out = String::with_capacity(text.len() * 3 / 2);
        html::push_html(&mut out, parser);
        out
    }
}

/// Headless editor surface
///
/// Holds the buffer and the rendered preview in memory. Used by the command
/// line front end, which prints `preview()` or `buffer()` depending on mode.
#[derive(Debug, Clone, Default)]
pub struct BufferSurface {
    buffer: String,
    preview: String,
    mode: SurfaceMode,
    renderer: CmarkRenderer,
}

impl BufferSurface {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn mode(&self) -> SurfaceMode {
        self.mode
    }

    /// Rendered HTML as of the last switch to preview
    pub fn preview(&self) -> &str {
        &self.preview
    }
}

impl MarkdownRenderer for BufferSurface {
    fn render(&self, text: &str) -> String {
        self.renderer.render(text)
    }
}

impl EditorSurface for BufferSurface {
    fn buffer(&self) -> String {
        self.buffer.clone()
    }

    fn set_buffer(&mut self, text: &str) {
        self.buffer = text.to_string();
        if self.mode == SurfaceMode::Preview {
            self.preview = self.render(text);
        }
    }

    fn set_mode(&mut self, mode: SurfaceMode) {
        self.mode = mode;
        if mode == SurfaceMode::Preview {
            self.preview = self.render(&self.buffer);
        }
    }
}
