//! Indentation-aware Kotlin source buffer.

const INDENT: &str = "    ";

#[derive(Debug, Default)]
pub struct KotlinWriter {
    content: String,
    depth: usize,
}

impl KotlinWriter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Writes one line at the current depth.
    pub fn line(&mut self, text: impl AsRef<str>) {
        let text = text.as_ref();
        if !text.is_empty() {
            for _ in 0..self.depth {
                self.content.push_str(INDENT);
            }
            self.content.push_str(text);
        }
        self.content.push('\n');
    }

    /// Writes a blank line, never two in a row.
    pub fn blank(&mut self) {
        if !self.content.is_empty() && !self.content.ends_with("\n\n") {
            self.content.push('\n');
        }
    }

    /// Writes `header {` and indents.
    pub fn open(&mut self, header: impl AsRef<str>) {
        self.line(format!("{} {{", header.as_ref()));
        self.depth += 1;
    }

    /// Dedents and writes `}`.
    pub fn close(&mut self) {
        self.close_with("}");
    }

    /// Dedents and writes `text`, e.g. `} ?: return`.
    pub fn close_with(&mut self, text: impl AsRef<str>) {
        self.depth = self.depth.saturating_sub(1);
        self.line(text);
    }

    /// Dedents, writes `text` and indents again, e.g. `} catch (...) {`.
    pub fn reopen(&mut self, text: impl AsRef<str>) {
        self.close_with(text);
        self.depth += 1;
    }

    pub fn block(&mut self, header: impl AsRef<str>, body: impl FnOnce(&mut Self)) {
        self.open(header);
        body(self);
        self.close();
    }

    pub fn finish(self) -> String {
        self.content
    }
}
