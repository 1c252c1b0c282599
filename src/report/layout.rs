//! Fixed-width page composition.
//!
//! Reports are rendered as plain text on fixed-size pages. The composer owns
//! the cursor: callers emit content and declare keep-together blocks, and the
//! composer decides where page breaks fall and stamps the footers once the
//! total page count is known.

/// Printable columns per page.
pub const PAGE_WIDTH: usize = 78;

/// Content lines per page, excluding the two footer lines.
pub const PAGE_BODY_LINES: usize = 58;

/// Cursor-driven paginator for fixed-width text pages.
pub struct PageComposer {
    width: usize,
    body_lines: usize,
    pages: Vec<Vec<String>>,
    current: Vec<String>,
}

impl Default for PageComposer {
    fn default() -> Self {
        Self::new(PAGE_WIDTH, PAGE_BODY_LINES)
    }
}

impl PageComposer {
    pub fn new(width: usize, body_lines: usize) -> Self {
        Self {
            width,
            body_lines,
            pages: Vec::new(),
            current: Vec::new(),
        }
    }

    /// Emits a paragraph, wrapped to the page width.
    pub fn text(&mut self, text: &str) {
        for line in wrap(text, self.width) {
            self.push_line(line);
        }
    }

    /// Emits a labelled value, with continuation lines indented under the value.
    pub fn field(&mut self, label: &str, value: &str) {
        let prefix = format!("{label}: ");
        let indent = " ".repeat(prefix.len().min(self.width / 2));
        let avail = self.width.saturating_sub(indent.len()).max(1);

        let mut first = true;
        for line in wrap(value, avail) {
            if first {
                self.push_line(format!("{prefix}{line}"));
                first = false;
            } else {
                self.push_line(format!("{indent}{line}"));
            }
        }
        if first {
            self.push_line(prefix.trim_end().to_string());
        }
    }

    /// Emits a section heading, kept together with at least two content lines.
    pub fn heading(&mut self, title: &str) {
        self.reserve(4);
        if !self.at_page_top() {
            self.blank();
        }
        self.push_line(title.to_uppercase());
        self.push_line("-".repeat(self.width));
    }

    /// Full-width separator rule.
    pub fn rule(&mut self) {
        self.push_line("=".repeat(self.width));
    }

    pub fn blank(&mut self) {
        // never start a page with blank spacing
        if !self.at_page_top() {
            self.push_line(String::new());
        }
    }

    /// Starts a new page if fewer than `lines` remain on the current one.
    pub fn reserve(&mut self, lines: usize) {
        if !self.at_page_top() && self.current.len() + lines > self.body_lines {
            self.break_page();
        }
    }

    /// Unconditional page break (no-op at the top of a fresh page).
    pub fn break_page(&mut self) {
        if !self.at_page_top() {
            let page = std::mem::take(&mut self.current);
            self.pages.push(page);
        }
    }

    fn at_page_top(&self) -> bool {
        self.current.is_empty()
    }

    fn push_line(&mut self, line: String) {
        if self.current.len() >= self.body_lines {
            self.break_page();
        }
        self.current.push(line);
    }

    /// Finalizes pagination and stamps `PAGE i OF n` footers carrying `tag`.
    pub fn finish(mut self, tag: &str) -> String {
        self.break_page();
        if self.pages.is_empty() {
            self.pages.push(Vec::new());
        }

        let total = self.pages.len();
        let mut out = String::new();
        for (index, page) in self.pages.iter().enumerate() {
            for line in page {
                out.push_str(line);
                out.push('\n');
            }
            // pad the body so footers line up across pages
            for _ in page.len()..self.body_lines {
                out.push('\n');
            }
            out.push_str(&"-".repeat(self.width));
            out.push('\n');
            let left = tag.to_string();
            let right = format!("PAGE {} OF {}", index + 1, total);
            let pad = self.width.saturating_sub(left.len() + right.len());
            out.push_str(&left);
            out.push_str(&" ".repeat(pad));
            out.push_str(&right);
            out.push('\n');
            if index + 1 < total {
                out.push('\u{c}');
                out.push('\n');
            }
        }
        out
    }
}

/// Greedy word wrap. Words longer than `width` are hard-split rather than
/// overflowing the page.
pub fn wrap(text: &str, width: usize) -> Vec<String> {
    let width = width.max(1);
    let mut lines = Vec::new();

    for paragraph in text.split('\n') {
        let mut line = String::new();
        for word in paragraph.split_whitespace() {
            let mut word = word;
            // hard-split oversized tokens
            while word.chars().count() > width {
                if !line.is_empty() {
                    lines.push(std::mem::take(&mut line));
                }
                let split: String = word.chars().take(width).collect();
                word = &word[split.len()..];
                lines.push(split);
            }
            if line.is_empty() {
                line.push_str(word);
            } else if line.chars().count() + 1 + word.chars().count() <= width {
                line.push(' ');
                line.push_str(word);
            } else {
                lines.push(std::mem::take(&mut line));
                line.push_str(word);
            }
        }
        if !line.is_empty() {
            lines.push(line);
        }
    }

    lines
}
