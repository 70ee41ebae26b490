use similar::{ChangeTag, TextDiff};

/// Context lines shown around each hunk unless configured otherwise.
pub const DEFAULT_CONTEXT: usize = 3;

#[derive(Debug, Clone)]
pub struct FileDiff {
    pub path: String,
    pub old_content: Option<String>,
    pub new_content: Option<String>,
    pub diff_lines: Vec<DiffLine>,
    binary_changed: bool,
}

#[derive(Debug, Clone)]
pub struct DiffLine {
    pub line_type: DiffLineType,
    pub content: String,
    pub old_line_number: Option<usize>,
    pub new_line_number: Option<usize>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiffLineType {
    Context,
    Addition,
    Deletion,
}

/// True when every byte is printable ASCII or `\t`, `\n`, `\r`.
pub fn is_printable_text(bytes: &[u8]) -> bool {
    bytes
        .iter()
        .all(|&b| matches!(b, 0x20..=0x7e | b'\t' | b'\n' | b'\r'))
}

fn as_text(bytes: &[u8]) -> Option<&str> {
    if is_printable_text(bytes) {
        std::str::from_utf8(bytes).ok()
    } else {
        None
    }
}

/// Unified diff of `old` against `new`. Empty when the inputs are equal.
pub fn unified(old: &[u8], new: &[u8], old_label: &str, new_label: &str, context: usize) -> String {
    if old == new {
        return String::new();
    }

    match (as_text(old), as_text(new)) {
        (Some(old), Some(new)) => TextDiff::from_lines(old, new)
            .unified_diff()
            .context_radius(context)
            .header(old_label, new_label)
            .to_string(),
        _ => format!("Binary files {} and {} differ\n", old_label, new_label),
    }
}

impl FileDiff {
    pub fn from_contents(path: &str, old: &[u8], new: &[u8]) -> Self {
        let old_content = as_text(old).map(str::to_owned);
        let new_content = as_text(new).map(str::to_owned);

        let diff_lines = if let (Some(old), Some(new)) = (&old_content, &new_content) {
            Self::compute_diff(old, new)
        } else {
            Vec::new()
        };

        FileDiff {
            path: path.to_string(),
            binary_changed: (old_content.is_none() || new_content.is_none()) && old != new,
            old_content,
            new_content,
            diff_lines,
        }
    }

    /// Line-by-line changes with 1-based line numbers on each side.
    fn compute_diff(old_text: &str, new_text: &str) -> Vec<DiffLine> {
        let diff = TextDiff::from_lines(old_text, new_text);
        let mut lines = Vec::new();
        let mut old_line_num = 1;
        let mut new_line_num = 1;

        // Equal lines advance both counters, inserts and deletes only their own.
        for change in diff.iter_all_changes() {
            let (line_type, old_num, new_num) = match change.tag() {
                ChangeTag::Delete => {
                    let num = old_line_num;
                    old_line_num += 1;
                    (DiffLineType::Deletion, Some(num), None)
                }
                ChangeTag::Insert => {
                    let num = new_line_num;
                    new_line_num += 1;
                    (DiffLineType::Addition, None, Some(num))
                }
                ChangeTag::Equal => {
                    let old_num = old_line_num;
                    let new_num = new_line_num;
                    old_line_num += 1;
                    new_line_num += 1;
                    (DiffLineType::Context, Some(old_num), Some(new_num))
                }
            };

            lines.push(DiffLine {
                line_type,
                content: change.to_string(),
                old_line_number: old_num,
                new_line_number: new_num,
            });
        }

        lines
    }

    pub fn is_binary(&self) -> bool {
        self.old_content.is_none() || self.new_content.is_none()
    }

    pub fn has_changes(&self) -> bool {
        self.binary_changed
            || self
                .diff_lines
                .iter()
                .any(|l| l.line_type != DiffLineType::Context)
    }

    pub fn additions(&self) -> usize {
        self.count(DiffLineType::Addition)
    }

    pub fn deletions(&self) -> usize {
        self.count(DiffLineType::Deletion)
    }

    fn count(&self, line_type: DiffLineType) -> usize {
        self.diff_lines
            .iter()
            .filter(|l| l.line_type == line_type)
            .count()
    }

    /// Renders the diff in unified format, labelling the snapshot side `a/`
    /// and the working side `b/`.
    pub fn format_unified(&self, context_lines: usize) -> String {
        let old_label = format!("a/{}", self.path);
        let new_label = format!("b/{}", self.path);

        match (&self.old_content, &self.new_content) {
            (Some(old), Some(new)) => unified(
                old.as_bytes(),
                new.as_bytes(),
                &old_label,
                &new_label,
                context_lines,
            ),
            _ if self.binary_changed => {
                format!("Binary files {} and {} differ\n", old_label, new_label)
            }
            _ => String::new(),
        }
    }
}
