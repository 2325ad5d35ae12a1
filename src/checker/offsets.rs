//! Byte offset to line/column conversion for one file.

/// Cumulative line-end offsets of a file's content.
///
/// `line_ends[i]` is the offset just past the terminator of line `i + 1`.
/// A final line without a terminator has no entry.
#[derive(Debug, Clone)]
pub struct OffsetIndex<'a> {
    content: &'a str,
    line_ends: Vec<usize>,
}

impl<'a> OffsetIndex<'a> {
    /// Index `content`. `\n`, `\r\n` and a lone `\r` all end a line.
    pub fn build(content: &'a str) -> Self {
        let bytes = content.as_bytes();
        let mut line_ends = Vec::new();
        for (i, &b) in bytes.iter().enumerate() {
            let ends = match b {
                b'\n' => true,
                b'\r' => bytes.get(i + 1) != Some(&b'\n'),
                _ => false,
            };
            if ends {
                line_ends.push(i + 1);
            }
        }
        Self { content, line_ends }
    }

    /// 1-indexed `(line, column)` of a byte offset. The column counts
    /// characters, so it matches what an editor shows for non-ASCII lines.
    /// An offset exactly on a line boundary belongs to the following line.
    pub fn locate(&self, offset: usize) -> (usize, usize) {
        let line = self.line_ends.partition_point(|&end| end <= offset) + 1;
        let start = self.line_start(line);
        let offset = offset.min(self.content.len());
        let column = self
            .content
            .get(start..offset)
            .map_or(offset - start, |prefix| prefix.chars().count());
        (line, column + 1)
    }

    /// Content of a 1-indexed line without its terminator.
    pub fn line_text(&self, line: usize) -> &'a str {
        let start = self.line_start(line).min(self.content.len());
        let end = self
            .line_ends
            .get(line.saturating_sub(1))
            .copied()
            .unwrap_or(self.content.len());
        self.content[start..end].trim_end_matches(['\n', '\r'])
    }

    fn line_start(&self, line: usize) -> usize {
        match line {
            0 | 1 => 0,
            n => self.line_ends.get(n - 2).copied().unwrap_or(self.content.len()),
        }
    }
}
