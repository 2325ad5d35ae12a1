use crate::checker::tokenizer::word_spans;

/// One piece of a [`SourceMap`]: a word or the separator between words.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Chunk {
    pub offset: usize,
    pub text: String,
    pub word: bool,
}

/// A file's content split into alternating word and separator chunks,
/// keyed by their original byte offsets.
///
/// Chunks cover the content with no gaps or overlaps. Corrections replace
/// a chunk's text; the partition itself never changes.
#[derive(Debug, Clone)]
pub struct SourceMap {
    chunks: Vec<Chunk>,
}

impl SourceMap {
    pub fn build(content: &str) -> Self {
        Self::with_boundaries(content, [])
    }

    /// Like [`SourceMap::build`], but no word chunk crosses any of
    /// `boundaries`. Words are split within each stretch between two
    /// boundaries, so a word starting right after one (`f'hello` split at
    /// the quote) gets its own chunk.
    pub fn with_boundaries(content: &str, boundaries: impl IntoIterator<Item = usize>) -> Self {
        let mut cuts: Vec<usize> = boundaries
            .into_iter()
            .filter(|&at| at > 0 && at < content.len() && content.is_char_boundary(at))
            .collect();
        cuts.push(content.len());
        cuts.sort_unstable();
        cuts.dedup();

        let mut map = Self { chunks: Vec::new() };
        let mut from = 0;
        for to in cuts {
            map.push_stretch(content, from, to);
            from = to;
        }
        map
    }

    fn push_stretch(&mut self, content: &str, from: usize, to: usize) {
        let mut pos = from;
        for span in word_spans(&content[from..to]) {
            let (start, end) = (span.start + from, span.end + from);
            self.push_separator(content, pos, start);
            self.chunks.push(Chunk {
                offset: start,
                text: content[start..end].to_string(),
                word: true,
            });
            pos = end;
        }
        self.push_separator(content, pos, to);
    }

    /// Separators stay maximal across boundaries.
    fn push_separator(&mut self, content: &str, from: usize, to: usize) {
        if from >= to {
            return;
        }
        match self.chunks.last_mut() {
            Some(last) if !last.word => last.text.push_str(&content[from..to]),
            _ => self.chunks.push(Chunk {
                offset: from,
                text: content[from..to].to_string(),
                word: false,
            }),
        }
    }

    /// Replace the chunk starting at `offset`. Returns `false`, changing
    /// nothing, when no chunk starts there.
    pub fn apply(&mut self, offset: usize, replacement: &str) -> bool {
        match self.chunks.binary_search_by_key(&offset, |chunk| chunk.offset) {
            Ok(i) => {
                self.chunks[i].text = replacement.to_string();
                true
            }
            Err(_) => false,
        }
    }

    pub fn serialize(&self) -> String {
        self.chunks.iter().map(|chunk| chunk.text.as_str()).collect()
    }

    pub fn chunks(&self) -> &[Chunk] {
        &self.chunks
    }
}
