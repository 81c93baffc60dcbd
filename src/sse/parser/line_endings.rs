//! Line terminator normalization across chunk boundaries.

/// Rewrite CRLF and lone CR as LF.
///
/// Stateless; use [`LineEndingNormalizer`] when the input arrives in pieces.
pub fn normalize_line_endings(input: &str) -> String {
    LineEndingNormalizer::default().normalize(input)
}

/// Incremental CRLF/CR to LF rewriter.
///
/// Remembers whether the previous chunk ended in a CR so that a CRLF split
/// across two chunks still counts as one line break.
#[derive(Debug, Default, Clone)]
pub struct LineEndingNormalizer {
    after_cr: bool,
}

impl LineEndingNormalizer {
    /// Create a normalizer with no carried state.
    pub fn new() -> Self {
        Self::default()
    }

    /// Normalize the next chunk.
    ///
    /// An empty chunk returns an empty string and leaves the carried state
    /// untouched.
    pub fn normalize(&mut self, chunk: &str) -> String {
        if chunk.is_empty() {
            return String::new();
        }

        // The LF half of a CRLF whose CR closed the previous chunk
        let chunk = if self.after_cr {
            chunk.strip_prefix('\n').unwrap_or(chunk)
        } else {
            chunk
        };
        self.after_cr = chunk.ends_with('\r');

        if !chunk.contains('\r') {
            return chunk.to_string();
        }

        let mut out = String::with_capacity(chunk.len());
        let mut chars = chunk.chars().peekable();
        while let Some(c) = chars.next() {
            if c == '\r' {
                out.push('\n');
                if chars.peek() == Some(&'\n') {
                    chars.next();
                }
            } else {
                out.push(c);
            }
        }
        out
    }

    /// Forget any carried CR.
    pub fn reset(&mut self) {
        self.after_cr = false;
    }
}
