//! Whitespace-delimited token reader for scene files.
//!
//! Scene files are a flat stream of tokens separated by ASCII whitespace.
//! Keywords, numbers, names and hex colours are all plain tokens; their
//! meaning is decided by the parser. The reader only tracks the byte offset
//! so diagnostics can report an approximate line.

/// A token with the byte offset where it starts.
#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    /// Token text (invalid UTF-8 is replaced).
    pub text: String,
    /// Byte offset of the first character.
    pub offset: usize,
}

impl Token {
    /// Case-insensitive keyword comparison.
    pub fn is(&self, keyword: &str) -> bool {
        self.text.eq_ignore_ascii_case(keyword)
    }

    /// Whether this token opens a `#` comment.
    pub fn is_comment(&self) -> bool {
        self.text.starts_with('#')
    }
}

/// Reader over the bytes of one scene source.
#[derive(Debug, Clone)]
pub struct Reader {
    input: Vec<u8>,
    pos: usize,
}

impl Reader {
    /// Create a reader positioned at the start of `input`.
    pub fn new(input: Vec<u8>) -> Self {
        Self { input, pos: 0 }
    }

    /// Current byte offset.
    pub fn offset(&self) -> usize {
        self.pos
    }

    /// Read the next token, or `None` at end of input.
    pub fn next_token(&mut self) -> Option<Token> {
        self.skip_whitespace();
        if self.pos >= self.input.len() {
            return None;
        }

        let start = self.pos;
        while let Some(ch) = self.peek_byte() {
            if ch.is_ascii_whitespace() {
                break;
            }
            self.pos += 1;
        }

        Some(Token {
            text: String::from_utf8_lossy(&self.input[start..self.pos]).into_owned(),
            offset: start,
        })
    }

    /// Consume the rest of the current line, including the newline.
    pub fn skip_line(&mut self) {
        while let Some(ch) = self.peek_byte() {
            self.pos += 1;
            if ch == b'\n' {
                break;
            }
        }
    }

    /// Line number (1-indexed) containing `offset`.
    ///
    /// Counts newlines from the start of the input; the cursor is untouched.
    pub fn line_at(&self, offset: usize) -> usize {
        let end = offset.min(self.input.len());
        self.input[..end].iter().filter(|&&b| b == b'\n').count() + 1
    }

    /// Line number of the cursor.
    pub fn line(&self) -> usize {
        self.line_at(self.pos)
    }

    fn peek_byte(&self) -> Option<u8> {
        self.input.get(self.pos).copied()
    }

    fn skip_whitespace(&mut self) {
        while let Some(ch) = self.peek_byte() {
            if !ch.is_ascii_whitespace() {
                break;
            }
            self.pos += 1;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tokenize(input: &str) -> Vec<String> {
        let mut reader = Reader::new(input.as_bytes().to_vec());
        std::iter::from_fn(|| reader.next_token())
            .map(|t| t.text)
            .collect()
    }

    #[test]
    fn test_tokens() {
        assert_eq!(
            tokenize("SPHERE CENTER 0 0 0\n  RAD 1.5\tfoo"),
            vec!["SPHERE", "CENTER", "0", "0", "0", "RAD", "1.5", "foo"]
        );
    }

    #[test]
    fn test_empty_and_whitespace() {
        assert!(tokenize("").is_empty());
        assert!(tokenize(" \n\t\r\n ").is_empty());
    }

    #[test]
    fn test_offsets() {
        let mut reader = Reader::new(b"  ab\ncd".to_vec());
        let a = reader.next_token().unwrap();
        assert_eq!(a.offset, 2);
        let b = reader.next_token().unwrap();
        assert_eq!(b.offset, 5);
        assert_eq!(reader.offset(), 7);
        assert!(reader.next_token().is_none());
    }

    #[test]
    fn test_skip_line() {
        let mut reader = Reader::new(b"# a comment here\nBEGIN_SCENE".to_vec());
        let hash = reader.next_token().unwrap();
        assert!(hash.is_comment());
        reader.skip_line();
        assert_eq!(reader.next_token().unwrap().text, "BEGIN_SCENE");
    }

    #[test]
    fn test_skip_line_at_eof() {
        let mut reader = Reader::new(b"# trailing".to_vec());
        reader.next_token();
        reader.skip_line();
        assert!(reader.next_token().is_none());
    }

    #[test]
    fn test_line_numbers_do_not_move_cursor() {
        let mut reader = Reader::new(b"a\nb\n\nc".to_vec());
        for _ in 0..3 {
            reader.next_token();
        }
        let pos = reader.offset();
        assert_eq!(reader.line(), 4);
        assert_eq!(reader.line_at(0), 1);
        assert_eq!(reader.line_at(2), 2);
        assert_eq!(reader.offset(), pos);
    }

    #[test]
    fn test_keyword_match_is_case_insensitive() {
        let mut reader = Reader::new(b"begin_scene".to_vec());
        assert!(reader.next_token().unwrap().is("BEGIN_SCENE"));
    }
}
