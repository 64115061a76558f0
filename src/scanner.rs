//! Comment scanner for C-family source text.
//!
//! The scanner makes a single pass over the source and copies everything
//! except comments into a new buffer:
//! - `//` line comments are dropped up to, but not including, the newline
//! - `/* ... */` block comments are dropped entirely (no nesting)
//! - `"..."` and `'...'` literals are copied verbatim, honoring `\` escapes
//!
//! Unterminated literals and comments are not errors. The scan simply ends in
//! whatever mode it was in; the caller can inspect [`Stripped::diagnostics`]
//! to find out about them.

use std::fmt;
use std::iter::Peekable;
use std::str::Chars;

/// Scanner mode, one per lexical context the scanner distinguishes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    /// Ordinary code, copied through.
    Normal,
    /// Inside `//`, discarded until end of line.
    LineComment,
    /// Inside `/* */`, discarded until `*/`.
    BlockComment,
    /// Inside a double-quoted literal.
    InString,
    /// Inside a single-quoted literal.
    InChar,
}

impl Mode {
    /// The quote character that closes the current literal.
    /// `None` outside of literal modes.
    pub fn delimiter(self) -> Option<char> {
        match self {
            Mode::InString => Some('"'),
            Mode::InChar => Some('\''),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiagnosticKind {
    UnclosedString,
    UnclosedChar,
    UnclosedComment,
}

impl fmt::Display for DiagnosticKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DiagnosticKind::UnclosedString => write!(f, "unterminated string literal"),
            DiagnosticKind::UnclosedChar => write!(f, "unterminated character literal"),
            DiagnosticKind::UnclosedComment => write!(f, "unterminated block comment"),
        }
    }
}

/// A construct that was still open when the source ran out.
///
/// Diagnostics never affect the stripped text, they only describe it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    pub kind: DiagnosticKind,
    /// Line of the opening delimiter (1-indexed).
    pub line: usize,
    /// Column of the opening delimiter, in characters (1-indexed).
    pub column: usize,
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}: {}", self.line, self.column, self.kind)
    }
}

/// Result of a full scan.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Stripped {
    pub text: String,
    pub diagnostics: Vec<Diagnostic>,
}

/// The comment scanner state. One instance scans one buffer.
#[derive(Debug)]
pub struct Scanner<'src> {
    chars: Peekable<Chars<'src>>,
    /// Character offset of the next unread character.
    offset: usize,
    /// Character offset of the current line start.
    line_offset: usize,
    /// Current line number (1-indexed).
    lnum: usize,
    mode: Mode,
    /// The previous literal character was a backslash that has not yet
    /// consumed the character it escapes.
    escape_pending: bool,
    /// Line and column where the current literal or comment opened.
    opened_at: (usize, usize),
    out: String,
}

impl<'src> Scanner<'src> {
    pub fn new(src: &'src str) -> Self {
        Self {
            chars: src.chars().peekable(),
            offset: 0,
            line_offset: 0,
            lnum: 1,
            mode: Mode::Normal,
            escape_pending: false,
            opened_at: (1, 1),
            out: String::with_capacity(src.len()),
        }
    }

    /// Current mode.
    pub fn mode(&self) -> Mode {
        self.mode
    }

    /// Consume the next character, keeping line tracking up to date.
    fn next(&mut self) -> Option<char> {
        let ch = self.chars.next()?;
        self.offset += 1;
        if ch == '\n' {
            self.line_offset = self.offset;
            self.lnum += 1;
        }
        Some(ch)
    }

    fn peek(&mut self) -> Option<char> {
        self.chars.peek().copied()
    }

    /// Switch to `mode`, remembering the position of the character that was
    /// just consumed as the opening delimiter.
    fn enter(&mut self, mode: Mode) {
        self.opened_at = (self.lnum, self.offset - self.line_offset);
        self.escape_pending = false;
        self.mode = mode;
    }

    fn scan_normal(&mut self, ch: char) {
        match ch {
            '"' => {
                self.out.push(ch);
                self.enter(Mode::InString);
            }
            '\'' => {
                self.out.push(ch);
                self.enter(Mode::InChar);
            }
            '/' => match self.peek() {
                Some('/') => {
                    self.enter(Mode::LineComment);
                    self.next();
                }
                Some('*') => {
                    self.enter(Mode::BlockComment);
                    self.next();
                }
                _ => self.out.push(ch),
            },
            _ => self.out.push(ch),
        }
    }

    fn scan_line_comment(&mut self, ch: char) {
        // The newline survives so that following lines keep their numbers.
        if ch == '\n' {
            self.out.push(ch);
            self.mode = Mode::Normal;
        }
    }

    fn scan_block_comment(&mut self, ch: char) {
        if ch == '*' && self.peek() == Some('/') {
            self.next();
            self.mode = Mode::Normal;
        }
    }

    fn scan_literal(&mut self, ch: char) {
        self.out.push(ch);
        if self.escape_pending {
            self.escape_pending = false;
        } else if ch == '\\' {
            self.escape_pending = true;
        } else if Some(ch) == self.mode.delimiter() {
            self.mode = Mode::Normal;
        }
    }

    fn unclosed(&self) -> Option<Diagnostic> {
        let kind = match self.mode {
            Mode::InString => DiagnosticKind::UnclosedString,
            Mode::InChar => DiagnosticKind::UnclosedChar,
            Mode::BlockComment => DiagnosticKind::UnclosedComment,
            // A line comment is closed by end of file just as well as by a newline.
            Mode::Normal | Mode::LineComment => return None,
        };
        let (line, column) = self.opened_at;
        Some(Diagnostic { kind, line, column })
    }

    /// Scan the whole source and hand back the stripped text.
    pub fn run(mut self) -> Stripped {
        while let Some(ch) = self.next() {
            match self.mode {
                Mode::Normal => self.scan_normal(ch),
                Mode::LineComment => self.scan_line_comment(ch),
                Mode::BlockComment => self.scan_block_comment(ch),
                Mode::InString | Mode::InChar => self.scan_literal(ch),
            }
        }

        let diagnostics = self.unclosed().into_iter().collect();
        Stripped {
            text: self.out,
            diagnostics,
        }
    }
}

/// Remove all comments from `text`, leaving literals untouched.
pub fn strip(text: &str) -> String {
    Scanner::new(text).run().text
}

/// Like [`strip`], but also reports constructs left open at end of input.
pub fn strip_with_diagnostics(text: &str) -> Stripped {
    Scanner::new(text).run()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn unclosed(text: &str) -> Vec<Diagnostic> {
        strip_with_diagnostics(text).diagnostics
    }

    #[test]
    fn test_line_comment_keeps_newline() {
        assert_eq!(strip("int x = 1; // set x\nint y = 2;"), "int x = 1; \nint y = 2;");
    }

    #[test]
    fn test_only_line_comment() {
        assert_eq!(strip("// hello\n"), "\n");
    }

    #[test]
    fn test_line_comment_at_eof() {
        assert_eq!(strip("char *s = \"http://x\"; // note"), "char *s = \"http://x\"; ");
        assert!(unclosed("x; // note").is_empty());
    }

    #[test]
    fn test_line_comment_drops_carriage_return() {
        assert_eq!(strip("a; // c\r\nb;\r\n"), "a; \nb;\r\n");
    }

    #[test]
    fn test_block_comment() {
        assert_eq!(strip("/* header\ncomment */ int x;"), " int x;");
        assert_eq!(strip("a /* b */ c"), "a  c");
    }

    #[test]
    fn test_block_comment_removes_its_newlines() {
        let input = "a\n/* one\ntwo\nthree\n */\nb\n";
        let output = strip(input);
        assert_eq!(output, "a\n\nb\n");
        assert_eq!(input.matches('\n').count() - output.matches('\n').count(), 3);
    }

    #[test]
    fn test_single_line_block_comment_keeps_line_count() {
        let input = "a /* x */\nb\n";
        assert_eq!(strip(input).lines().count(), input.lines().count());
    }

    #[test]
    fn test_block_comment_lone_star() {
        assert_eq!(strip("a/* 2 * 3 **/b"), "ab");
        assert_eq!(strip("a/*/ still comment */b"), "ab");
    }

    #[test]
    fn test_block_comments_do_not_nest() {
        assert_eq!(strip("/* /* inner */ x */"), " x */");
    }

    #[test]
    fn test_unterminated_block_comment() {
        assert_eq!(strip("/* unterminated"), "");
        assert_eq!(
            unclosed("int a;\n  /* open"),
            vec![Diagnostic {
                kind: DiagnosticKind::UnclosedComment,
                line: 2,
                column: 3,
            }]
        );
    }

    #[test]
    fn test_slash_in_char_literal() {
        assert_eq!(strip("char q = '/';"), "char q = '/';");
    }

    #[test]
    fn test_comment_markers_inside_string() {
        let input = "s = \"/* not a comment */ // nor this\";";
        assert_eq!(strip(input), input);
    }

    #[test]
    fn test_escaped_quote() {
        let input = r#"s = "a\"b"; // tail"#;
        assert_eq!(strip(input), r#"s = "a\"b"; "#);
    }

    #[test]
    fn test_escaped_backslash_closes_literal() {
        // `"\\"` is a complete literal, so the comment after it is real.
        let input = r#"p = "\\"; // c"#;
        assert_eq!(strip(input), r#"p = "\\"; "#);
    }

    #[test]
    fn test_escaped_char_quote() {
        let input = r"c = '\''; /* q */ d = '\\';";
        assert_eq!(strip(input), r"c = '\'';  d = '\\';");
    }

    #[test]
    fn test_other_quote_inside_literal() {
        assert_eq!(strip("s = \"it's\"; // x"), "s = \"it's\"; ");
        assert_eq!(strip("c = '\"'; // x"), "c = '\"'; ");
    }

    #[test]
    fn test_division_is_not_a_comment() {
        assert_eq!(strip("a = b / c;"), "a = b / c;");
        assert_eq!(strip("a /= 2; x/"), "a /= 2; x/");
    }

    #[test]
    fn test_unterminated_literals() {
        assert_eq!(strip("s = \"abc // x"), "s = \"abc // x");
        assert_eq!(
            unclosed("s = \"abc"),
            vec![Diagnostic {
                kind: DiagnosticKind::UnclosedString,
                line: 1,
                column: 5,
            }]
        );
        assert_eq!(strip("c = 'a"), "c = 'a");
        assert_eq!(unclosed("c = 'a")[0].kind, DiagnosticKind::UnclosedChar);
    }

    #[test]
    fn test_trailing_backslash_in_literal() {
        assert_eq!(strip("\"abc\\"), "\"abc\\");
    }

    #[test]
    fn test_literal_spans_lines() {
        let input = "s = \"a\n// b\"; // c\n";
        assert_eq!(strip(input), "s = \"a\n// b\"; \n");
    }

    #[test]
    fn test_non_ascii() {
        assert_eq!(strip("é = \"ü//\"; // ñ\n"), "é = \"ü//\"; \n");
        assert_eq!(
            unclosed("ü /* x")[0],
            Diagnostic {
                kind: DiagnosticKind::UnclosedComment,
                line: 1,
                column: 3,
            }
        );
    }

    #[test]
    fn test_empty() {
        assert_eq!(strip(""), "");
        assert!(unclosed("").is_empty());
    }

    #[test]
    fn test_idempotent() {
        let inputs = [
            "int x = 1; // set x\nint y = 2;",
            "/* a */ b /* c\n d */ e // f",
            "s = \"/* keep */\"; c = '//'; /* drop */",
            "a /\n/ b",
            "x = \"a\\\"b\" /**/ / 2;",
            "/ /* /",
        ];
        for input in inputs {
            let once = strip(input);
            assert_eq!(strip(&once), once, "input: {input:?}");
        }
    }

    #[test]
    fn test_split_slashes_are_not_comments() {
        assert_eq!(strip("a /\n/ b"), "a /\n/ b");
    }

    #[test]
    fn test_next_and_delimiter() {
        let mut scanner = Scanner::new("x");
        assert_eq!(scanner.mode(), Mode::Normal);
        assert_eq!(scanner.next(), Some('x'));
        assert_eq!(scanner.next(), None);
        assert_eq!(Mode::InChar.delimiter(), Some('\''));
        assert_eq!(Mode::BlockComment.delimiter(), None);
    }

    #[test]
    fn test_diagnostic_display() {
        let diagnostic = Diagnostic {
            kind: DiagnosticKind::UnclosedChar,
            line: 4,
            column: 2,
        };
        assert_eq!(diagnostic.to_string(), "4:2: unterminated character literal");
    }
}
