//lexer.rs - the source manager
//there is no token array here: the parser asks the source "does this
//pattern match at the cursor?" and the source moves forward on success.
//line/column tracking lives here so every error can point at the code.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::error::CompileError;

//a single quote starts a comment that runs to the end of its line
static COMMENT: Lazy<Regex> = Lazy::new(|| Regex::new(r"'[^\n]*").expect("comment pattern"));

//blank every comment with spaces so offsets and line numbers stay put
pub fn strip_comments(raw: &str) -> String {
    COMMENT
        .replace_all(raw, |caps: &regex::Captures| " ".repeat(caps[0].chars().count()))
        .into_owned()
}

#[derive(Debug, Clone)]
pub struct Source {
    src: String,
    pub cursor: usize,
    pub line: usize,
    pub line_start: usize,
    pub paren_ctr: i32,
    pub inside_gene: bool,
}

impl Source {
    pub fn new(raw: &str) -> Self {
        Self {
            src: strip_comments(raw),
            cursor: 0,
            line: 1,
            line_start: 0,
            paren_ctr: 0,
            inside_gene: false,
        }
    }

    pub fn rest(&self) -> &str {
        &self.src[self.cursor..]
    }

    //char under the cursor, None at eof
    pub fn peek(&self) -> Option<char> {
        self.rest().chars().next()
    }

    //skip whitespace then peek
    pub fn next_char(&mut self) -> Option<char> {
        self.skip_whitespace();
        self.peek()
    }

    pub fn at_eof(&mut self) -> bool {
        self.next_char().is_none()
    }

    pub fn skip_whitespace(&mut self) {
        let mut pos = self.cursor;
        for (i, c) in self.src[self.cursor..].char_indices() {
            if !c.is_whitespace() {
                break;
            }
            if c == '\n' {
                self.line += 1;
                self.line_start = self.cursor + i + 1;
            }
            pos = self.cursor + i + c.len_utf8();
        }
        self.cursor = pos;
    }

    //length of an anchored match at the cursor (after whitespace), cursor untouched
    pub fn lookahead(&mut self, pattern: &Regex) -> Option<usize> {
        self.skip_whitespace();
        pattern
            .find(self.rest())
            .filter(|m| m.start() == 0)
            .map(|m| m.end())
    }

    //consume the pattern if it is next, otherwise do nothing
    pub fn accept(&mut self, pattern: &Regex) -> Option<String> {
        let len = self.lookahead(pattern)?;
        let matched = self.rest()[..len].to_string();
        self.cursor += len;
        Some(matched)
    }

    pub fn expect(&mut self, pattern: &Regex, label: &str) -> Result<String, CompileError> {
        self.accept(pattern)
            .ok_or_else(|| self.error_at_cursor(&format!("Expected to find {}", label)))
    }

    //succeeds (without consuming) only when the pattern is NOT next
    pub fn expect_not(&mut self, pattern: &Regex, label: &str) -> Result<(), CompileError> {
        match self.lookahead(pattern) {
            Some(_) => Err(self.error_at_cursor(&format!("Unexpected {}", label))),
            None => Ok(()),
        }
    }

    //move back to a position on the current line (used after a rejected match)
    pub fn rewind(&mut self, cursor: usize) {
        debug_assert!(cursor >= self.line_start && cursor <= self.cursor);
        self.cursor = cursor;
    }

    pub fn column(&self) -> usize {
        self.src[self.line_start..self.cursor].chars().count() + 1
    }

    //the current line with a caret under the cursor and the message below
    pub fn error_at_cursor(&self, message: &str) -> CompileError {
        let line_end = self.src[self.cursor..]
            .find(['\n', '\r'])
            .map_or(self.src.len(), |i| self.cursor + i);
        let excerpt = &self.src[self.line_start..line_end];
        CompileError::new(self.line, self.column(), message, excerpt)
    }
}
