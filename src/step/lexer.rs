//! Part 21 (STEP physical file format) tokenizer.
//!
//! Produces keywords, entity references (`#12`), strings, reals, integers,
//! enumerations (`.T.`) and the punctuation `( ) , ; = * $`. Comments
//! (`/* ... */`) and whitespace are skipped.

use crate::error::StepError;

/// A token in a STEP file.
#[derive(Debug, Clone, PartialEq)]
pub enum Token {
    /// Keyword or type name, upper-cased (`CARTESIAN_POINT`, `DATA`).
    Keyword(String),
    /// Entity reference, `#123` becomes `EntityRef(123)`.
    EntityRef(u64),
    /// String literal without the surrounding quotes.
    String(String),
    Real(f64),
    Integer(i64),
    /// Enumeration, `.TRUE.` becomes `Enum("TRUE")`.
    Enum(String),
    LParen,
    RParen,
    Comma,
    Semicolon,
    Equals,
    /// Derived value marker `*`.
    Asterisk,
    /// Unset value marker `$`.
    Dollar,
}

/// Line and column of a token, both 1-based.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Position {
    pub line: usize,
    pub col: usize,
}

/// A token with the position it starts at.
#[derive(Debug, Clone)]
pub struct SpannedToken {
    pub token: Token,
    pub pos: Position,
}

/// Tokenizer over the raw bytes of a STEP file.
pub struct Lexer<'a> {
    input: &'a [u8],
    pos: usize,
    line: usize,
    col: usize,
}

impl<'a> Lexer<'a> {
    #[must_use]
    pub fn new(input: &'a [u8]) -> Self {
        Self {
            input,
            pos: 0,
            line: 1,
            col: 1,
        }
    }

    /// Tokenizes the whole input.
    ///
    /// # Errors
    ///
    /// Returns [`StepError::Lexer`] on the first malformed token.
    pub fn tokenize(&mut self) -> Result<Vec<SpannedToken>, StepError> {
        let mut tokens = Vec::new();
        while let Some(tok) = self.next_token()? {
            tokens.push(tok);
        }
        Ok(tokens)
    }

    /// Reads the next token, or `None` at end of input.
    ///
    /// # Errors
    ///
    /// Returns [`StepError::Lexer`] if the input at the cursor is not a token.
    pub fn next_token(&mut self) -> Result<Option<SpannedToken>, StepError> {
        self.skip_whitespace_and_comments()?;

        let Some(ch) = self.peek() else {
            return Ok(None);
        };
        let pos = Position {
            line: self.line,
            col: self.col,
        };

        let token = match ch {
            b'(' | b')' | b',' | b';' | b'=' | b'*' | b'$' => {
                self.advance();
                match ch {
                    b'(' => Token::LParen,
                    b')' => Token::RParen,
                    b',' => Token::Comma,
                    b';' => Token::Semicolon,
                    b'=' => Token::Equals,
                    b'*' => Token::Asterisk,
                    _ => Token::Dollar,
                }
            }
            b'#' => self.read_entity_ref()?,
            b'\'' => self.read_string()?,
            b'.' => self.read_enum()?,
            b'-' | b'+' if self.peek_at(1).is_some_and(|c| c.is_ascii_digit() || c == b'.') => {
                self.read_number()?
            }
            b'0'..=b'9' => self.read_number()?,
            b'A'..=b'Z' | b'a'..=b'z' | b'_' | b'!' => self.read_keyword(),
            _ => return Err(self.error(format!("unexpected character: '{}'", ch as char))),
        };

        Ok(Some(SpannedToken { token, pos }))
    }

    fn peek(&self) -> Option<u8> {
        self.input.get(self.pos).copied()
    }

    fn peek_at(&self, offset: usize) -> Option<u8> {
        self.input.get(self.pos + offset).copied()
    }

    fn advance(&mut self) -> Option<u8> {
        let ch = self.peek()?;
        self.pos += 1;
        if ch == b'\n' {
            self.line += 1;
            self.col = 1;
        } else {
            self.col += 1;
        }
        Some(ch)
    }

    fn error(&self, message: impl Into<String>) -> StepError {
        StepError::lexer(self.line, self.col, message)
    }

    /// Consumes bytes while `accept` holds, returning them as text.
    fn take_while(&mut self, accept: impl Fn(u8) -> bool) -> String {
        let start = self.pos;
        while self.peek().is_some_and(&accept) {
            self.advance();
        }
        String::from_utf8_lossy(&self.input[start..self.pos]).into_owned()
    }

    fn skip_whitespace_and_comments(&mut self) -> Result<(), StepError> {
        loop {
            while self.peek().is_some_and(|c| c.is_ascii_whitespace()) {
                self.advance();
            }

            if self.peek() == Some(b'/') && self.peek_at(1) == Some(b'*') {
                let (line, col) = (self.line, self.col);
                self.advance();
                self.advance();
                loop {
                    match (self.peek(), self.peek_at(1)) {
                        (Some(b'*'), Some(b'/')) => {
                            self.advance();
                            self.advance();
                            break;
                        }
                        (Some(_), _) => {
                            self.advance();
                        }
                        (None, _) => return Err(StepError::lexer(line, col, "unterminated comment")),
                    }
                }
                continue;
            }

            return Ok(());
        }
    }

    fn read_entity_ref(&mut self) -> Result<Token, StepError> {
        let (line, col) = (self.line, self.col);
        self.advance();

        let digits = self.take_while(|c| c.is_ascii_digit());
        if digits.is_empty() {
            return Err(StepError::lexer(line, col, "expected digits after '#'"));
        }
        digits
            .parse()
            .map(Token::EntityRef)
            .map_err(|_| StepError::lexer(line, col, format!("invalid entity id: {digits}")))
    }

    fn read_string(&mut self) -> Result<Token, StepError> {
        let (line, col) = (self.line, self.col);
        self.advance();

        let mut content = Vec::new();
        loop {
            match self.advance() {
                None => return Err(StepError::lexer(line, col, "unterminated string")),
                Some(b'\'') => {
                    // '' is an escaped quote
                    if self.peek() == Some(b'\'') {
                        self.advance();
                        content.push(b'\'');
                    } else {
                        break;
                    }
                }
                Some(ch) => content.push(ch),
            }
        }

        Ok(Token::String(String::from_utf8_lossy(&content).into_owned()))
    }

    fn read_enum(&mut self) -> Result<Token, StepError> {
        let (line, col) = (self.line, self.col);
        self.advance();

        let name = self.take_while(|c| c.is_ascii_alphanumeric() || c == b'_');
        if self.advance() != Some(b'.') {
            return Err(StepError::lexer(line, col, "unterminated enumeration"));
        }
        if name.is_empty() {
            return Err(StepError::lexer(line, col, "empty enumeration"));
        }
        Ok(Token::Enum(name.to_uppercase()))
    }

    /// Reads an integer or real. A `.` right after the integer digits always
    /// makes a real, so `0.`, `1.E-3` and `-.5` are accepted.
    fn read_number(&mut self) -> Result<Token, StepError> {
        let (line, col) = (self.line, self.col);
        let mut text = String::new();
        let mut is_real = false;

        if let Some(sign @ (b'-' | b'+')) = self.peek() {
            text.push(sign as char);
            self.advance();
        }
        text.push_str(&self.take_while(|c| c.is_ascii_digit()));

        if self.peek() == Some(b'.') {
            is_real = true;
            self.advance();
            text.push('.');
            text.push_str(&self.take_while(|c| c.is_ascii_digit()));
        }

        if let Some(b'E' | b'e') = self.peek() {
            is_real = true;
            self.advance();
            text.push('E');
            if let Some(sign @ (b'-' | b'+')) = self.peek() {
                text.push(sign as char);
                self.advance();
            }
            text.push_str(&self.take_while(|c| c.is_ascii_digit()));
        }

        if is_real {
            text.parse::<f64>()
                .map(Token::Real)
                .map_err(|_| StepError::lexer(line, col, format!("invalid real number: {text}")))
        } else {
            text.parse::<i64>()
                .map(Token::Integer)
                .map_err(|_| StepError::lexer(line, col, format!("invalid integer: {text}")))
        }
    }

    fn read_keyword(&mut self) -> Token {
        // Hyphens appear in ISO-10303-21 and END-ISO-10303-21.
        let name = self.take_while(|c| c.is_ascii_alphanumeric() || c == b'_' || c == b'-' || c == b'!');
        Token::Keyword(name.to_uppercase())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn tokenize(input: &str) -> Vec<Token> {
        Lexer::new(input.as_bytes())
            .tokenize()
            .unwrap()
            .into_iter()
            .map(|st| st.token)
            .collect()
    }

    #[test]
    fn entity_refs_and_strings() {
        assert_eq!(tokenize("#123"), vec![Token::EntityRef(123)]);
        assert_eq!(tokenize("'it''s'"), vec![Token::String("it's".into())]);
        assert_eq!(tokenize("''"), vec![Token::String(String::new())]);
    }

    #[test]
    fn enumerations() {
        assert_eq!(tokenize(".T."), vec![Token::Enum("T".into())]);
        assert_eq!(tokenize(".unspecified."), vec![Token::Enum("UNSPECIFIED".into())]);
    }

    #[test]
    fn integers_and_reals() {
        assert_eq!(tokenize("42"), vec![Token::Integer(42)]);
        assert_eq!(tokenize("-7"), vec![Token::Integer(-7)]);
        assert_eq!(tokenize("3.25"), vec![Token::Real(3.25)]);
        assert_eq!(tokenize("-1.5E-10"), vec![Token::Real(-1.5e-10)]);
        assert_eq!(tokenize("2.E3"), vec![Token::Real(2000.0)]);
        assert_eq!(tokenize("0."), vec![Token::Real(0.0)]);
        assert_eq!(tokenize("-.5"), vec![Token::Real(-0.5)]);
    }

    #[test]
    fn trailing_dot_real_is_not_an_enum() {
        assert_eq!(
            tokenize("(0.,1.)"),
            vec![
                Token::LParen,
                Token::Real(0.0),
                Token::Comma,
                Token::Real(1.0),
                Token::RParen,
            ]
        );
    }

    #[test]
    fn keywords_are_upper_cased() {
        assert_eq!(tokenize("data"), vec![Token::Keyword("DATA".into())]);
        assert_eq!(
            tokenize("END-ISO-10303-21"),
            vec![Token::Keyword("END-ISO-10303-21".into())]
        );
    }

    #[test]
    fn punctuation_and_comments() {
        assert_eq!(
            tokenize("( ) /* note */ = , ; * $"),
            vec![
                Token::LParen,
                Token::RParen,
                Token::Equals,
                Token::Comma,
                Token::Semicolon,
                Token::Asterisk,
                Token::Dollar,
            ]
        );
    }

    #[test]
    fn positions_track_lines() {
        let tokens = Lexer::new(b"#1\n  #2").tokenize().unwrap();
        assert_eq!(tokens[1].pos, Position { line: 2, col: 3 });
    }

    #[test]
    fn malformed_input_is_rejected() {
        assert!(Lexer::new(b"'open").tokenize().is_err());
        assert!(Lexer::new(b"/* open").tokenize().is_err());
        assert!(Lexer::new(b"#x").tokenize().is_err());
        let err = Lexer::new(b"\n  @").tokenize().unwrap_err();
        assert!(matches!(err, StepError::Lexer { line: 2, col: 3, .. }));
    }
}
