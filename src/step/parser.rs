//! Part 21 parser: turns tokens into a raw entity graph.
//!
//! Entities are not interpreted here. Each one keeps its id, type name and
//! (possibly nested) argument list. Complex instances such as
//! `#7 = ( BOUNDED_CURVE() B_SPLINE_CURVE(..) ... );` keep one partial
//! record per type in [`StepEntity::parts`].

use std::collections::BTreeMap;

use crate::error::StepError;

use super::lexer::{Lexer, SpannedToken, Token};

/// A single argument value in a STEP entity.
#[derive(Debug, Clone, PartialEq)]
pub enum StepValue {
    EntityRef(u64),
    String(String),
    Real(f64),
    Integer(i64),
    Enum(String),
    List(Vec<StepValue>),
    /// Derived value (`*`).
    Derived,
    /// Unset value (`$`).
    Null,
    /// Inline typed value such as `LENGTH_MEASURE(1.0)`.
    Typed {
        type_name: String,
        args: Vec<StepValue>,
    },
}

impl StepValue {
    #[must_use]
    pub fn as_entity_ref(&self) -> Option<u64> {
        match self {
            Self::EntityRef(id) => Some(*id),
            _ => None,
        }
    }

    /// Returns the value as a real; integers and typed measures are accepted.
    #[must_use]
    pub fn as_real(&self) -> Option<f64> {
        match self {
            Self::Real(v) => Some(*v),
            #[allow(clippy::cast_precision_loss)]
            Self::Integer(v) => Some(*v as f64),
            Self::Typed { args, .. } if args.len() == 1 => args[0].as_real(),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_integer(&self) -> Option<i64> {
        match self {
            Self::Integer(v) => Some(*v),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_string(&self) -> Option<&str> {
        match self {
            Self::String(s) => Some(s),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_enum(&self) -> Option<&str> {
        match self {
            Self::Enum(s) => Some(s),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_list(&self) -> Option<&[StepValue]> {
        match self {
            Self::List(v) => Some(v),
            _ => None,
        }
    }

    #[must_use]
    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }
}

/// A parsed STEP entity instance.
#[derive(Debug, Clone, PartialEq)]
pub struct StepEntity {
    /// Instance id (`#123`); header entities use 0.
    pub id: u64,
    /// Type name. For a complex instance this is the parenthesized list of
    /// its partial record names, e.g. `(BOUNDED_CURVE B_SPLINE_CURVE)`.
    pub type_name: String,
    /// Arguments of a simple instance; empty for a complex one.
    pub args: Vec<StepValue>,
    /// Partial records of a complex instance, in file order.
    pub parts: Vec<StepEntity>,
}

impl StepEntity {
    /// Returns `true` for a complex (multi-record) instance.
    #[must_use]
    pub fn is_complex(&self) -> bool {
        !self.parts.is_empty()
    }

    /// Finds the record of type `name`: the entity itself for a simple
    /// instance, or the matching partial record of a complex one.
    #[must_use]
    pub fn part(&self, name: &str) -> Option<&StepEntity> {
        if self.is_complex() {
            self.parts.iter().find(|p| p.type_name == name)
        } else {
            (self.type_name == name).then_some(self)
        }
    }
}

/// The parsed contents of a STEP file.
#[derive(Debug, Clone, Default)]
pub struct StepFile {
    /// `FILE_DESCRIPTION`, `FILE_NAME`, `FILE_SCHEMA` and friends.
    pub header: Vec<StepEntity>,
    /// Data section entities, ordered by id.
    pub entities: BTreeMap<u64, StepEntity>,
}

impl StepFile {
    #[must_use]
    pub fn get(&self, id: u64) -> Option<&StepEntity> {
        self.entities.get(&id)
    }

    /// Returns the entity with `id`.
    ///
    /// # Errors
    ///
    /// Returns [`StepError::MissingEntity`] if no such entity exists.
    pub fn require(&self, id: u64) -> Result<&StepEntity, StepError> {
        self.entities.get(&id).ok_or(StepError::MissingEntity(id))
    }

    /// Iterates, in id order, over the simple entities of `type_name`.
    pub fn entities_of_type<'a>(&'a self, type_name: &'a str) -> impl Iterator<Item = &'a StepEntity> + 'a {
        self.entities.values().filter(move |e| e.type_name == type_name)
    }
}

/// Recursive-descent parser over a token stream.
pub struct Parser {
    tokens: Vec<SpannedToken>,
    pos: usize,
}

impl Parser {
    /// Parses a STEP file from bytes.
    ///
    /// # Errors
    ///
    /// Returns a lexer or parser error on malformed input, including a
    /// duplicated entity id.
    pub fn parse(input: &[u8]) -> Result<StepFile, StepError> {
        let tokens = Lexer::new(input).tokenize()?;
        Parser { tokens, pos: 0 }.parse_file()
    }

    fn parse_file(&mut self) -> Result<StepFile, StepError> {
        let mut file = StepFile::default();

        self.expect_keyword("ISO-10303-21")?;
        self.expect_token(&Token::Semicolon)?;

        loop {
            if self.check_keyword("HEADER") {
                self.advance();
                self.expect_token(&Token::Semicolon)?;
                file.header = self.parse_header_section()?;
                self.expect_section_end()?;
            } else if self.check_keyword("DATA") {
                self.advance();
                // DATA may carry a parameter list in edition 3 files.
                if self.check_token(&Token::LParen) {
                    self.parse_args(None)?;
                }
                self.expect_token(&Token::Semicolon)?;
                self.parse_data_section(&mut file.entities)?;
                self.expect_section_end()?;
            } else if self.check_keyword("END-ISO-10303-21") {
                self.advance();
                self.expect_token(&Token::Semicolon)?;
                return Ok(file);
            } else {
                return Err(self.unexpected(None, "a section keyword"));
            }
        }
    }

    fn expect_section_end(&mut self) -> Result<(), StepError> {
        self.expect_keyword("ENDSEC")?;
        self.expect_token(&Token::Semicolon)
    }

    fn parse_header_section(&mut self) -> Result<Vec<StepEntity>, StepError> {
        let mut entities = Vec::new();
        while let Some(Token::Keyword(type_name)) = self.peek_token().cloned() {
            if type_name == "ENDSEC" {
                break;
            }
            self.advance();
            let args = self.parse_args(None)?;
            self.expect_token(&Token::Semicolon)?;
            entities.push(StepEntity {
                id: 0,
                type_name,
                args,
                parts: Vec::new(),
            });
        }
        Ok(entities)
    }

    fn parse_data_section(&mut self, entities: &mut BTreeMap<u64, StepEntity>) -> Result<(), StepError> {
        while let Some(Token::EntityRef(id)) = self.peek_token().cloned() {
            self.advance();
            self.expect_token(&Token::Equals)?;

            let entity = match self.peek_token().cloned() {
                Some(Token::Keyword(type_name)) => {
                    self.advance();
                    let args = self.parse_args(Some(id))?;
                    StepEntity {
                        id,
                        type_name,
                        args,
                        parts: Vec::new(),
                    }
                }
                Some(Token::LParen) => self.parse_complex(id)?,
                _ => return Err(self.unexpected(Some(id), "a type name")),
            };
            self.expect_token(&Token::Semicolon)?;

            if entities.insert(id, entity).is_some() {
                return Err(StepError::parser(Some(id), "duplicate entity id"));
            }
        }
        Ok(())
    }

    /// Parses `( NAME(args) NAME(args) ... )`.
    fn parse_complex(&mut self, id: u64) -> Result<StepEntity, StepError> {
        self.expect_token(&Token::LParen)?;
        let mut parts = Vec::new();
        while let Some(Token::Keyword(type_name)) = self.peek_token().cloned() {
            self.advance();
            let args = self.parse_args(Some(id))?;
            parts.push(StepEntity {
                id,
                type_name,
                args,
                parts: Vec::new(),
            });
        }
        self.expect_token(&Token::RParen)?;

        if parts.is_empty() {
            return Err(StepError::parser(Some(id), "empty complex instance"));
        }
        let names: Vec<&str> = parts.iter().map(|p| p.type_name.as_str()).collect();
        Ok(StepEntity {
            id,
            type_name: format!("({})", names.join(" ")),
            args: Vec::new(),
            parts,
        })
    }

    fn parse_args(&mut self, id: Option<u64>) -> Result<Vec<StepValue>, StepError> {
        self.expect_token(&Token::LParen)?;
        let mut args = Vec::new();
        if !self.check_token(&Token::RParen) {
            args.push(self.parse_value(id)?);
            while self.check_token(&Token::Comma) {
                self.advance();
                args.push(self.parse_value(id)?);
            }
        }
        self.expect_token(&Token::RParen)?;
        Ok(args)
    }

    fn parse_value(&mut self, id: Option<u64>) -> Result<StepValue, StepError> {
        let Some(token) = self.peek_token().cloned() else {
            return Err(StepError::parser(id, "unexpected end of file"));
        };
        let value = match token {
            Token::LParen => return self.parse_args(id).map(StepValue::List),
            Token::Keyword(type_name) => {
                self.advance();
                let args = self.parse_args(id)?;
                return Ok(StepValue::Typed { type_name, args });
            }
            Token::EntityRef(r) => StepValue::EntityRef(r),
            Token::String(s) => StepValue::String(s),
            Token::Real(v) => StepValue::Real(v),
            Token::Integer(v) => StepValue::Integer(v),
            Token::Enum(s) => StepValue::Enum(s),
            Token::Asterisk => StepValue::Derived,
            Token::Dollar => StepValue::Null,
            _ => return Err(self.unexpected(id, "a value")),
        };
        self.advance();
        Ok(value)
    }

    fn peek_token(&self) -> Option<&Token> {
        self.tokens.get(self.pos).map(|t| &t.token)
    }

    fn advance(&mut self) {
        self.pos += 1;
    }

    fn check_token(&self, expected: &Token) -> bool {
        self.peek_token() == Some(expected)
    }

    fn check_keyword(&self, name: &str) -> bool {
        matches!(self.peek_token(), Some(Token::Keyword(k)) if k == name)
    }

    fn unexpected(&self, id: Option<u64>, expected: &str) -> StepError {
        match self.tokens.get(self.pos) {
            Some(t) => StepError::parser(
                id,
                format!(
                    "expected {expected}, got {:?} at line {}, column {}",
                    t.token, t.pos.line, t.pos.col
                ),
            ),
            None => StepError::parser(id, format!("expected {expected}, got end of file")),
        }
    }

    fn expect_token(&mut self, expected: &Token) -> Result<(), StepError> {
        if self.check_token(expected) {
            self.advance();
            Ok(())
        } else {
            Err(self.unexpected(None, &format!("{expected:?}")))
        }
    }

    fn expect_keyword(&mut self, name: &str) -> Result<(), StepError> {
        if self.check_keyword(name) {
            self.advance();
            Ok(())
        } else {
            Err(self.unexpected(None, &format!("keyword '{name}'")))
        }
    }
}
