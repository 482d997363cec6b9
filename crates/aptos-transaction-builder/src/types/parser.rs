//! Textual type-signature grammar.
//!
//! Turns strings like `0x1::coin::CoinStore<0x1::aptos_coin::AptosCoin>`
//! into the structural [`TypeTag`] tree via a small tokenizer and a
//! recursive-descent parser.

use crate::error::{AptosError, AptosResult};
use crate::types::{AccountAddress, Identifier, StructTag, TypeTag};

/// A lexical token of the type-signature grammar.
#[derive(Clone, Debug, PartialEq, Eq)]
enum Token {
    /// `::`
    ColonColon,
    /// `<`
    Lt,
    /// `>`
    Gt,
    /// `,`
    Comma,
    /// A run of `[A-Za-z0-9_]` characters
    Ident(String),
}

impl Token {
    fn describe(&self) -> &str {
        match self {
            Token::ColonColon => "::",
            Token::Lt => "<",
            Token::Gt => ">",
            Token::Comma => ",",
            Token::Ident(s) => s,
        }
    }
}

fn is_ident_char(c: u8) -> bool {
    c == b'_' || c.is_ascii_alphanumeric()
}

fn is_whitespace(c: u8) -> bool {
    matches!(c, b' ' | b'\x0c' | b'\n' | b'\r' | b'\t' | b'\x0b')
}

/// Splits the input into tokens, skipping whitespace runs.
fn tokenize(input: &str) -> AptosResult<Vec<Token>> {
    let bytes = input.as_bytes();
    let mut tokens = Vec::new();
    let mut pos = 0;

    while pos < bytes.len() {
        let c = bytes[pos];
        match c {
            b':' => {
                if bytes.get(pos + 1) == Some(&b':') {
                    tokens.push(Token::ColonColon);
                    pos += 2;
                } else {
                    return Err(AptosError::Lex(format!(
                        "unrecognized token ':' at position {pos}"
                    )));
                }
            }
            b'<' => {
                tokens.push(Token::Lt);
                pos += 1;
            }
            b'>' => {
                tokens.push(Token::Gt);
                pos += 1;
            }
            b',' => {
                tokens.push(Token::Comma);
                pos += 1;
            }
            c if is_whitespace(c) => {
                pos += 1;
                while pos < bytes.len() && is_whitespace(bytes[pos]) {
                    pos += 1;
                }
            }
            c if is_ident_char(c) => {
                let start = pos;
                pos += 1;
                while pos < bytes.len() && is_ident_char(bytes[pos]) {
                    pos += 1;
                }
                tokens.push(Token::Ident(input[start..pos].to_string()));
            }
            c => {
                return Err(AptosError::Lex(format!(
                    "unrecognized character {:?} at position {pos}",
                    char::from(c)
                )));
            }
        }
    }
    Ok(tokens)
}

/// Recursive-descent parser over the token stream.
struct TypeTagParser {
    tokens: Vec<Token>,
    pos: usize,
}

impl TypeTagParser {
    fn new(input: &str) -> AptosResult<Self> {
        Ok(Self {
            tokens: tokenize(input)?,
            pos: 0,
        })
    }

    fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.pos)
    }

    fn shift(&mut self) -> Option<Token> {
        let token = self.tokens.get(self.pos).cloned();
        if token.is_some() {
            self.pos += 1;
        }
        token
    }

    fn consume(&mut self, expected: &Token) -> AptosResult<()> {
        match self.shift() {
            Some(token) if &token == expected => Ok(()),
            Some(token) => Err(AptosError::Parse(format!(
                "expected '{}', found '{}'",
                expected.describe(),
                token.describe()
            ))),
            None => Err(AptosError::Parse(format!(
                "expected '{}', found end of input",
                expected.describe()
            ))),
        }
    }

    /// Parses a comma-separated list of type tags up to (not including)
    /// `end`. Exactly one trailing comma is tolerated before the closing
    /// token.
    fn parse_comma_list(&mut self, end: &Token, allow_trailing_comma: bool) -> AptosResult<Vec<TypeTag>> {
        if self.peek().is_none() {
            return Err(AptosError::Parse("unterminated type argument list".into()));
        }
        let mut res = Vec::new();

        while self.peek() != Some(end) {
            res.push(self.parse_type_tag()?);

            if self.peek() == Some(end) {
                break;
            }
            self.consume(&Token::Comma)?;
            if self.peek() == Some(end) && allow_trailing_comma {
                break;
            }
            if self.peek().is_none() {
                return Err(AptosError::Parse("unterminated type argument list".into()));
            }
        }

        Ok(res)
    }

    fn parse_type_tag(&mut self) -> AptosResult<TypeTag> {
        let Some(token) = self.shift() else {
            return Err(AptosError::Parse("empty type tag".into()));
        };

        if let Token::Ident(ident) = &token {
            match ident.as_str() {
                "bool" => return Ok(TypeTag::Bool),
                "u8" => return Ok(TypeTag::U8),
                "u64" => return Ok(TypeTag::U64),
                "u128" => return Ok(TypeTag::U128),
                "address" => return Ok(TypeTag::Address),
                "vector" => {
                    self.consume(&Token::Lt)?;
                    let inner = self.parse_type_tag()?;
                    self.consume(&Token::Gt)?;
                    return Ok(TypeTag::Vector(Box::new(inner)));
                }
                _ => {}
            }

            if ident.starts_with("0x") || ident.starts_with("0X") {
                let address = AccountAddress::from_hex(ident)?;

                self.consume(&Token::ColonColon)?;
                let module = self.shift_ident()?;
                self.consume(&Token::ColonColon)?;
                let name = self.shift_ident()?;

                let mut type_args = Vec::new();
                if self.peek() == Some(&Token::Lt) {
                    self.consume(&Token::Lt)?;
                    type_args = self.parse_comma_list(&Token::Gt, true)?;
                    self.consume(&Token::Gt)?;
                }

                return Ok(TypeTag::Struct(Box::new(StructTag {
                    address,
                    module,
                    name,
                    type_args,
                })));
            }
        }

        Err(AptosError::Parse(format!(
            "invalid type tag at '{}'",
            token.describe()
        )))
    }

    fn shift_ident(&mut self) -> AptosResult<Identifier> {
        match self.shift() {
            Some(Token::Ident(s)) => Identifier::new(s),
            Some(token) => Err(AptosError::Parse(format!(
                "expected identifier, found '{}'",
                token.describe()
            ))),
            None => Err(AptosError::Parse(
                "expected identifier, found end of input".into(),
            )),
        }
    }

    fn expect_end(&self) -> AptosResult<()> {
        if let Some(token) = self.peek() {
            return Err(AptosError::Parse(format!(
                "unexpected trailing token '{}'",
                token.describe()
            )));
        }
        Ok(())
    }
}

/// Parses a textual Move type signature into a [`TypeTag`].
///
/// The whole input must form a single type tag; stray trailing tokens
/// (e.g. `u64<u8>`) are a parse error.
///
/// # Example
///
/// ```rust
/// use aptos_transaction_builder::types::{parse_type_tag, TypeTag};
///
/// assert_eq!(parse_type_tag("u64").unwrap(), TypeTag::U64);
/// let tag = parse_type_tag("vector<0x1::aptos_coin::AptosCoin>").unwrap();
/// assert!(matches!(tag, TypeTag::Vector(_)));
/// ```
pub fn parse_type_tag(input: &str) -> AptosResult<TypeTag> {
    let mut parser = TypeTagParser::new(input)?;
    let tag = parser.parse_type_tag()?;
    parser.expect_end()?;
    Ok(tag)
}
