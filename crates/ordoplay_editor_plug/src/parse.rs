// SPDX-License-Identifier: MIT OR Apache-2.0
//! Reconstruction of plugs from their constructor expressions.
//!
//! Accepts the output of [`crate::repr::ReprGenerator`] and any hand-written
//! expression following the same contract: a class path, then a parenthesised
//! argument list holding an optional positional name followed by keyword
//! arguments in any order. A trailing comma is allowed. Omitted arguments
//! take the constructor defaults.

use crate::any::AnyPlug;
use crate::class_path::{strip_module, ClassPathResolver, PlugKind};
use crate::config::SerialisationConfig;
use crate::plug::{CompoundNumericPlug, PlugError, PlugOptions};
use crate::serialiser::PlugSerialiser;
use crate::value::{Color3f, Color4f, Component, CompoundValue, V2f, V2i, V3f, V3i};
use std::collections::HashSet;

/// Token kinds
#[derive(Debug, Clone, PartialEq)]
enum TokenKind {
    /// Possibly dotted identifier
    Ident(String),
    /// Unescaped string literal
    Str(String),
    /// Numeric literal, validated later against the component type
    Number(String),
    LParen,
    RParen,
    Comma,
    Eq,
    Pipe,
    Eof,
}

#[derive(Debug, Clone, PartialEq)]
struct Token {
    kind: TokenKind,
    position: usize,
}

impl TokenKind {
    fn describe(&self) -> String {
        match self {
            TokenKind::Ident(s) => format!("identifier `{s}`"),
            TokenKind::Str(s) => format!("string {s:?}"),
            TokenKind::Number(s) => format!("number `{s}`"),
            TokenKind::LParen => "`(`".to_string(),
            TokenKind::RParen => "`)`".to_string(),
            TokenKind::Comma => "`,`".to_string(),
            TokenKind::Eq => "`=`".to_string(),
            TokenKind::Pipe => "`|`".to_string(),
            TokenKind::Eof => "end of input".to_string(),
        }
    }
}

fn tokenize(input: &str) -> Result<Vec<Token>, ParseError> {
    let mut tokens = Vec::new();
    let mut chars = input.char_indices().peekable();

    while let Some(&(pos, ch)) = chars.peek() {
        let kind = match ch {
            c if c.is_whitespace() => {
                chars.next();
                continue;
            }
            '(' => {
                chars.next();
                TokenKind::LParen
            }
            ')' => {
                chars.next();
                TokenKind::RParen
            }
            ',' => {
                chars.next();
                TokenKind::Comma
            }
            '=' => {
                chars.next();
                TokenKind::Eq
            }
            '|' => {
                chars.next();
                TokenKind::Pipe
            }

            '"' => {
                chars.next(); // opening quote
                let mut s = String::new();
                loop {
                    match chars.next() {
                        Some((_, '\\')) => match chars.next() {
                            Some((_, 'n')) => s.push('\n'),
                            Some((_, 't')) => s.push('\t'),
                            Some((_, c)) => s.push(c),
                            None => return Err(ParseError::UnterminatedString { position: pos }),
                        },
                        Some((_, '"')) => break,
                        Some((_, c)) => s.push(c),
                        None => return Err(ParseError::UnterminatedString { position: pos }),
                    }
                }
                TokenKind::Str(s)
            }

            c if c.is_ascii_digit() || c == '-' || c == '+' || c == '.' => {
                let mut num = String::new();
                num.push(c);
                chars.next();
                while let Some(&(_, c)) = chars.peek() {
                    let after_exponent = matches!(num.chars().last(), Some('e' | 'E'));
                    if c.is_ascii_digit()
                        || c == '.'
                        || c == 'e'
                        || c == 'E'
                        || ((c == '-' || c == '+') && after_exponent)
                    {
                        num.push(c);
                        chars.next();
                    } else {
                        break;
                    }
                }
                TokenKind::Number(num)
            }

            c if c.is_alphabetic() || c == '_' => {
                let mut ident = String::new();
                while let Some(&(_, c)) = chars.peek() {
                    if c.is_alphanumeric() || c == '_' || c == '.' {
                        ident.push(c);
                        chars.next();
                    } else {
                        break;
                    }
                }
                TokenKind::Ident(ident)
            }

            c => return Err(ParseError::UnexpectedChar { position: pos, found: c }),
        };
        tokens.push(Token { kind, position: pos });
    }

    tokens.push(Token { kind: TokenKind::Eof, position: input.len() });
    Ok(tokens)
}

/// Right-hand side of an argument
#[derive(Debug, Clone, PartialEq)]
enum ArgValue {
    Str(String),
    /// `V3f( 1, 2, 3 )`
    Literal { type_name: String, components: Vec<(String, usize)> },
    /// `Out`, or `Dynamic | ReadOnly`
    Symbols(Vec<String>),
}

#[derive(Debug, Clone, PartialEq)]
struct Argument {
    keyword: Option<String>,
    value: ArgValue,
    position: usize,
}

struct Parser {
    tokens: Vec<Token>,
    pos: usize,
}

impl Parser {
    fn peek(&self) -> &Token {
        // The token list always ends with Eof, and `advance` never passes it
        &self.tokens[self.pos.min(self.tokens.len() - 1)]
    }

    fn advance(&mut self) -> Token {
        let token = self.peek().clone();
        if token.kind != TokenKind::Eof {
            self.pos += 1;
        }
        token
    }

    fn unexpected(token: &Token, expected: &'static str) -> ParseError {
        ParseError::UnexpectedToken {
            position: token.position,
            expected,
            found: token.kind.describe(),
        }
    }

    fn expect(&mut self, kind: TokenKind, expected: &'static str) -> Result<Token, ParseError> {
        let token = self.advance();
        if token.kind == kind {
            Ok(token)
        } else {
            Err(Self::unexpected(&token, expected))
        }
    }

    fn expect_ident(&mut self, expected: &'static str) -> Result<(String, usize), ParseError> {
        let token = self.advance();
        match token.kind {
            TokenKind::Ident(name) => Ok((name, token.position)),
            _ => Err(Self::unexpected(&token, expected)),
        }
    }

    /// `ClassPath ( args )` followed by end of input
    fn call(&mut self) -> Result<(String, usize, Vec<Argument>), ParseError> {
        let (class_path, position) = self.expect_ident("class path")?;
        self.expect(TokenKind::LParen, "`(`")?;

        let mut arguments = Vec::new();
        loop {
            if self.peek().kind == TokenKind::RParen {
                self.advance();
                break;
            }
            arguments.push(self.argument()?);

            let token = self.advance();
            match token.kind {
                TokenKind::Comma => {}
                TokenKind::RParen => break,
                _ => return Err(Self::unexpected(&token, "`,` or `)`")),
            }
        }

        self.expect(TokenKind::Eof, "end of input")?;
        Ok((class_path, position, arguments))
    }

    fn argument(&mut self) -> Result<Argument, ParseError> {
        let position = self.peek().position;
        let keyword = match (&self.peek().kind, self.tokens.get(self.pos + 1).map(|t| &t.kind)) {
            (TokenKind::Ident(name), Some(TokenKind::Eq)) => {
                let name = name.clone();
                self.pos += 2;
                Some(name)
            }
            _ => None,
        };
        let value = self.value()?;
        Ok(Argument { keyword, value, position })
    }

    fn value(&mut self) -> Result<ArgValue, ParseError> {
        let token = self.advance();
        match token.kind {
            TokenKind::Str(s) => Ok(ArgValue::Str(s)),
            TokenKind::Ident(name) if self.peek().kind == TokenKind::LParen => {
                self.advance();
                let mut components = Vec::new();
                loop {
                    let token = self.advance();
                    match token.kind {
                        TokenKind::Number(text) => components.push((text, token.position)),
                        TokenKind::RParen if components.is_empty() => break,
                        _ => return Err(Self::unexpected(&token, "number")),
                    }
                    let token = self.advance();
                    match token.kind {
                        TokenKind::Comma if self.peek().kind == TokenKind::RParen => {
                            self.advance();
                            break;
                        }
                        TokenKind::Comma => {}
                        TokenKind::RParen => break,
                        _ => return Err(Self::unexpected(&token, "`,` or `)`")),
                    }
                }
                Ok(ArgValue::Literal { type_name: name, components })
            }
            TokenKind::Ident(name) => {
                let mut symbols = vec![name];
                while self.peek().kind == TokenKind::Pipe {
                    self.advance();
                    symbols.push(self.expect_ident("identifier")?.0);
                }
                Ok(ArgValue::Symbols(symbols))
            }
            _ => Err(Self::unexpected(&token, "value")),
        }
    }
}

/// Rebuilds plugs from constructor expressions
#[derive(Debug, Clone, Default)]
pub struct PlugParser {
    resolver: ClassPathResolver,
    value_module: Option<String>,
}

impl PlugParser {
    /// Parser accepting bare class paths and literal names
    pub fn new() -> Self {
        Self::default()
    }

    /// Parser accepting the module prefixes from `config`
    pub fn from_config(config: &SerialisationConfig) -> Self {
        Self {
            resolver: config.class_path_resolver(),
            value_module: config.value_module.clone(),
        }
    }

    /// Parse an expression into a plug of whichever kind it names
    pub fn parse(&self, text: &str) -> Result<AnyPlug, ParseError> {
        let tokens = tokenize(text)?;
        let (class_path, position, arguments) = Parser { tokens, pos: 0 }.call()?;
        let kind = self
            .resolver
            .resolve(&class_path)
            .ok_or(ParseError::UnknownClass { position, class_path })?;

        tracing::trace!(?kind, arguments = arguments.len(), "parsing plug expression");

        Ok(match kind {
            PlugKind::V2f => self.build::<V2f>(arguments)?.into(),
            PlugKind::V3f => self.build::<V3f>(arguments)?.into(),
            PlugKind::V2i => self.build::<V2i>(arguments)?.into(),
            PlugKind::V3i => self.build::<V3i>(arguments)?.into(),
            PlugKind::Color3f => self.build::<Color3f>(arguments)?.into(),
            PlugKind::Color4f => self.build::<Color4f>(arguments)?.into(),
        })
    }

    /// Parse an expression that must name a plug holding `V`
    pub fn parse_as<V: CompoundValue>(
        &self,
        text: &str,
    ) -> Result<CompoundNumericPlug<V>, ParseError> {
        let plug = self.parse(text)?;
        let found = plug.kind();
        match plug.downcast_ref::<V>() {
            Some(typed) => Ok(typed.clone()),
            None => Err(ParseError::KindMismatch { expected: V::KIND, found }),
        }
    }

    fn build<V: CompoundValue>(
        &self,
        arguments: Vec<Argument>,
    ) -> Result<CompoundNumericPlug<V>, ParseError> {
        let mut options = PlugOptions::<V>::default();
        let mut seen = HashSet::new();

        for (index, argument) in arguments.into_iter().enumerate() {
            let position = argument.position;
            let keyword = match argument.keyword {
                Some(keyword) => keyword,
                None if index == 0 => "name".to_string(),
                None => return Err(ParseError::MisplacedPositional { position }),
            };
            if !seen.insert(keyword.clone()) {
                return Err(ParseError::DuplicateKeyword { position, keyword });
            }

            match (keyword.as_str(), argument.value) {
                ("name", ArgValue::Str(name)) => options.name = Some(name),
                ("direction", ArgValue::Symbols(symbols)) if symbols.len() == 1 => {
                    options.direction = PlugSerialiser::parse_direction(&symbols[0])
                        .ok_or_else(|| ParseError::UnknownDirection {
                            position,
                            token: symbols[0].clone(),
                        })?;
                }
                ("defaultValue", ArgValue::Literal { type_name, components }) => {
                    options.default_value = self.literal(position, &type_name, &components)?;
                }
                ("minValue", ArgValue::Literal { type_name, components }) => {
                    options.min_value = self.literal(position, &type_name, &components)?;
                }
                ("maxValue", ArgValue::Literal { type_name, components }) => {
                    options.max_value = self.literal(position, &type_name, &components)?;
                }
                ("flags", ArgValue::Symbols(symbols)) => {
                    let tokens: Vec<&str> = symbols.iter().map(String::as_str).collect();
                    options.flags = PlugSerialiser::parse_flags(&tokens).map_err(|token| {
                        ParseError::UnknownFlag { position, token: token.to_string() }
                    })?;
                }
                ("name" | "direction" | "defaultValue" | "minValue" | "maxValue" | "flags", _) => {
                    return Err(ParseError::InvalidArgument { position, keyword: keyword.clone() });
                }
                _ => return Err(ParseError::UnknownKeyword { position, keyword: keyword.clone() }),
            }
        }

        Ok(CompoundNumericPlug::new(options)?)
    }

    fn literal<V: CompoundValue>(
        &self,
        position: usize,
        type_name: &str,
        components: &[(String, usize)],
    ) -> Result<V, ParseError> {
        let expected = V::KIND.value_type_name();
        if strip_module(self.value_module.as_deref(), type_name) != Some(expected) {
            return Err(ParseError::LiteralType {
                position,
                expected,
                found: type_name.to_string(),
            });
        }
        if components.len() != V::ARITY {
            return Err(ParseError::Arity {
                position,
                expected: V::ARITY,
                found: components.len(),
            });
        }

        let mut parsed = Vec::with_capacity(components.len());
        for (text, position) in components {
            // Out-of-range float text parses to infinity, which has no literal form
            match text.parse::<V::Base>() {
                Ok(component) if component.is_finite() => parsed.push(component),
                _ => {
                    return Err(ParseError::InvalidNumber {
                        position: *position,
                        text: text.clone(),
                    });
                }
            }
        }
        V::from_components(&parsed).ok_or(ParseError::Arity {
            position,
            expected: V::ARITY,
            found: parsed.len(),
        })
    }
}

/// Error while parsing a plug expression
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ParseError {
    /// Character outside the expression grammar
    #[error("Unexpected character {found:?} at {position}")]
    UnexpectedChar {
        /// Byte offset
        position: usize,
        /// Offending character
        found: char,
    },

    /// String literal without closing quote
    #[error("Unterminated string literal at {position}")]
    UnterminatedString {
        /// Byte offset of the opening quote
        position: usize,
    },

    /// Token out of place
    #[error("Expected {expected} at {position}, found {found}")]
    UnexpectedToken {
        /// Byte offset
        position: usize,
        /// What the parser wanted
        expected: &'static str,
        /// What it got
        found: String,
    },

    /// Class path names no known plug type
    #[error("Unknown plug class {class_path:?} at {position}")]
    UnknownClass {
        /// Byte offset
        position: usize,
        /// Class path as written
        class_path: String,
    },

    /// Keyword not accepted by the constructor
    #[error("Unknown keyword argument {keyword:?} at {position}")]
    UnknownKeyword {
        /// Byte offset
        position: usize,
        /// Keyword as written
        keyword: String,
    },

    /// Keyword given twice
    #[error("Duplicate keyword argument {keyword:?} at {position}")]
    DuplicateKeyword {
        /// Byte offset
        position: usize,
        /// Keyword as written
        keyword: String,
    },

    /// Positional argument after the first
    #[error("Positional argument at {position} must come first")]
    MisplacedPositional {
        /// Byte offset
        position: usize,
    },

    /// Keyword given the wrong sort of value
    #[error("Invalid value for {keyword:?} at {position}")]
    InvalidArgument {
        /// Byte offset
        position: usize,
        /// Keyword as written
        keyword: String,
    },

    /// Value literal of the wrong type for the plug
    #[error("Expected {expected} literal at {position}, found {found:?}")]
    LiteralType {
        /// Byte offset
        position: usize,
        /// Literal type the plug holds
        expected: &'static str,
        /// Literal type as written
        found: String,
    },

    /// Value literal with the wrong number of components
    #[error("Expected {expected} components at {position}, found {found}")]
    Arity {
        /// Byte offset
        position: usize,
        /// Plug value arity
        expected: usize,
        /// Components given
        found: usize,
    },

    /// Component that does not parse as the plug's base type
    #[error("Invalid number {text:?} at {position}")]
    InvalidNumber {
        /// Byte offset
        position: usize,
        /// Number as written
        text: String,
    },

    /// Unknown direction token
    #[error("Unknown direction {token:?} at {position}")]
    UnknownDirection {
        /// Byte offset
        position: usize,
        /// Token as written
        token: String,
    },

    /// Unknown flag token
    #[error("Unknown flag {token:?} at {position}")]
    UnknownFlag {
        /// Byte offset
        position: usize,
        /// Token as written
        token: String,
    },

    /// Expression names a different plug kind than requested
    #[error("Expected a {expected:?} plug, found {found:?}")]
    KindMismatch {
        /// Requested kind
        expected: PlugKind,
        /// Kind named by the expression
        found: PlugKind,
    },

    /// The arguments describe an invalid plug
    #[error(transparent)]
    Plug(#[from] PlugError),
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::flags::PlugFlag;
    use crate::plug::Direction;

    #[test]
    fn test_tokenize() {
        let tokens = tokenize("V2iPlug( \"a\\\"b\", x = -1.5e-3 | )").unwrap();
        let kinds: Vec<TokenKind> = tokens.into_iter().map(|t| t.kind).collect();
        assert_eq!(
            kinds,
            vec![
                TokenKind::Ident("V2iPlug".to_string()),
                TokenKind::LParen,
                TokenKind::Str("a\"b".to_string()),
                TokenKind::Comma,
                TokenKind::Ident("x".to_string()),
                TokenKind::Eq,
                TokenKind::Number("-1.5e-3".to_string()),
                TokenKind::Pipe,
                TokenKind::RParen,
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn test_tokenize_errors() {
        assert_eq!(
            tokenize("V2iPlug( \"open").unwrap_err(),
            ParseError::UnterminatedString { position: 9 }
        );
        assert_eq!(
            tokenize("V2iPlug[").unwrap_err(),
            ParseError::UnexpectedChar { position: 7, found: '[' }
        );
    }

    #[test]
    fn test_parse_minimal() {
        let plug = PlugParser::new().parse("V3fPlug( \"translate\", )").unwrap();
        assert_eq!(plug.kind(), PlugKind::V3f);
        assert_eq!(plug.name(), "translate");
        assert_eq!(plug.direction(), Direction::In);
        let plug = plug.downcast_ref::<V3f>().unwrap();
        assert!(!plug.has_min_value());
        assert!(!plug.has_max_value());
        assert_eq!(plug.default_value(), V3f::zero());
    }

    #[test]
    fn test_parse_without_trailing_comma_or_name() {
        let plug = PlugParser::new().parse("Color4fPlug()").unwrap();
        assert_eq!(plug.name(), "Color4fPlug");

        let plug = PlugParser::new().parse("V2iPlug( \"p\" )").unwrap();
        assert_eq!(plug.name(), "p");
    }

    #[test]
    fn test_parse_full() {
        let plug = PlugParser::new()
            .parse_as::<V2i>(
                "V2iPlug( \"tile\", direction = Out, defaultValue = V2i( 1, 1 ), \
                 minValue = V2i( 0, 0 ), maxValue = V2i( 64, 64 ), flags = Dynamic | ReadOnly, )",
            )
            .unwrap();
        assert_eq!(plug.name(), "tile");
        assert_eq!(plug.direction(), Direction::Out);
        assert_eq!(plug.default_value(), V2i::new([1, 1]));
        assert_eq!(plug.min_value(), V2i::new([0, 0]));
        assert_eq!(plug.max_value(), V2i::new([64, 64]));
        assert_eq!(plug.flags(), PlugFlag::Dynamic | PlugFlag::ReadOnly);
    }

    #[test]
    fn test_keywords_in_any_order() {
        let plug = PlugParser::new()
            .parse_as::<V3f>(
                "V3fPlug( flags = Default, defaultValue = V3f( 1, 2, 3, ), name = \"p\" )",
            )
            .unwrap();
        assert_eq!(plug.name(), "p");
        assert_eq!(plug.default_value(), V3f::new([1.0, 2.0, 3.0]));
        assert!(plug.flags().is_default());
    }

    #[test]
    fn test_qualified_names() {
        let config = SerialisationConfig {
            plug_module: Some("Gaffer".to_string()),
            value_module: Some("IECore".to_string()),
        };
        let parser = PlugParser::from_config(&config);
        let plug = parser
            .parse_as::<Color3f>(
                "Gaffer.Color3fPlug( \"c\", maxValue = IECore.Color3f( 1, 1, 1 ), )",
            )
            .unwrap();
        assert_eq!(plug.max_value(), Color3f::new([1.0, 1.0, 1.0]));

        assert!(matches!(
            PlugParser::new().parse("Gaffer.Color3fPlug( \"c\" )"),
            Err(ParseError::UnknownClass { .. })
        ));
    }

    #[test]
    fn test_rejects_bad_literals() {
        let parser = PlugParser::new();
        assert!(matches!(
            parser.parse("V2iPlug( \"p\", defaultValue = V2f( 1, 1 ) )"),
            Err(ParseError::LiteralType { expected: "V2i", .. })
        ));
        assert!(matches!(
            parser.parse("V2iPlug( \"p\", defaultValue = V2i( 1, 1, 1 ) )"),
            Err(ParseError::Arity { expected: 2, found: 3, .. })
        ));
        assert!(matches!(
            parser.parse("V2iPlug( \"p\", defaultValue = V2i( 1.5, 1 ) )"),
            Err(ParseError::InvalidNumber { .. })
        ));    }

    #[test]
    fn test_rejects_literals_overflowing_to_infinity() {
        let parser = PlugParser::new();
        let err = parser
            .parse("V3fPlug( \"p\", maxValue = V3f( 1e39, 1, 1 ), )")
            .unwrap_err();
        assert_eq!(
            err,
            ParseError::InvalidNumber { position: 30, text: "1e39".to_string() }
        );
        assert!(matches!(
            parser.parse("V2fPlug( \"p\", minValue = V2f( 0, -3.5e38 ), )"),
            Err(ParseError::InvalidNumber { ref text, .. }) if text == "-3.5e38"
        ));

        // The largest finite values still parse
        let plug = parser
            .parse_as::<V2f>("V2fPlug( \"p\", maxValue = V2f( 3.4028235e38, 1e-45 ), )")
            .unwrap();
        assert_eq!(plug.max_value(), V2f::new([f32::MAX, 1e-45]));
    }

    #[test]
    fn test_rejects_bad_arguments() {
        let parser = PlugParser::new();
        assert!(matches!(
            parser.parse("V2iPlug( \"p\", colour = Out )"),
            Err(ParseError::UnknownKeyword { .. })
        ));
        assert!(matches!(
            parser.parse("V2iPlug( \"p\", direction = Out, direction = InOut )"),
            Err(ParseError::DuplicateKeyword { .. })
        ));
        assert!(matches!(
            parser.parse("V2iPlug( direction = Out, \"p\" )"),
            Err(ParseError::MisplacedPositional { .. })
        ));
        assert!(matches!(
            parser.parse("V2iPlug( \"p\", direction = Up )"),
            Err(ParseError::UnknownDirection { .. })
        ));
        assert!(matches!(
            parser.parse("V2iPlug( \"p\", flags = Dynamic | Sticky )"),
            Err(ParseError::UnknownFlag { ref token, .. }) if token == "Sticky"
        ));
        assert!(matches!(
            parser.parse("V2iPlug( \"p\", direction = \"Out\" )"),
            Err(ParseError::InvalidArgument { .. })
        ));
        assert!(matches!(
            parser.parse("V2iPlug( \"p\" ) trailing"),
            Err(ParseError::UnexpectedToken { expected: "end of input", .. })
        ));
    }

    #[test]
    fn test_invalid_bounds_surface_as_plug_errors() {
        let err = PlugParser::new()
            .parse("V2iPlug( \"p\", minValue = V2i( 5, 0 ), maxValue = V2i( 4, 10 ), )")
            .unwrap_err();
        assert!(matches!(err, ParseError::Plug(PlugError::InvalidBounds { .. })));
    }

    #[test]
    fn test_parse_as_kind_mismatch() {
        let err = PlugParser::new().parse_as::<V3i>("V3fPlug( \"p\" )").unwrap_err();
        assert_eq!(
            err,
            ParseError::KindMismatch { expected: PlugKind::V3i, found: PlugKind::V3f }
        );
    }
}
