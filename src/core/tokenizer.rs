//! Markup Tokenizer - expectation-driven state machine
//!
//! The tokenizer does not sit in a single state. After every lexeme it holds a
//! small set of expectations (a primary one plus up to two alternates) and the
//! next lexeme must satisfy at least one of them. This captures the local
//! ambiguity of the grammar: right after a tag name an attribute, a `>` and a
//! self-closing `/` are all valid.
//!
//! Token production:
//! - `<name ...>` emits `TagOpen` (attributes attached once `>` or `/` is seen)
//! - `</name>` emits `TagClose` with value `/name`
//! - `<name/>` emits `TagOpen` followed by a synthetic `TagClose` with value `/`
//! - text between tags is trimmed and emitted as `Text`
//! - a leading declaration and DOCTYPE become `Meta`

use super::attributes::{Attribute, AttributeSet, Redefinition};
use super::error::{ParseError, ParseWarning};
use super::options::ParseOptions;
use super::scanner::{is_whitespace, Scanner};

const LOG_TARGET: &str = "xmlquery.tokenizer";

/// Type of token
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
    /// Opening tag: `<name attr="v">`
    TagOpen,
    /// Closing tag `</name>` or the close half of `<name/>`
    TagClose,
    /// Text content between tags
    Text,
    /// Leading declaration or DOCTYPE line
    Meta,
    /// Synthetic tree root; never produced by the tokenizer
    Document,
}

/// A token in document order
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    /// Tag name, `/`-prefixed close value, or literal text
    pub value: String,
    /// Only populated for `TagOpen`
    pub attributes: AttributeSet,
}

impl Token {
    pub fn new(kind: TokenKind, value: impl Into<String>) -> Self {
        Token {
            kind,
            value: value.into(),
            attributes: AttributeSet::new(),
        }
    }

    /// Token carried by the synthetic root node
    pub fn document() -> Self {
        Token::new(TokenKind::Document, "")
    }

    #[inline]
    pub fn is_open(&self) -> bool {
        self.kind == TokenKind::TagOpen
    }

    #[inline]
    pub fn is_close(&self) -> bool {
        self.kind == TokenKind::TagClose
    }
}

/// Output of a completed tokenization
#[derive(Debug, Clone, Default)]
pub struct TokenStream {
    pub tokens: Vec<Token>,
    pub warnings: Vec<ParseWarning>,
}

/// What the tokenizer is prepared to see next
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Expectation {
    LessThan,
    GreaterThan,
    NodeName,
    NodeClosingName,
    NodeValue,
    AttributeName,
    Equals,
    OpenQuote,
    AttributeValue,
    CloseQuote,
    ClosingSlash,
    SelfClosingSlash,
}

impl Expectation {
    fn accepts(self, kind: LexemeKind) -> bool {
        use Expectation::*;
        matches!(
            (self, kind),
            (LessThan, LexemeKind::LessThan)
                | (GreaterThan, LexemeKind::GreaterThan)
                | (NodeName | NodeClosingName | AttributeName, LexemeKind::Name)
                | (NodeValue, LexemeKind::Text)
                | (Equals, LexemeKind::Equals)
                | (OpenQuote | CloseQuote, LexemeKind::Quote)
                | (AttributeValue, LexemeKind::Quoted)
                | (ClosingSlash | SelfClosingSlash, LexemeKind::Slash)
        )
    }

    fn describe(self) -> &'static str {
        match self {
            Expectation::LessThan => "'<'",
            Expectation::GreaterThan => "'>'",
            Expectation::NodeName => "tag name",
            Expectation::NodeClosingName => "closing tag name",
            Expectation::NodeValue => "text",
            Expectation::AttributeName => "attribute name",
            Expectation::Equals => "'='",
            Expectation::OpenQuote => "opening '\"'",
            Expectation::AttributeValue => "attribute value",
            Expectation::CloseQuote => "closing '\"'",
            Expectation::ClosingSlash => "'/'",
            Expectation::SelfClosingSlash => "'/'",
        }
    }
}

/// Primary expectation plus up to two alternates
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Expectations {
    primary: Expectation,
    alternates: [Option<Expectation>; 2],
}

impl Expectations {
    pub const fn one(primary: Expectation) -> Self {
        Expectations {
            primary,
            alternates: [None, None],
        }
    }

    pub const fn two(primary: Expectation, alternate: Expectation) -> Self {
        Expectations {
            primary,
            alternates: [Some(alternate), None],
        }
    }

    pub const fn three(primary: Expectation, first: Expectation, second: Expectation) -> Self {
        Expectations {
            primary,
            alternates: [Some(first), Some(second)],
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = Expectation> + '_ {
        std::iter::once(self.primary).chain(self.alternates.iter().flatten().copied())
    }

    pub fn contains(&self, expectation: Expectation) -> bool {
        self.iter().any(|e| e == expectation)
    }

    /// First active expectation (primary before alternates) accepting the lexeme
    fn resolve(&self, kind: LexemeKind) -> Option<Expectation> {
        self.iter().find(|e| e.accepts(kind))
    }

    fn describe(&self) -> String {
        let parts: Vec<&str> = self.iter().map(Expectation::describe).collect();
        match parts.split_last() {
            Some((last, rest)) if !rest.is_empty() => format!("{} or {}", rest.join(", "), last),
            Some((last, _)) => (*last).to_string(),
            None => String::new(),
        }
    }
}

const DOCUMENT_START: Expectations = Expectations::two(Expectation::LessThan, Expectation::NodeValue);
const AFTER_LESS_THAN: Expectations = Expectations::two(Expectation::NodeName, Expectation::ClosingSlash);
const INSIDE_TAG: Expectations = Expectations::three(
    Expectation::AttributeName,
    Expectation::GreaterThan,
    Expectation::SelfClosingSlash,
);
const AFTER_TAG: Expectations = Expectations::two(Expectation::NodeValue, Expectation::LessThan);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum LexemeKind {
    LessThan,
    GreaterThan,
    Slash,
    Equals,
    Quote,
    Name,
    Quoted,
    Text,
}

#[derive(Debug, Clone, Copy)]
struct Lexeme<'a> {
    kind: LexemeKind,
    text: &'a str,
    offset: usize,
}

/// Attribute being read inside the current tag
#[derive(Debug)]
struct PendingAttribute<'a> {
    name: &'a str,
    offset: usize,
    value: &'a str,
    complete: bool,
}

/// Markup tokenizer
pub struct Tokenizer<'a> {
    scanner: Scanner<'a>,
    options: ParseOptions,
    expecting: Expectations,
    tokens: Vec<Token>,
    pending_text: Option<&'a str>,
    /// Index of the `TagOpen` whose attributes are still being read
    open_tag: Option<usize>,
    attributes: AttributeSet,
    attribute: Option<PendingAttribute<'a>>,
    /// Offset of the `<` of the tag currently being read
    tag_start: Option<usize>,
    tag_name: &'a str,
    opened: usize,
    closed: usize,
    /// Names of open scopes, tracked in strict mode only
    open_names: Vec<&'a str>,
}

impl<'a> Tokenizer<'a> {
    /// Create a new tokenizer for the given input (lenient mode)
    pub fn new(input: &'a str) -> Self {
        Self::with_options(input, ParseOptions::new())
    }

    /// Create a new tokenizer in strict mode
    pub fn new_strict(input: &'a str) -> Self {
        Self::with_options(input, ParseOptions::strict())
    }

    pub fn with_options(input: &'a str, options: ParseOptions) -> Self {
        Tokenizer {
            scanner: Scanner::new(input),
            options,
            expecting: DOCUMENT_START,
            tokens: Vec::new(),
            pending_text: None,
            open_tag: None,
            attributes: AttributeSet::new(),
            attribute: None,
            tag_start: None,
            tag_name: "",
            opened: 0,
            closed: 0,
            open_names: Vec::new(),
        }
    }

    /// Run the state machine over the whole input
    pub fn tokenize(mut self) -> Result<TokenStream, ParseError> {
        if self.options.detect_prolog {
            self.read_prolog();
        }

        while let Some(lexeme) = self.next_lexeme() {
            let expectation = match self.expecting.resolve(lexeme.kind) {
                Some(expectation) => expectation,
                None => return Err(self.malformed(&lexeme)),
            };
            self.expecting = self.step(expectation, lexeme)?;
        }

        self.finish()
    }

    /// Consume a leading declaration and DOCTYPE as `Meta` tokens.
    /// Anything else is rewound and left to the main grammar.
    fn read_prolog(&mut self) {
        let start = self.scanner.position();
        self.scanner.skip_whitespace();
        let decl_start = self.scanner.position();
        match self.scanner.find_byte(b'>') {
            Some(end) if self.scanner.starts_with(b"<?") => {
                let text = self.scanner.slice(decl_start, end + 1);
                self.emit(Token::new(TokenKind::Meta, text));
                self.scanner.set_position(end + 1);
            }
            _ => self.scanner.set_position(start),
        }

        let start = self.scanner.position();
        self.scanner.skip_whitespace();
        let doctype_start = self.scanner.position();
        if self.scanner.starts_with(b"<!") {
            let end = match (self.scanner.find_byte(b'['), self.scanner.find_byte(b'>')) {
                (Some(bracket), Some(gt)) if bracket < gt => {
                    self.scanner.find_sequence(b"]>").map(|i| i + 1)
                }
                (_, gt) => gt,
            };
            if let Some(end) = end {
                let text = self.scanner.slice(doctype_start, end + 1);
                if text.contains("DOCTYPE") {
                    self.emit(Token::new(TokenKind::Meta, text));
                    self.scanner.set_position(end + 1);
                    return;
                }
            }
        }
        self.scanner.set_position(start);
    }

    /// Cut the next lexeme. How the input is cut depends on what is expected:
    /// inside quotes whitespace is content, between tags text runs up to `<`.
    fn next_lexeme(&mut self) -> Option<Lexeme<'a>> {
        if self.expecting.contains(Expectation::AttributeValue) {
            let offset = self.scanner.position();
            return match self.scanner.peek()? {
                b'"' | b'<' => Some(self.single(offset)),
                _ => {
                    let text = self.scanner.read_quoted();
                    Some(Lexeme { kind: LexemeKind::Quoted, text, offset })
                }
            };
        }

        if self.expecting.contains(Expectation::NodeValue) {
            let start = self.scanner.position();
            let raw = self.scanner.read_text();
            let leading = raw.len() - raw.trim_start_matches(is_whitespace_char).len();
            let text = raw.trim_matches(is_whitespace_char);
            if !text.is_empty() {
                return Some(Lexeme {
                    kind: LexemeKind::Text,
                    text,
                    offset: start + leading,
                });
            }
        }

        self.scanner.skip_whitespace();
        let offset = self.scanner.position();
        match self.scanner.peek()? {
            b'<' | b'>' | b'/' | b'=' | b'"' => Some(self.single(offset)),
            _ => {
                let text = self.scanner.read_name();
                Some(Lexeme { kind: LexemeKind::Name, text, offset })
            }
        }
    }

    /// One-byte structural lexeme at the current position
    fn single(&mut self, offset: usize) -> Lexeme<'a> {
        let kind = match self.scanner.peek() {
            Some(b'<') => LexemeKind::LessThan,
            Some(b'>') => LexemeKind::GreaterThan,
            Some(b'/') => LexemeKind::Slash,
            Some(b'=') => LexemeKind::Equals,
            Some(b'"') => LexemeKind::Quote,
            other => unreachable!("not a structural byte: {:?}", other),
        };
        self.scanner.advance(1);
        Lexeme {
            kind,
            text: self.scanner.slice(offset, offset + 1),
            offset,
        }
    }

    /// Apply the accepted expectation and return the next expectation set
    fn step(&mut self, accepted: Expectation, lexeme: Lexeme<'a>) -> Result<Expectations, ParseError> {
        use Expectation::*;

        let next = match accepted {
            LessThan => {
                self.flush_text();
                self.tag_start = Some(lexeme.offset);
                self.tag_name = "";
                AFTER_LESS_THAN
            }
            ClosingSlash => Expectations::one(NodeClosingName),
            NodeClosingName => {
                self.tag_name = lexeme.text;
                self.close_tag(lexeme)?;
                Expectations::one(GreaterThan)
            }
            NodeName => {
                self.tag_name = lexeme.text;
                self.open_tag = Some(self.tokens.len());
                self.opened += 1;
                if self.options.strict {
                    self.open_names.push(lexeme.text);
                }
                self.emit(Token::new(TokenKind::TagOpen, lexeme.text));
                INSIDE_TAG
            }
            AttributeName => {
                self.flush_attribute()?;
                self.attribute = Some(PendingAttribute {
                    name: lexeme.text,
                    offset: lexeme.offset,
                    value: "",
                    complete: false,
                });
                Expectations::one(Equals)
            }
            Equals => Expectations::one(OpenQuote),
            OpenQuote => Expectations::two(AttributeValue, CloseQuote),
            AttributeValue => {
                match self.attribute.as_mut() {
                    Some(pending) => pending.value = lexeme.text,
                    None => unreachable!("attribute value without an attribute name"),
                }
                Expectations::one(CloseQuote)
            }
            CloseQuote => {
                match self.attribute.as_mut() {
                    Some(pending) => pending.complete = true,
                    None => unreachable!("closing quote without an attribute name"),
                }
                INSIDE_TAG
            }
            SelfClosingSlash => {
                self.attach_attributes()?;
                self.closed += 1;
                if self.options.strict {
                    let _ = self.open_names.pop();
                }
                self.emit(Token::new(TokenKind::TagClose, "/"));
                Expectations::one(GreaterThan)
            }
            GreaterThan => {
                if self.open_tag.is_some() {
                    self.attach_attributes()?;
                }
                self.tag_start = None;
                AFTER_TAG
            }
            NodeValue => {
                self.pending_text = Some(lexeme.text);
                Expectations::one(LessThan)
            }
        };

        Ok(next)
    }

    fn close_tag(&mut self, lexeme: Lexeme<'a>) -> Result<(), ParseError> {
        if self.options.strict {
            if let Some(expected) = self.open_names.pop() {
                if expected != lexeme.text {
                    return Err(ParseError::MismatchedCloseTag {
                        expected: expected.to_string(),
                        found: lexeme.text.to_string(),
                        position: self.scanner.position_of(lexeme.offset),
                    });
                }
            }
        }
        self.closed += 1;
        self.emit(Token::new(TokenKind::TagClose, format!("/{}", lexeme.text)));
        Ok(())
    }

    /// Move a completed pending attribute into the current set
    fn flush_attribute(&mut self) -> Result<(), ParseError> {
        let pending = match self.attribute.take() {
            Some(pending) => pending,
            None => return Ok(()),
        };
        if !pending.complete {
            unreachable!("attribute {:?} flushed before its closing quote", pending.name);
        }

        self.attributes
            .insert(Attribute::new(pending.name, pending.value))
            .map_err(|Redefinition(attribute)| ParseError::AttributeRedefinition {
                tag: self.tag_name.to_string(),
                name: attribute.name,
                position: self.scanner.position_of(pending.offset),
            })
    }

    /// Hand the finished attribute set to the most recent `TagOpen`
    fn attach_attributes(&mut self) -> Result<(), ParseError> {
        self.flush_attribute()?;
        let index = match self.open_tag.take() {
            Some(index) => index,
            None => unreachable!("attributes completed outside an opening tag"),
        };
        self.tokens[index].attributes = std::mem::take(&mut self.attributes);
        Ok(())
    }

    fn flush_text(&mut self) {
        if let Some(text) = self.pending_text.take() {
            self.emit(Token::new(TokenKind::Text, text));
        }
    }

    fn emit(&mut self, token: Token) {
        log::trace!(target: LOG_TARGET, "emit token: {token:?}");
        self.tokens.push(token);
    }

    fn malformed(&self, lexeme: &Lexeme<'a>) -> ParseError {
        ParseError::MalformedDocument {
            found: lexeme.text.to_string(),
            expected: self.expecting.describe(),
            position: self.scanner.position_of(lexeme.offset),
        }
    }

    fn finish(mut self) -> Result<TokenStream, ParseError> {
        if let Some(start) = self.tag_start {
            let position = self.scanner.position_of(start);
            if self.tag_name.is_empty() {
                return Err(ParseError::UnterminatedTag { position });
            }
            return Err(ParseError::UnclosedTag {
                name: self.tag_name.to_string(),
                position,
            });
        }
        self.flush_text();

        let mut warnings = Vec::new();
        if self.opened != self.closed {
            let warning = ParseWarning::UnbalancedTags {
                opened: self.opened,
                closed: self.closed,
            };
            log::warn!(target: LOG_TARGET, "{warning}");
            warnings.push(warning);
        }

        log::debug!(
            target: LOG_TARGET,
            "tokenized {} tokens ({} open, {} close)",
            self.tokens.len(),
            self.opened,
            self.closed
        );

        Ok(TokenStream {
            tokens: self.tokens,
            warnings,
        })
    }
}

#[inline]
fn is_whitespace_char(c: char) -> bool {
    c.is_ascii() && is_whitespace(c as u8)
}

/// Tokenize in lenient mode
pub fn tokenize(input: &str) -> Result<TokenStream, ParseError> {
    Tokenizer::new(input).tokenize()
}

/// Tokenize with explicit options
pub fn tokenize_with(input: &str, options: ParseOptions) -> Result<TokenStream, ParseError> {
    Tokenizer::with_options(input, options).tokenize()
}
