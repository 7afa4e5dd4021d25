//! Parser configuration

/// Knobs shared by the tokenizer and the document entry points.
///
/// The default is lenient: closing tag names are only counted, never compared.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParseOptions {
    /// Compare every named closing tag with the innermost open tag
    pub strict: bool,
    /// Recognize a leading `<?...>` declaration and `<!DOCTYPE ...>` as meta tokens
    pub detect_prolog: bool,
}

impl ParseOptions {
    /// Lenient parsing with prolog detection
    pub const fn new() -> Self {
        ParseOptions {
            strict: false,
            detect_prolog: true,
        }
    }

    /// Strict parsing: mismatched closing tag names are fatal
    pub const fn strict() -> Self {
        ParseOptions {
            strict: true,
            detect_prolog: true,
        }
    }

    pub const fn with_strict(mut self, strict: bool) -> Self {
        self.strict = strict;
        self
    }

    pub const fn with_prolog(mut self, detect_prolog: bool) -> Self {
        self.detect_prolog = detect_prolog;
        self
    }
}

impl Default for ParseOptions {
    fn default() -> Self {
        Self::new()
    }
}
