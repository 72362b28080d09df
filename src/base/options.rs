//! Parse configuration shared by every tree of a lineage.

use smol_str::SmolStr;

/// Language version, gating contextual keywords
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub enum LanguageVersion {
    CSharp7,
    CSharp8,
    CSharp9,
    #[default]
    Latest,
}

impl LanguageVersion {
    /// `record` declarations are recognised from C# 9 on
    pub fn supports_records(self) -> bool {
        self >= LanguageVersion::CSharp9
    }
}

/// Options for a parse
///
/// Options never change between a tree and the trees reparsed from it.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ParseOptions {
    pub language_version: LanguageVersion,
    /// Symbols defined before the first line, as if by `#define`
    pub preprocessor_symbols: Vec<SmolStr>,
}

impl ParseOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_language_version(mut self, version: LanguageVersion) -> Self {
        self.language_version = version;
        self
    }

    pub fn with_preprocessor_symbols<I, S>(mut self, symbols: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<SmolStr>,
    {
        self.preprocessor_symbols = symbols.into_iter().map(Into::into).collect();
        self
    }
}

/// The production a tree is parsed from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum EntryPoint {
    /// A whole file
    #[default]
    CompilationUnit,
    /// A single member declaration
    Member,
    /// A single statement
    Statement,
    /// A single expression
    Expression,
}
