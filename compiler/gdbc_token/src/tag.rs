//! Token type tags.

use std::fmt;

/// Token type tag.
///
/// Discriminants are part of the buffer format: a token record stores the
/// tag in its low seven bits, so every value must stay below 128. The order
/// follows the script language's scanner and must never be reshuffled.
///
/// | Range | Category           |
/// |-------|--------------------|
/// | 0-3   | Carriers (empty, annotation, identifier, literal) |
/// | 4-27  | Operators          |
/// | 28-39 | Assignment         |
/// | 40-72 | Keywords           |
/// | 73-86 | Punctuation        |
/// | 87-89 | Whitespace         |
/// | 90-93 | Built-in constants |
/// | 94-98 | Special            |
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[repr(u8)]
pub enum TokenTag {
    // === Carriers (0-3) ===
    Empty = 0,
    Annotation = 1,
    Identifier = 2,
    Literal = 3,

    // === Comparison (4-9) ===
    Less = 4,
    LessEqual = 5,
    Greater = 6,
    GreaterEqual = 7,
    EqualEqual = 8,
    BangEqual = 9,

    // === Logical (10-15) ===
    And = 10,
    Or = 11,
    Not = 12,
    AmpersandAmpersand = 13,
    PipePipe = 14,
    Bang = 15,

    // === Bitwise (16-21) ===
    Ampersand = 16,
    Pipe = 17,
    Tilde = 18,
    Caret = 19,
    LessLess = 20,
    GreaterGreater = 21,

    // === Math (22-27) ===
    Plus = 22,
    Minus = 23,
    Star = 24,
    StarStar = 25,
    Slash = 26,
    Percent = 27,

    // === Assignment (28-39) ===
    Equal = 28,
    PlusEqual = 29,
    MinusEqual = 30,
    StarEqual = 31,
    StarStarEqual = 32,
    SlashEqual = 33,
    PercentEqual = 34,
    LessLessEqual = 35,
    GreaterGreaterEqual = 36,
    AmpersandEqual = 37,
    PipeEqual = 38,
    CaretEqual = 39,

    // === Control flow (40-50) ===
    If = 40,
    Elif = 41,
    Else = 42,
    For = 43,
    While = 44,
    Break = 45,
    Continue = 46,
    Pass = 47,
    Return = 48,
    Match = 49,
    When = 50,

    // === Keywords (51-72) ===
    As = 51,
    Assert = 52,
    Await = 53,
    Breakpoint = 54,
    Class = 55,
    ClassName = 56,
    Const = 57,
    Enum = 58,
    Extends = 59,
    Func = 60,
    In = 61,
    Is = 62,
    Namespace = 63,
    Preload = 64,
    SelfKw = 65,
    Signal = 66,
    Static = 67,
    Super = 68,
    Trait = 69,
    Var = 70,
    Void = 71,
    Yield = 72,

    // === Punctuation (73-86) ===
    BracketOpen = 73,      // [
    BracketClose = 74,     // ]
    BraceOpen = 75,        // {
    BraceClose = 76,       // }
    ParenthesisOpen = 77,  // (
    ParenthesisClose = 78, // )
    Comma = 79,            // ,
    Semicolon = 80,        // ;
    Period = 81,           // .
    PeriodPeriod = 82,     // ..
    Colon = 83,            // :
    Dollar = 84,           // $
    ForwardArrow = 85,     // ->
    Underscore = 86,       // _

    // === Whitespace (87-89) ===
    Newline = 87,
    Indent = 88,
    Dedent = 89,

    // === Built-in constants (90-93) ===
    ConstPi = 90,
    ConstTau = 91,
    ConstInf = 92,
    ConstNan = 93,

    // === Special (94-98) ===
    VcsConflictMarker = 94,
    Backtick = 95,
    QuestionMark = 96,
    Error = 97,
    Eof = 98,
}

impl TokenTag {
    /// Number of tags; every discriminant is below this.
    pub const COUNT: usize = Self::Eof as usize + 1;

    /// Every tag, indexed by discriminant.
    const ALL: [TokenTag; Self::COUNT] = [
        Self::Empty,
        Self::Annotation,
        Self::Identifier,
        Self::Literal,
        Self::Less,
        Self::LessEqual,
        Self::Greater,
        Self::GreaterEqual,
        Self::EqualEqual,
        Self::BangEqual,
        Self::And,
        Self::Or,
        Self::Not,
        Self::AmpersandAmpersand,
        Self::PipePipe,
        Self::Bang,
        Self::Ampersand,
        Self::Pipe,
        Self::Tilde,
        Self::Caret,
        Self::LessLess,
        Self::GreaterGreater,
        Self::Plus,
        Self::Minus,
        Self::Star,
        Self::StarStar,
        Self::Slash,
        Self::Percent,
        Self::Equal,
        Self::PlusEqual,
        Self::MinusEqual,
        Self::StarEqual,
        Self::StarStarEqual,
        Self::SlashEqual,
        Self::PercentEqual,
        Self::LessLessEqual,
        Self::GreaterGreaterEqual,
        Self::AmpersandEqual,
        Self::PipeEqual,
        Self::CaretEqual,
        Self::If,
        Self::Elif,
        Self::Else,
        Self::For,
        Self::While,
        Self::Break,
        Self::Continue,
        Self::Pass,
        Self::Return,
        Self::Match,
        Self::When,
        Self::As,
        Self::Assert,
        Self::Await,
        Self::Breakpoint,
        Self::Class,
        Self::ClassName,
        Self::Const,
        Self::Enum,
        Self::Extends,
        Self::Func,
        Self::In,
        Self::Is,
        Self::Namespace,
        Self::Preload,
        Self::SelfKw,
        Self::Signal,
        Self::Static,
        Self::Super,
        Self::Trait,
        Self::Var,
        Self::Void,
        Self::Yield,
        Self::BracketOpen,
        Self::BracketClose,
        Self::BraceOpen,
        Self::BraceClose,
        Self::ParenthesisOpen,
        Self::ParenthesisClose,
        Self::Comma,
        Self::Semicolon,
        Self::Period,
        Self::PeriodPeriod,
        Self::Colon,
        Self::Dollar,
        Self::ForwardArrow,
        Self::Underscore,
        Self::Newline,
        Self::Indent,
        Self::Dedent,
        Self::ConstPi,
        Self::ConstTau,
        Self::ConstInf,
        Self::ConstNan,
        Self::VcsConflictMarker,
        Self::Backtick,
        Self::QuestionMark,
        Self::Error,
        Self::Eof,
    ];

    #[inline]
    pub const fn as_u8(self) -> u8 {
        self as u8
    }

    /// Tag for a stored discriminant, or `None` if out of range.
    #[inline]
    pub fn from_u8(raw: u8) -> Option<Self> {
        Self::ALL.get(usize::from(raw)).copied()
    }

    /// Identifier and annotation tokens carry an identifier string.
    #[inline]
    pub const fn carries_identifier(self) -> bool {
        matches!(self, Self::Identifier | Self::Annotation)
    }

    /// Literal and error tokens carry a value.
    #[inline]
    pub const fn carries_literal(self) -> bool {
        matches!(self, Self::Literal | Self::Error)
    }

    /// Tokens the decoder synthesizes instead of storing.
    #[inline]
    pub const fn is_whitespace(self) -> bool {
        matches!(self, Self::Newline | Self::Indent | Self::Dedent)
    }

    /// Human-readable name, matching the source text for fixed tokens.
    pub const fn name(self) -> &'static str {
        match self {
            Self::Empty => "empty",
            Self::Annotation => "annotation",
            Self::Identifier => "identifier",
            Self::Literal => "literal",
            Self::Less => "<",
            Self::LessEqual => "<=",
            Self::Greater => ">",
            Self::GreaterEqual => ">=",
            Self::EqualEqual => "==",
            Self::BangEqual => "!=",
            Self::And => "and",
            Self::Or => "or",
            Self::Not => "not",
            Self::AmpersandAmpersand => "&&",
            Self::PipePipe => "||",
            Self::Bang => "!",
            Self::Ampersand => "&",
            Self::Pipe => "|",
            Self::Tilde => "~",
            Self::Caret => "^",
            Self::LessLess => "<<",
            Self::GreaterGreater => ">>",
            Self::Plus => "+",
            Self::Minus => "-",
            Self::Star => "*",
            Self::StarStar => "**",
            Self::Slash => "/",
            Self::Percent => "%",
            Self::Equal => "=",
            Self::PlusEqual => "+=",
            Self::MinusEqual => "-=",
            Self::StarEqual => "*=",
            Self::StarStarEqual => "**=",
            Self::SlashEqual => "/=",
            Self::PercentEqual => "%=",
            Self::LessLessEqual => "<<=",
            Self::GreaterGreaterEqual => ">>=",
            Self::AmpersandEqual => "&=",
            Self::PipeEqual => "|=",
            Self::CaretEqual => "^=",
            Self::If => "if",
            Self::Elif => "elif",
            Self::Else => "else",
            Self::For => "for",
            Self::While => "while",
            Self::Break => "break",
            Self::Continue => "continue",
            Self::Pass => "pass",
            Self::Return => "return",
            Self::Match => "match",
            Self::When => "when",
            Self::As => "as",
            Self::Assert => "assert",
            Self::Await => "await",
            Self::Breakpoint => "breakpoint",
            Self::Class => "class",
            Self::ClassName => "class_name",
            Self::Const => "const",
            Self::Enum => "enum",
            Self::Extends => "extends",
            Self::Func => "func",
            Self::In => "in",
            Self::Is => "is",
            Self::Namespace => "namespace",
            Self::Preload => "preload",
            Self::SelfKw => "self",
            Self::Signal => "signal",
            Self::Static => "static",
            Self::Super => "super",
            Self::Trait => "trait",
            Self::Var => "var",
            Self::Void => "void",
            Self::Yield => "yield",
            Self::BracketOpen => "[",
            Self::BracketClose => "]",
            Self::BraceOpen => "{",
            Self::BraceClose => "}",
            Self::ParenthesisOpen => "(",
            Self::ParenthesisClose => ")",
            Self::Comma => ",",
            Self::Semicolon => ";",
            Self::Period => ".",
            Self::PeriodPeriod => "..",
            Self::Colon => ":",
            Self::Dollar => "$",
            Self::ForwardArrow => "->",
            Self::Underscore => "_",
            Self::Newline => "newline",
            Self::Indent => "indent",
            Self::Dedent => "dedent",
            Self::ConstPi => "PI",
            Self::ConstTau => "TAU",
            Self::ConstInf => "INF",
            Self::ConstNan => "NAN",
            Self::VcsConflictMarker => "VCS conflict marker",
            Self::Backtick => "`",
            Self::QuestionMark => "?",
            Self::Error => "error",
            Self::Eof => "end of file",
        }
    }
}

impl fmt::Display for TokenTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
