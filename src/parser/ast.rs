/*! Abstract syntax tree for regular-expression patterns.

The types in this module are produced by the [`crate::parser::Parser`] and
consumed once by the compiler. They follow the grammar closely: a pattern is
an optionally anchored [`Expression`], an expression is a sequence of
[`ExpressionItem`]s, and alternation appears as an item holding the two
expressions it separates (right-associative, so `a|b|c` nests to the right).
*/

use std::fmt::{Display, Formatter};

use unicode_categories::UnicodeCategories;

/// Result of parsing a whole pattern.
#[derive(Debug, PartialEq, Eq)]
pub(crate) struct Ast {
    /// True if the pattern starts with the `^` anchor.
    pub anchored: bool,
    /// The pattern's top-level expression.
    pub root: Expression,
    /// Total number of capturing groups in the pattern.
    pub capture_groups: usize,
}

/// A sequence of items matched one after the other.
///
/// An empty expression is valid and matches the empty string only.
#[derive(Debug, Default, PartialEq, Eq)]
pub(crate) struct Expression {
    pub items: Vec<ExpressionItem>,
}

#[derive(Debug, PartialEq, Eq)]
pub(crate) enum ExpressionItem {
    Match(Match),
    Group(Group),
    Backreference(Backreference),
    Alternation(Alternation),
}

/// Two alternative expressions. The left one is tried first at match time.
#[derive(Debug, PartialEq, Eq)]
pub(crate) struct Alternation {
    pub left: Expression,
    pub right: Expression,
}

/// A parenthesized subexpression, optionally quantified.
#[derive(Debug, PartialEq, Eq)]
pub(crate) struct Group {
    pub expr: Expression,
    /// 1-based capture index, in order of the opening parenthesis. `None`
    /// for non-capturing `(?:...)` groups.
    pub index: Option<usize>,
    pub quantifier: Option<Quantifier>,
}

/// A single atom, optionally quantified.
#[derive(Debug, PartialEq, Eq)]
pub(crate) struct Match {
    pub item: MatchItem,
    pub quantifier: Option<Quantifier>,
}

#[derive(Debug, PartialEq, Eq)]
pub(crate) enum MatchItem {
    /// `.`
    AnyCharacter,
    /// A literal character.
    Character(char),
    /// `\w`, `\W`, `\d` or `\D`.
    CharacterClass(CharacterClass),
    /// `\p{...}`
    UnicodeCategory(UnicodeCategory),
    /// `[...]`
    CharacterGroup { negated: bool, items: Vec<CharacterGroupItem> },
}

#[derive(Debug, PartialEq, Eq)]
pub(crate) enum CharacterGroupItem {
    Class(CharacterClass),
    Category(UnicodeCategory),
    Character(char),
    /// `a-b`, both ends inclusive.
    Range(char, char),
}

/// A reference to the text captured by an earlier group, like `\1`.
#[derive(Debug, PartialEq, Eq)]
pub(crate) struct Backreference {
    /// 1-based capture group index.
    pub index: usize,
    /// Offset of the backreference in the pattern, kept so that the
    /// group-exists check can report a position once the whole pattern has
    /// been parsed.
    pub position: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Quantifier {
    pub kind: QuantifierKind,
    /// Lazy quantifiers (`*?`, `+?`, ...) prefer the minimum number of
    /// repetitions; greedy ones prefer the maximum.
    pub lazy: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum QuantifierKind {
    /// `*`
    ZeroOrMore,
    /// `+`
    OneOrMore,
    /// `?`
    ZeroOrOne,
    /// `{min}`, `{min,}` or `{min,max}`.
    Range { min: u32, max: Option<u32> },
}

/// The `\w`/`\W`/`\d`/`\D` shorthands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum CharacterClass {
    Word,
    NonWord,
    Digit,
    NonDigit,
}

impl CharacterClass {
    /// True if `c` belongs to the class.
    ///
    /// Word characters are letters, decimal digits and the underscore.
    /// Digits are the Unicode `Nd` category.
    pub fn contains(self, c: char) -> bool {
        match self {
            Self::Word => c.is_alphanumeric() || c == '_',
            Self::NonWord => !(c.is_alphanumeric() || c == '_'),
            Self::Digit => c.is_number_decimal_digit(),
            Self::NonDigit => !c.is_number_decimal_digit(),
        }
    }
}

impl Display for CharacterClass {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Word => write!(f, r"\w"),
            Self::NonWord => write!(f, r"\W"),
            Self::Digit => write!(f, r"\d"),
            Self::NonDigit => write!(f, r"\D"),
        }
    }
}

/// A Unicode general category, as named by `\p{...}`.
///
/// Both the two-letter abbreviations (`Lu`, `Nd`, ...) and the long names
/// (`Letter`, `Number`, ...) are accepted. Membership tests are backed by
/// the `unicode_categories` tables.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum UnicodeCategory {
    Letter,
    LowercaseLetter,
    UppercaseLetter,
    TitlecaseLetter,
    ModifierLetter,
    OtherLetter,
    Mark,
    NonspacingMark,
    SpacingMark,
    EnclosingMark,
    Number,
    DecimalNumber,
    LetterNumber,
    OtherNumber,
    Punctuation,
    ConnectorPunctuation,
    DashPunctuation,
    OpenPunctuation,
    ClosePunctuation,
    InitialPunctuation,
    FinalPunctuation,
    OtherPunctuation,
    Symbol,
    MathSymbol,
    CurrencySymbol,
    ModifierSymbol,
    OtherSymbol,
    Separator,
    SpaceSeparator,
    LineSeparator,
    ParagraphSeparator,
    Other,
    Control,
    Format,
    PrivateUse,
    Surrogate,
}

impl UnicodeCategory {
    /// Looks a category up by its `\p{...}` name.
    pub fn from_name(name: &str) -> Option<Self> {
        let category = match name {
            "L" | "Letter" => Self::Letter,
            "Ll" | "LowercaseLetter" => Self::LowercaseLetter,
            "Lu" | "UppercaseLetter" => Self::UppercaseLetter,
            "Lt" | "TitlecaseLetter" => Self::TitlecaseLetter,
            "Lm" | "ModifierLetter" => Self::ModifierLetter,
            "Lo" | "OtherLetter" => Self::OtherLetter,
            "M" | "Mark" => Self::Mark,
            "Mn" | "NonspacingMark" => Self::NonspacingMark,
            "Mc" | "SpacingMark" => Self::SpacingMark,
            "Me" | "EnclosingMark" => Self::EnclosingMark,
            "N" | "Number" => Self::Number,
            "Nd" | "DecimalNumber" => Self::DecimalNumber,
            "Nl" | "LetterNumber" => Self::LetterNumber,
            "No" | "OtherNumber" => Self::OtherNumber,
            "P" | "Punctuation" => Self::Punctuation,
            "Pc" | "ConnectorPunctuation" => Self::ConnectorPunctuation,
            "Pd" | "DashPunctuation" => Self::DashPunctuation,
            "Ps" | "OpenPunctuation" => Self::OpenPunctuation,
            "Pe" | "ClosePunctuation" => Self::ClosePunctuation,
            "Pi" | "InitialPunctuation" => Self::InitialPunctuation,
            "Pf" | "FinalPunctuation" => Self::FinalPunctuation,
            "Po" | "OtherPunctuation" => Self::OtherPunctuation,
            "S" | "Symbol" => Self::Symbol,
            "Sm" | "MathSymbol" => Self::MathSymbol,
            "Sc" | "CurrencySymbol" => Self::CurrencySymbol,
            "Sk" | "ModifierSymbol" => Self::ModifierSymbol,
            "So" | "OtherSymbol" => Self::OtherSymbol,
            "Z" | "Separator" => Self::Separator,
            "Zs" | "SpaceSeparator" => Self::SpaceSeparator,
            "Zl" | "LineSeparator" => Self::LineSeparator,
            "Zp" | "ParagraphSeparator" => Self::ParagraphSeparator,
            "C" | "Other" => Self::Other,
            "Cc" | "Control" => Self::Control,
            "Cf" | "Format" => Self::Format,
            "Co" | "PrivateUse" => Self::PrivateUse,
            "Cs" | "Surrogate" => Self::Surrogate,
            _ => return None,
        };
        Some(category)
    }

    /// Short name of the category, as it appears in `\p{...}`.
    pub fn name(self) -> &'static str {
        match self {
            Self::Letter => "L",
            Self::LowercaseLetter => "Ll",
            Self::UppercaseLetter => "Lu",
            Self::TitlecaseLetter => "Lt",
            Self::ModifierLetter => "Lm",
            Self::OtherLetter => "Lo",
            Self::Mark => "M",
            Self::NonspacingMark => "Mn",
            Self::SpacingMark => "Mc",
            Self::EnclosingMark => "Me",
            Self::Number => "N",
            Self::DecimalNumber => "Nd",
            Self::LetterNumber => "Nl",
            Self::OtherNumber => "No",
            Self::Punctuation => "P",
            Self::ConnectorPunctuation => "Pc",
            Self::DashPunctuation => "Pd",
            Self::OpenPunctuation => "Ps",
            Self::ClosePunctuation => "Pe",
            Self::InitialPunctuation => "Pi",
            Self::FinalPunctuation => "Pf",
            Self::OtherPunctuation => "Po",
            Self::Symbol => "S",
            Self::MathSymbol => "Sm",
            Self::CurrencySymbol => "Sc",
            Self::ModifierSymbol => "Sk",
            Self::OtherSymbol => "So",
            Self::Separator => "Z",
            Self::SpaceSeparator => "Zs",
            Self::LineSeparator => "Zl",
            Self::ParagraphSeparator => "Zp",
            Self::Other => "C",
            Self::Control => "Cc",
            Self::Format => "Cf",
            Self::PrivateUse => "Co",
            Self::Surrogate => "Cs",
        }
    }

    /// True if `c` belongs to the category.
    pub fn contains(self, c: char) -> bool {
        match self {
            Self::Letter => c.is_letter(),
            Self::LowercaseLetter => c.is_letter_lowercase(),
            Self::UppercaseLetter => c.is_letter_uppercase(),
            Self::TitlecaseLetter => c.is_letter_titlecase(),
            Self::ModifierLetter => c.is_letter_modifier(),
            Self::OtherLetter => c.is_letter_other(),
            Self::Mark => c.is_mark(),
            Self::NonspacingMark => c.is_mark_nonspacing(),
            Self::SpacingMark => c.is_mark_spacing_combining(),
            Self::EnclosingMark => c.is_mark_enclosing(),
            Self::Number => c.is_number(),
            Self::DecimalNumber => c.is_number_decimal_digit(),
            Self::LetterNumber => c.is_number_letter(),
            Self::OtherNumber => c.is_number_other(),
            Self::Punctuation => c.is_punctuation(),
            Self::ConnectorPunctuation => c.is_punctuation_connector(),
            Self::DashPunctuation => c.is_punctuation_dash(),
            Self::OpenPunctuation => c.is_punctuation_open(),
            Self::ClosePunctuation => c.is_punctuation_close(),
            Self::InitialPunctuation => c.is_punctuation_initial_quote(),
            Self::FinalPunctuation => c.is_punctuation_final_quote(),
            Self::OtherPunctuation => c.is_punctuation_other(),
            Self::Symbol => c.is_symbol(),
            Self::MathSymbol => c.is_symbol_math(),
            Self::CurrencySymbol => c.is_symbol_currency(),
            Self::ModifierSymbol => c.is_symbol_modifier(),
            Self::OtherSymbol => c.is_symbol_other(),
            Self::Separator => c.is_separator(),
            Self::SpaceSeparator => c.is_separator_space(),
            Self::LineSeparator => c.is_separator_line(),
            Self::ParagraphSeparator => c.is_separator_paragraph(),
            Self::Other => c.is_other(),
            Self::Control => c.is_other_control(),
            Self::Format => c.is_other_format(),
            Self::PrivateUse => c.is_other_private_use(),
            Self::Surrogate => false,
        }
    }
}

impl Display for UnicodeCategory {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, r"\p{{{}}}", self.name())
    }
}
