/*! Parses regular-expression patterns and produces an AST.

The parser is a hand-written recursive descent: each production of the
pattern grammar maps to one function, and every diagnostic carries the
0-based character offset into the pattern at which the problem was found.
Alternation binds looser than concatenation and associates to the right;
evaluation order (left branch first) is the compiler's business.
*/

use crate::errors::{Error, ErrorKind};

pub(crate) mod ast;


use ast::*;

/// Characters that lose their special meaning when preceded by `\`.
const ESCAPABLE: &[char] = &[
    '(', ')', '[', ']', '{', '}', '|', '^', '$', '.', '*', '+', '?', '\\',
    '/',
];

/// A pattern parser.
///
/// Consumes the whole pattern; trailing unparsed input is an error.
pub(crate) struct Parser<'a> {
    pattern: &'a str,
    chars: Vec<char>,
    pos: usize,
    group_count: usize,
    /// Backreferences seen so far, with the offset of their backslash.
    /// Validated against `group_count` once the whole pattern has been
    /// parsed, so that forward references like `\2(a)(b)` are accepted.
    backreferences: Vec<(usize, usize)>,
}

impl<'a> Parser<'a> {
    pub(crate) fn new(pattern: &'a str) -> Self {
        Self {
            pattern,
            chars: pattern.chars().collect(),
            pos: 0,
            group_count: 0,
            backreferences: Vec::new(),
        }
    }

    /// Parses the pattern and returns its AST.
    pub(crate) fn parse(mut self) -> Result<Ast, Error> {
        let anchored = if self.peek() == Some('^') {
            self.advance();
            true
        } else {
            false
        };

        let root = self.parse_expression()?;

        // `parse_expression` stops at `|` (which it consumes itself), at
        // `)`, or at the end of the pattern. Anything left over here is a
        // stray closing parenthesis.
        match self.peek() {
            Some(')') => {
                return Err(self
                    .error(ErrorKind::UnmatchedClosingParenthesis, self.pos));
            }
            Some(_) => {
                return Err(self.error(ErrorKind::UnexpectedCharacter, self.pos));
            }
            None => {}
        }

        for (index, position) in self.backreferences.iter() {
            if *index == 0 || *index > self.group_count {
                return Err(self
                    .error(ErrorKind::InvalidBackreference(*index), *position));
            }
        }

        Ok(Ast { anchored, root, capture_groups: self.group_count })
    }

    #[inline]
    fn peek(&self) -> Option<char> {
        self.chars.get(self.pos).copied()
    }

    #[inline]
    fn peek_at(&self, offset: usize) -> Option<char> {
        self.chars.get(self.pos + offset).copied()
    }

    #[inline]
    fn advance(&mut self) -> Option<char> {
        let c = self.peek();
        if c.is_some() {
            self.pos += 1;
        }
        c
    }

    fn error(&self, kind: ErrorKind, position: usize) -> Error {
        Error::new(kind, position, self.pattern)
    }

    /// `Expression ::= ExpressionItem+`, plus the alternation rule: if the
    /// concatenation is followed by `|`, the rest of the expression becomes
    /// the right branch of an [`Alternation`].
    fn parse_expression(&mut self) -> Result<Expression, Error> {
        let mut items = Vec::new();

        while let Some(c) = self.peek() {
            if c == '|' || c == ')' {
                break;
            }
            items.push(self.parse_expression_item()?);
        }

        if self.peek() == Some('|') {
            self.advance();
            let right = self.parse_expression()?;
            let alternation =
                Alternation { left: Expression { items }, right };
            return Ok(Expression {
                items: vec![ExpressionItem::Alternation(alternation)],
            });
        }

        Ok(Expression { items })
    }

    fn parse_expression_item(&mut self) -> Result<ExpressionItem, Error> {
        match self.peek() {
            None => Err(self.error(ErrorKind::UnexpectedEndOfPattern, self.pos)),
            Some('(') => Ok(ExpressionItem::Group(self.parse_group()?)),
            Some('\\')
                if self.peek_at(1).is_some_and(|c| c.is_ascii_digit()) =>
            {
                Ok(ExpressionItem::Backreference(self.parse_backreference()))
            }
            // Quantifiers need an atom to apply to, and the remaining
            // metacharacters are only valid in their own productions.
            Some('*' | '+' | '?' | '{' | '^' | '$' | ']' | '}') => {
                Err(self.error(ErrorKind::UnexpectedCharacter, self.pos))
            }
            Some(_) => {
                let item = self.parse_match_item()?;
                let quantifier = self.parse_quantifier()?;
                Ok(ExpressionItem::Match(Match { item, quantifier }))
            }
        }
    }

    fn parse_match_item(&mut self) -> Result<MatchItem, Error> {
        match self.peek() {
            None => Err(self.error(ErrorKind::UnexpectedEndOfPattern, self.pos)),
            Some('.') => {
                self.advance();
                Ok(MatchItem::AnyCharacter)
            }
            Some('[') => self.parse_character_group(),
            Some('\\') => self.parse_escape_atom(),
            Some(c) => {
                self.advance();
                Ok(MatchItem::Character(c))
            }
        }
    }

    /// `Group ::= "(" "?:"? Expression ")" Quantifier?`
    fn parse_group(&mut self) -> Result<Group, Error> {
        let open = self.pos;
        self.advance(); // '('

        let capturing = if self.peek() == Some('?') {
            self.advance();
            match self.peek() {
                Some(':') => {
                    self.advance();
                    false
                }
                Some(_) => {
                    return Err(
                        self.error(ErrorKind::UnexpectedCharacter, self.pos)
                    );
                }
                None => {
                    return Err(self
                        .error(ErrorKind::UnexpectedEndOfPattern, self.pos));
                }
            }
        } else {
            true
        };

        // Groups are numbered by their opening parenthesis, so the index is
        // claimed before the inner expression introduces its own groups.
        let index = if capturing {
            self.group_count += 1;
            Some(self.group_count)
        } else {
            None
        };

        let expr = self.parse_expression()?;

        match self.peek() {
            Some(')') => {
                self.advance();
            }
            _ => {
                return Err(
                    self.error(ErrorKind::UnmatchedOpeningParenthesis, open)
                );
            }
        }

        let quantifier = self.parse_quantifier()?;

        Ok(Group { expr, index, quantifier })
    }

    /// `Backreference ::= "\" Integer`
    ///
    /// The caller guarantees that a digit follows the backslash.
    fn parse_backreference(&mut self) -> Backreference {
        let backslash = self.pos;
        self.advance(); // '\'

        let start = self.pos;
        while self.peek().is_some_and(|c| c.is_ascii_digit()) {
            self.advance();
        }
        let digits: String = self.chars[start..self.pos].iter().collect();
        // Anything too large to parse can't possibly name an existing
        // group, so it is caught by the range check at the end of parsing.
        let index = digits.parse::<usize>().unwrap_or(usize::MAX);

        self.backreferences.push((index, backslash));

        Backreference { index, position: backslash }
    }

    /// An escape in atom position: a character class, a Unicode category,
    /// or an escaped metacharacter.
    fn parse_escape_atom(&mut self) -> Result<MatchItem, Error> {
        self.advance(); // '\'

        match self.peek() {
            None => Err(self.error(ErrorKind::UnexpectedEndOfPattern, self.pos)),
            Some('w') => {
                self.advance();
                Ok(MatchItem::CharacterClass(CharacterClass::Word))
            }
            Some('W') => {
                self.advance();
                Ok(MatchItem::CharacterClass(CharacterClass::NonWord))
            }
            Some('d') => {
                self.advance();
                Ok(MatchItem::CharacterClass(CharacterClass::Digit))
            }
            Some('D') => {
                self.advance();
                Ok(MatchItem::CharacterClass(CharacterClass::NonDigit))
            }
            Some('p') => {
                Ok(MatchItem::UnicodeCategory(self.parse_unicode_category()?))
            }
            Some(c) if ESCAPABLE.contains(&c) => {
                self.advance();
                Ok(MatchItem::Character(c))
            }
            Some(c) => Err(self.error(ErrorKind::InvalidEscape(c), self.pos)),
        }
    }

    /// `"\p{" Letters "}"`, with the leading backslash already consumed.
    fn parse_unicode_category(&mut self) -> Result<UnicodeCategory, Error> {
        let p = self.pos;
        self.advance(); // 'p'

        if self.peek() != Some('{') {
            return Err(self.error(ErrorKind::UnterminatedUnicodeCategory, p));
        }
        self.advance();

        let start = self.pos;
        while self.peek().is_some_and(|c| c.is_ascii_alphabetic()) {
            self.advance();
        }
        let name: String = self.chars[start..self.pos].iter().collect();

        if self.peek() != Some('}') {
            return Err(self.error(ErrorKind::UnterminatedUnicodeCategory, p));
        }
        self.advance();

        UnicodeCategory::from_name(&name).ok_or_else(|| {
            self.error(ErrorKind::UnknownUnicodeCategory(name), start)
        })
    }

    /// `CharacterGroup ::= "[" "^"? CharacterGroupItem+ "]"`
    fn parse_character_group(&mut self) -> Result<MatchItem, Error> {
        let open = self.pos;
        self.advance(); // '['

        let negated = if self.peek() == Some('^') {
            self.advance();
            true
        } else {
            false
        };

        let mut items = Vec::new();

        loop {
            match self.peek() {
                None => {
                    return Err(
                        self.error(ErrorKind::UnmatchedOpeningBracket, open)
                    );
                }
                Some(']') if items.is_empty() => {
                    return Err(
                        self.error(ErrorKind::EmptyCharacterGroup, open)
                    );
                }
                Some(']') => {
                    self.advance();
                    break;
                }
                Some('\\') => {
                    let item = self.parse_character_group_escape()?;
                    items.push(item);
                }
                Some(c) => {
                    self.advance();
                    items.push(self.maybe_range(c)?);
                }
            }
        }

        Ok(MatchItem::CharacterGroup { negated, items })
    }

    /// An escape inside a character group. Class and category escapes stand
    /// on their own; an escaped character may still be the low end of a
    /// range, as in `[\^-z]`.
    fn parse_character_group_escape(
        &mut self,
    ) -> Result<CharacterGroupItem, Error> {
        self.advance(); // '\'

        match self.peek() {
            None => Err(self.error(ErrorKind::UnexpectedEndOfPattern, self.pos)),
            Some('w') => {
                self.advance();
                Ok(CharacterGroupItem::Class(CharacterClass::Word))
            }
            Some('W') => {
                self.advance();
                Ok(CharacterGroupItem::Class(CharacterClass::NonWord))
            }
            Some('d') => {
                self.advance();
                Ok(CharacterGroupItem::Class(CharacterClass::Digit))
            }
            Some('D') => {
                self.advance();
                Ok(CharacterGroupItem::Class(CharacterClass::NonDigit))
            }
            Some('p') => {
                Ok(CharacterGroupItem::Category(self.parse_unicode_category()?))
            }
            Some(c) if ESCAPABLE.contains(&c) || c == '-' => {
                self.advance();
                self.maybe_range(c)
            }
            Some(c) => Err(self.error(ErrorKind::InvalidEscape(c), self.pos)),
        }
    }

    /// Having consumed `lo`, parses the `-hi` tail of a character range if
    /// one follows. A `-` that can't form a range (last thing before `]`)
    /// is a literal.
    fn maybe_range(&mut self, lo: char) -> Result<CharacterGroupItem, Error> {
        if self.peek() != Some('-')
            || !self.peek_at(1).is_some_and(|c| c != ']')
        {
            return Ok(CharacterGroupItem::Character(lo));
        }
        self.advance(); // '-'

        let hi_pos = self.pos;
        let hi = match self.peek() {
            Some('\\') => self.parse_range_end_escape()?,
            Some(c) => {
                self.advance();
                c
            }
            // Unreachable: peek_at(1) above saw a character.
            None => {
                return Err(
                    self.error(ErrorKind::UnexpectedEndOfPattern, self.pos)
                );
            }
        };

        if hi < lo {
            return Err(
                self.error(ErrorKind::InvalidCharacterRange { lo, hi }, hi_pos)
            );
        }

        Ok(CharacterGroupItem::Range(lo, hi))
    }

    /// The high end of a character range given as an escape, like `[!-\]]`.
    fn parse_range_end_escape(&mut self) -> Result<char, Error> {
        self.advance(); // '\'

        match self.peek() {
            None => Err(self.error(ErrorKind::UnexpectedEndOfPattern, self.pos)),
            Some(c) if ESCAPABLE.contains(&c) || c == '-' => {
                self.advance();
                Ok(c)
            }
            Some(c) => Err(self.error(ErrorKind::InvalidEscape(c), self.pos)),
        }
    }

    /// `Quantifier ::= ("*" | "+" | "?" | RangeQuantifier) "?"?`
    fn parse_quantifier(&mut self) -> Result<Option<Quantifier>, Error> {
        let kind = match self.peek() {
            Some('*') => {
                self.advance();
                QuantifierKind::ZeroOrMore
            }
            Some('+') => {
                self.advance();
                QuantifierKind::OneOrMore
            }
            Some('?') => {
                self.advance();
                QuantifierKind::ZeroOrOne
            }
            Some('{') => self.parse_range_quantifier()?,
            _ => return Ok(None),
        };

        let lazy = if self.peek() == Some('?') {
            self.advance();
            true
        } else {
            false
        };

        Ok(Some(Quantifier { kind, lazy }))
    }

    /// `RangeQuantifier ::= "{" Integer ("," Integer?)? "}"`
    fn parse_range_quantifier(&mut self) -> Result<QuantifierKind, Error> {
        let open = self.pos;
        self.advance(); // '{'

        let min = self.parse_integer()?;

        let kind = if self.peek() == Some(',') {
            self.advance();
            if self.peek() == Some('}') {
                QuantifierKind::Range { min, max: None }
            } else {
                let max = self.parse_integer()?;
                if max < min {
                    return Err(self.error(
                        ErrorKind::InvalidQuantifierRange { lo: min, hi: max },
                        open,
                    ));
                }
                QuantifierKind::Range { min, max: Some(max) }
            }
        } else {
            QuantifierKind::Range { min, max: Some(min) }
        };

        match self.peek() {
            Some('}') => {
                self.advance();
            }
            Some(_) => {
                return Err(self.error(ErrorKind::UnexpectedCharacter, self.pos));
            }
            None => {
                return Err(
                    self.error(ErrorKind::UnexpectedEndOfPattern, self.pos)
                );
            }
        }

        Ok(kind)
    }

    fn parse_integer(&mut self) -> Result<u32, Error> {
        let start = self.pos;
        while self.peek().is_some_and(|c| c.is_ascii_digit()) {
            self.advance();
        }
        if self.pos == start {
            return match self.peek() {
                None => {
                    Err(self.error(ErrorKind::UnexpectedEndOfPattern, self.pos))
                }
                Some(_) => Err(self.error(ErrorKind::ExpectedNumber, self.pos)),
            };
        }
        let digits: String = self.chars[start..self.pos].iter().collect();
        digits
            .parse::<u32>()
            .map_err(|_| self.error(ErrorKind::QuantifierBoundTooLarge, start))
    }
}
