//! CSS selector text parsing
//!
//! [§ 4 Selector syntax](https://www.w3.org/TR/selectors-4/#syntax)
//!
//! Turns selector text into a [`SelectorNode`]. Every fragment is added
//! through the builder, so text that violates fragment order or repeats an
//! element, id or pseudo-element fails with the same [`SelectorError`] the
//! builder would return.
//!
//! Compound selectors are joined left to right: `a > b c` becomes
//! `(a > b) c`. Reading back the text of a right-nested tree therefore gives
//! the same text and specificity, but a left-nested tree.

use std::str::FromStr;

use selkit_common::warning::warn_once;
use thiserror::Error;

use crate::selector::{Combinator, CompoundSelector, FragmentKind, SelectorError, SelectorNode};

/// [CSS 2.1 § 5.12](https://www.w3.org/TR/CSS2/selector.html#pseudo-element-selectors)
///
/// Pseudo-elements that CSS 2 wrote with a single colon. Selectors Level 4
/// still accepts this spelling for these four names only.
const LEGACY_PSEUDO_ELEMENTS: [&str; 4] = ["before", "after", "first-line", "first-letter"];

/// Errors raised while reading selector text.
///
/// Offsets are byte offsets into the input.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    /// The input was empty or only whitespace.
    #[error("empty selector")]
    Empty,

    /// A character that cannot appear here.
    #[error("unexpected character {found:?} at offset {position}")]
    UnexpectedChar {
        /// The character found.
        found: char,
        /// Where it was found.
        position: usize,
    },

    /// A `#`, `.`, `:`, `::` or `[` with nothing usable after it.
    #[error("expected a name after {prefix:?} at offset {position}")]
    MissingName {
        /// The prefix that needs a name.
        prefix: &'static str,
        /// Offset of the prefix.
        position: usize,
    },

    /// A bracket, parenthesis or quoted string that never closes.
    #[error("unterminated {what} starting at offset {position}")]
    Unterminated {
        /// What was left open.
        what: &'static str,
        /// Offset of the opening character.
        position: usize,
    },

    /// A combinator with no compound selector on one side.
    #[error("combinator {:?} at offset {position} is missing a selector", .combinator.token())]
    DanglingCombinator {
        /// The combinator.
        combinator: Combinator,
        /// Offset of its token.
        position: usize,
    },

    /// [§ 4.1 Selector lists](https://www.w3.org/TR/selectors-4/#grouping)
    ///
    /// Comma-separated lists have no representation as a single tree.
    #[error("selector lists are not supported (',' at offset {position})")]
    SelectorList {
        /// Offset of the comma.
        position: usize,
    },

    /// The text is well-formed but the builder rejected a fragment.
    #[error(transparent)]
    Selector(#[from] SelectorError),
}

/// Check if a character can start an identifier.
/// [§ 4.3.10 ident-start code point](https://www.w3.org/TR/css-syntax-3/#ident-start-code-point)
const fn is_ident_start_char(c: char) -> bool {
    c.is_ascii_alphabetic() || c == '_' || !c.is_ascii()
}

/// Check if a character can continue an identifier.
/// [§ 4.3.9 ident code point](https://www.w3.org/TR/css-syntax-3/#ident-code-point)
const fn is_ident_char(c: char) -> bool {
    is_ident_start_char(c) || c.is_ascii_digit() || c == '-'
}

const fn combinator_for(c: char) -> Option<Combinator> {
    match c {
        '>' => Some(Combinator::Child),
        '+' => Some(Combinator::NextSibling),
        '~' => Some(Combinator::SubsequentSibling),
        _ => None,
    }
}

struct SelectorParser<'a> {
    input: &'a str,
    pos: usize,
}

impl<'a> SelectorParser<'a> {
    const fn new(input: &'a str) -> Self {
        Self { input, pos: 0 }
    }

    fn peek(&self) -> Option<char> {
        self.input[self.pos..].chars().next()
    }

    fn bump(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.pos += c.len_utf8();
        Some(c)
    }

    /// Skip whitespace; returns true if any was skipped.
    fn skip_whitespace(&mut self) -> bool {
        let start = self.pos;
        while self.peek().is_some_and(|c| c.is_ascii_whitespace()) {
            let _ = self.bump();
        }
        self.pos > start
    }

    fn parse(mut self) -> Result<SelectorNode, ParseError> {
        let _ = self.skip_whitespace();
        if self.peek().is_none() {
            return Err(ParseError::Empty);
        }

        let mut node = SelectorNode::from(self.compound()?);

        loop {
            let had_whitespace = self.skip_whitespace();
            let Some(c) = self.peek() else { break };

            let combinator = match combinator_for(c) {
                Some(combinator) => {
                    let position = self.pos;
                    let _ = self.bump();
                    let _ = self.skip_whitespace();
                    if self.peek().is_none() {
                        return Err(ParseError::DanglingCombinator {
                            combinator,
                            position,
                        });
                    }
                    combinator
                }
                None if c == ',' => return Err(ParseError::SelectorList { position: self.pos }),
                // [§ 16.1](https://www.w3.org/TR/selectors-4/#descendant-combinators)
                // Whitespace alone is the descendant combinator.
                None if had_whitespace => Combinator::Descendant,
                None => {
                    return Err(ParseError::UnexpectedChar {
                        found: c,
                        position: self.pos,
                    });
                }
            };

            let right = self.compound()?;
            node = SelectorNode::combined(node, combinator, right);
        }

        Ok(node)
    }

    /// [§ 4.2 Compound selectors](https://www.w3.org/TR/selectors-4/#compound)
    fn compound(&mut self) -> Result<CompoundSelector, ParseError> {
        let mut compound = CompoundSelector::new();

        while let Some(c) = self.peek() {
            let position = self.pos;
            match c {
                '*' => {
                    let _ = self.bump();
                    compound.push(FragmentKind::Element, "*")?;
                }
                '#' => {
                    let _ = self.bump();
                    let name = self.name("#", position)?;
                    compound.push(FragmentKind::Id, name)?;
                }
                '.' => {
                    let _ = self.bump();
                    let name = self.name(".", position)?;
                    compound.push(FragmentKind::Class, name)?;
                }
                '[' => {
                    let inner = self.attribute(position)?;
                    compound.push(FragmentKind::Attribute, inner)?;
                }
                ':' => self.pseudo(&mut compound, position)?,
                c if is_ident_start_char(c) || c == '-' || c == '\\' => {
                    let name = self.ident();
                    compound.push(FragmentKind::Element, name)?;
                }
                _ => break,
            }
        }

        if compound.is_empty() {
            let position = self.pos;
            return Err(match self.peek() {
                Some(',') => ParseError::SelectorList { position },
                Some(c) => combinator_for(c).map_or(
                    ParseError::UnexpectedChar { found: c, position },
                    |combinator| ParseError::DanglingCombinator {
                        combinator,
                        position,
                    },
                ),
                None => ParseError::Empty,
            });
        }

        Ok(compound)
    }

    /// Read identifier characters, keeping backslash escapes verbatim.
    fn ident(&mut self) -> String {
        let start = self.pos;
        while let Some(c) = self.peek() {
            if c == '\\' {
                let _ = self.bump();
                let _ = self.bump();
            } else if is_ident_char(c) {
                let _ = self.bump();
            } else {
                break;
            }
        }
        self.input[start..self.pos].to_owned()
    }

    fn name(&mut self, prefix: &'static str, position: usize) -> Result<String, ParseError> {
        let name = self.ident();
        if name.is_empty() {
            return Err(ParseError::MissingName { prefix, position });
        }
        Ok(name)
    }

    /// Read up to the closing `close`, skipping over quoted strings.
    /// `self.pos` must be just past the opening character.
    fn balanced(
        &mut self,
        open: char,
        close: char,
        what: &'static str,
        position: usize,
    ) -> Result<(), ParseError> {
        let mut depth = 1usize;
        while let Some(c) = self.bump() {
            match c {
                '"' | '\'' => self.skip_string(c)?,
                '\\' => {
                    let _ = self.bump();
                }
                c if c == open => depth += 1,
                c if c == close => {
                    depth -= 1;
                    if depth == 0 {
                        return Ok(());
                    }
                }
                _ => {}
            }
        }
        Err(ParseError::Unterminated { what, position })
    }

    fn skip_string(&mut self, quote: char) -> Result<(), ParseError> {
        let position = self.pos - quote.len_utf8();
        while let Some(c) = self.bump() {
            if c == '\\' {
                let _ = self.bump();
            } else if c == quote {
                return Ok(());
            }
        }
        Err(ParseError::Unterminated {
            what: "string",
            position,
        })
    }

    /// Append a parenthesized argument list to `name`, if one follows.
    fn with_arguments(&mut self, name: String) -> Result<String, ParseError> {
        if self.peek() != Some('(') {
            return Ok(name);
        }
        let start = self.pos;
        let _ = self.bump();
        self.balanced('(', ')', "parenthesis", start)?;
        Ok(format!("{name}{}", &self.input[start..self.pos]))
    }

    /// [§ 6.4 Attribute selectors](https://www.w3.org/TR/selectors-4/#attribute-selectors)
    ///
    /// Returns the trimmed text between the brackets.
    fn attribute(&mut self, position: usize) -> Result<String, ParseError> {
        let _ = self.bump();
        let start = self.pos;
        self.balanced('[', ']', "attribute selector", position)?;
        let inner = self.input[start..self.pos - 1].trim();
        if inner.is_empty() {
            return Err(ParseError::MissingName {
                prefix: "[",
                position,
            });
        }
        Ok(inner.to_owned())
    }

    /// [§ 3.6 Pseudo-classes and pseudo-elements](https://www.w3.org/TR/selectors-4/#pseudo-classes)
    fn pseudo(
        &mut self,
        compound: &mut CompoundSelector,
        position: usize,
    ) -> Result<(), ParseError> {
        let _ = self.bump();
        if self.peek() == Some(':') {
            let _ = self.bump();
            let name = self.name("::", position)?;
            let name = self.with_arguments(name)?;
            compound.push(FragmentKind::PseudoElement, name)?;
            return Ok(());
        }

        let name = self.name(":", position)?;
        if self.peek() == Some('(') {
            let with_args = self.with_arguments(name)?;
            compound.push(FragmentKind::PseudoClass, with_args)?;
            return Ok(());
        }

        // Kept as a pseudo-class so builder output such as `p:before` or
        // `:after::marker` reads back unchanged.
        let lowered = name.to_ascii_lowercase();
        if LEGACY_PSEUDO_ELEMENTS.contains(&lowered.as_str()) {
            warn_once(
                "CSS",
                &format!(
                    "legacy pseudo-element syntax ':{name}' kept as written; use '::{name}'"
                ),
            );
        }
        compound.push(FragmentKind::PseudoClass, name)?;
        Ok(())
    }
}

/// Parse selector text into a selector tree.
///
/// Supports:
/// - Type selectors: `div`, `*`
/// - ID selectors: `#main`
/// - Class selectors: `.container`
/// - Attribute selectors: `[href$=".png"]` (kept as written, minus the brackets)
/// - Pseudo-classes: `:focus`, `:nth-child(2n + 1)`
/// - Pseudo-elements: `::before` (legacy `:before` stays a pseudo-class and
///   is reported once)
/// - Combinators: `div p`, `ul > li`, `h1 + p`, `h1 ~ p`
///
/// # Errors
///
/// Returns a [`ParseError`] for malformed text, selector lists, and anything
/// the builder rejects (see [`SelectorError`]).
pub fn parse_selector(text: &str) -> Result<SelectorNode, ParseError> {
    SelectorParser::new(text).parse()
}

impl FromStr for SelectorNode {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_selector(s)
    }
}
