//! CSS selector building and serialization
//!
//! This module builds selectors fragment by fragment per
//! [Selectors Level 4](https://www.w3.org/TR/selectors-4/), rejecting
//! fragments that would put a compound selector out of canonical order, and
//! serializes the resulting tree back to selector text.
//!
//! ```
//! use selkit_css::selector::{combine, element, id};
//!
//! # fn main() -> Result<(), selkit_css::SelectorError> {
//! let left = element("div").id("main")?;
//! let right = element("table").id("data")?;
//! let selector = combine(left, "+", right)?;
//! assert_eq!(selector.stringify(), "div#main + table#data");
//! # Ok(())
//! # }
//! ```

use std::collections::BTreeMap;
use std::fmt;
use std::ops::Add;

use serde::Serialize;
use strum::IntoEnumIterator;
use strum_macros::{Display, EnumIter, EnumString, IntoStaticStr};
use thiserror::Error;

/// [§ 5 Elemental selectors](https://www.w3.org/TR/selectors-4/#elemental-selectors)
/// [§ 6 Attribute selectors](https://www.w3.org/TR/selectors-4/#attribute-selectors)
///
/// The kind of one fragment of a compound selector.
///
/// Variants are declared in canonical order, so the derived `Ord` is the
/// canonical rank: a compound selector may only grow by fragments whose kind
/// compares greater than or equal to the last one added.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Display, EnumIter, Serialize,
)]
#[strum(serialize_all = "kebab-case")]
#[serde(rename_all = "camelCase")]
pub enum FragmentKind {
    /// [§ 5.1 Type selector](https://www.w3.org/TR/selectors-4/#type-selectors)
    ///
    /// Examples: `div`, `a`, `*`
    Element,

    /// [§ 6.7 ID selector](https://www.w3.org/TR/selectors-4/#id-selectors)
    ///
    /// Example: `#main`
    Id,

    /// [§ 6.6 Class selector](https://www.w3.org/TR/selectors-4/#class-html)
    ///
    /// Example: `.container`
    Class,

    /// [§ 6.4 Attribute selectors](https://www.w3.org/TR/selectors-4/#attribute-selectors)
    ///
    /// Example: `[href$=".png"]`
    Attribute,

    /// [§ 3.6.1 Pseudo-classes](https://www.w3.org/TR/selectors-4/#pseudo-classes)
    ///
    /// Examples: `:focus`, `:nth-child(2)`
    PseudoClass,

    /// [§ 3.6.2 Pseudo-elements](https://www.w3.org/TR/selectors-4/#pseudo-elements)
    ///
    /// Examples: `::before`, `::placeholder`
    PseudoElement,
}

impl FragmentKind {
    /// Position of this kind in the canonical order, starting at 0 for
    /// [`FragmentKind::Element`].
    #[must_use]
    pub const fn rank(self) -> u8 {
        self as u8
    }

    /// Whether a compound selector may hold at most one fragment of this kind.
    #[must_use]
    pub const fn is_singleton(self) -> bool {
        matches!(self, Self::Element | Self::Id | Self::PseudoElement)
    }

    /// Text written before and after a value of this kind.
    #[must_use]
    pub const fn affixes(self) -> (&'static str, &'static str) {
        match self {
            Self::Element => ("", ""),
            Self::Id => ("#", ""),
            Self::Class => (".", ""),
            Self::Attribute => ("[", "]"),
            Self::PseudoClass => (":", ""),
            Self::PseudoElement => ("::", ""),
        }
    }

    fn write_decorated(self, f: &mut fmt::Formatter<'_>, value: &str) -> fmt::Result {
        let (prefix, suffix) = self.affixes();
        write!(f, "{prefix}{value}{suffix}")
    }
}

/// Errors raised while building a selector.
///
/// A builder call that fails leaves the selector it was called on unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SelectorError {
    /// An element, id or pseudo-element was added to a compound selector that
    /// already has one.
    #[error("{kind} should not occur more than one time inside the selector")]
    DuplicateFragment {
        /// The singleton kind that was added twice.
        kind: FragmentKind,
    },

    /// A fragment was added after one that must come after it.
    #[error(
        "{kind} cannot follow {last}: selector parts should be arranged in the order \
         element, id, class, attribute, pseudo-class, pseudo-element"
    )]
    OrderViolation {
        /// The kind that was being added.
        kind: FragmentKind,
        /// The kind of the fragment added before it.
        last: FragmentKind,
    },

    /// A combinator token other than `" "`, `"+"`, `"~"` or `">"`.
    #[error("invalid combinator {0:?}: expected one of \" \", \"+\", \"~\", \">\"")]
    InvalidCombinator(String),
}

/// [§ 4.2 Compound selectors](https://www.w3.org/TR/selectors-4/#compound)
///
/// "A compound selector is a sequence of simple selectors that are not
/// separated by a combinator, and represents a set of simultaneous
/// conditions on a single element."
///
/// Fragments are grouped by kind; values of a repeatable kind keep their
/// insertion order. Every mutation goes through [`CompoundSelector::push`],
/// which validates before it writes.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CompoundSelector {
    fragments: BTreeMap<FragmentKind, Vec<String>>,
}

impl CompoundSelector {
    /// Create an empty compound selector.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn seeded(kind: FragmentKind, value: impl Into<String>) -> Self {
        let mut fragments = BTreeMap::new();
        let _ = fragments.insert(kind, vec![value.into()]);
        Self { fragments }
    }

    /// Add one fragment in place.
    ///
    /// # Errors
    ///
    /// - [`SelectorError::DuplicateFragment`] if `kind` is a singleton kind
    ///   that is already present.
    /// - [`SelectorError::OrderViolation`] if `kind` ranks below the kind of
    ///   the last fragment added.
    pub fn push(
        &mut self,
        kind: FragmentKind,
        value: impl Into<String>,
    ) -> Result<(), SelectorError> {
        self.check(kind)?;
        self.fragments.entry(kind).or_default().push(value.into());
        Ok(())
    }

    fn check(&self, kind: FragmentKind) -> Result<(), SelectorError> {
        if kind.is_singleton() && self.fragments.contains_key(&kind) {
            return Err(SelectorError::DuplicateFragment { kind });
        }
        match self.last_kind() {
            Some(last) if kind < last => Err(SelectorError::OrderViolation { kind, last }),
            _ => Ok(()),
        }
    }

    fn with(mut self, kind: FragmentKind, value: impl Into<String>) -> Result<Self, SelectorError> {
        self.push(kind, value)?;
        Ok(self)
    }

    /// Add the type selector.
    ///
    /// # Errors
    ///
    /// Fails if the selector already has an element, or if anything has been
    /// added yet (an element must come first).
    pub fn element(self, value: impl Into<String>) -> Result<Self, SelectorError> {
        self.with(FragmentKind::Element, value)
    }

    /// Add the id selector.
    ///
    /// # Errors
    ///
    /// Fails if the selector already has an id, or if a class, attribute,
    /// pseudo-class or pseudo-element has been added.
    pub fn id(self, value: impl Into<String>) -> Result<Self, SelectorError> {
        self.with(FragmentKind::Id, value)
    }

    /// Append a class selector.
    ///
    /// # Errors
    ///
    /// Fails if an attribute, pseudo-class or pseudo-element has been added.
    pub fn class(self, value: impl Into<String>) -> Result<Self, SelectorError> {
        self.with(FragmentKind::Class, value)
    }

    /// Append an attribute selector. `value` is the text between the
    /// brackets, e.g. `href$=".png"`.
    ///
    /// # Errors
    ///
    /// Fails if a pseudo-class or pseudo-element has been added.
    pub fn attr(self, value: impl Into<String>) -> Result<Self, SelectorError> {
        self.with(FragmentKind::Attribute, value)
    }

    /// Append a pseudo-class, without the leading colon.
    ///
    /// # Errors
    ///
    /// Fails if a pseudo-element has been added.
    pub fn pseudo_class(self, value: impl Into<String>) -> Result<Self, SelectorError> {
        self.with(FragmentKind::PseudoClass, value)
    }

    /// Add the pseudo-element, without the leading colons.
    ///
    /// # Errors
    ///
    /// Fails if the selector already has a pseudo-element.
    pub fn pseudo_element(self, value: impl Into<String>) -> Result<Self, SelectorError> {
        self.with(FragmentKind::PseudoElement, value)
    }

    /// Values of one kind, in insertion order.
    #[must_use]
    pub fn values(&self, kind: FragmentKind) -> &[String] {
        self.fragments.get(&kind).map_or(&[], Vec::as_slice)
    }

    /// Kind of the most recently added fragment.
    ///
    /// Insertion order never decreases in rank, so this is also the highest
    /// kind present.
    #[must_use]
    pub fn last_kind(&self) -> Option<FragmentKind> {
        self.fragments.keys().next_back().copied()
    }

    /// Whether no fragment has been added.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.fragments.is_empty()
    }

    /// All fragments in canonical order.
    pub fn fragments(&self) -> impl Iterator<Item = (FragmentKind, &str)> {
        self.fragments
            .iter()
            .flat_map(|(&kind, values)| values.iter().map(move |v| (kind, v.as_str())))
    }

    /// [§ 17 Calculating Specificity](https://www.w3.org/TR/selectors-4/#specificity-rules)
    ///
    /// "The universal selector is not counted" so an element of `*`
    /// contributes nothing.
    #[must_use]
    pub fn specificity(&self) -> Specificity {
        let count = |kind| u32::try_from(self.values(kind).len()).unwrap_or(u32::MAX);
        let types = self
            .values(FragmentKind::Element)
            .iter()
            .filter(|name| name.as_str() != "*")
            .count();

        Specificity(
            count(FragmentKind::Id),
            count(FragmentKind::Class)
                .saturating_add(count(FragmentKind::Attribute))
                .saturating_add(count(FragmentKind::PseudoClass)),
            u32::try_from(types)
                .unwrap_or(u32::MAX)
                .saturating_add(count(FragmentKind::PseudoElement)),
        )
    }

    /// Canonical selector text.
    #[must_use]
    pub fn stringify(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for CompoundSelector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for kind in FragmentKind::iter() {
            for value in self.values(kind) {
                kind.write_decorated(f, value)?;
            }
        }
        Ok(())
    }
}

/// [§ 16 Combinators](https://www.w3.org/TR/selectors-4/#combinators)
///
/// "A combinator is punctuation that represents a particular kind of
/// relationship between the selectors on either side."
///
/// `Display` and `FromStr` use the combinator's token.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Display,
    EnumString,
    EnumIter,
    IntoStaticStr,
    Serialize,
)]
pub enum Combinator {
    /// [§ 16.1 Descendant combinator](https://www.w3.org/TR/selectors-4/#descendant-combinators)
    /// "A descendant combinator is whitespace that separates two compound selectors."
    #[strum(serialize = " ")]
    #[serde(rename = " ")]
    Descendant,

    /// [§ 16.2 Child combinator](https://www.w3.org/TR/selectors-4/#child-combinators)
    /// "A child combinator is a greater-than sign (>) that separates two compound
    /// selectors."
    #[strum(serialize = ">")]
    #[serde(rename = ">")]
    Child,

    /// [§ 16.3 Next-sibling combinator](https://www.w3.org/TR/selectors-4/#adjacent-sibling-combinators)
    /// "A next-sibling combinator is a plus sign (+) that separates two compound
    /// selectors."
    #[strum(serialize = "+")]
    #[serde(rename = "+")]
    NextSibling,

    /// [§ 16.4 Subsequent-sibling combinator](https://www.w3.org/TR/selectors-4/#general-sibling-combinators)
    /// "A subsequent-sibling combinator is a tilde (~) that separates two compound
    /// selectors."
    #[strum(serialize = "~")]
    #[serde(rename = "~")]
    SubsequentSibling,
}

impl Combinator {
    /// The combinator's token.
    #[must_use]
    pub fn token(self) -> &'static str {
        self.into()
    }

    /// Look up a combinator by its token.
    ///
    /// # Errors
    ///
    /// Returns [`SelectorError::InvalidCombinator`] for anything other than
    /// `" "`, `"+"`, `"~"` or `">"`.
    pub fn from_token(token: &str) -> Result<Self, SelectorError> {
        token
            .parse()
            .map_err(|_| SelectorError::InvalidCombinator(token.to_owned()))
    }
}

/// [§ 4.3 Complex selectors](https://www.w3.org/TR/selectors-4/#complex)
///
/// A selector tree: either one compound selector, or two trees joined by a
/// combinator. Combined nodes own both sides and are never mutated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum SelectorNode {
    /// A compound selector with no combinator.
    Compound(CompoundSelector),

    /// `left combinator right`.
    Combined {
        /// Selector on the left of the combinator.
        left: Box<SelectorNode>,
        /// How the two sides relate.
        combinator: Combinator,
        /// Selector on the right of the combinator.
        right: Box<SelectorNode>,
    },
}

impl SelectorNode {
    /// Join two selectors with a combinator.
    #[must_use]
    pub fn combined(
        left: impl Into<Self>,
        combinator: Combinator,
        right: impl Into<Self>,
    ) -> Self {
        Self::Combined {
            left: Box::new(left.into()),
            combinator,
            right: Box::new(right.into()),
        }
    }

    /// The compound selector, if this node has no combinator.
    #[must_use]
    pub const fn as_compound(&self) -> Option<&CompoundSelector> {
        match self {
            Self::Compound(compound) => Some(compound),
            Self::Combined { .. } => None,
        }
    }

    /// Compound selectors from left to right.
    #[must_use]
    pub fn compounds(&self) -> Vec<&CompoundSelector> {
        let mut out = Vec::new();
        self.collect_compounds(&mut out);
        out
    }

    fn collect_compounds<'a>(&'a self, out: &mut Vec<&'a CompoundSelector>) {
        match self {
            Self::Compound(compound) => out.push(compound),
            Self::Combined { left, right, .. } => {
                left.collect_compounds(out);
                right.collect_compounds(out);
            }
        }
    }

    /// [§ 17 Calculating Specificity](https://www.w3.org/TR/selectors-4/#specificity-rules)
    ///
    /// Sum of the specificities of every compound selector in the tree.
    #[must_use]
    pub fn specificity(&self) -> Specificity {
        self.compounds()
            .into_iter()
            .map(CompoundSelector::specificity)
            .fold(Specificity::default(), Add::add)
    }

    /// Canonical selector text.
    #[must_use]
    pub fn stringify(&self) -> String {
        self.to_string()
    }
}

impl From<CompoundSelector> for SelectorNode {
    fn from(compound: CompoundSelector) -> Self {
        Self::Compound(compound)
    }
}

impl fmt::Display for SelectorNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Compound(compound) => write!(f, "{compound}"),
            // One space on each side of the token, including the descendant
            // token itself.
            Self::Combined {
                left,
                combinator,
                right,
            } => write!(f, "{left} {combinator} {right}"),
        }
    }
}

/// [§ 17 Calculating Specificity](https://www.w3.org/TR/selectors-4/#specificity-rules)
/// "A selector's specificity is calculated for a given element as follows:
///  - count the number of ID selectors in the selector (= A)
///  - count the number of class selectors, attributes selectors, and pseudo-classes in the selector (= B)
///  - count the number of type selectors and pseudo-elements in the selector (= C)
///
/// Specificities are compared by comparing the three components in order."
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize)]
pub struct Specificity(pub u32, pub u32, pub u32);

impl Specificity {
    /// Create a new specificity with (A, B, C) components.
    #[must_use]
    pub const fn new(a: u32, b: u32, c: u32) -> Self {
        Self(a, b, c)
    }
}

impl Add for Specificity {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self(
            self.0.saturating_add(rhs.0),
            self.1.saturating_add(rhs.1),
            self.2.saturating_add(rhs.2),
        )
    }
}

impl fmt::Display for Specificity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({},{},{})", self.0, self.1, self.2)
    }
}

/// Start a selector with a type selector.
#[must_use]
pub fn element(value: impl Into<String>) -> CompoundSelector {
    CompoundSelector::seeded(FragmentKind::Element, value)
}

/// Start a selector with an id selector.
#[must_use]
pub fn id(value: impl Into<String>) -> CompoundSelector {
    CompoundSelector::seeded(FragmentKind::Id, value)
}

/// Start a selector with a class selector.
#[must_use]
pub fn class(value: impl Into<String>) -> CompoundSelector {
    CompoundSelector::seeded(FragmentKind::Class, value)
}

/// Start a selector with an attribute selector.
#[must_use]
pub fn attr(value: impl Into<String>) -> CompoundSelector {
    CompoundSelector::seeded(FragmentKind::Attribute, value)
}

/// Start a selector with a pseudo-class.
#[must_use]
pub fn pseudo_class(value: impl Into<String>) -> CompoundSelector {
    CompoundSelector::seeded(FragmentKind::PseudoClass, value)
}

/// Start a selector with a pseudo-element.
#[must_use]
pub fn pseudo_element(value: impl Into<String>) -> CompoundSelector {
    CompoundSelector::seeded(FragmentKind::PseudoElement, value)
}

/// Join two selectors with the combinator written as `token`.
///
/// Both sides are moved into the result, so later changes to a side must be
/// made on a clone and will not show up in the combined selector.
///
/// # Errors
///
/// Returns [`SelectorError::InvalidCombinator`] if `token` is not one of
/// `" "`, `"+"`, `"~"` or `">"`.
pub fn combine(
    left: impl Into<SelectorNode>,
    token: &str,
    right: impl Into<SelectorNode>,
) -> Result<SelectorNode, SelectorError> {
    let combinator = Combinator::from_token(token)?;
    Ok(SelectorNode::combined(left, combinator, right))
}
