//! CSS selector building, serialization and parsing for selkit.
//!
//! # Scope
//!
//! This crate implements:
//! - **Selector Builder** ([Selectors Level 4](https://www.w3.org/TR/selectors-4/))
//!   - Element, id, class, attribute, pseudo-class and pseudo-element fragments
//!   - Canonical fragment order and single-occurrence rules, checked on every add
//!   - Combinators (descendant, child, next-sibling, subsequent-sibling)
//!   - Serialization to canonical selector text
//!   - Specificity calculation
//!
//! - **Selector Parser** ([§ 4 Selector syntax](https://www.w3.org/TR/selectors-4/#syntax))
//!   - Reads selector text back into a tree through the builder
//!
//! # Not Implemented
//!
//! - Selector lists (`a, b`)
//! - Matching selectors against a document

/// Selector text parsing per [§ 4 Selector syntax](https://www.w3.org/TR/selectors-4/#syntax).
pub mod parser;
/// Selector building and serialization per [Selectors Level 4](https://www.w3.org/TR/selectors-4/).
pub mod selector;

// Re-exports for convenience
pub use parser::{ParseError, parse_selector};
pub use selector::{
    Combinator, CompoundSelector, FragmentKind, SelectorError, SelectorNode, Specificity, attr,
    class, combine, element, id, pseudo_class, pseudo_element,
};
