//! Integration tests for building and serializing CSS selectors.

use selkit_css::selector::{
    Combinator, CompoundSelector, FragmentKind, SelectorError, SelectorNode, Specificity, attr,
    class, combine, element, id, pseudo_class, pseudo_element,
};
use strum::IntoEnumIterator;

fn sample_value(kind: FragmentKind) -> &'static str {
    match kind {
        FragmentKind::Element => "div",
        FragmentKind::Id => "main",
        FragmentKind::Class => "container",
        FragmentKind::Attribute => "data-x=\"1\"",
        FragmentKind::PseudoClass => "hover",
        FragmentKind::PseudoElement => "after",
    }
}

// Compound Selector Tests
// [§ 4.2 Compound selectors](https://www.w3.org/TR/selectors-4/#compound)

#[test]
fn test_id_with_classes() {
    let selector = id("main")
        .class("container")
        .unwrap()
        .class("editable")
        .unwrap();
    assert_eq!(selector.stringify(), "#main.container.editable");
}

#[test]
fn test_element_attribute_pseudo_class() {
    let selector = element("a")
        .attr(r#"href$=".png""#)
        .unwrap()
        .pseudo_class("focus")
        .unwrap();
    assert_eq!(selector.stringify(), r#"a[href$=".png"]:focus"#);
}

#[test]
fn test_every_kind_decorated() {
    let selector = element("input")
        .id("name")
        .unwrap()
        .class("wide")
        .unwrap()
        .attr("type=text")
        .unwrap()
        .pseudo_class("focus")
        .unwrap()
        .pseudo_element("placeholder")
        .unwrap();
    assert_eq!(
        selector.stringify(),
        "input#name.wide[type=text]:focus::placeholder"
    );
}

#[test]
fn test_entry_points_seed_one_fragment() {
    assert_eq!(element("p").stringify(), "p");
    assert_eq!(id("x").stringify(), "#x");
    assert_eq!(class("x").stringify(), ".x");
    assert_eq!(attr("x").stringify(), "[x]");
    assert_eq!(pseudo_class("x").stringify(), ":x");
    assert_eq!(pseudo_element("x").stringify(), "::x");
    assert_eq!(CompoundSelector::new().stringify(), "");
}

#[test]
fn test_every_ordered_subset_serializes_in_canonical_order() {
    let kinds: Vec<FragmentKind> = FragmentKind::iter().collect();

    for mask in 1u32..(1 << kinds.len()) {
        let chosen: Vec<FragmentKind> = kinds
            .iter()
            .enumerate()
            .filter(|(i, _)| mask & (1 << i) != 0)
            .map(|(_, &kind)| kind)
            .collect();

        let mut selector = CompoundSelector::new();
        let mut expected = String::new();
        for &kind in &chosen {
            let value = sample_value(kind);
            selector.push(kind, value).unwrap();
            let (prefix, suffix) = kind.affixes();
            expected.push_str(&format!("{prefix}{value}{suffix}"));
        }

        assert_eq!(selector.stringify(), expected, "kinds {chosen:?}");
    }
}

#[test]
fn test_repeatable_kinds_keep_insertion_order() {
    let selector = element("li")
        .class("b")
        .unwrap()
        .class("a")
        .unwrap()
        .class("c")
        .unwrap()
        .attr("z")
        .unwrap()
        .attr("y")
        .unwrap()
        .pseudo_class("hover")
        .unwrap()
        .pseudo_class("first-child")
        .unwrap();
    assert_eq!(selector.stringify(), "li.b.a.c[z][y]:hover:first-child");
    assert_eq!(selector.values(FragmentKind::Class), ["b", "a", "c"]);
}

// Cardinality Tests

#[test]
fn test_duplicate_element_fails() {
    let err = element("div")
        .id("main")
        .unwrap()
        .element("span")
        .unwrap_err();
    assert_eq!(
        err,
        SelectorError::DuplicateFragment {
            kind: FragmentKind::Element
        }
    );
}

#[test]
fn test_duplicate_singletons_fail_regardless_of_context() {
    let err = id("a").id("b").unwrap_err();
    assert!(matches!(err, SelectorError::DuplicateFragment { kind: FragmentKind::Id }));

    let err = element("div")
        .pseudo_element("before")
        .unwrap()
        .pseudo_element("after")
        .unwrap_err();
    assert!(matches!(
        err,
        SelectorError::DuplicateFragment {
            kind: FragmentKind::PseudoElement
        }
    ));

    // An id after classes is both repeated and out of order; the repeat wins.
    let err = id("a").class("x").unwrap().id("b").unwrap_err();
    assert!(matches!(err, SelectorError::DuplicateFragment { kind: FragmentKind::Id }));
}

// Ordering Tests

#[test]
fn test_element_after_id_fails() {
    let err = id("main").element("div").unwrap_err();
    assert_eq!(
        err,
        SelectorError::OrderViolation {
            kind: FragmentKind::Element,
            last: FragmentKind::Id,
        }
    );
}

#[test]
fn test_every_descending_pair_fails() {
    for later in FragmentKind::iter() {
        for earlier in FragmentKind::iter().filter(|&k| k < later) {
            let mut selector = CompoundSelector::new();
            selector.push(later, "x").unwrap();
            let err = selector.push(earlier, "y").unwrap_err();
            assert_eq!(
                err,
                SelectorError::OrderViolation {
                    kind: earlier,
                    last: later,
                },
                "{earlier} after {later}"
            );
            assert!(selector.values(earlier).is_empty());
        }
    }
}

#[test]
fn test_error_messages() {
    let err = id("main").element("div").unwrap_err();
    assert_eq!(
        err.to_string(),
        "element cannot follow id: selector parts should be arranged in the order \
         element, id, class, attribute, pseudo-class, pseudo-element"
    );

    let err = pseudo_element("a").pseudo_element("b").unwrap_err();
    assert_eq!(
        err.to_string(),
        "pseudo-element should not occur more than one time inside the selector"
    );
}

// Combinator Tests
// [§ 16 Combinators](https://www.w3.org/TR/selectors-4/#combinators)

#[test]
fn test_combine_next_sibling() {
    let selector = combine(
        element("div").id("main").unwrap(),
        "+",
        element("table").id("data").unwrap(),
    )
    .unwrap();
    assert_eq!(selector.stringify(), "div#main + table#data");
}

#[test]
fn test_combine_is_concatenation() {
    let left = element("ul").class("nav").unwrap();
    let right = element("li").pseudo_class("hover").unwrap();

    for token in [" ", "+", "~", ">"] {
        let expected = format!("{} {token} {}", left.stringify(), right.stringify());
        let combined = combine(left.clone(), token, right.clone()).unwrap();
        assert_eq!(combined.stringify(), expected);
    }
}

#[test]
fn test_nested_combine() {
    // Right-nested, as the builder is usually driven
    let selector = combine(
        element("div")
            .id("main")
            .unwrap()
            .class("container")
            .unwrap()
            .class("draggable")
            .unwrap(),
        "+",
        combine(
            element("table").id("data").unwrap(),
            "~",
            combine(
                element("tr").pseudo_class("nth-of-type(even)").unwrap(),
                " ",
                element("td").pseudo_class("nth-of-type(even)").unwrap(),
            )
            .unwrap(),
        )
        .unwrap(),
    )
    .unwrap();

    assert_eq!(
        selector.stringify(),
        "div#main.container.draggable + table#data ~ tr:nth-of-type(even)   td:nth-of-type(even)"
    );

    // Left-nested produces the same text
    let left_nested = SelectorNode::combined(
        SelectorNode::combined(element("a"), Combinator::Child, element("b")),
        Combinator::SubsequentSibling,
        element("c"),
    );
    assert_eq!(left_nested.stringify(), "a > b ~ c");
    assert_eq!(left_nested.compounds().len(), 3);
}

#[test]
fn test_invalid_combinator() {
    let err = combine(element("a"), "|", element("b")).unwrap_err();
    assert_eq!(err, SelectorError::InvalidCombinator("|".to_owned()));

    let err = combine(element("a"), "", element("b")).unwrap_err();
    assert_eq!(err, SelectorError::InvalidCombinator(String::new()));
}

#[test]
fn test_combined_sides_are_frozen() {
    let left = element("div").class("a").unwrap();
    let combined = combine(left.clone(), ">", element("p")).unwrap();

    // Changing the caller's copy does not touch the combined tree.
    let _extended = left.class("b").unwrap();
    assert_eq!(combined.stringify(), "div.a > p");
}

// Specificity Tests
// [§ 17 Calculating Specificity](https://www.w3.org/TR/selectors-4/#specificity-rules)

#[test]
fn test_compound_specificity() {
    let selector = element("a")
        .id("x")
        .unwrap()
        .class("b")
        .unwrap()
        .attr("href")
        .unwrap()
        .pseudo_class("hover")
        .unwrap()
        .pseudo_element("before")
        .unwrap();
    assert_eq!(selector.specificity(), Specificity(1, 3, 2));
}

#[test]
fn test_universal_has_no_specificity() {
    assert_eq!(element("*").specificity(), Specificity(0, 0, 0));
    assert_eq!(
        element("*").class("a").unwrap().specificity(),
        Specificity(0, 1, 0)
    );
}

#[test]
fn test_combined_specificity_sums() {
    let selector = combine(
        element("ul").id("nav").unwrap(),
        ">",
        element("li").class("item").unwrap(),
    )
    .unwrap();
    assert_eq!(selector.specificity(), Specificity::new(1, 1, 2));
    assert!(selector.specificity() > Specificity(0, 99, 99));
    assert_eq!(selector.specificity().to_string(), "(1,1,2)");
}

// Serialization Tests

#[test]
fn test_json_shape() {
    let selector = combine(element("a").class("b").unwrap(), ">", id("c")).unwrap();
    let json = serde_json::to_value(&selector).unwrap();

    assert_eq!(
        json,
        serde_json::json!({
            "type": "combined",
            "left": {
                "type": "compound",
                "fragments": { "element": ["a"], "class": ["b"] }
            },
            "combinator": ">",
            "right": {
                "type": "compound",
                "fragments": { "id": ["c"] }
            }
        })
    );
}
