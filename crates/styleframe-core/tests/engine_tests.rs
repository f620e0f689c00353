//! End-to-end engine tests: tokens, utilities and recipes through the serializer.

use styleframe_core::prelude::*;
use styleframe_core::Error;

fn button_recipe() -> RecipeDefinition {
    RecipeDefinition::new("button")
        .base(DeclarationBlock::new().with("display", "inline-block"))
        .variant("size", [
            ("sm", DeclarationBlock::new().with("padding", "2px 4px")),
            ("lg", DeclarationBlock::new().with("padding", "8px 16px")),
        ])
        .variant("tone", [
            ("primary", DeclarationBlock::new().with("color", "white")),
            ("secondary", DeclarationBlock::new().with("color", "black")),
        ])
        .compound(
            [("size", "lg"), ("tone", "primary")],
            DeclarationBlock::new().with("font-weight", "600"),
        )
}

#[test]
fn test_primary_color_end_to_end() {
    let mut sf = Styleframe::new("app");
    sf.declare("color--primary", "blue");
    sf.selector(".h1", [("color", reference("color--primary"))]).unwrap();

    let css = sf.serialize().unwrap();
    assert!(css.contains(".h1 { color: blue; }"), "got: {css}");
}

fn init_logging() {
    let _ = tracing_subscriber::fmt().with_test_writer().try_init();
}

#[test]
fn test_selector_merge_last_write_wins() {
    init_logging();
    let mut sf = Styleframe::new("app");
    let first = sf.selector(".card", [("color", "red"), ("padding", "1rem")]).unwrap();
    let second = sf.selector(".card", [("color", "blue")]).unwrap();
    assert_eq!(first, second);

    let css = sf.serialize().unwrap();
    assert_eq!(css, ".card { color: blue; padding: 1rem; }\n");

    let warnings: Vec<&Warning> = sf.warnings().collect();
    assert_eq!(
        warnings,
        vec![&Warning::DuplicateSelectorConflict {
            selector: ".card".into(),
            property: "color".into(),
        }]
    );
}

#[test]
fn test_camel_case_properties_are_normalized() {
    let mut sf = Styleframe::new("app");
    sf.selector(".a", [("backgroundColor", "red"), ("--brand", "blue")]).unwrap();

    let css = sf.serialize().unwrap();
    assert_eq!(css, ".a { background-color: red; --brand: blue; }\n");
}

#[test]
fn test_utility_idempotent_and_ordered() {
    let mut sf = Styleframe::new("app");
    let spacing: ValueTable = [("default", "4px"), ("sm", "2px"), ("lg", "16px")].into_iter().collect();
    let margin = sf
        .create_use_utility(
            "m",
            |v| DeclarationBlock::new().with("margin", v.value),
            spacing.clone(),
        )
        .unwrap();

    margin.apply(&mut sf, None).unwrap();
    margin.apply(&mut sf, Some(&spacing)).unwrap();

    let css = sf.serialize().unwrap();
    assert_eq!(
        css,
        ".m { margin: 4px; }\n.m\\:sm { margin: 2px; }\n.m\\:lg { margin: 16px; }\n"
    );
}

#[test]
fn test_recipe_base_only_without_selection() {
    let mut sf = Styleframe::new("app");
    let badge = sf
        .recipe(RecipeDefinition::new("badge").base(DeclarationBlock::new().with("display", "inline-block")))
        .unwrap();

    let none: [(&str, &str); 0] = [];
    assert_eq!(badge.resolve(&sf, none).unwrap(), vec!["badge"]);
}

#[test]
fn test_compound_variant_matching() {
    let mut sf = Styleframe::new("app");
    let button = sf.recipe(button_recipe()).unwrap();

    let both = button.resolve(&sf, [("size", "lg"), ("tone", "primary")]).unwrap();
    assert_eq!(
        both,
        vec![
            "button",
            "button--size-lg--tone-primary",
            "button--size-lg",
            "button--tone-primary",
        ]
    );

    let only_size = button.resolve(&sf, [("size", "lg")]).unwrap();
    assert_eq!(only_size, vec!["button", "button--size-lg"]);
}

#[test]
fn test_invalid_variant_combination() {
    let mut sf = Styleframe::new("app");
    let button = sf.recipe(button_recipe()).unwrap();

    let err = button.resolve(&sf, [("size", "xl")]).unwrap_err();
    assert!(matches!(err, Error::InvalidVariantCombination { .. }));

    let err = button.resolve(&sf, [("shape", "round")]).unwrap_err();
    assert!(matches!(err, Error::InvalidVariantCombination { option: None, .. }));
}

#[test]
fn test_recipe_css_emitted_once() {
    let mut sf = Styleframe::new("app");
    let button = sf.recipe(button_recipe()).unwrap();
    for _ in 0..3 {
        button.resolve(&sf, [("size", "sm")]).unwrap();
    }

    let css = sf.serialize().unwrap();
    assert_eq!(css.matches(".button--size-sm ").count(), 1);
    assert!(css.starts_with(".button { display: inline-block; }\n"));
    assert!(css.ends_with(".button--size-lg--tone-primary { font-weight: 600; }\n"));
}

#[test]
fn test_cyclic_variables_fail() {
    let mut sf = Styleframe::new("app");
    sf.declare("a", reference("b"));
    sf.declare("b", reference("a"));
    sf.selector(".x", [("color", reference("a"))]).unwrap();

    assert!(matches!(sf.serialize(), Err(Error::CyclicReference { .. })));
}

#[test]
fn test_unresolved_reference_is_fatal() {
    let mut sf = Styleframe::new("app");
    sf.selector(".x", [("color", reference("nope"))]).unwrap();

    let err = sf.serialize().unwrap_err();
    assert!(err.to_string().contains("nope"), "got: {err}");
}

#[test]
fn test_user_selector_merges_with_recipe_class() {
    init_logging();
    let mut sf = Styleframe::new("app");
    sf.recipe(RecipeDefinition::new("badge").base(DeclarationBlock::new().with("display", "inline-flex")))
        .unwrap();
    sf.selector(".badge", [("color", "red")]).unwrap();

    let css = sf.serialize().unwrap();
    assert_eq!(css, ".badge { display: inline-flex; color: red; }\n");
}

#[test]
fn test_user_selector_merges_with_utility_class() {
    let mut sf = Styleframe::new("app");
    sf.selector(".m", [("padding", "1px"), ("margin", "0")]).unwrap();
    let spacing: ValueTable = [("default", "4px"), ("sm", "2px")].into_iter().collect();
    let margin = sf
        .create_use_utility("m", |v| DeclarationBlock::new().with("margin", v.value), spacing)
        .unwrap();
    margin.apply(&mut sf, None).unwrap();

    let css = sf.serialize().unwrap();
    assert_eq!(css.matches(".m {").count(), 1, "got: {css}");
    assert!(css.starts_with(".m { padding: 1px; margin: 4px; }\n"), "got: {css}");
    assert!(css.contains(".m\\:sm { margin: 2px; }"));

    let warnings: Vec<&Warning> = sf.warnings().collect();
    assert_eq!(
        warnings,
        vec![&Warning::DuplicateSelectorConflict {
            selector: ".m".into(),
            property: "margin".into(),
        }]
    );
}
