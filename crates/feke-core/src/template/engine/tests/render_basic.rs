//! Basic substitution tests for template engine

use super::helpers::{nested_bindings, simple_bindings};
use super::*;

#[test]
fn test_render_simple_placeholder() {
    let vars = simple_bindings();
    let result = render("Title: {$title}", &vars).unwrap();
    assert_eq!(result, "Title: My Title");
}

#[test]
fn test_render_placeholder_with_spaces() {
    let vars = simple_bindings();
    let result = render("Title: {$ title }", &vars).unwrap();
    assert_eq!(result, "Title: My Title");
}

#[test]
fn test_render_exact_name_boundary() {
    let vars = simple_bindings();
    let result = render("{$value1}|{$value10}|{$value1}0", &vars).unwrap();
    assert_eq!(result, "A|B|A0");
}

#[test]
fn test_render_prefix_name_does_not_match_longer_binding() {
    let mut vars = Bindings::new();
    vars.assign("value1", "A").unwrap();
    let result = render("[{$value10}]", &vars).unwrap();
    assert_eq!(result, "[]");
}

#[test]
fn test_render_nested_key() {
    let vars = simple_bindings();
    let result = render("{$user.name} is {$user.age}", &vars).unwrap();
    assert_eq!(result, "Alice is 30");
}

#[test]
fn test_render_deeply_nested_key() {
    let vars = nested_bindings();
    let result = render("<html lang=\"{$site.meta.lang}\">{$site.menu.1}", &vars).unwrap();
    assert_eq!(result, "<html lang=\"en\">About");
}

#[test]
fn test_render_mapping_placeholder_is_empty() {
    let vars = simple_bindings();
    let result = render("[{$user}]", &vars).unwrap();
    assert_eq!(result, "[]");
}

#[test]
fn test_render_scalar_with_extra_segments() {
    let vars = simple_bindings();
    let result = render("{$title.whatever}", &vars).unwrap();
    assert_eq!(result, "My Title");
}

#[test]
fn test_render_removes_unassigned_placeholders() {
    let vars = Bindings::new();
    let template = "a{$missing}b{$user.name}c{$ }d{$}e";
    let result = render(template, &vars).unwrap();
    assert_eq!(result, "abcde");
    assert!(!result.contains("{$"));
}

#[test]
fn test_render_multiple_placeholders_on_lines() {
    let vars = simple_bindings();
    let template = "<h1>{$title}</h1>\n<p>{$user.name}</p>\n";
    let result = render(template, &vars).unwrap();
    assert_eq!(result, "<h1>My Title</h1>\n<p>Alice</p>\n");
}

#[test]
fn test_render_values_are_inserted_verbatim() {
    let mut vars = Bindings::new();
    vars.assign("html", "<b>&amp;</b>").unwrap();
    let result = render("{$html}", &vars).unwrap();
    assert_eq!(result, "<b>&amp;</b>");
}

#[test]
fn test_render_no_placeholders() {
    let vars = simple_bindings();
    let template = "body { color: red; }\nfunction f() { return {a: 1}; }";
    let result = render(template, &vars).unwrap();
    assert_eq!(result, template);
}

#[test]
fn test_render_placeholder_inside_css_block() {
    let mut vars = Bindings::new();
    vars.assign("color", "red").unwrap();
    let result = render("a { color: {$color}; }", &vars).unwrap();
    assert_eq!(result, "a { color: red; }");
}

#[test]
fn test_render_does_not_modify_bindings() {
    let vars = simple_bindings();
    let before = vars.clone();
    render("{set var='title' value='Other'}{$title}", &vars).unwrap();
    assert_eq!(vars, before);
}
