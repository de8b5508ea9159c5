//! Include expansion and two-pass tests

use super::helpers::{simple_bindings, write_file};
use super::*;
use feke_testkit::temp_dir_in_workspace;

#[test]
fn test_include_is_expanded_from_include_root() {
    let temp = temp_dir_in_workspace();
    write_file(temp.path(), "partials/header.tpl", "<h1>{$title}</h1>");

    let engine = TemplateEngine::new(temp.path(), temp.path().join("unused"));
    let vars = simple_bindings();
    let result = engine
        .render("{include file='partials/header.tpl'}<p>body</p>", &vars)
        .unwrap();

    assert_eq!(result.output, "<h1>My Title</h1><p>body</p>");
    assert_eq!(result.sources, vec![temp.path().join("partials/header.tpl")]);
}

#[test]
fn test_nested_includes() {
    let temp = temp_dir_in_workspace();
    write_file(temp.path(), "layout.tpl", "[{include file=\"inner.tpl\"}]");
    write_file(temp.path(), "inner.tpl", "({include file='leaf.tpl'})");
    write_file(temp.path(), "leaf.tpl", "leaf");

    let engine = TemplateEngine::new(temp.path(), temp.path());
    let result = engine
        .render("{include file='layout.tpl'}", &Bindings::new())
        .unwrap();

    assert_eq!(result.output, "[(leaf)]");
    assert_eq!(result.sources.len(), 3);
}

#[test]
fn test_repeated_include_recorded_once() {
    let temp = temp_dir_in_workspace();
    write_file(temp.path(), "sep.tpl", "-");

    let engine = TemplateEngine::new(temp.path(), temp.path());
    let result = engine
        .render(
            "a{include file='sep.tpl'}b{include file='sep.tpl'}c",
            &Bindings::new(),
        )
        .unwrap();

    assert_eq!(result.output, "a-b-c");
    assert_eq!(result.sources.len(), 1);
}

#[test]
fn test_include_from_value_resolves_in_second_pass() {
    let temp = temp_dir_in_workspace();
    let include_root = temp.path().join("base");
    let template_dir = temp.path().join("templates");
    write_file(&template_dir, "widget.tpl", "<widget {$title}>");
    std::fs::create_dir_all(&include_root).unwrap();

    let engine = TemplateEngine::new(&include_root, &template_dir);
    let mut vars = simple_bindings();
    vars.assign("slot", "{include file='widget.tpl'}").unwrap();

    let result = engine.render("{$slot}", &vars).unwrap();
    assert_eq!(result.output, "<widget My Title>");
    assert_eq!(result.sources, vec![template_dir.join("widget.tpl")]);
}

#[test]
fn test_include_inside_capture() {
    let temp = temp_dir_in_workspace();
    write_file(temp.path(), "nav.tpl", "<nav>{$user.name}</nav>");

    let engine = TemplateEngine::new(temp.path(), temp.path());
    let template = "{capture name='nav'}{include file='nav.tpl'}{/capture}{$nav}{$nav}";
    let result = engine.render(template, &simple_bindings()).unwrap();

    assert_eq!(result.output, "<nav>Alice</nav><nav>Alice</nav>");
}

#[test]
fn test_malformed_include_stays_raw() {
    let vars = Bindings::new();
    for template in ["{include file='x.tpl'", "{include}", "{include file=x.tpl}"] {
        let result = render(template, &vars).unwrap();
        assert_eq!(result, template);
    }
}
