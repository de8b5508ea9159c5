//! Linear-time checks for TokenStream

use super::tokenize::{test_counter, TokenStream};
use super::*;

fn assert_linear(text: &str) -> usize {
    test_counter::reset();
    let count = TokenStream::new(text).count();
    let steps = test_counter::get();
    assert!(
        steps <= text.len() * 3,
        "Expected at most {} steps, got {}",
        text.len() * 3,
        steps
    );
    count
}

#[test]
fn test_many_placeholders_linear() {
    let text = "x {$key} y ".repeat(2_000);
    assert_eq!(assert_linear(&text), 2_000);
}

#[test]
fn test_many_lone_braces_linear() {
    let text = "{{{{ {a {$ ".repeat(2_000);
    assert_eq!(assert_linear(&text), 0);
}

#[test]
fn test_unclosed_comment_rescanned_once() {
    let text = format!("{{* {}", "{* {$a} ".repeat(2_000));
    assert_eq!(assert_linear(&text), 2_000);
}

#[test]
fn test_render_large_template_completes() {
    let mut vars = Bindings::new();
    vars.assign("name", "v").unwrap();
    let template = "<li>{$name}</li>{* c *}\n".repeat(5_000);
    let result = render(&template, &vars).unwrap();
    assert_eq!(result, "<li>v</li>\n".repeat(5_000));
}
