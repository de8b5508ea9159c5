//! Error handling tests for template engine

use super::helpers::write_file;
use super::*;
use crate::template::engine::include::MAX_INCLUDE_DEPTH;
use feke_testkit::temp_dir_in_workspace;

#[test]
fn test_error_include_not_found() {
    let temp = temp_dir_in_workspace();
    let engine = TemplateEngine::new(temp.path(), temp.path());
    let result = engine.render("line one\n{include file='missing.tpl'}", &Bindings::new());

    match result {
        Err(TemplateError::IncludeNotFound { file, path, line }) => {
            assert_eq!(file, "missing.tpl");
            assert_eq!(path, temp.path().join("missing.tpl"));
            assert_eq!(line, 2);
        }
        other => panic!("Expected IncludeNotFound error, got {:?}", other),
    }
}

#[test]
fn test_error_include_escape() {
    let temp = temp_dir_in_workspace();
    let engine = TemplateEngine::new(temp.path(), temp.path());
    let result = engine.render("{include file='../outside.tpl'}", &Bindings::new());

    assert!(matches!(
        result,
        Err(TemplateError::IncludePathEscape { file }) if file == "../outside.tpl"
    ));
}

#[test]
fn test_error_include_cycle() {
    let temp = temp_dir_in_workspace();
    write_file(temp.path(), "a.tpl", "a{include file='b.tpl'}");
    write_file(temp.path(), "b.tpl", "b{include file='a.tpl'}");

    let engine = TemplateEngine::new(temp.path(), temp.path());
    let result = engine.render("{include file='a.tpl'}", &Bindings::new());

    match result {
        Err(TemplateError::IncludeDepthExceeded { max_depth, .. }) => {
            assert_eq!(max_depth, MAX_INCLUDE_DEPTH);
        }
        other => panic!("Expected IncludeDepthExceeded error, got {:?}", other),
    }
}

#[test]
fn test_error_display_mentions_file() {
    let err = TemplateError::IncludeNotFound {
        file: "nav.tpl".to_string(),
        path: std::path::PathBuf::from("/t/nav.tpl"),
        line: 3,
    };
    let message = err.to_string();
    assert!(message.contains("nav.tpl"));
    assert!(message.contains("line 3"));
}
