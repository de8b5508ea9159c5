//! Integration tests for the feke CLI

use assert_cmd::assert::OutputAssertExt;
use assert_cmd::cargo_bin;
use feke_testkit::{TemplateFixture, backdate, with_isolated_feke_env};
use predicates::prelude::*;
use std::fs;
use std::process::Command;

fn feke() -> Command {
    Command::new(cargo_bin!(env!("CARGO_PKG_NAME")))
}

#[test]
fn test_cli_version_flag() {
    with_isolated_feke_env(|_cache| {
        feke()
            .arg("--version")
            .assert()
            .success()
            .stdout(predicate::str::contains("feke"));
    });
}

#[test]
fn test_cli_help_flag() {
    with_isolated_feke_env(|_cache| {
        feke()
            .arg("--help")
            .assert()
            .success()
            .stdout(predicate::str::contains("Usage:"))
            .stdout(predicate::str::contains("render"))
            .stdout(predicate::str::contains("cache"));
    });
}

#[test]
fn test_render_with_vars_to_stdout() {
    with_isolated_feke_env(|_cache| {
        let fixture = TemplateFixture::new();
        fixture.template("hello.tpl", "Hello {$name}{$missing}!");
        fixture.config(false);

        feke()
            .args(["render", "hello.tpl", "--var", "name=World"])
            .current_dir(fixture.root())
            .assert()
            .success()
            .stdout("Hello World!");
    });
}

#[test]
fn test_render_dotted_and_decorated_vars() {
    with_isolated_feke_env(|_cache| {
        let fixture = TemplateFixture::new();
        fixture.template("page.tpl", "{$user.name}|{$css}");
        fixture.config(false);

        feke()
            .args(["render", "page.tpl"])
            .args(["--var", "user.name=Alice"])
            .args(["--var", "css=b.css"])
            .args(["--var", "++css=a.css "])
            .current_dir(fixture.root())
            .assert()
            .success()
            .stdout("Alice|a.css b.css");
    });
}

#[test]
fn test_render_with_vars_file() {
    with_isolated_feke_env(|_cache| {
        let fixture = TemplateFixture::new();
        fixture.template("page.tpl", "{$site.name} {$site.menu.1} {$site.live} {$title}");
        fixture.config(false);
        let vars = fixture.write(
            "vars.json",
            r#"{"site": {"name": "Feke", "menu": ["Home", "About"], "live": true}, "title": "file"}"#,
        );

        // --var is applied after the file and wins
        feke()
            .arg("render")
            .arg("page.tpl")
            .arg("--vars-file")
            .arg(&vars)
            .args(["--var", "title=cli"])
            .current_dir(fixture.root())
            .assert()
            .success()
            .stdout("Feke About true cli");
    });
}

#[test]
fn test_render_with_toml_vars_file() {
    with_isolated_feke_env(|_cache| {
        let fixture = TemplateFixture::new();
        fixture.template("page.tpl", "{$user.name} ({$user.age})");
        fixture.config(false);
        fixture.write("vars.toml", "[user]\nname = \"Alice\"\nage = 30\n");

        feke()
            .args(["render", "page.tpl", "--vars-file", "vars.toml"])
            .current_dir(fixture.root())
            .assert()
            .success()
            .stdout("Alice (30)");
    });
}

#[test]
fn test_render_to_output_file() {
    with_isolated_feke_env(|_cache| {
        let fixture = TemplateFixture::new();
        fixture.template("page.tpl", "<p>{$body}</p>");
        fixture.config(false);

        feke()
            .args(["render", "page.tpl", "--var", "body=hi", "--output", "out.html"])
            .current_dir(fixture.root())
            .assert()
            .success()
            .stdout("")
            .stderr(predicate::str::contains("Rendered page.tpl"));

        let written = fs::read_to_string(fixture.root().join("out.html")).unwrap();
        assert_eq!(written, "<p>hi</p>");
    });
}

#[test]
fn test_render_writes_cache_and_status_reports_fresh() {
    with_isolated_feke_env(|_cache| {
        let fixture = TemplateFixture::new();
        let source = fixture.template("page.tpl", "{$name}");
        backdate(&source, 60);
        fixture.config(true);

        feke()
            .args(["render", "page.tpl", "--var", "name=A"])
            .current_dir(fixture.root())
            .assert()
            .success()
            .stdout("A");

        assert!(fixture.cache().join("page.cache").exists());

        let output = feke()
            .args(["cache", "status", "page.tpl", "--json"])
            .current_dir(fixture.root())
            .output()
            .unwrap();
        assert!(output.status.success());

        let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
        assert_eq!(json["template"], "page.tpl");
        assert_eq!(json["cache_enabled"], true);
        assert_eq!(json["entry"]["fresh"], true);
        assert_eq!(json["entry"]["header"]["template"], "page.tpl");
        assert_eq!(json["entry"]["header"]["output_len"], 1);
    });
}

#[test]
fn test_cache_status_without_entry() {
    with_isolated_feke_env(|_cache| {
        let fixture = TemplateFixture::new();
        fixture.template("page.tpl", "x");
        fixture.config(true);

        feke()
            .args(["cache", "status", "page.tpl"])
            .current_dir(fixture.root())
            .assert()
            .success()
            .stdout(predicate::str::contains("No cache entry for page.tpl"));
    });
}

#[test]
fn test_cache_clear_removes_entries() {
    with_isolated_feke_env(|_cache| {
        let fixture = TemplateFixture::new();
        fixture.template("a.tpl", "a");
        fixture.template("b.tpl", "b");
        fixture.config(true);

        for template in ["a.tpl", "b.tpl"] {
            feke()
                .args(["render", template])
                .current_dir(fixture.root())
                .assert()
                .success();
        }

        feke()
            .args(["cache", "clear"])
            .current_dir(fixture.root())
            .assert()
            .success()
            .stdout(predicate::str::contains("Removed 2 cache entries"));

        assert!(!fixture.cache().join("a.cache").exists());
        assert!(!fixture.cache().join("b.cache").exists());
    });
}

#[test]
fn test_no_cache_flag_skips_cache() {
    with_isolated_feke_env(|_cache| {
        let fixture = TemplateFixture::new();
        fixture.template("page.tpl", "x");
        fixture.config(true);

        feke()
            .args(["render", "page.tpl", "--no-cache"])
            .current_dir(fixture.root())
            .assert()
            .success();

        assert!(!fixture.cache().join("page.cache").exists());
    });
}

#[test]
fn test_invalid_cache_flag_renders_uncached() {
    with_isolated_feke_env(|_cache| {
        let fixture = TemplateFixture::new();
        fixture.template("page.tpl", "x");
        fixture.config(true);

        feke()
            .args(["render", "page.tpl", "--cache", "sometimes"])
            .current_dir(fixture.root())
            .assert()
            .success()
            .stdout("x")
            .stderr(predicate::str::contains("rendering without cache"));

        assert!(!fixture.cache().join("page.cache").exists());
    });
}

#[test]
fn test_missing_template_fails() {
    with_isolated_feke_env(|_cache| {
        let fixture = TemplateFixture::new();
        fixture.config(true);

        feke()
            .args(["render", "missing.tpl"])
            .current_dir(fixture.root())
            .assert()
            .failure()
            .code(1)
            .stderr(predicate::str::contains("Error:"))
            .stderr(predicate::str::contains("missing.tpl"));
    });
}

#[test]
fn test_invalid_var_fails() {
    with_isolated_feke_env(|_cache| {
        let fixture = TemplateFixture::new();
        fixture.template("page.tpl", "x");
        fixture.config(false);

        feke()
            .args(["render", "page.tpl", "--var", "novalue"])
            .current_dir(fixture.root())
            .assert()
            .failure()
            .stderr(predicate::str::contains("expected NAME=VALUE"));

        feke()
            .args(["render", "page.tpl", "--var", "bad name=x"])
            .current_dir(fixture.root())
            .assert()
            .failure()
            .stderr(predicate::str::contains("Invalid variable name"));
    });
}

#[test]
fn test_render_without_config_uses_current_dir() {
    with_isolated_feke_env(|_cache| {
        let fixture = TemplateFixture::new();
        fixture.write("plain.tpl", "{* note *}plain {$v}");

        feke()
            .args(["render", "plain.tpl", "--var", "v=ok"])
            .current_dir(fixture.root())
            .assert()
            .success()
            .stdout("plain ok");
    });
}

#[test]
fn test_template_dir_env_override() {
    with_isolated_feke_env(|_cache| {
        let fixture = TemplateFixture::new();
        fixture.write("other/page.tpl", "[{include file='part.tpl'}]");
        fixture.write("other/part.tpl", "from other");
        fixture.config(false);

        feke()
            .args(["render", "page.tpl"])
            .env("FEKE_TEMPLATE_DIR", fixture.root().join("other"))
            .current_dir(fixture.root())
            .assert()
            .success()
            .stdout("[from other]");
    });
}

#[test]
fn test_explicit_missing_config_fails() {
    with_isolated_feke_env(|_cache| {
        let fixture = TemplateFixture::new();

        feke()
            .args(["--config", "nope.toml", "render", "page.tpl"])
            .current_dir(fixture.root())
            .assert()
            .failure()
            .stderr(predicate::str::contains("CONFIG_NOT_FOUND"));
    });
}

#[test]
fn test_render_rejects_template_outside_template_dir() {
    with_isolated_feke_env(|_cache| {
        let fixture = TemplateFixture::new();
        fixture.write("secret.txt", "TOP SECRET");
        fixture.config(false);

        feke()
            .args(["render", "../secret.txt"])
            .current_dir(fixture.root())
            .assert()
            .failure()
            .stdout(predicate::str::contains("TOP SECRET").not())
            .stderr(predicate::str::contains("must be relative"));
    });
}
