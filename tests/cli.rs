// tests/cli.rs — Testing CLI subcommands, outputs, and errors

mod common;
use common::{calc_diff_json, make_fixture, run_fixmine};

#[test]
fn test_span_prints_block() {
    let fixture = make_fixture(&[(
        "Foo.java",
        "class Foo {\n    void f() {\n        s = \"}\";\n    }\n}\n",
    )]);
    let file = fixture.path().join("Foo.java");

    let out = run_fixmine(&["span", file.to_str().unwrap(), "--line", "2", "--column", "5"]);
    assert!(out.status.success(), "span exited non-zero: {:?}", out.status);
    let stdout = String::from_utf8_lossy(&out.stdout);
    assert_eq!(stdout, "    void f() {\n        s = \"}\";\n    }\n");
}

#[test]
fn test_span_warns_when_unterminated() {
    let fixture = make_fixture(&[("Open.java", "void f() {\n  g();\n")]);
    let file = fixture.path().join("Open.java");

    let out = run_fixmine(&["span", file.to_str().unwrap(), "-l", "1"]);
    assert!(out.status.success());
    let stderr = String::from_utf8_lossy(&out.stderr);
    assert!(stderr.contains("never balanced"), "missing warning:\n{}", stderr);
}

#[test]
fn test_span_rejects_line_past_end() {
    let fixture = make_fixture(&[("Tiny.java", "class T {}\n")]);
    let file = fixture.path().join("Tiny.java");

    let out = run_fixmine(&["span", file.to_str().unwrap(), "--line", "40"]);
    assert!(!out.status.success());
    let stderr = String::from_utf8_lossy(&out.stderr);
    assert!(stderr.contains("[ERROR]"), "stderr:\n{}", stderr);
}

#[test]
fn test_span_rejects_zero_line() {
    let fixture = make_fixture(&[("Tiny.java", "class T {}\n")]);
    let file = fixture.path().join("Tiny.java");

    let out = run_fixmine(&["span", file.to_str().unwrap(), "--line", "0"]);
    assert!(!out.status.success());
}

#[test]
fn test_nonexistent_diff_dir_fails() {
    let out = run_fixmine(&["methods", "/nonexistent/path/that/does/not/exist"]);
    assert!(!out.status.success(), "Should fail for nonexistent directory");
}

#[test]
fn test_changed_lists_declarations() {
    let json = calc_diff_json();
    let fixture = make_fixture(&[("closure-1.json", json.as_str())]);
    let file = fixture.path().join("closure-1.json");

    let out = run_fixmine(&["changed", file.to_str().unwrap()]);
    assert!(out.status.success());
    let stdout = String::from_utf8_lossy(&out.stdout);
    assert!(stdout.contains("src/demo/Calc.java"), "stdout:\n{}", stdout);
    assert!(stdout.contains("compute"), "stdout:\n{}", stdout);
    assert!(!stdout.contains("helper"), "stdout:\n{}", stdout);
}

#[test]
fn test_changed_honours_type_marker() {
    let diff = " Node build(int n) {\n-  return null;\n }\n";
    let json = serde_json::json!({ "A.java": diff }).to_string();
    let fixture = make_fixture(&[("a.json", json.as_str())]);
    let file = fixture.path().join("a.json");

    let default = run_fixmine(&["changed", file.to_str().unwrap()]);
    assert!(!String::from_utf8_lossy(&default.stdout).contains("build"));

    let marked = run_fixmine(&["changed", file.to_str().unwrap(), "--type-marker", "Node"]);
    assert!(String::from_utf8_lossy(&marked.stdout).contains("build"));
}

#[test]
fn test_changed_rejects_malformed_json() {
    let fixture = make_fixture(&[("bad.json", "not json")]);
    let out = run_fixmine(&["changed", fixture.path().join("bad.json").to_str().unwrap()]);
    assert!(!out.status.success());
}

#[test]
fn test_version_flag() {
    let out = run_fixmine(&["--version"]);
    assert!(out.status.success());
    let stdout = String::from_utf8_lossy(&out.stdout);
    assert!(stdout.contains("fixmine"), "stdout:\n{}", stdout);
}
