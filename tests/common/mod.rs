// tests/common/mod.rs — Shared helpers for integration tests

use std::fs;
use std::path::PathBuf;
pub use tempfile::TempDir;

/// Resolve the compiled binary from the workspace target directory
pub fn fixmine_bin() -> PathBuf {
    let mut path = std::env::current_exe()
        .expect("current_exe")
        .parent()
        .expect("parent")
        .to_path_buf();

    if path.ends_with("deps") {
        path.pop();
    }
    path.join("fixmine")
}

/// Execute the fixmine binary with given arguments, isolated from any
/// user-level config.toml.
pub fn run_fixmine(args: &[&str]) -> std::process::Output {
    std::process::Command::new(fixmine_bin())
        .args(args)
        .env("XDG_CONFIG_HOME", std::env::temp_dir().join("fixmine-tests-no-config"))
        .env("NO_COLOR", "1")
        .output()
        .expect("Failed to execute fixmine binary")
}

/// Create a temporary directory with a set of named files and content.
pub fn make_fixture(files: &[(&str, &str)]) -> TempDir {
    let dir = TempDir::new().expect("TempDir::new");
    for (name, content) in files {
        let path = dir.path().join(name);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(&path, content).unwrap();
    }
    dir
}

/// A diff JSON with one entry whose removed line sits inside `compute`.
#[allow(dead_code)]
pub fn calc_diff_json() -> String {
    let diff = "\
@@ -1,9 +1,9 @@
 public class Calc {
     public int compute(int x) {
         // closing } in a comment
-        return x + 1;
+        return x + 2;
     }

     private int helper() { return 0; }
 }
";
    serde_json::json!({ "src/demo/Calc.java": diff }).to_string()
}
