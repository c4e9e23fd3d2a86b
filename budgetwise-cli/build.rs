use std::path::Path;
use std::process::Command;

// Stamps `--version` with `git describe` so locally modified builds show "-dirty".
fn main() {
    let manifest_dir = std::env::var("CARGO_MANIFEST_DIR").unwrap_or_else(|_| ".".to_string());
    let repo_root = Path::new(&manifest_dir).join("..");

    let git_head = repo_root.join(".git/HEAD");
    if git_head.exists() {
        println!("cargo:rerun-if-changed={}", git_head.display());
    }

    let describe = Command::new("git")
        .arg("-C")
        .arg(&repo_root)
        .args(["describe", "--always", "--dirty", "--abbrev=10"])
        .output()
        .ok()
        .filter(|o| o.status.success())
        .map(|o| String::from_utf8_lossy(&o.stdout).trim().to_string())
        .filter(|s| !s.is_empty());

    let version = match describe {
        Some(d) => d,
        None => format!("{}-nogit", env!("CARGO_PKG_VERSION")),
    };
    println!("cargo:rustc-env=BUDGETWISE_BUILD_SHA={version}");
}
