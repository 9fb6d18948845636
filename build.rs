// LogLens - GPL-3.0-or-later
// Embeds the git revision so log output can name the exact build

use std::process::{Command, Output};

fn git(args: &[&str]) -> Option<Output> {
    Command::new("git")
        .args(args)
        .output()
        .ok()
        .filter(|output| output.status.success())
}

fn main() {
    let hash = git(&["rev-parse", "--short", "HEAD"])
        .and_then(|output| String::from_utf8(output.stdout).ok())
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty());

    let dirty = git(&["status", "--porcelain"]).is_some_and(|output| !output.stdout.is_empty());

    let revision = match (hash, dirty) {
        (Some(hash), true) => format!("{hash}-dirty"),
        (Some(hash), false) => hash,
        (None, _) => "unknown".to_string(),
    };
    println!("cargo:rustc-env=GIT_HASH={revision}");

    println!("cargo:rerun-if-changed=.git/HEAD");
    println!("cargo:rerun-if-changed=.git/index");
}
