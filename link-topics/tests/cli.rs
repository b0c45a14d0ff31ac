//! CLI behavior tests for link-topics

use assert_cmd::Command;
use predicates::prelude::*;

fn cmd() -> Command {
    let mut cmd = Command::cargo_bin("link-topics").expect("binary builds");
    cmd.env_remove("NEWSAPI_KEY");
    cmd
}

#[test]
fn missing_news_key_fails_fast() {
    cmd()
        .assert()
        .failure()
        .code(3)
        .stderr(predicate::str::contains("NEWSAPI_KEY"));
}

#[test]
fn rejects_unknown_flag() {
    cmd().arg("--nope").assert().failure();
}
