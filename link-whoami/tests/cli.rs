//! CLI behavior tests for link-whoami

use assert_cmd::Command;
use predicates::prelude::*;

fn cmd() -> Command {
    let mut cmd = Command::cargo_bin("link-whoami").expect("binary builds");
    cmd.env_remove("LINKEDIN_ACCESS_TOKEN");
    cmd
}

#[test]
fn missing_token_fails_fast() {
    cmd()
        .assert()
        .failure()
        .code(3)
        .stderr(predicate::str::contains("LINKEDIN_ACCESS_TOKEN"));
}
