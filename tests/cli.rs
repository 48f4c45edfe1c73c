use assert_cmd::Command;
use predicates::prelude::*;

fn bookshelf() -> Command {
    Command::cargo_bin("bookshelf").expect("bookshelf binary")
}

#[test]
fn help_lists_options() {
    bookshelf()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("--addr").and(predicate::str::contains("--seed")));
}

#[test]
fn invalid_addr_is_rejected() {
    bookshelf()
        .args(["--addr", "not-an-addr"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid value"));
}

#[test]
fn missing_seed_file_fails_startup() {
    let dir = tempfile::tempdir().expect("tempdir");
    let seed = dir.path().join("books.json");

    bookshelf()
        .args(["--addr", "127.0.0.1:0", "--seed"])
        .arg(&seed)
        .assert()
        .failure()
        .stderr(predicate::str::contains("read seed file"));
}

#[test]
fn invalid_seed_entry_fails_startup() {
    let dir = tempfile::tempdir().expect("tempdir");
    let seed = dir.path().join("books.json");
    std::fs::write(&seed, r#"[{"name":"","pageCount":1,"readPage":0}]"#).expect("write seed");

    bookshelf()
        .args(["--addr", "127.0.0.1:0", "--seed"])
        .arg(&seed)
        .assert()
        .failure()
        .stderr(predicate::str::contains("Please provide the book name"));
}

#[test]
fn rust_log_debug_emits_debug_line_to_stderr() {
    let dir = tempfile::tempdir().expect("tempdir");
    let seed = dir.path().join("missing.json");

    bookshelf()
        .env("RUST_LOG", "debug")
        .args(["--addr", "127.0.0.1:0", "--seed"])
        .arg(&seed)
        .assert()
        .failure()
        .stderr(predicate::str::contains("parsed cli"));
}

#[test]
fn invalid_log_filter_fails_startup() {
    bookshelf()
        .env_remove("RUST_LOG")
        .args(["--addr", "127.0.0.1:0", "--log-filter", "bookshelf=loud"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("init logging"));
}
