//! End-to-end tests for the `ls` command.

mod common;
use common::prelude::*;

#[test]
fn test_ls_expands_shorthand_targets() {
    let fixture = TestFixture::new().with_config(manifests::SHORTHAND);

    fixture
        .command()
        .arg("ls")
        .assert()
        .success()
        .stdout(predicate::str::starts_with("owner/tree-sitter-foo\n"))
        .stdout(predicate::str::contains("  Foo/\n"))
        .stdout(predicate::str::contains("    include/public.h  <- template public.h\n"))
        .stdout(predicate::str::contains("  FooQueries/\n"))
        .stdout(predicate::str::contains(
            "    Query.swift  <- template Query.swift listing queries/\n",
        ));
}

#[test]
fn test_ls_targets_only() {
    let fixture = TestFixture::new().with_config(manifests::SHORTHAND);

    fixture
        .command()
        .args(["ls", "--targets-only"])
        .assert()
        .success()
        .stdout("Foo\nFooQueries\n");
}

#[test]
fn test_ls_does_not_create_output() {
    let fixture = TestFixture::new().with_config(manifests::EXPLICIT);

    fixture.command().arg("ls").assert().success();
    fixture.child("Sources").assert(predicate::path::missing());
}

#[test]
fn test_ls_rejects_malformed_manifest() {
    let fixture = TestFixture::new().with_config(manifests::INCOMPLETE_SHORTHAND);

    fixture
        .command()
        .arg("ls")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid configuration for repository"));
}
