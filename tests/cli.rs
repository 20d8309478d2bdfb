//! CLI contract tests for `lexrag`.
#![cfg(feature = "cli")]

use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;
use std::fs;

fn lexrag() -> assert_cmd::Command {
    cargo_bin_cmd!("lexrag")
}

fn corpus(dir: &std::path::Path, name: &str, body: &str) -> String {
    let path = dir.join(name);
    fs::write(&path, body).expect("write corpus");
    path.to_str().unwrap().to_string()
}

#[test]
fn search_ranks_literal_match_first() {
    let tmp = tempfile::tempdir().expect("tempdir");
    let input = corpus(tmp.path(), "docs.txt", "the cat sat\nthe dog ran\ncats and dogs\n");

    lexrag()
        .args(["search", "--input", input.as_str(), "-k", "2", "cat"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Results for \"cat\":"))
        .stdout(predicate::str::contains(
            "  Doc 0: score 0.7071 [document_0] the cat sat",
        ))
        .stdout(predicate::str::contains("  Doc 1: score 0.0000 [document_1] the dog ran"))
        .stdout(predicate::str::contains("cats and dogs").not());
}

#[test]
fn search_skips_blank_lines() {
    let tmp = tempfile::tempdir().expect("tempdir");
    let input = corpus(tmp.path(), "docs.txt", "\nalpha\n\n   \nbeta\n");

    lexrag()
        .args(["search", "--input", input.as_str(), "-k", "5", "beta"])
        .assert()
        .success()
        .stdout(predicate::str::contains("  Doc 1: score 1.0000 [document_1] beta"))
        .stdout(predicate::str::contains("Doc 2").not());
}

#[test]
fn search_jsonl_keeps_metadata() {
    let tmp = tempfile::tempdir().expect("tempdir");
    let input = corpus(
        tmp.path(),
        "docs.jsonl",
        concat!(
            r#"{"text": "Flask is a web framework", "metadata": {"source": "kb_flask"}}"#,
            "\n",
            r#"{"text": "ChromaDB stores embeddings"}"#,
            "\n",
        ),
    );

    lexrag()
        .args(["search", "--input", input.as_str(), "--jsonl", "-k", "2", "flask"])
        .assert()
        .success()
        .stdout(predicate::str::contains("[kb_flask] Flask is a web framework"))
        .stdout(predicate::str::contains("[document_1] ChromaDB stores embeddings"));
}

#[test]
fn context_joins_documents() {
    let tmp = tempfile::tempdir().expect("tempdir");
    let input = corpus(
        tmp.path(),
        "docs.txt",
        "rust ownership rules\npython garbage collection\nrust borrow checker\n",
    );

    lexrag()
        .args(["context", "--input", input.as_str(), "rust", "borrow"])
        .assert()
        .success()
        .stdout("rust borrow checker\n\nrust ownership rules\n");
}

#[test]
fn zero_k_is_rejected() {
    let tmp = tempfile::tempdir().expect("tempdir");
    let input = corpus(tmp.path(), "docs.txt", "one\ntwo\n");

    lexrag()
        .args(["search", "--input", input.as_str(), "-k", "0", "one"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("n_results must be positive"));
}

#[test]
fn malformed_jsonl_reports_line() {
    let tmp = tempfile::tempdir().expect("tempdir");
    let input = corpus(tmp.path(), "docs.jsonl", "{\"text\": \"ok\"}\nnot json\n");

    lexrag()
        .args(["search", "--input", input.as_str(), "--jsonl", "ok"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("docs.jsonl:2"));
}
