use assert_cmd::Command;
use flate2::write::GzEncoder;
use flate2::Compression;
use predicates::prelude::*;
use std::io::Write;
use tempfile::{Builder, NamedTempFile};

const SMALL_LM: &str = "\\data\\
ngram 1=4
ngram 2=2
ngram 3=1

\\1-grams:
-1.0 <s> -0.5
-0.7 the -0.3
-0.9 cat
-1.1 </s>

\\2-grams:
-0.4 <s> the -0.2
-0.3 the cat

\\3-grams:
-0.1 <s> the cat

\\end\\
";

fn arpa_cmd() -> Command {
    Command::cargo_bin("arpa").expect("binary should be built")
}

fn model_file(contents: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(contents.as_bytes()).unwrap();
    file.flush().unwrap();
    file
}

#[test]
fn test_cli_summarises_file() {
    let file = model_file(SMALL_LM);

    arpa_cmd()
        .arg("--input")
        .arg(file.path())
        .assert()
        .success()
        .stdout(
            "order 1: declared 4, read 4\n\
             order 2: declared 2, read 2\n\
             order 3: declared 1, read 1\n\
             vocabulary: 5 words\n",
        );
}

#[test]
fn test_cli_reads_stdin() {
    arpa_cmd()
        .write_stdin(SMALL_LM)
        .assert()
        .success()
        .stdout(predicate::str::contains("order 3: declared 1, read 1"));
}

#[test]
fn test_cli_max_order() {
    let file = model_file(SMALL_LM);

    arpa_cmd()
        .arg("--input")
        .arg(file.path())
        .arg("--max-order")
        .arg("2")
        .assert()
        .success()
        .stdout(predicate::str::contains("order 2: declared 2, read 2"))
        .stdout(predicate::str::contains("order 3").not());
}

#[test]
fn test_cli_mmap() {
    let file = model_file(SMALL_LM);

    arpa_cmd()
        .arg("--input")
        .arg(file.path())
        .arg("--mmap")
        .assert()
        .success()
        .stdout(predicate::str::contains("vocabulary: 5 words"));
}

#[test]
fn test_cli_gzip_input() {
    let file = Builder::new().suffix(".arpa.gz").tempfile().unwrap();
    let mut encoder = GzEncoder::new(file.reopen().unwrap(), Compression::default());
    encoder.write_all(SMALL_LM.as_bytes()).unwrap();
    encoder.finish().unwrap();

    arpa_cmd()
        .arg("--input")
        .arg(file.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("order 1: declared 4, read 4"));
}

#[test]
fn test_cli_rejects_positive_probability() {
    let file = model_file("\\data\\\nngram 1=1\n\n\\1-grams:\n0.5 a\n\\end\\\n");

    arpa_cmd()
        .arg("--input")
        .arg(file.path())
        .arg("--quiet")
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("Error: bad ARPA line 5"))
        .stderr(predicate::str::contains("0.5 a"));
}

#[test]
fn test_cli_missing_unigram_section() {
    let file = model_file("\\data\\\nngram 1=1\n");

    arpa_cmd()
        .arg("--input")
        .arg(file.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("without a \\1-grams: section"));
}

#[test]
fn test_cli_missing_file() {
    arpa_cmd()
        .arg("--input")
        .arg("this_file_should_not_exist.arpa")
        .assert()
        .failure()
        .stderr(predicate::str::contains("I/O error"));
}

#[test]
fn test_cli_zero_max_order() {
    arpa_cmd()
        .arg("--max-order")
        .arg("0")
        .write_stdin(SMALL_LM)
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid configuration"));
}

#[test]
fn test_cli_count_mismatch_warns() {
    let file = model_file("\\data\\\nngram 1=3\n\n\\1-grams:\n-1.0 a\n\\end\\\n");

    arpa_cmd()
        .arg("--input")
        .arg(file.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("order 1: declared 3, read 1"))
        .stderr(predicate::str::contains("Declared n-gram count differs"));
}
