use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::{tempdir, TempDir};

const WORDS: &str = "this\nis\na\nand\ntypo\nfine\nthe\nmain\n";

struct Project {
    dir: TempDir,
    home: TempDir,
    words: PathBuf,
}

impl Project {
    fn new() -> Self {
        let home = tempdir().unwrap();
        let words = home.path().join("words.txt");
        fs::write(&words, WORDS).unwrap();
        Self {
            dir: tempdir().unwrap(),
            home,
            words,
        }
    }

    fn file(&self, name: &str, content: &str) -> PathBuf {
        let path = self.dir.path().join(name);
        fs::write(&path, content).unwrap();
        path
    }

    fn path(&self) -> &Path {
        self.dir.path()
    }

    fn cmd(&self) -> Command {
        let mut cmd = Command::cargo_bin("srcspell").unwrap();
        cmd.current_dir(self.dir.path())
            .env("XDG_CONFIG_HOME", self.home.path().join("config"))
            .env("XDG_DATA_HOME", self.home.path().join("data"))
            .env_remove("RUST_LOG")
            .arg("--no-color")
            .arg("--dictionary")
            .arg(&self.words);
        cmd
    }
}

#[test]
fn test_reports_misspelling() {
    let project = Project::new();
    project.file("main.rs", "fn main() {}\n// This is a tpyo\n");

    project
        .cmd()
        .assert()
        .failure()
        .code(1)
        .stdout(predicate::str::contains("main.rs - Ln 2 Col 14: tpyo"))
        .stdout(predicate::str::contains("→ typo"));
}

#[test]
fn test_clean_project_passes() {
    let project = Project::new();
    project.file("main.rs", "// This is fine\n");

    project
        .cmd()
        .assert()
        .success()
        .stdout(predicate::str::contains("No spelling errors found"));
}

#[test]
fn test_no_fail() {
    let project = Project::new();
    project.file("main.rs", "// tpyo\n");

    project.cmd().arg("--no-fail").assert().success();
}

#[test]
fn test_fix_applies_first_suggestion() {
    let project = Project::new();
    let path = project.file("main.rs", "// This is a tpyo\n");

    project.cmd().arg("--fix").assert().success();
    assert_eq!(fs::read_to_string(path).unwrap(), "// This is a typo\n");
}

#[test]
fn test_interactive_selects_suggestion() {
    let project = Project::new();
    let path = project.file("main.rs", "// This is a tpyo\n");

    project
        .cmd()
        .arg("-i")
        .write_stdin("0\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("0: typo"));
    assert_eq!(fs::read_to_string(path).unwrap(), "// This is a typo\n");
}

#[test]
fn test_interactive_quit_discards_changes() {
    let project = Project::new();
    let path = project.file("main.rs", "// tpyo and tpyo\n");

    project
        .cmd()
        .arg("-i")
        .write_stdin("0\nq\n")
        .assert()
        .failure();
    assert_eq!(fs::read_to_string(path).unwrap(), "// tpyo and tpyo\n");
}

#[test]
fn test_interactive_add_persists_word() {
    let project = Project::new();
    project.file("a.rs", "// tpyo\n");
    project.file("b.rs", "// tpyo again\n");

    // The second file only stops on "again"; end of input then quits.
    project
        .cmd()
        .arg("-i")
        .write_stdin("a\n")
        .assert()
        .failure()
        .stdout(predicate::str::contains("b.rs - Ln 1 Col 9: again"));

    let excluded = fs::read_to_string(project.path().join(".excluded-words")).unwrap();
    assert_eq!(excluded, "tpyo\n");
}

#[test]
fn test_add_to_dict() {
    let project = Project::new();
    project.file("main.rs", "// tpyo\n");

    project.cmd().args(["--add-to-dict", "tpyo"]).assert().success();
    project.cmd().assert().success();
}

#[test]
fn test_json_output() {
    let project = Project::new();
    project.file("main.rs", "// This is a tpyo\n");

    let output = project.cmd().args(["-o", "json"]).output().unwrap();
    assert_eq!(output.status.code(), Some(1));

    let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(json["files_checked"], 1);
    assert_eq!(json["errors"][0]["word"], "tpyo");
    assert_eq!(json["errors"][0]["file"], "main.rs");
    assert_eq!(json["errors"][0]["column"], 14);
    assert_eq!(json["errors"][0]["suggestions"][0], "typo");
}

#[test]
fn test_unknown_language_fails() {
    let project = Project::new();
    project.file("data.xyz", "tpyo");

    project
        .cmd()
        .assert()
        .failure()
        .stderr(predicate::str::contains("No lexer found for: data.xyz"));
}

#[test]
fn test_parse_error_reports_line() {
    let project = Project::new();
    project.file("bad.c", "int x;\n/* never closed\n");

    project
        .cmd()
        .assert()
        .failure()
        .stderr(predicate::str::contains("bad.c: Parse error at line 2."));
}

#[test]
fn test_decode_error() {
    let project = Project::new();
    fs::write(project.path().join("latin.py"), b"# caf\xe9\n").unwrap();

    project
        .cmd()
        .assert()
        .failure()
        .stderr(predicate::str::contains(
            "latin.py: Couldn't decode with 'utf-8' codec.",
        ));
}

#[test]
fn test_empty_file_is_skipped() {
    let project = Project::new();
    project.file("empty.rs", "");

    project.cmd().assert().success();
}

#[test]
fn test_ignore_patterns() {
    let project = Project::new();
    project.file("main.rs", "// fine\n");
    project.file("vendored.js", "// tpyo\n");

    project.cmd().args(["-I", "*.js"]).assert().success();
}

#[test]
fn test_completion() {
    Command::cargo_bin("srcspell")
        .unwrap()
        .args(["--completion", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::contains("srcspell"));
}
