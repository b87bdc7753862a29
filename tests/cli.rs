use assert_cmd::Command;
use predicates::prelude::*;
use serde_json::Value;
use std::fs;
use std::path::Path;
use tempfile::tempdir;

fn write_file(path: &Path, content: &str) {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    fs::write(path, content).unwrap();
}

fn texmeter() -> Command {
    Command::new(assert_cmd::cargo::cargo_bin!("texmeter"))
}

#[test]
fn text_report_goes_to_stdout_by_default() {
    let temp = tempdir().unwrap();
    write_file(
        &temp.path().join("main.tex"),
        "\\title{Notes}\n\\section{Intro}\nHello world.\n",
    );

    let assert = texmeter()
        .current_dir(temp.path())
        .arg("--main")
        .arg("main.tex")
        .assert()
        .success();

    let stdout = String::from_utf8_lossy(&assert.get_output().stdout).to_string();
    assert!(stdout.starts_with("Document Info Report\n"));
    assert!(stdout.contains("Main file: main.tex\n"));
    assert!(stdout.contains("Title: Notes\n"));
    assert!(stdout.contains("  - main.tex\n"));
    // "Notes", "Intro", "Hello", "world"
    assert!(stdout.contains("  English words: 4\n"));
    assert!(stdout.contains("  section: 1\n"));
}

#[test]
fn missing_main_exits_with_status_2() {
    let temp = tempdir().unwrap();

    texmeter()
        .current_dir(temp.path())
        .arg("--main")
        .arg("absent.tex")
        .assert()
        .code(2)
        .stdout(predicate::str::is_empty())
        .stderr(predicate::str::contains("[report] Main file not found:"))
        .stderr(predicate::str::contains("absent.tex"));
}

#[test]
fn writes_both_reports_and_creates_parent_dirs() {
    let temp = tempdir().unwrap();
    write_file(
        &temp.path().join("main.tex"),
        "\\section{One}\nalpha\n\\subsection{Two}\nbeta\n",
    );
    let out = temp.path().join("build/reports/info.txt");
    let sections = temp.path().join("build/sections.txt");

    texmeter()
        .current_dir(temp.path())
        .arg("--main")
        .arg("main.tex")
        .arg("--out")
        .arg(&out)
        .arg("--out-sections")
        .arg(&sections)
        .arg("--no-color")
        .assert()
        .success()
        .stdout(predicate::str::is_empty())
        .stderr(predicate::str::contains("[report]").count(2));

    let info = fs::read_to_string(&out).unwrap();
    assert!(info.contains("  subsection: 1\n"));

    let breakdown = fs::read_to_string(&sections).unwrap();
    assert!(breakdown.starts_with("Per-section Character Counts\n"));
    assert!(breakdown.contains("[section] One\n"));
    assert!(breakdown.contains("\t[subsection] Two\n"));
    // "One" + "alpha" + "Two" + "beta"
    assert!(breakdown.contains("[section] One\n\tChinese: 0\n\tEnglish: 15\n"));
}

#[test]
fn quiet_suppresses_report_lines() {
    let temp = tempdir().unwrap();
    write_file(&temp.path().join("main.tex"), "text\n");

    texmeter()
        .current_dir(temp.path())
        .args(["--main", "main.tex", "--out", "out/report.txt", "--quiet"])
        .assert()
        .success()
        .stderr(predicate::str::is_empty());

    assert!(temp.path().join("out/report.txt").is_file());
}

#[test]
fn json_report_includes_counts_and_warnings() {
    let temp = tempdir().unwrap();
    write_file(
        &temp.path().join("main.tex"),
        "\\input{a}\n\\input{nowhere}\n$$x$$ and $y$\n\\includegraphics{fig}\n",
    );
    write_file(&temp.path().join("a.tex"), "\\input{main}\n\\cite{k}\n");
    write_file(&temp.path().join("fig.pdf"), "pdf-bytes");

    let assert = texmeter()
        .current_dir(temp.path())
        .args(["--main", "main.tex", "--format", "json"])
        .assert()
        .success();

    let report: Value = serde_json::from_slice(&assert.get_output().stdout).unwrap();
    assert_eq!(report["formulas"]["display"], 1);
    assert_eq!(report["formulas"]["inline"], 1);
    assert_eq!(report["references"]["cites"], 1);
    assert_eq!(report["files"].as_array().unwrap().len(), 2);
    assert_eq!(report["images"][0]["size"], 9);
    assert_eq!(report["total_image_size"], 9);

    let codes: Vec<&str> = report["warnings"]
        .as_array()
        .unwrap()
        .iter()
        .filter_map(|w| w["code"].as_str())
        .collect();
    assert!(codes.contains(&"MISSING_INCLUDE"));
    assert!(codes.contains(&"DUPLICATE_INCLUDE"));
}

#[test]
fn json_sections_report_lists_entries() {
    let temp = tempdir().unwrap();
    write_file(&temp.path().join("main.tex"), "\\section{Alpha}\n\\paragraph{Beta}\n");

    texmeter()
        .current_dir(temp.path())
        .args([
            "--main",
            "main.tex",
            "--format",
            "json",
            "--out",
            "r.json",
            "--out-sections",
            "s.json",
        ])
        .assert()
        .success();

    let sections: Value =
        serde_json::from_str(&fs::read_to_string(temp.path().join("s.json")).unwrap()).unwrap();
    let entries = sections["entries"].as_array().unwrap();
    assert_eq!(entries.len(), 2);
    assert_eq!(entries[1]["level"], "paragraph");
    assert_eq!(entries[1]["title"], "Beta");
    assert_eq!(sections["levels"].as_array().unwrap().len(), 5);
}

#[test]
fn verbose_prints_warnings() {
    let temp = tempdir().unwrap();
    write_file(&temp.path().join("main.tex"), "\\include{missing}\n");

    texmeter()
        .current_dir(temp.path())
        .args(["--main", "main.tex", "--verbose", "--no-color"])
        .assert()
        .success()
        .stderr(predicate::str::contains("warning[MISSING_INCLUDE]"));
}

#[test]
fn unknown_format_is_an_error() {
    let temp = tempdir().unwrap();
    write_file(&temp.path().join("main.tex"), "text\n");

    texmeter()
        .current_dir(temp.path())
        .args(["--main", "main.tex", "--format", "yaml"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Unknown format: yaml"));
}
