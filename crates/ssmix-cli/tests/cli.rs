use std::path::{Path, PathBuf};
use std::process::{Command, Output};

use serde_json::Value;
use tempfile::TempDir;

const MESSAGE: &str = "MSH|^~\\&|HIS|HOSP|SSMIX|HOSP|20210805120000||RDE^O11^RDE_O11|1|P|2.5\r\
PID|1||0000000001^^^^PI||山田^太郎\r\
ORC|NW|ORD001^HIS\r\
RXE||103835401^ムコダイン錠２５０ｍｇ^HOT|1||TAB^錠^MR9P\r\
ZZZ|1\r";

fn standards_dir() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("../../standards")
}

fn run(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_ssmix-jsonizer"))
        .args(args)
        .arg("--standards-dir")
        .arg(standards_dir())
        .env_remove("RUST_LOG")
        .output()
        .expect("run ssmix-jsonizer")
}

fn write_message(dir: &Path) -> PathBuf {
    let folder = dir.join("000/000/0000000001/20210805/OMP-01");
    std::fs::create_dir_all(&folder).unwrap();
    let path = folder.join("0000000001_20210805_OMP-01_1_20210805120000000_01_1");
    std::fs::write(&path, MESSAGE).unwrap();
    path
}

fn lines(output: &Output) -> Vec<Value> {
    String::from_utf8(output.stdout.clone())
        .unwrap()
        .lines()
        .map(|line| serde_json::from_str(line).unwrap())
        .collect()
}

#[test]
fn jsonize_storage_tree() {
    let dir = TempDir::new().unwrap();
    write_message(dir.path());

    let output = run(&["jsonize", "--encoding", "utf-8", dir.path().to_str().unwrap()]);
    assert!(output.status.success(), "{output:?}");

    let documents = lines(&output);
    assert_eq!(documents.len(), 1);
    let document = &documents[0];
    assert_eq!(document["MSH"]["MSH-2 Encoding Characters"], "^~\\&");
    assert_eq!(
        document["PID"]["PID-5 Patient Name_Nested"][0]["XPN.1 Family Name"],
        "**DEIDENTIFIED**"
    );
    assert_eq!(document["ORDER_Nested"][0]["ORC"]["ORC-1 Order Control"], "NW");
}

#[test]
fn jsonize_with_diagnostics_and_overrides() {
    let dir = TempDir::new().unwrap();
    let path = write_message(dir.path());

    let output = run(&[
        "jsonize",
        "--encoding",
        "utf-8",
        "--with-diagnostics",
        "--keep-identifiers",
        "--nest-suffix",
        "_List",
        path.to_str().unwrap(),
    ]);
    assert!(output.status.success(), "{output:?}");

    let records = lines(&output);
    let record = &records[0];
    assert_eq!(record["category"], "OMP-01");
    assert_eq!(
        record["document"]["PID"]["PID-5 Patient Name_List"][0]["XPN.2 Given Name"],
        "太郎"
    );
    assert!(record["document"].get("ORDER_List").is_some());
    let diagnostics = record["diagnostics"].as_array().unwrap();
    assert_eq!(diagnostics.len(), 1);
    assert_eq!(diagnostics[0]["kind"], "unknown_segment_for_category");
}

#[test]
fn jsonize_fails_without_category() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("message.hl7");
    std::fs::write(&path, MESSAGE).unwrap();

    let output = run(&["jsonize", "--encoding", "utf-8", path.to_str().unwrap()]);
    assert_eq!(output.status.code(), Some(1));
    assert!(output.stdout.is_empty());

    let output = run(&[
        "jsonize",
        "--encoding",
        "utf-8",
        "--category",
        "omp-01",
        path.to_str().unwrap(),
    ]);
    assert!(output.status.success(), "{output:?}");
    assert_eq!(lines(&output).len(), 1);
}

#[test]
fn jsonize_rejects_unknown_encoding() {
    let dir = TempDir::new().unwrap();
    let path = write_message(dir.path());

    let output = run(&["jsonize", "--encoding", "klingon", path.to_str().unwrap()]);
    assert_eq!(output.status.code(), Some(1));
    assert!(String::from_utf8_lossy(&output.stderr).contains("klingon"));
}

#[test]
fn jsonize_reads_config_file() {
    let dir = TempDir::new().unwrap();
    let path = write_message(dir.path());
    let config = dir.path().join("jsonizer.toml");
    std::fs::write(
        &config,
        "[jsonizer.nesting]\nprefix = \"G_\"\n\n[read]\nencoding = \"utf-8\"\n",
    )
    .unwrap();

    let output = run(&[
        "jsonize",
        "--config",
        config.to_str().unwrap(),
        path.to_str().unwrap(),
    ]);
    assert!(output.status.success(), "{output:?}");
    assert!(lines(&output)[0].get("G_ORDER_Nested").is_some());
}

#[test]
fn categories_lists_group_arrays() {
    let output = run(&["categories"]);
    assert!(output.status.success(), "{output:?}");
    let stdout = String::from_utf8(output.stdout).unwrap();
    assert!(stdout.contains("OMP-11"));
    assert!(stdout.contains("ADMINISTRATION"));
    assert!(stdout.contains("PPR-01"));
}

#[test]
fn standards_prints_doctor_report() {
    let output = run(&["standards"]);
    assert!(output.status.success(), "{output:?}");
    let report: Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(report["schema"], "ssmix-jsonizer.standards-doctor");
    assert_eq!(report["counts"]["segments"], 20);
}
