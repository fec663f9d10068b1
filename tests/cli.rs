mod common;

use std::fs;

use assert_cmd::Command;
use common::TestWorkspace;
use predicates::str::contains;

const HEADINGS: [&str; 4] = ["file_name_1", "dc:title", "dc:subject", "dc:creator"];

fn metagen() -> Command {
    Command::cargo_bin("csv-metagen").expect("binary exists")
}

#[test]
fn generate_writes_rows_to_stdout() {
    let workspace = TestWorkspace::new();
    let headings = workspace.headings(&HEADINGS);
    metagen()
        .args([
            "generate",
            "--schema",
            headings.to_str().unwrap(),
            "/scans/Photo_01.jpg",
            "/scans/Photo_02.jpg",
        ])
        .assert()
        .success()
        .stdout(
            "file_name_1,dc:title,dc:subject,dc:creator\n\
             Photo_01.jpg,Photo_01,,\n\
             Photo_02.jpg,Photo_02,,\n",
        );
}

#[test]
fn generate_merges_metadata_into_output_file() {
    let workspace = TestWorkspace::new();
    let headings = workspace.headings(&HEADINGS);
    let metadata = workspace.write(
        "metadata.csv",
        "Filename,dc:subject,dc:creator,Notes\n\
         photo-01,Landscape,\"Smith, J.\",ignored\n\
         Photo 02,Harbour,,\n",
    );
    let output = workspace.path().join("generated.csv");
    metagen()
        .args([
            "generate",
            "-s",
            headings.to_str().unwrap(),
            "--metadata",
            metadata.to_str().unwrap(),
            "-o",
            output.to_str().unwrap(),
            "/scans/Photo_01.jpg",
            "/scans/Photo_02.jpg",
            "/scans/Photo_03.jpg",
        ])
        .assert()
        .success();

    let contents = fs::read_to_string(&output).expect("read output");
    let lines = contents.lines().collect::<Vec<_>>();
    assert_eq!(
        lines,
        vec![
            "file_name_1,dc:title,dc:subject,dc:creator",
            "Photo_01.jpg,Photo_01,Landscape,\"Smith, J.\"",
            "Photo_02.jpg,Photo_02,Harbour,",
            "Photo_03.jpg,Photo_03,,",
        ]
    );
}

#[test]
fn generate_without_files_fails() {
    let workspace = TestWorkspace::new();
    let headings = workspace.headings(&HEADINGS);
    metagen()
        .args(["generate", "--schema", headings.to_str().unwrap()])
        .assert()
        .failure()
        .stderr(contains("No files selected"));
}

#[test]
fn generate_with_empty_headings_fails() {
    let workspace = TestWorkspace::new();
    let headings = workspace.write("headings.csv", "");
    metagen()
        .args(["generate", "--schema", headings.to_str().unwrap(), "a.jpg"])
        .assert()
        .failure()
        .stderr(contains("Failed to load CSV headings"));
}

#[test]
fn generate_reads_directory_and_profile() {
    let workspace = TestWorkspace::new();
    let headings = workspace.write("schema/alma.csv", "Filename,Title,Notes\n");
    workspace.write("scans/b.tif", "");
    workspace.write("scans/a.tif", "");
    workspace.write("scans/readme.txt", "");
    let profile = workspace.write(
        "profile.yaml",
        &format!(
            "headings: {}\nroles:\n  filename: Filename\n  title: Title\n",
            headings.display()
        ),
    );
    let scans = workspace.path().join("scans");
    metagen()
        .args([
            "generate",
            "--profile",
            profile.to_str().unwrap(),
            "--dir",
            scans.to_str().unwrap(),
            "--extension",
            "tif",
        ])
        .assert()
        .success()
        .stdout("Filename,Title,Notes\na.tif,a,\nb.tif,b,\n");
}

#[test]
fn merge_command_updates_previous_export_and_reports() {
    let workspace = TestWorkspace::new();
    let headings = workspace.headings(&HEADINGS);
    let rows = workspace.write(
        "rows.csv",
        "dc:title,file_name_1,dc:subject,dc:creator\n\
         Photo_01,Photo_01.jpg,Kept,\n\
         Photo_02,Photo_02.jpg,,\n",
    );
    let metadata = workspace.write(
        "metadata.tsv",
        "filename\tdc:subject\tdc:creator\nphoto_01\tReplaced\tLee\nphoto_02\tSea\t\n",
    );
    let output = workspace.path().join("merged.csv");
    let report = workspace.path().join("summary.json");
    metagen()
        .args([
            "merge",
            "-s",
            headings.to_str().unwrap(),
            "-i",
            rows.to_str().unwrap(),
            "--metadata",
            metadata.to_str().unwrap(),
            "-o",
            output.to_str().unwrap(),
            "--report",
            report.to_str().unwrap(),
        ])
        .assert()
        .success();

    let contents = fs::read_to_string(&output).expect("read output");
    assert_eq!(
        contents,
        "file_name_1,dc:title,dc:subject,dc:creator\n\
         Photo_01.jpg,Photo_01,Kept,Lee\n\
         Photo_02.jpg,Photo_02,Sea,\n"
    );

    let summary: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(&report).expect("read report"))
            .expect("parse report");
    assert_eq!(summary["match_column"], "filename");
    assert_eq!(summary["merged_rows"], 2);
    assert_eq!(summary["merged_fields"], 2);
    assert_eq!(summary["total_rows"], 2);
}

#[test]
fn merge_rejects_metadata_without_join_column() {
    let workspace = TestWorkspace::new();
    let headings = workspace.headings(&HEADINGS);
    let rows = workspace.write(
        "rows.csv",
        "file_name_1,dc:title,dc:subject,dc:creator\nPhoto_01.jpg,Photo_01,,\n",
    );
    let metadata = workspace.write("metadata.csv", "Object,dc:subject\nphoto-01,Sea\n");
    let output = workspace.path().join("merged.csv");
    metagen()
        .args([
            "merge",
            "-s",
            headings.to_str().unwrap(),
            "-i",
            rows.to_str().unwrap(),
            "--metadata",
            metadata.to_str().unwrap(),
            "-o",
            output.to_str().unwrap(),
        ])
        .assert()
        .failure()
        .stderr(contains("expected one of: 'file_name_1', 'dc:identifier'"));
    assert!(!output.exists());
}

#[test]
fn merge_rejects_rows_with_foreign_columns() {
    let workspace = TestWorkspace::new();
    let headings = workspace.headings(&HEADINGS);
    let rows = workspace.write("rows.csv", "file_name_1,dc:title\nPhoto_01.jpg,Photo_01\n");
    let metadata = workspace.write("metadata.csv", "Filename,dc:subject\nphoto-01,Sea\n");
    metagen()
        .args([
            "merge",
            "-s",
            headings.to_str().unwrap(),
            "-i",
            rows.to_str().unwrap(),
            "--metadata",
            metadata.to_str().unwrap(),
        ])
        .assert()
        .failure()
        .stderr(contains("Row columns do not match the schema"));
}

#[test]
fn preview_shows_only_populated_columns() {
    let workspace = TestWorkspace::new();
    let rows = workspace.write(
        "rows.csv",
        "file_name_1,dc:title,dc:subject,dc:creator\n\
         a.jpg,a,,\n\
         b.jpg,b,,Smith\n",
    );
    metagen()
        .args(["preview", "-i", rows.to_str().unwrap()])
        .assert()
        .success()
        .stdout(
            "file_name_1  dc:title  dc:creator\n\
             -----------  --------  ----------\n\
             a.jpg        a\n\
             b.jpg        b         Smith\n",
        );
}

#[test]
fn headings_lists_roles() {
    let workspace = TestWorkspace::new();
    let headings = workspace.headings(&HEADINGS);
    metagen()
        .args(["headings", "--schema", headings.to_str().unwrap()])
        .assert()
        .success()
        .stdout(contains("file_name_1  filename"))
        .stdout(contains("dc:title     title"));
}

#[test]
fn generate_reads_path_list_from_stdin() {
    let workspace = TestWorkspace::new();
    let headings = workspace.headings(&HEADINGS);
    metagen()
        .args([
            "generate",
            "--schema",
            headings.to_str().unwrap(),
            "--files-from",
            "-",
        ])
        .write_stdin("/x/a.jpg\n# c\n\n/x/b.jpg\n")
        .assert()
        .success()
        .stdout(
            "file_name_1,dc:title,dc:subject,dc:creator\n\
             a.jpg,a,,\n\
             b.jpg,b,,\n",
        );
}

#[test]
fn generate_decodes_metadata_with_input_encoding() {
    let workspace = TestWorkspace::new();
    let headings = workspace.headings(&HEADINGS);
    let metadata =
        workspace.write_bytes("metadata.csv", b"Filename,dc:subject\nphoto-01,Caf\xe9\n");
    metagen()
        .args([
            "generate",
            "--schema",
            headings.to_str().unwrap(),
            "--input-encoding",
            "windows-1252",
            "--metadata",
            metadata.to_str().unwrap(),
            "/scans/Photo_01.jpg",
        ])
        .assert()
        .success()
        .stdout(
            "file_name_1,dc:title,dc:subject,dc:creator\n\
             Photo_01.jpg,Photo_01,Café,\n",
        );
}
