mod common;

use std::fs;

use common::{TestWorkspace, scenario_schema};
use csv_metagen::error::MetagenError;
use csv_metagen::metadata::MetadataTable;
use csv_metagen::profile::Profile;
use csv_metagen::session::Session;

fn session() -> Session {
    Session::new(scenario_schema(), &Profile::default())
}

#[test]
fn generate_merge_export_round() {
    let workspace = TestWorkspace::new();
    let session = session();
    assert_eq!(
        session
            .generate(&["/x/Photo_01.jpg", "/x/Photo_02.jpg"])
            .expect("generate"),
        2
    );

    let metadata = MetadataTable::from_rows(
        &["Filename", "dc:subject"],
        &[["photo-01", "Landscape, coastal"]],
    );
    let summary = session.merge(&metadata).expect("merge");
    assert_eq!(
        (summary.merged_rows, summary.merged_fields, summary.total_rows),
        (1, 1, 2)
    );

    let output = workspace.path().join("out.csv");
    let written = session.export(Some(output.as_path()), None).expect("export");
    assert_eq!(written.as_deref(), Some(output.as_path()));
    let contents = fs::read_to_string(&output).expect("read export");
    assert_eq!(
        contents,
        "file_name_1,dc:title,dc:subject\n\
         Photo_01.jpg,Photo_01,\"Landscape, coastal\"\n\
         Photo_02.jpg,Photo_02,\n"
    );
}

#[test]
fn failed_merge_keeps_previous_rows() {
    let session = session();
    session.generate(&["/x/a.jpg"]).expect("generate");
    let before = session.rows();

    let metadata = MetadataTable::from_rows(&["Unrelated"], &[["a.jpg"]]);
    let err = session.merge(&metadata).unwrap_err();
    assert!(matches!(err, MetagenError::NoMatchColumn { .. }));
    assert_eq!(session.rows(), before);
}

#[test]
fn failed_generate_keeps_previous_rows() {
    let session = session();
    session.generate(&["/x/a.jpg"]).expect("generate");
    let empty: [&str; 0] = [];
    assert!(matches!(
        session.generate(&empty),
        Err(MetagenError::NoSelection)
    ));
    assert_eq!(session.row_count(), 1);
}

#[test]
fn clear_empties_snapshot_and_blocks_export() {
    let workspace = TestWorkspace::new();
    let session = session();
    session.generate(&["/x/a.jpg"]).expect("generate");
    assert_eq!(session.clear(), 1);
    assert_eq!(session.row_count(), 0);

    let err = session
        .export(Some(workspace.path().join("out.csv").as_path()), None)
        .unwrap_err();
    assert!(err.to_string().contains("no rows to export"));
}

#[test]
fn export_into_directory_uses_generated_name() {
    let workspace = TestWorkspace::new();
    let session = session();
    session.generate(&["/x/a.jpg"]).expect("generate");
    let written = session
        .export(Some(workspace.path()), None)
        .expect("export")
        .expect("file path");
    assert_eq!(written.parent(), Some(workspace.path()));
    let name = written.file_name().unwrap().to_string_lossy().into_owned();
    assert!(name.starts_with("generated_metadata_"));
    assert!(name.ends_with(".csv"));
}

#[test]
fn unwritable_destination_reports_export_error() {
    let workspace = TestWorkspace::new();
    let session = session();
    session.generate(&["/x/a.jpg"]).expect("generate");
    let target = workspace.path().join("missing").join("out.csv");
    let err = session.export(Some(target.as_path()), None).unwrap_err();
    assert!(matches!(err, MetagenError::Export { .. }));
    assert_eq!(session.row_count(), 1);
}
