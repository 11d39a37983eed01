mod common;

use std::fs;

use psu_format::chrono::{NaiveDate, TimeZone, Utc};
use psu_format::PSUFile;
use psu_packer::{load_config, pack_to_file, pack_with_config, Config, Error};
use tempfile::tempdir;

fn sample_file() -> PSUFile {
    let created = Utc.with_ymd_and_hms(2019, 5, 6, 7, 8, 9).unwrap();
    let modified = Utc.with_ymd_and_hms(2020, 6, 7, 8, 9, 10).unwrap();
    PSUFile::new("DATA.BIN", created, modified, b"example".to_vec())
}

#[test]
fn pack_with_or_without_timestamp_controls_entry_times() {
    let timestamp = NaiveDate::from_ymd_opt(2024, 1, 2)
        .unwrap()
        .and_hms_opt(3, 4, 5)
        .unwrap();
    let config_with_timestamp = Config {
        timestamp: Some(timestamp),
        quiet: true,
        ..Config::new("Test Save")
    };

    let mut with_timestamp = vec![];
    pack_with_config(&mut with_timestamp, vec![sample_file()], config_with_timestamp)
        .expect("pack with timestamp");

    let entries = common::entries(&with_timestamp);
    assert_eq!(entries.len(), 4);
    for entry in entries.iter() {
        assert!(
            entry.has_times(timestamp),
            "{} should carry the configured timestamp",
            entry.name
        );
    }

    // Without a configured timestamp files keep their own times.
    let mut without_timestamp = vec![];
    pack_with_config(
        &mut without_timestamp,
        vec![sample_file()],
        Config {
            quiet: true,
            ..Config::new("Test Save")
        },
    )
    .expect("pack without timestamp");

    let entries = common::entries(&without_timestamp);
    let file = entries
        .iter()
        .find(|entry| entry.is_file())
        .expect("file entry present");
    assert_eq!(file.created, [0, 9, 8, 7, 6, 5, 0xE3, 0x07]);
    assert_eq!(file.modified, [0, 10, 9, 8, 7, 6, 0xE4, 0x07]);
    for entry in entries.iter().filter(|entry| !entry.is_file()) {
        assert!(!entry.has_times(timestamp));
        assert_eq!(entry.created, entries[0].created);
    }
}

#[test]
fn config_on_disk_drives_packing_to_file() {
    let workspace = tempdir().expect("temp dir");
    let project = workspace.path();
    fs::write(
        project.join("psu.toml"),
        "[config]\nname = \"BASLUS-20000\"\ntimestamp = \"2024-10-10 10:30:00\"\nquiet = true\n",
    )
    .expect("write config");

    let config = load_config(project).expect("load config");
    let output = project.join("out.psu");
    pack_to_file(&output, vec![sample_file()], config).expect("pack to file");

    let data = fs::read(&output).expect("read packed psu");
    assert_eq!(data.len(), 4 * 512 + 1024);

    let entries = common::entries(&data);
    assert_eq!(entries[0].name, "BASLUS-20000");
    assert_eq!(entries[0].size, 4);
    assert_eq!(entries[3].name, "DATA.BIN");
    assert_eq!(entries[3].created, [0, 0, 30, 10, 10, 10, 0xE8, 0x07]);
}

#[test]
fn missing_config_is_an_io_error() {
    let workspace = tempdir().expect("temp dir");

    let err = load_config(workspace.path()).expect_err("no psu.toml present");

    assert!(matches!(err, Error::IOError(_)));
}
