use assert_cmd::cargo_bin;
use assert_cmd::prelude::*;
use predicates::prelude::*;
use std::io::Write;
use std::process::Command;

#[cfg(not(feature = "storage-rocksdb"))]
#[test]
fn test_rocksdb_fallback_warning() {
    let mut csv = tempfile::NamedTempFile::new().unwrap();
    writeln!(csv, "caller, op, value, args").unwrap();
    writeln!(csv, "0x2222222222222222222222222222222222222222, fund, 1,").unwrap();

    let mut cmd = Command::new(cargo_bin!("swapper"));
    cmd.arg(csv.path()).arg("--db-path").arg("some_db");

    cmd.assert()
        .success()
        .stderr(predicate::str::contains("WARNING: Persistent storage requested via --db-path, but 'storage-rocksdb' feature is not enabled. Falling back to In-Memory storage."))
        .stdout(predicate::str::contains(
            "0x2222222222222222222222222222222222222222,1,0",
        ));
}

#[cfg(not(feature = "storage-rocksdb"))]
#[test]
fn test_fallback_store_starts_fresh_every_run() {
    let mut csv = tempfile::NamedTempFile::new().unwrap();
    writeln!(csv, "caller, op, value, args").unwrap();
    writeln!(csv, "0x2222222222222222222222222222222222222222, fund, 1,").unwrap();
    writeln!(csv, "0x2222222222222222222222222222222222222222, receive, 1,").unwrap();

    let dir = tempfile::tempdir().unwrap();
    let db_path = dir.path().join("unused_db");

    for _ in 0..2 {
        let mut cmd = Command::new(cargo_bin!("swapper"));
        cmd.arg(csv.path()).arg("--db-path").arg(&db_path);

        // nothing carries over, so each run ends with a single swap
        cmd.assert()
            .success()
            .stdout(predicate::str::contains(
                "0x2222222222222222222222222222222222222222,0,2000",
            ));
    }
    assert!(!db_path.exists());
}

#[cfg(feature = "storage-rocksdb")]
#[test]
fn test_rocksdb_no_fallback_warning() {
    let mut csv = tempfile::NamedTempFile::new().unwrap();
    writeln!(csv, "caller, op, value, args").unwrap();
    writeln!(csv, "0x2222222222222222222222222222222222222222, fund, 1,").unwrap();

    let dir = tempfile::tempdir().unwrap();
    let db_path = dir.path().join("test_db");

    let mut cmd = Command::new(cargo_bin!("swapper"));
    cmd.arg(csv.path()).arg("--db-path").arg(&db_path);

    cmd.assert()
        .success()
        .stderr(predicate::str::contains("WARNING").not())
        .stdout(predicate::str::contains(
            "0x2222222222222222222222222222222222222222,1,0",
        ));
    assert!(db_path.exists());
}
