use assert_fs::prelude::*;
use mnf::Options;
use std::fs;

#[test]
fn dry_run_changes_nothing() {
    let td = assert_fs::TempDir::new().unwrap();
    td.child("src/a/one.txt").write_str("1").unwrap();
    td.child("src/a/b/two.txt").write_str("2").unwrap();
    td.child("src/empty").create_dir_all().unwrap();
    td.child("dst").create_dir_all().unwrap();

    let mut opts = Options::new(td.child("src").path(), td.child("dst").path());
    opts.dry_run = true;
    opts.prune_empty_dirs = true;

    let summary = mnf::run(&opts).unwrap();
    assert_eq!(summary.discovered, 2);
    assert_eq!(summary.stats.moved, 0);
    assert_eq!(summary.stats.skipped, 2);
    assert_eq!(summary.pruned_dirs, 0);

    assert!(td.child("src/a/one.txt").path().exists());
    assert!(td.child("src/a/b/two.txt").path().exists());
    assert!(td.child("src/empty").path().is_dir());
    assert_eq!(fs::read_dir(td.child("dst").path()).unwrap().count(), 0);
}

#[test]
fn dry_run_does_not_create_destination() {
    let td = assert_fs::TempDir::new().unwrap();
    td.child("src/a/one.txt").write_str("1").unwrap();
    let dst = td.child("missing/dst");

    let mut opts = Options::new(td.child("src").path(), dst.path());
    opts.dry_run = true;

    let summary = mnf::run(&opts).unwrap();
    assert_eq!(summary.stats.skipped, 1);
    assert!(!dst.path().exists());
    assert!(!td.child("missing").path().exists());
}
