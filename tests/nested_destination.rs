use assert_fs::prelude::*;
use mnf::Options;
use std::fs;

#[test]
fn destination_inside_source_is_excluded() {
    let td = assert_fs::TempDir::new().unwrap();
    let src = td.child("src");
    src.child("a/one.txt").write_str("1").unwrap();
    src.child("b/c/two.txt").write_str("2").unwrap();
    src.child("flat/already.txt").write_str("kept").unwrap();
    src.child("flat/inner/deep.txt").write_str("kept too").unwrap();

    let dst = src.child("flat");
    let mut opts = Options::new(src.path(), dst.path());
    opts.prune_empty_dirs = true;
    opts.threads = 4;

    let summary = mnf::run(&opts).unwrap();
    assert_eq!(summary.discovered, 2);
    assert_eq!(summary.stats.moved, 2);

    assert!(dst.child("one.txt").path().exists());
    assert!(dst.child("two.txt").path().exists());
    // Files already in the destination subtree stay exactly where they were.
    assert_eq!(fs::read_to_string(dst.child("already.txt").path()).unwrap(), "kept");
    assert!(dst.child("inner/deep.txt").path().exists());
    assert!(!dst.child("deep.txt").path().exists());

    // Emptied source dirs are pruned, the destination never is.
    assert!(!src.child("a").path().exists());
    assert!(!src.child("b").path().exists());
    assert!(dst.path().is_dir());
}

#[test]
fn same_roots_are_rejected() {
    let td = assert_fs::TempDir::new().unwrap();
    td.child("src/a/one.txt").write_str("1").unwrap();
    let opts = Options::new(td.child("src").path(), td.child("src/a/..").path());

    let err = mnf::run(&opts).unwrap_err();
    assert!(matches!(
        err.downcast_ref::<mnf::MnfError>(),
        Some(mnf::MnfError::SameRoots(_))
    ));
    assert!(td.child("src/a/one.txt").path().exists());
}

#[test]
fn missing_source_is_fatal() {
    let td = assert_fs::TempDir::new().unwrap();
    let opts = Options::new(td.child("nope").path(), td.child("dst").path());
    let err = mnf::run(&opts).unwrap_err();
    assert!(matches!(
        err.downcast_ref::<mnf::MnfError>(),
        Some(mnf::MnfError::SourceNotFound(_))
    ));
}
