use std::fs;

use pretty_assertions::assert_eq;
use site_assets::{
    run_minification, AssetKind, MinificationReport, SiteFile, MINIFICATION_REPORT_FILENAME,
};
use tempfile::TempDir;

fn site() -> TempDir {
    let dir = TempDir::new().unwrap();
    fs::create_dir_all(dir.path().join("styles")).unwrap();
    fs::create_dir_all(dir.path().join("scripts")).unwrap();
    fs::write(
        dir.path().join("styles/main.css"),
        ".a { color: red; /* note */ }\n",
    )
    .unwrap();
    fs::write(
        dir.path().join("scripts/main.js"),
        "// entry\nconst a = 1;\n\nfunction f() {\n  return a;\n}\n",
    )
    .unwrap();
    fs::write(dir.path().join("scripts/empty.js"), "").unwrap();
    dir
}

fn targets() -> Vec<SiteFile> {
    vec![
        SiteFile::new("styles/main.css", AssetKind::Css),
        SiteFile::new("scripts/main.js", AssetKind::Js),
        SiteFile::new("scripts/missing.js", AssetKind::Js),
        SiteFile::new("scripts/empty.js", AssetKind::Js),
    ]
}

#[test]
fn minification_writes_min_files_and_report() {
    let dir = site();
    let docs = dir.path().join("docs");

    let report =
        run_minification(dir.path(), &targets(), &docs, "2025-01-01T00:00:00+00:00").unwrap();

    assert_eq!(
        fs::read_to_string(dir.path().join("styles/main.min.css")).unwrap(),
        ".a{color:red}"
    );
    assert_eq!(
        fs::read_to_string(dir.path().join("scripts/main.min.js")).unwrap(),
        "const a = 1; function f() { return a; }"
    );
    assert!(dir.path().join("scripts/empty.min.js").is_file());
    assert!(!dir.path().join("scripts/missing.min.js").exists());

    assert_eq!(report.files_minified, 3);
    let names: Vec<&str> = report.files.iter().map(|f| f.filename.as_str()).collect();
    assert_eq!(names, vec!["main.css", "main.js", "empty.js"]);
    assert_eq!(report.files[2].reduction_percentage, 0.0);
    assert_eq!(
        report.total_original_bytes,
        report.files.iter().map(|f| f.original_size).sum::<u64>()
    );

    let body = fs::read_to_string(docs.join(MINIFICATION_REPORT_FILENAME)).unwrap();
    let stored: MinificationReport = serde_json::from_str(&body).unwrap();
    assert_eq!(stored.files_minified, 3);
    assert_eq!(stored.minification_date, "2025-01-01T00:00:00+00:00");
    assert_eq!(stored.total_minified_bytes, report.total_minified_bytes);
    let raw: serde_json::Value = serde_json::from_str(&body).unwrap();
    assert_eq!(raw["files"][0]["type"], "css");
}

#[test]
fn minifying_minified_output_saves_nothing() {
    let dir = site();
    let docs = dir.path().join("docs");
    run_minification(dir.path(), &targets(), &docs, "first").unwrap();

    let again = vec![
        SiteFile::new("styles/main.min.css", AssetKind::Css),
        SiteFile::new("scripts/main.min.js", AssetKind::Js),
    ];
    let report = run_minification(dir.path(), &again, &docs, "second").unwrap();

    for file in &report.files {
        assert_eq!(file.original_size, file.minified_size, "{}", file.filename);
    }
    assert_eq!(report.total_reduction_percentage, 0.0);
}

#[test]
fn nothing_to_minify_still_writes_a_report() {
    let dir = TempDir::new().unwrap();
    let docs = dir.path().join("docs");

    let report = run_minification(
        dir.path(),
        &[SiteFile::new("styles/main.css", AssetKind::Css)],
        &docs,
        "now",
    )
    .unwrap();

    assert_eq!(report.files_minified, 0);
    assert_eq!(report.total_reduction_percentage, 0.0);
    assert!(docs.join(MINIFICATION_REPORT_FILENAME).is_file());
}

#[test]
fn unreadable_source_does_not_stop_the_pass() {
    let dir = site();
    fs::write(dir.path().join("styles/main.css"), [0xff, 0xfe, b'a', b'{', b'}']).unwrap();
    let docs = dir.path().join("docs");

    let report = run_minification(dir.path(), &targets(), &docs, "now").unwrap();

    assert!(!dir.path().join("styles/main.min.css").exists());
    assert!(dir.path().join("scripts/main.min.js").is_file());
    let names: Vec<&str> = report.files.iter().map(|f| f.filename.as_str()).collect();
    assert_eq!(names, vec!["main.js", "empty.js"]);
    assert_eq!(report.files_minified, 2);
    assert!(docs.join(MINIFICATION_REPORT_FILENAME).is_file());
}
