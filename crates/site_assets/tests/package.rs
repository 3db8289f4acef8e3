use std::fs::{self, File};
use std::path::{Path, PathBuf};

use flate2::read::GzDecoder;
use pretty_assertions::assert_eq;
use site_assets::{build_package, ArchiveOutcome, PackageConfig, PackageError, PackageInfo};
use tempfile::TempDir;

fn site() -> TempDir {
    let dir = TempDir::new().unwrap();
    let root = dir.path();
    fs::create_dir_all(root.join("pages/alternate")).unwrap();
    fs::create_dir_all(root.join("styles")).unwrap();
    fs::create_dir_all(root.join("docs")).unwrap();
    fs::write(root.join("index.html"), "<!DOCTYPE html><title>Home</title>").unwrap();
    fs::write(root.join("pages/alternate/about_alt.html"), "<h1>About</h1>").unwrap();
    fs::write(root.join("styles/main.min.css"), ".a{color:red}").unwrap();
    fs::write(root.join("docs/USER_MANUAL.md"), "# Manual\n").unwrap();
    fs::write(root.join("docs/SEO_VALIDATION_REPORT.md"), "# SEO\n").unwrap();
    dir
}

fn config(root: &Path) -> PackageConfig {
    PackageConfig {
        root: root.to_path_buf(),
        output_dir: "production_package".to_string(),
        archive_name: "site_production_v1.0".to_string(),
        package_name: "Acme Website Production Package".to_string(),
        version: "1.0".to_string(),
        release_date: "2025-11-15".to_string(),
        include: vec![
            PathBuf::from("index.html"),
            PathBuf::from("pages/alternate/about_alt.html"),
            PathBuf::from("styles/main.min.css"),
            PathBuf::from("scripts/main.min.js"),
            PathBuf::from("docs"),
        ],
    }
}

#[test]
fn package_copies_allow_list_and_describes_it() {
    let dir = site();
    let summary = build_package(&config(dir.path())).unwrap();
    let pkg = dir.path().join("production_package");

    assert_eq!(summary.package_dir, pkg);
    assert_eq!(summary.skipped, vec!["scripts/main.min.js".to_string()]);
    assert_eq!(
        summary.copied,
        vec![
            "index.html".to_string(),
            "pages/alternate/about_alt.html".to_string(),
            "styles/main.min.css".to_string(),
            "docs/SEO_VALIDATION_REPORT.md".to_string(),
            "docs/USER_MANUAL.md".to_string(),
        ]
    );
    for name in ["VERSION.txt", "DEPLOYMENT_CHECKLIST.md", "MANIFEST.txt", "PACKAGE_INFO.json"] {
        assert!(pkg.join(name).is_file(), "{name}");
    }
    assert_eq!(
        fs::read_to_string(pkg.join("pages/alternate/about_alt.html")).unwrap(),
        "<h1>About</h1>"
    );

    let info: PackageInfo =
        serde_json::from_str(&fs::read_to_string(pkg.join("PACKAGE_INFO.json")).unwrap()).unwrap();
    assert_eq!(info.version, "1.0");
    assert_eq!(info.total_files, 8);
    assert_eq!(info.contents.html_pages, 2);
    assert_eq!(info.contents.css_files, 1);
    assert_eq!(info.contents.js_files, 0);
    assert_eq!(info.contents.documentation_files, 5);
    assert_eq!(
        info.checksums.get("index.html").map(String::len),
        Some(64)
    );
    assert!(!info.checksums.contains_key("PACKAGE_INFO.json"));

    let manifest = fs::read_to_string(pkg.join("MANIFEST.txt")).unwrap();
    assert!(manifest.contains("  index.html (34 bytes)"));
    assert!(manifest.contains("    pages/alternate/"));
    assert!(manifest.contains("      about_alt.html (14 bytes)"));
}

#[test]
fn both_archives_contain_the_package() {
    let dir = site();
    let summary = build_package(&config(dir.path())).unwrap();

    assert_eq!(summary.archives.len(), 2);
    for outcome in &summary.archives {
        assert!(matches!(outcome, ArchiveOutcome::Created { size_bytes, .. } if *size_bytes > 0));
    }

    let tar_path = dir.path().join("site_production_v1.0.tar.gz");
    let mut archive = tar::Archive::new(GzDecoder::new(File::open(&tar_path).unwrap()));
    let names: Vec<String> = archive
        .entries()
        .unwrap()
        .map(|entry| entry.unwrap().path().unwrap().to_string_lossy().into_owned())
        .collect();
    assert!(names.iter().any(|n| n == "production_package/index.html"));
    assert!(names
        .iter()
        .any(|n| n == "production_package/pages/alternate/about_alt.html"));

    let zip_path = dir.path().join("site_production_v1.0.zip");
    let mut zip = zip::ZipArchive::new(File::open(&zip_path).unwrap()).unwrap();
    assert!(zip.by_name("production_package/PACKAGE_INFO.json").is_ok());
    assert!(zip.by_name("production_package/styles/main.min.css").is_ok());
}

#[test]
fn rebuilding_discards_stale_files() {
    let dir = site();
    build_package(&config(dir.path())).unwrap();
    let stale = dir.path().join("production_package/stale.txt");
    fs::write(&stale, "old").unwrap();

    build_package(&config(dir.path())).unwrap();

    assert!(!stale.exists());
}

#[test]
fn failed_archive_does_not_stop_the_other() {
    let dir = site();
    // A directory where the tarball should go makes File::create fail.
    fs::create_dir_all(dir.path().join("site_production_v1.0.tar.gz")).unwrap();

    let summary = build_package(&config(dir.path())).unwrap();

    assert!(matches!(summary.archives[0], ArchiveOutcome::Failed { .. }));
    assert!(matches!(summary.archives[1], ArchiveOutcome::Created { .. }));
}

#[test]
fn output_dir_outside_a_subdirectory_is_refused() {
    let dir = site();
    for output_dir in ["", ".", "../elsewhere"] {
        let mut config = config(dir.path());
        config.output_dir = output_dir.to_string();

        let err = build_package(&config).unwrap_err();

        assert!(matches!(err, PackageError::OutputDir(_)), "{output_dir:?}");
    }
    assert!(dir.path().join("index.html").is_file());
    assert!(dir.path().join("docs/USER_MANUAL.md").is_file());
}
