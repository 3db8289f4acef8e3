use std::collections::BTreeMap;
use std::fmt::Write as _;
use std::fs::{self, File};
use std::io::Write as _;
use std::path::{Component, Path, PathBuf};

use flate2::write::GzEncoder;
use flate2::Compression;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use site_engine::AtomicFileWriter;
use site_logging::{site_error, site_info, site_warn};
use walkdir::WalkDir;
use zip::write::SimpleFileOptions;

use crate::asset::AssetKind;
use crate::error::PackageError;

const VERSION_FILENAME: &str = "VERSION.txt";
const CHECKLIST_FILENAME: &str = "DEPLOYMENT_CHECKLIST.md";
const MANIFEST_FILENAME: &str = "MANIFEST.txt";
const PACKAGE_INFO_FILENAME: &str = "PACKAGE_INFO.json";

const DEPLOYMENT_CHECKLIST: &str = "# Pre-Deployment Checklist

## Files Verification
- [ ] All HTML pages present
- [ ] Minified CSS and JS files present
- [ ] All documentation included
- [ ] VERSION.txt and MANIFEST.txt present
- [ ] PACKAGE_INFO.json checksums match the uploaded files

## Configuration
- [ ] Update HTML files to reference .min.css and .min.js files
- [ ] Verify all internal links use correct paths
- [ ] Check form action URLs are configured

## Server Setup
- [ ] Enable gzip/brotli compression
- [ ] Configure cache headers (CSS/JS: 1 year, HTML: 1 hour)
- [ ] Install SSL certificate and test the HTTPS redirect

## Testing
- [ ] All pages load and navigation works
- [ ] Interactive tools and forms behave correctly
- [ ] Pages render on mobile devices

## Post-Deployment
- [ ] Site loads at the production URL
- [ ] Monitor for errors during the first 24 hours

---

**Date Deployed:** _____________
**Deployed By:** _____________
";

/// What to put in the release package and how to label it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackageConfig {
    pub root: PathBuf,
    /// Package directory, relative to `root`; removed and rebuilt on every run.
    pub output_dir: String,
    /// Stem of the `.tar.gz` and `.zip` archives written next to the package.
    pub archive_name: String,
    pub package_name: String,
    pub version: String,
    pub release_date: String,
    /// Files or directories relative to `root`, copied to the same relative path.
    pub include: Vec<PathBuf>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PackageContents {
    pub html_pages: usize,
    pub css_files: usize,
    pub js_files: usize,
    pub documentation_files: usize,
}

/// Contents of `PACKAGE_INFO.json`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PackageInfo {
    pub package_name: String,
    pub version: String,
    pub release_date: String,
    pub total_files: usize,
    pub total_size_bytes: u64,
    pub total_size_kb: f64,
    pub contents: PackageContents,
    /// SHA-256 of every file in the package, keyed by `/`-separated path.
    pub checksums: BTreeMap<String, String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ArchiveOutcome {
    Created { path: PathBuf, size_bytes: u64 },
    Failed { path: PathBuf, error: String },
}

#[derive(Debug, Clone, PartialEq)]
pub struct PackageSummary {
    pub package_dir: PathBuf,
    pub copied: Vec<String>,
    pub skipped: Vec<String>,
    pub info: PackageInfo,
    pub archives: Vec<ArchiveOutcome>,
}

/// Rebuild the package directory from `config.include`, describe it and
/// archive it.
///
/// Archive failures are reported in [`PackageSummary::archives`] rather than
/// as an error; the second archive is attempted even when the first fails.
pub fn build_package(config: &PackageConfig) -> Result<PackageSummary, PackageError> {
    check_output_dir(&config.output_dir)?;
    let package_dir = config.root.join(&config.output_dir);
    if package_dir.exists() {
        fs::remove_dir_all(&package_dir).map_err(|e| PackageError::io(&package_dir, e))?;
    }
    fs::create_dir_all(&package_dir).map_err(|e| PackageError::io(&package_dir, e))?;
    site_info!("Building package in {}", package_dir.display());

    let mut copied = Vec::new();
    let mut skipped = Vec::new();
    for relative in &config.include {
        let source = config.root.join(relative);
        if source.is_file() {
            copy_file(&source, &package_dir.join(relative))?;
            copied.push(slash_path(relative));
        } else if source.is_dir() {
            copied.extend(copy_tree(&source, relative, &package_dir)?);
        } else {
            site_warn!("Not found, skipping: {}", source.display());
            skipped.push(slash_path(relative));
        }
    }
    site_info!("Copied {} files ({} skipped)", copied.len(), skipped.len());

    let writer = AtomicFileWriter::new(package_dir.clone());
    writer.write(VERSION_FILENAME, &version_text(config, copied.len()))?;
    writer.write(CHECKLIST_FILENAME, DEPLOYMENT_CHECKLIST)?;
    let manifest = manifest_text(&package_dir, &config.package_name)?;
    writer.write(MANIFEST_FILENAME, &manifest)?;

    let info = package_info(config, &package_dir)?;
    writer.write_json(PACKAGE_INFO_FILENAME, &info)?;
    site_info!(
        "Package ready: {} files, {:.1} KB",
        info.total_files,
        info.total_size_kb
    );

    let archives = vec![
        archive_with(&config.root, &format!("{}.tar.gz", config.archive_name), |dest| {
            write_tar_gz(&package_dir, &config.output_dir, dest)
        }),
        archive_with(&config.root, &format!("{}.zip", config.archive_name), |dest| {
            write_zip(&package_dir, &config.output_dir, dest)
        }),
    ];

    Ok(PackageSummary {
        package_dir,
        copied,
        skipped,
        info,
        archives,
    })
}

/// The package directory is deleted on every run, so it must name a
/// subdirectory strictly below the site root.
fn check_output_dir(output_dir: &str) -> Result<(), PackageError> {
    let path = Path::new(output_dir);
    let below_root = path.components().next().is_some()
        && path
            .components()
            .all(|component| matches!(component, Component::Normal(_)));
    if below_root {
        Ok(())
    } else {
        Err(PackageError::OutputDir(output_dir.to_string()))
    }
}

fn slash_path(path: &Path) -> String {
    path.components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}

fn copy_file(source: &Path, dest: &Path) -> Result<(), PackageError> {
    if let Some(parent) = dest.parent() {
        fs::create_dir_all(parent).map_err(|e| PackageError::io(parent, e))?;
    }
    fs::copy(source, dest).map_err(|e| PackageError::io(source, e))?;
    Ok(())
}

/// Copy every file under `source`; never descends into the package itself.
fn copy_tree(
    source: &Path,
    relative: &Path,
    package_dir: &Path,
) -> Result<Vec<String>, PackageError> {
    let mut copied = Vec::new();
    let walker = WalkDir::new(source)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|entry| !entry.path().starts_with(package_dir));
    for entry in walker {
        let entry = entry?;
        if !entry.file_type().is_file() {
            continue;
        }
        let Ok(inner) = entry.path().strip_prefix(source) else {
            continue;
        };
        let target = relative.join(inner);
        copy_file(entry.path(), &package_dir.join(&target))?;
        copied.push(slash_path(&target));
    }
    Ok(copied)
}

fn version_text(config: &PackageConfig, copied: usize) -> String {
    format!(
        "{name}\nVersion: {version}\nRelease Date: {date}\nStatus: Production Ready\n\n\
         Package Contents:\n- {copied} site files\n- {CHECKLIST_FILENAME}\n- {MANIFEST_FILENAME}\n- {PACKAGE_INFO_FILENAME}\n",
        name = config.package_name,
        version = config.version,
        date = config.release_date,
    )
}

/// Directory listing, two spaces of indent per level, files before
/// subdirectories, `name (N bytes)` per file.
fn manifest_text(package_dir: &Path, package_name: &str) -> Result<String, PackageError> {
    let mut out = String::new();
    let _ = writeln!(out, "{package_name} - File Manifest");
    let _ = writeln!(out, "{}\n", "=".repeat(60));

    let walker = WalkDir::new(package_dir).min_depth(1).sort_by(|a, b| {
        a.file_type()
            .is_dir()
            .cmp(&b.file_type().is_dir())
            .then_with(|| a.file_name().cmp(b.file_name()))
    });
    for entry in walker {
        let entry = entry?;
        let indent = "  ".repeat(entry.depth());
        if entry.file_type().is_dir() {
            let relative = entry
                .path()
                .strip_prefix(package_dir)
                .map(slash_path)
                .unwrap_or_default();
            let _ = writeln!(out, "{indent}{relative}/");
        } else {
            let size = entry.metadata()?.len();
            let _ = writeln!(
                out,
                "{indent}{} ({size} bytes)",
                entry.file_name().to_string_lossy()
            );
        }
    }
    Ok(out)
}

fn sha256_hex(bytes: &[u8]) -> String {
    let digest = Sha256::digest(bytes);
    let mut hex = String::with_capacity(digest.len() * 2);
    for byte in digest.iter() {
        let _ = write!(&mut hex, "{byte:02x}");
    }
    hex
}

fn package_info(config: &PackageConfig, package_dir: &Path) -> Result<PackageInfo, PackageError> {
    let mut contents = PackageContents::default();
    let mut checksums = BTreeMap::new();
    let mut total_size_bytes = 0;

    for entry in WalkDir::new(package_dir).sort_by_file_name() {
        let entry = entry?;
        if !entry.file_type().is_file() {
            continue;
        }
        let bytes = fs::read(entry.path()).map_err(|e| PackageError::io(entry.path(), e))?;
        total_size_bytes += bytes.len() as u64;

        match AssetKind::from_path(entry.path()) {
            Some(AssetKind::Html) => contents.html_pages += 1,
            Some(AssetKind::Css) => contents.css_files += 1,
            Some(AssetKind::Js) => contents.js_files += 1,
            None => {
                let is_doc = entry
                    .path()
                    .extension()
                    .and_then(|ext| ext.to_str())
                    .is_some_and(|ext| matches!(ext.to_ascii_lowercase().as_str(), "md" | "txt" | "pdf"));
                if is_doc {
                    contents.documentation_files += 1;
                }
            }
        }

        if let Ok(relative) = entry.path().strip_prefix(package_dir) {
            checksums.insert(slash_path(relative), sha256_hex(&bytes));
        }
    }

    Ok(PackageInfo {
        package_name: config.package_name.clone(),
        version: config.version.clone(),
        release_date: config.release_date.clone(),
        total_files: checksums.len(),
        total_size_bytes,
        total_size_kb: (total_size_bytes as f64 / 1024.0 * 10.0).round() / 10.0,
        contents,
        checksums,
    })
}

fn archive_with(
    root: &Path,
    filename: &str,
    write: impl FnOnce(&Path) -> Result<(), PackageError>,
) -> ArchiveOutcome {
    let path = root.join(filename);
    let result = write(&path).and_then(|()| {
        fs::metadata(&path)
            .map(|meta| meta.len())
            .map_err(|e| PackageError::io(&path, e))
    });
    match result {
        Ok(size_bytes) => {
            site_info!("Archive created: {} ({} bytes)", path.display(), size_bytes);
            ArchiveOutcome::Created { path, size_bytes }
        }
        Err(err) => {
            site_error!("Failed to create {}: {}", path.display(), err);
            ArchiveOutcome::Failed {
                path,
                error: err.to_string(),
            }
        }
    }
}

fn write_tar_gz(package_dir: &Path, dir_name: &str, dest: &Path) -> Result<(), PackageError> {
    let file = File::create(dest).map_err(|e| PackageError::io(dest, e))?;
    let mut builder = tar::Builder::new(GzEncoder::new(file, Compression::default()));
    builder
        .append_dir_all(dir_name, package_dir)
        .map_err(|e| PackageError::io(package_dir, e))?;
    let encoder = builder.into_inner().map_err(|e| PackageError::io(dest, e))?;
    encoder.finish().map_err(|e| PackageError::io(dest, e))?;
    Ok(())
}

fn write_zip(package_dir: &Path, dir_name: &str, dest: &Path) -> Result<(), PackageError> {
    let file = File::create(dest).map_err(|e| PackageError::io(dest, e))?;
    let mut zip = zip::ZipWriter::new(file);
    let options = SimpleFileOptions::default().compression_method(zip::CompressionMethod::Deflated);

    for entry in WalkDir::new(package_dir).sort_by_file_name() {
        let entry = entry?;
        let Ok(relative) = entry.path().strip_prefix(package_dir) else {
            continue;
        };
        let name = if relative.as_os_str().is_empty() {
            dir_name.to_string()
        } else {
            format!("{dir_name}/{}", slash_path(relative))
        };
        if entry.file_type().is_dir() {
            zip.add_directory(name, options)?;
        } else {
            zip.start_file(name, options)?;
            let bytes = fs::read(entry.path()).map_err(|e| PackageError::io(entry.path(), e))?;
            zip.write_all(&bytes).map_err(|e| PackageError::io(dest, e))?;
        }
    }
    zip.finish()?;
    Ok(())
}
