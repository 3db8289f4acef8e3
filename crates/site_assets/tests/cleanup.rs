use std::fs;

use site_assets::{run_cleanup, AssetKind, SiteFile};
use tempfile::TempDir;

#[test]
fn scripts_are_rewritten_in_place() {
    let dir = TempDir::new().unwrap();
    fs::create_dir_all(dir.path().join("scripts")).unwrap();
    fs::write(
        dir.path().join("scripts/tools.js"),
        "init();\nconsole.log('ready');\nload().catch(err => console.log(err));\n",
    )
    .unwrap();

    let results = run_cleanup(
        dir.path(),
        &[
            SiteFile::new("scripts/tools.js", AssetKind::Js),
            SiteFile::new("scripts/absent.js", AssetKind::Js),
        ],
    )
    .unwrap();

    assert_eq!(results.len(), 1);
    assert_eq!(results[0].file, "scripts/tools.js");
    assert_eq!(results[0].original_lines, 4);
    assert_eq!(results[0].new_lines, 3);
    assert_eq!(results[0].remaining, 0);
    assert_eq!(
        fs::read_to_string(dir.path().join("scripts/tools.js")).unwrap(),
        "init();\nload().catch(err => {});\n"
    );
}
