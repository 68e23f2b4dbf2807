// crates/bundler/tests/bundle.rs
use std::fs;
use std::path::Path;

use bundler::{collect_resources, run, PACK_FILE, SOURCE_FILE};
use engine_assets::{AssetIgnore, Assets};
use image::{ImageBuffer, Rgba};

fn write(path: &Path, bytes: &[u8]) {
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, bytes).unwrap();
}

fn resource_folder(base: &Path) -> std::path::PathBuf {
    let root = base.join("res");
    fs::create_dir_all(root.join("tiles")).unwrap();
    ImageBuffer::from_pixel(2, 2, Rgba([1u8, 2, 3, 255]))
        .save(root.join("tiles/grass.png"))
        .unwrap();
    write(&root.join("levels/one.txt"), b"hello");
    write(&root.join("scripts/libdemo.so"), b"\x7fELF\x02\x01\x01\0rest");
    write(&root.join("notes.tmp"), b"scratch");
    root
}

#[test]
fn walk_is_sorted_and_honors_ignore_rules() {
    let dir = tempfile::tempdir().unwrap();
    let root = resource_folder(dir.path());
    let ignore = AssetIgnore::parse("*.tmp\n");

    let resources = collect_resources(&root, &ignore).unwrap();
    assert_eq!(
        resources,
        ["levels/one.txt", "scripts/libdemo.so", "tiles/grass.png"]
    );
}

#[test]
fn run_writes_source_and_pack() {
    let dir = tempfile::tempdir().unwrap();
    let root = resource_folder(dir.path());
    write(&dir.path().join(engine_assets::ignore::IGNORE_FILE_NAME), b"notes.tmp\n");
    let out = dir.path().join("out");

    let len = run(&root, &out).unwrap();

    let blob = fs::read(out.join(PACK_FILE)).unwrap();
    assert_eq!(blob.len(), len);
    let source = fs::read_to_string(out.join(SOURCE_FILE)).unwrap();
    assert!(source.contains(&format!("pub static ASSETS: [u8; {len}]")));
    assert!(source.contains(&format!("pub const ASSETS_LEN: usize = {len};")));

    let assets = Assets::deserialize(&root, &blob).unwrap();
    assert_eq!(assets.len(), 3);
    assert!(assets.index_of("notes.tmp").is_none());
    let image = assets.image(assets.index_of("tiles/grass.png").unwrap()).unwrap();
    assert_eq!((image.width(), image.height()), (2, 2));
    let script = assets
        .generic(assets.index_of("scripts/libdemo.so").unwrap())
        .unwrap();
    assert!(script.bytes().starts_with(b"\x7fELF"));
}

#[test]
fn non_library_script_fails_the_bundle() {
    let dir = tempfile::tempdir().unwrap();
    let root = dir.path().join("res");
    write(&root.join("fake.so"), b"not a library");

    let err = run(&root, &dir.path().join("out")).unwrap_err();
    assert!(format!("{err:#}").contains("fake.so"));
}
