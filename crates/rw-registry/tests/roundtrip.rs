//! Scan a route tree, write the registry, read it back.

use camino::Utf8PathBuf;
use rw_core::Method;
use rw_registry::{RegistryReader, RegistryWriter, RouteTable};
use rw_scanner::RouteScanner;

fn fixture(files: &[&str]) -> (tempfile::TempDir, Utf8PathBuf) {
    let dir = tempfile::tempdir().unwrap();
    let root = Utf8PathBuf::from_path_buf(dir.path().to_path_buf()).unwrap();
    for file in files {
        let path = root.join("routes").join(file);
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(&path, "<h1>page</h1>").unwrap();
    }
    (dir, root)
}

#[test]
fn test_written_registry_reads_back_in_order() {
    let (_dir, root) = fixture(&[
        "index.svelte",
        "about.svelte",
        "blog/index.svelte",
        "users/$id.svelte",
    ]);
    let route_dir = root.join("routes");
    let output = root.join(".redwork/generated/routes.ts");

    let routes = RouteScanner::new(&route_dir).scan().unwrap();
    RegistryWriter::new(&route_dir)
        .write(&routes, &output, None)
        .unwrap();
    let entries = RegistryReader::load(&output).unwrap();

    assert_eq!(entries.len(), routes.len());
    for (entry, route) in entries.iter().zip(&routes) {
        assert_eq!(entry.method, route.method);
        assert_eq!(entry.path, route.path);
        assert_eq!(entry.import_path, format!("../../routes/{}", route.file));
    }
}

#[test]
fn test_registry_lookup() {
    let (_dir, root) = fixture(&["index.svelte", "users/$id.svelte", "users/new.svelte"]);
    let route_dir = root.join("routes");
    let output = root.join("generated/routes.ts");

    let routes = RouteScanner::new(&route_dir).scan().unwrap();
    RegistryWriter::new(&route_dir)
        .write(&routes, &output, None)
        .unwrap();
    let table = RouteTable::from_registry(&RegistryReader::load(&output).unwrap());

    let hit = table.find(Method::Get, "/users/42").unwrap();
    assert_eq!(hit.value, "../routes/users/$id.svelte");
    assert_eq!(hit.param("id"), Some("42"));
    assert_eq!(
        table.find(Method::Get, "/users/new").unwrap().value,
        "../routes/users/new.svelte"
    );
    assert_eq!(table.find(Method::Get, "/").unwrap().value, "../routes/index.svelte");
    assert!(table.find(Method::Get, "/nope").is_none());
}
