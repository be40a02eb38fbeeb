
use modsmith_cli::mods::{read_manifest, QmodStore};
use modsmith_core::{ModLoader, ModsmithError, PackageManager};
use test_helpers::{manifest, write_qmod, Workspace};

fn store(ws: &Workspace) -> QmodStore {
    QmodStore::open(&ws.config.storage.mods_dir, &ws.config.storage.state_file).unwrap()
}

#[tokio::test]
async fn test_non_qmod_is_not_a_package() {
    let ws = Workspace::new();
    let path = ws.download("cool.hat", b"hat");

    assert!(store(&ws).try_parse(&path).await.unwrap().is_none());
}

#[tokio::test]
async fn test_parse_manifest() {
    let ws = Workspace::new();
    let path = ws.qmod("Noodle.QMOD", &manifest("noodle", "Scotland2", Some("1.37.0")));

    let package = store(&ws).try_parse(&path).await.unwrap().unwrap();

    assert_eq!(package.id, "noodle");
    assert_eq!(package.name, "noodle mod");
    assert_eq!(package.version, "1.2.0");
    assert_eq!(package.loader, ModLoader::Scotland2);
    assert_eq!(package.package_version.as_deref(), Some("1.37.0"));
    assert_eq!(package.source_path, path);
}

#[test]
fn test_missing_loader_defaults_to_questloader() {
    let ws = Workspace::new();
    let path = ws.root().join("old.qmod");
    write_qmod(
        &path,
        &serde_json::json!({"id": "old", "name": "Old", "version": "0.1.0"}),
        &[],
    );

    let manifest = read_manifest(&path).unwrap();
    assert!(manifest.mod_loader.is_none());
    assert!(manifest.package_version.is_none());
}

#[tokio::test]
async fn test_corrupt_archive_is_installation_error() {
    let ws = Workspace::new();
    let path = ws.download("broken.qmod", b"not a zip");

    let err = store(&ws).try_parse(&path).await.unwrap_err();
    assert!(matches!(err, ModsmithError::Installation(_)));
    assert!(err.to_string().contains("broken.qmod"));
}

#[tokio::test]
async fn test_missing_manifest_is_installation_error() {
    let ws = Workspace::new();
    let path = ws.root().join("empty.qmod");
    let file = std::fs::File::create(&path).unwrap();
    zip::ZipWriter::new(file).finish().unwrap();

    let err = store(&ws).try_parse(&path).await.unwrap_err();
    assert!(err.is_installation());
    assert!(err.to_string().contains("mod.json"));
}

#[tokio::test]
async fn test_unknown_loader_is_installation_error() {
    let ws = Workspace::new();
    let path = ws.qmod("weird.qmod", &manifest("weird", "MelonLoader", None));

    let err = store(&ws).try_parse(&path).await.unwrap_err();
    assert!(err.is_installation());
}

#[tokio::test]
async fn test_install_extracts_and_save_persists() {
    let ws = Workspace::new();
    let path = ws.qmod("noodle.qmod", &manifest("noodle", "Scotland2", None));

    let store = store(&ws);
    let package = store.try_parse(&path).await.unwrap().unwrap();
    store.install(&package).await.unwrap();
    store.save().await.unwrap();

    let mod_dir = ws.config.storage.mods_dir.join("noodle");
    assert!(mod_dir.join("mod.json").is_file());
    assert_eq!(std::fs::read(mod_dir.join("libs/libmod.so")).unwrap(), b"ELF");

    let reopened = QmodStore::open(&ws.config.storage.mods_dir, &ws.config.storage.state_file).unwrap();
    let mods = reopened.installed_mods();
    assert_eq!(mods.len(), 1);
    assert_eq!(mods[0].id, "noodle");
    assert_eq!(mods[0].loader, ModLoader::Scotland2);
}

#[tokio::test]
async fn test_reinstall_replaces_previous_files() {
    let ws = Workspace::new();
    let store = store(&ws);

    let stale = ws.config.storage.mods_dir.join("noodle").join("stale.txt");
    std::fs::create_dir_all(stale.parent().unwrap()).unwrap();
    std::fs::write(&stale, b"old").unwrap();

    let path = ws.qmod("noodle.qmod", &manifest("noodle", "Scotland2", None));
    let package = store.try_parse(&path).await.unwrap().unwrap();
    store.install(&package).await.unwrap();

    assert!(!stale.exists());
    assert_eq!(store.installed_mods().len(), 1);
}

#[test]
fn test_supported_extensions() {
    let ws = Workspace::new();
    assert_eq!(store(&ws).supported_extensions(), vec!["qmod".to_string()]);
}

#[tokio::test]
async fn test_mod_ids_that_escape_mods_dir_are_rejected() {
    let ws = Workspace::new();
    let store = store(&ws);

    let good = ws.qmod("good.qmod", &manifest("good", "Scotland2", None));
    let package = store.try_parse(&good).await.unwrap().unwrap();
    store.install(&package).await.unwrap();

    let sentinel = ws.root().join("sentinel.txt");
    std::fs::write(&sentinel, b"keep").unwrap();

    for (file, id) in [("empty.qmod", ""), ("parent.qmod", ".."), ("nested.qmod", "a/b")] {
        let path = ws.qmod(file, &manifest(id, "Scotland2", None));

        let err = store.try_parse(&path).await.unwrap_err();
        assert!(err.is_installation(), "id {:?}", id);
        assert!(err.to_string().contains("invalid mod id"), "id {:?}", id);
    }

    // install refuses them too, even when handed a package directly
    let mut escaping = package.clone();
    escaping.id = "..".to_string();
    assert!(store.install(&escaping).await.unwrap_err().is_installation());

    assert!(sentinel.is_file());
    assert!(ws.config.storage.mods_dir.join("good").join("mod.json").is_file());
    assert_eq!(store.installed_mods().len(), 1);
}

#[tokio::test]
async fn test_failed_reinstall_keeps_previous_version() {
    let ws = Workspace::new();
    let store = store(&ws);

    let path = ws.qmod("noodle.qmod", &manifest("noodle", "Scotland2", None));
    let package = store.try_parse(&path).await.unwrap().unwrap();
    store.install(&package).await.unwrap();

    // The archive is replaced by garbage between parse and the second install
    std::fs::write(&path, b"truncated download").unwrap();
    let err = store.install(&package).await.unwrap_err();
    assert!(err.is_installation());

    let mod_dir = ws.config.storage.mods_dir.join("noodle");
    assert_eq!(std::fs::read(mod_dir.join("libs/libmod.so")).unwrap(), b"ELF");
    assert_eq!(store.installed_mods().len(), 1);

    let leftovers: Vec<_> = std::fs::read_dir(&ws.config.storage.mods_dir)
        .unwrap()
        .map(|entry| entry.unwrap().file_name())
        .collect();
    assert_eq!(leftovers, vec![std::ffi::OsString::from("noodle")]);
}
