use modsmith_cli::copy::{copy_to_directory, DirectoryCopier};
use modsmith_core::AssetCopier;
use std::fs;

#[test]
fn test_copy_creates_destination() {
    let temp = tempfile::tempdir().unwrap();
    let source = temp.path().join("cool.hat");
    fs::write(&source, b"hat data").unwrap();
    let dest_dir = temp.path().join("assets").join("hats");

    let dest = copy_to_directory(&source, &dest_dir).unwrap();

    assert_eq!(dest, dest_dir.join("cool.hat"));
    assert_eq!(fs::read(&dest).unwrap(), b"hat data");
    assert!(source.exists(), "source must be left in place");
}

#[test]
fn test_copy_conflict_gets_suffix() {
    let temp = tempfile::tempdir().unwrap();
    let source = temp.path().join("cool.hat");
    fs::write(&source, b"new").unwrap();
    let dest_dir = temp.path().join("hats");
    fs::create_dir_all(&dest_dir).unwrap();
    fs::write(dest_dir.join("cool.hat"), b"old").unwrap();

    let dest = copy_to_directory(&source, &dest_dir).unwrap();

    assert_eq!(dest, dest_dir.join("cool-1.hat"));
    assert_eq!(fs::read(dest_dir.join("cool.hat")).unwrap(), b"old");
}

#[test]
fn test_copy_missing_source_is_installation_error() {
    let temp = tempfile::tempdir().unwrap();
    let err = copy_to_directory(&temp.path().join("gone.hat"), temp.path()).unwrap_err();

    assert!(err.is_installation());
    assert!(err.to_string().contains("gone.hat"));
}

#[tokio::test]
async fn test_directory_copier() {
    let temp = tempfile::tempdir().unwrap();
    let source = temp.path().join("blue.saber");
    fs::write(&source, b"saber").unwrap();

    let copier = DirectoryCopier::new(temp.path().join("sabers"));
    copier.copy(&source).await.unwrap();
    copier.copy(&source).await.unwrap();

    assert!(copier.destination().join("blue.saber").is_file());
    assert!(copier.destination().join("blue-1.saber").is_file());
}
