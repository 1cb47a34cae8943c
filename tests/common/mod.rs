use std::fs;
use std::path::PathBuf;
use studybuddy::config::ChatConfig;
use studybuddy::storage::Storage;
use studybuddy::{App, ReplyGateway};
use tempfile::TempDir;

#[allow(dead_code)]
pub fn create_temp_storage() -> (Storage, TempDir) {
    let tmp = TempDir::new().expect("failed to create tempdir");
    let storage = Storage::open(tmp.path()).expect("failed to open sled storage");
    (storage, tmp)
}

#[allow(dead_code)]
pub fn open_app(dir: &TempDir, gateway: Box<dyn ReplyGateway>) -> App {
    let storage = Storage::open(dir.path()).expect("failed to open sled storage");
    App::with_parts(storage, gateway, &ChatConfig::default()).expect("failed to open app")
}

#[allow(dead_code)]
pub fn temp_config_file(contents: &str) -> (TempDir, PathBuf) {
    let temp_dir = TempDir::new().expect("failed to create tempdir");
    let config_path = temp_dir.path().join("config.yaml");
    fs::write(&config_path, contents).expect("failed to write config file");
    (temp_dir, config_path)
}
