use pushkind_promptbook::domain::types::Username;
use pushkind_promptbook::forms::auth::CredentialsFormPayload;
use pushkind_promptbook::repository::{JsonFileRepository, SnapshotReader};
use pushkind_promptbook::services::entries::{create_entry, list_entries};
use pushkind_promptbook::services::identity::{authenticate, register};
use tempfile::TempDir;

mod common;

fn credentials(username: &str, password: &str) -> CredentialsFormPayload {
    CredentialsFormPayload {
        username: Username::new(username).unwrap(),
        password: password.to_string(),
    }
}

#[test]
fn missing_file_is_an_empty_store() {
    let dir = TempDir::new().expect("temp dir");
    let repo = JsonFileRepository::open(dir.path().join("store.json")).expect("should open");

    assert!(repo.load_global().unwrap().users.is_empty());
    assert!(repo.list_owners().unwrap().is_empty());
    assert!(!repo.path().exists());
}

#[test]
fn state_survives_reopen() {
    let dir = TempDir::new().expect("temp dir");
    let path = dir.path().join("nested").join("store.json");
    let ann = Username::new("ann").unwrap();

    {
        let repo = JsonFileRepository::open(&path).expect("should open");
        register(credentials("ann", "pw1"), &repo).expect("should register");
        create_entry(&ann, common::entry_payload("VEO3", "drone shot", &[]), &repo)
            .expect("should create entry");
    }

    let repo = JsonFileRepository::open(&path).expect("should reopen");
    authenticate(credentials("ann", "pw1"), &repo).expect("credentials should persist");
    let entries = list_entries(&ann, &repo).expect("should list entries");
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].prompt_text, "drone shot");
    assert!(!path.with_extension("json.tmp").exists());
}

#[test]
fn file_layout_has_global_fields_and_scopes() {
    let dir = TempDir::new().expect("temp dir");
    let path = dir.path().join("store.json");
    let ann = Username::new("ann").unwrap();

    let repo = JsonFileRepository::open(&path).expect("should open");
    create_entry(&ann, common::entry_payload("Sora", "tide pool", &[]), &repo)
        .expect("should create entry");

    let text = std::fs::read_to_string(&path).expect("store file should exist");
    let value: serde_json::Value = serde_json::from_str(&text).unwrap();
    assert!(value["categories"].is_array());
    assert!(value["users"].is_array());
    assert_eq!(
        value["scopes"]["ann"]["entries"][0]["promptText"],
        "tide pool"
    );
}

#[test]
fn unreadable_file_fails_to_open() {
    let dir = TempDir::new().expect("temp dir");
    let path = dir.path().join("store.json");
    std::fs::write(&path, "{ truncated").unwrap();

    assert!(JsonFileRepository::open(&path).is_err());
}
