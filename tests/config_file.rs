//! Config file creation and loading

use newsrag::config::{load_config, load_or_create_config_at, Config};
use newsrag::search::SortOrder;
use tempfile::TempDir;

#[test]
fn creates_default_file_when_missing() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("nested").join("config.toml");

    let config = load_or_create_config_at(&path).unwrap();

    assert!(path.exists());
    assert_eq!(config.search.client_id, Config::default().search.client_id);

    let reloaded = load_config(&path).unwrap();
    assert_eq!(reloaded.search, config.search);
    assert_eq!(reloaded.completion, config.completion);
    assert_eq!(reloaded.prompt, config.prompt);
    assert_eq!(reloaded.defaults, config.defaults);
}

#[test]
fn loads_existing_file_without_overwriting() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("config.toml");
    std::fs::write(
        &path,
        r#"
[search]
client_id = "my-id"
client_secret = "my-secret"
cache_ttl_secs = 0

[completion]
api_key = "my-key"
model = "my-model"

[prompt]
citation_format = "- {title} ({link})"

[defaults]
sort = "relevance"
max_tokens = 256
"#,
    )
    .unwrap();

    let config = load_or_create_config_at(&path).unwrap();

    assert_eq!(config.search.client_id, "my-id");
    assert_eq!(config.search.cache_ttl_secs, 0);
    assert_eq!(config.completion.model, "my-model");
    assert_eq!(config.prompt.citation_format, "- {title} ({link})");
    assert_eq!(config.defaults.sort, SortOrder::Relevance);
    assert_eq!(config.defaults.max_tokens, 256);
    assert_eq!(config.defaults.result_count, 5);

    let on_disk = std::fs::read_to_string(&path).unwrap();
    assert!(on_disk.contains("my-secret"));
}

#[test]
fn malformed_file_reports_path() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("config.toml");
    std::fs::write(&path, "[search\nclient_id = ").unwrap();

    let err = load_config(&path).unwrap_err();
    assert!(format!("{err:#}").contains("config.toml"));
}
