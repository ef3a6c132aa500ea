use dimgrid::config::{AppConfig, render_template};
use dimgrid::error::ConfigError;
use std::fs;

fn vars(pairs: &[(&str, &str)]) -> Vec<(String, String)> {
    pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}

#[test]
fn test_defaults() {
    let config = AppConfig::default();
    assert_eq!(config.max_rows, 500);
    assert_eq!(config.max_columns, 256);
    assert_eq!(config.page_limit, 20);
    assert_eq!(config.entity, "dimension");
    assert_eq!(config.endpoints.list, "/api/dimensions");
    assert!(config.auth_token.is_none());
    println!("✓ Defaults match the documented limits");
}

#[test]
fn test_env_overrides() {
    let mut config = AppConfig::default();
    config
        .apply_overrides(vars(&[
            ("DIMGRID_MAX_ROWS", "50"),
            ("DIMGRID_PAGE_LIMIT", " 5 "),
            ("DIMGRID_MAX_COLUMNS", "12"),
            ("DIMGRID_AUTH_TOKEN", "secret"),
            ("DIMGRID_API_BASE_URL", "https://api.example.com"),
            ("HOME", "/root"),
        ]))
        .unwrap();

    assert_eq!(config.max_rows, 50);
    assert_eq!(config.page_limit, 5);
    assert_eq!(config.max_columns, 12);
    assert_eq!(config.auth_token.as_deref(), Some("secret"));
    assert_eq!(config.api_base_url, "https://api.example.com");
    println!("✓ DIMGRID_* variables override the config");
}

#[test]
fn test_invalid_env_value() {
    let mut config = AppConfig::default();
    let err = config
        .apply_overrides(vars(&[("DIMGRID_MAX_ROWS", "lots")]))
        .unwrap_err();
    match err {
        ConfigError::InvalidEnv { key, value } => {
            assert_eq!(key, "DIMGRID_MAX_ROWS");
            assert_eq!(value, "lots");
        }
        other => panic!("unexpected error: {}", other),
    }
    assert_eq!(config.max_rows, 500);
    println!("✓ Unparsable overrides are reported");
}

#[test]
fn test_partial_file_keeps_defaults() {
    let path = std::env::temp_dir().join(format!("dimgrid_config_{}.json", std::process::id()));
    fs::write(
        &path,
        r#"{"max_rows": 200, "messages": {"row_limit": "Only {max_rows} rows"}}"#,
    )
    .unwrap();

    let config = AppConfig::from_file(&path).unwrap();
    fs::remove_file(&path).ok();

    assert_eq!(config.max_rows, 200);
    assert_eq!(config.page_limit, 20);
    assert_eq!(config.messages.row_limit, "Only {max_rows} rows");
    assert_eq!(config.messages.empty_column, "Column name is required");
    println!("✓ Missing keys fall back to defaults");
}

#[test]
fn test_file_errors() {
    let missing = AppConfig::from_file("/nonexistent/dimgrid.json");
    assert!(matches!(missing, Err(ConfigError::Io(_))));

    let path = std::env::temp_dir().join(format!("dimgrid_bad_{}.json", std::process::id()));
    fs::write(&path, "{ not json").unwrap();
    let bad = AppConfig::from_file(&path);
    fs::remove_file(&path).ok();
    assert!(matches!(bad, Err(ConfigError::Parse(_))));
    println!("✓ Unreadable and malformed files are reported");
}

#[test]
fn test_render_template() {
    assert_eq!(
        render_template("You can add a maximum of {max_rows} rows", "{max_rows}", "25"),
        "You can add a maximum of 25 rows"
    );
    assert_eq!(render_template("no placeholder", "{name}", "x"), "no placeholder");
    println!("✓ Templates substitute their placeholder");
}
