use std::fs;

use taskmate::config::{Config, Verbosity, CONFIG_FILE};
use taskmate::Error;

#[test]
fn config_defaults_when_missing() {
    let dir = tempfile::tempdir().expect("tempdir");
    let config = Config::load_or_default(&dir.path().join(CONFIG_FILE));

    assert_eq!(config.store.key, "tasks");
    assert_eq!(config.chat.verbosity, Verbosity::Rich);
    assert_eq!(config.chat.thinking_delay_ms, 500);
    assert_eq!(config.tasks.default_priority, 3);
}

#[test]
fn config_overrides_from_toml() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempfile::tempdir()?;
    let config_path = dir.path().join(CONFIG_FILE);
    let toml = r#"
[store]
key = "home"
lock_timeout_ms = 250

[chat]
verbosity = "compact"
thinking_delay_ms = 0

[tasks]
default_priority = 5
"#;
    fs::write(&config_path, toml)?;

    let config = Config::load(&config_path)?;
    assert_eq!(config.store.key, "home");
    assert_eq!(config.store.lock_timeout_ms, 250);
    assert_eq!(config.chat.verbosity, Verbosity::Compact);
    assert_eq!(config.chat.thinking_delay_ms, 0);
    assert_eq!(config.tasks.default_priority, 5);
    assert_eq!(config.store_file(dir.path()), dir.path().join("home.json"));
    Ok(())
}

#[test]
fn invalid_values_are_rejected() {
    let dir = tempfile::tempdir().expect("tempdir");
    let config_path = dir.path().join(CONFIG_FILE);

    for contents in [
        "[store]\nkey = \"\"\n",
        "[store]\nlock_timeout_ms = 0\n",
        "[chat]\nthinking_delay_ms = 60000\n",
        "[tasks]\ndefault_priority = 6\n",
    ] {
        fs::write(&config_path, contents).expect("write");
        let err = Config::load(&config_path).unwrap_err();
        assert!(matches!(err, Error::InvalidConfig(_)), "{contents}");
        assert_eq!(err.exit_code(), 2);
    }
}

#[test]
fn unknown_verbosity_is_a_parse_error() {
    let dir = tempfile::tempdir().expect("tempdir");
    let config_path = dir.path().join(CONFIG_FILE);
    fs::write(&config_path, "[chat]\nverbosity = \"loud\"\n").expect("write");

    let err = Config::load(&config_path).unwrap_err();
    assert!(matches!(err, Error::TomlParse(_)));
}
