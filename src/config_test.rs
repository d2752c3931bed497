use std::collections::HashMap;

use super::*;

fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
    let map: HashMap<String, String> = pairs.iter().map(|(k, v)| ((*k).to_owned(), (*v).to_owned())).collect();
    move |key| map.get(key).cloned()
}

#[test]
fn from_lookup_defaults() {
    let cfg = ServerConfig::from_lookup(lookup_from(&[])).unwrap();
    assert_eq!(cfg.port, DEFAULT_PORT);
    assert_eq!(cfg.database_url, None);
    assert_eq!(cfg.db_max_connections, DEFAULT_DB_MAX_CONNECTIONS);
    assert_eq!(cfg.static_dir, PathBuf::from(DEFAULT_STATIC_DIR));
}

#[test]
fn from_lookup_reads_overrides() {
    let cfg = ServerConfig::from_lookup(lookup_from(&[
        ("PORT", "8080"),
        ("DATABASE_URL", "postgres://u:p@db/layout"),
        ("DB_MAX_CONNECTIONS", "12"),
        ("STATIC_DIR", "/srv/www"),
    ]))
    .unwrap();
    assert_eq!(cfg.port, 8080);
    assert_eq!(cfg.database_url.as_deref(), Some("postgres://u:p@db/layout"));
    assert_eq!(cfg.db_max_connections, 12);
    assert_eq!(cfg.static_dir, PathBuf::from("/srv/www"));
}

#[test]
fn from_lookup_rejects_bad_port() {
    let err = ServerConfig::from_lookup(lookup_from(&[("PORT", "http")])).unwrap_err();
    assert_eq!(err, ConfigError::InvalidPort("http".into()));
}

#[test]
fn from_lookup_rejects_out_of_range_port() {
    assert!(ServerConfig::from_lookup(lookup_from(&[("PORT", "70000")])).is_err());
}

#[test]
fn blank_database_url_means_memory() {
    let cfg = ServerConfig::from_lookup(lookup_from(&[("DATABASE_URL", "  ")])).unwrap();
    assert!(cfg.database_url.is_none());
}

#[test]
fn bad_pool_size_falls_back() {
    let zero = ServerConfig::from_lookup(lookup_from(&[("DB_MAX_CONNECTIONS", "0")])).unwrap();
    let junk = ServerConfig::from_lookup(lookup_from(&[("DB_MAX_CONNECTIONS", "many")])).unwrap();
    assert_eq!(zero.db_max_connections, DEFAULT_DB_MAX_CONNECTIONS);
    assert_eq!(junk.db_max_connections, DEFAULT_DB_MAX_CONNECTIONS);
}
