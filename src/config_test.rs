use super::*;
use std::collections::HashMap;

fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
    let map: HashMap<String, String> = pairs.iter().map(|(k, v)| ((*k).to_owned(), (*v).to_owned())).collect();
    move |key| map.get(key).cloned()
}

#[test]
fn defaults_when_nothing_set() {
    let config = ClientConfig::from_lookup(lookup_from(&[("HOME", "/home/ana")])).unwrap();
    assert_eq!(config.api_url, DEFAULT_API_URL);
    assert_eq!(config.storage_path, PathBuf::from("/home/ana/.carlot/storage.json"));
    assert_eq!(config.timeouts, Timeouts::default());
}

#[test]
fn storage_falls_back_to_cwd_without_home() {
    let config = ClientConfig::from_lookup(lookup_from(&[])).unwrap();
    assert_eq!(config.storage_path, PathBuf::from("./.carlot/storage.json"));
}

#[test]
fn explicit_values_override_defaults() {
    let config = ClientConfig::from_lookup(lookup_from(&[
        ("CARLOT_API_URL", "https://cars.example.com/api/"),
        ("CARLOT_STORAGE_PATH", "/tmp/carlot.json"),
        ("CARLOT_REQUEST_TIMEOUT_SECS", "5"),
        ("CARLOT_CONNECT_TIMEOUT_SECS", "2"),
    ]))
    .unwrap();
    assert_eq!(config.api_url, "https://cars.example.com/api");
    assert_eq!(config.storage_path, PathBuf::from("/tmp/carlot.json"));
    assert_eq!(config.timeouts, Timeouts { request_secs: 5, connect_secs: 2 });
}

#[test]
fn unparseable_timeouts_fall_back() {
    let config = ClientConfig::from_lookup(lookup_from(&[
        ("CARLOT_REQUEST_TIMEOUT_SECS", "soon"),
        ("CARLOT_CONNECT_TIMEOUT_SECS", "0"),
    ]))
    .unwrap();
    assert_eq!(config.timeouts, Timeouts::default());
}

#[test]
fn non_http_api_url_is_rejected() {
    let err = ClientConfig::from_lookup(lookup_from(&[("CARLOT_API_URL", "ftp://cars")])).unwrap_err();
    assert!(matches!(err, ConfigError::InvalidApiUrl(url) if url == "ftp://cars"));
}

#[test]
fn with_api_url_trims_and_validates() {
    let config = ClientConfig::from_lookup(lookup_from(&[])).unwrap();
    let config = config.with_api_url("http://127.0.0.1:4000/api/").unwrap();
    assert_eq!(config.api_url, "http://127.0.0.1:4000/api");
    assert!(config.with_api_url("localhost").is_err());
}
