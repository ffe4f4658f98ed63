use std::collections::HashMap;

use super::*;

fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
    let map: HashMap<String, String> = pairs.iter().map(|(k, v)| ((*k).to_owned(), (*v).to_owned())).collect();
    move |key| map.get(key).cloned()
}

#[test]
fn from_lookup_defaults_to_all_interfaces_on_3000() {
    let cfg = ServerConfig::from_lookup(lookup(&[])).unwrap();
    assert_eq!(cfg, ServerConfig { host: DEFAULT_HOST, port: DEFAULT_PORT });
    assert_eq!(cfg.bind_addr().to_string(), "0.0.0.0:3000");
}

#[test]
fn from_lookup_reads_overrides() {
    let cfg = ServerConfig::from_lookup(lookup(&[("HOST", "127.0.0.1"), ("PORT", " 8080 ")])).unwrap();
    assert_eq!(cfg.bind_addr().to_string(), "127.0.0.1:8080");
}

#[test]
fn from_lookup_treats_blank_values_as_unset() {
    let cfg = ServerConfig::from_lookup(lookup(&[("HOST", "  "), ("PORT", "")])).unwrap();
    assert_eq!(cfg.port, DEFAULT_PORT);
    assert_eq!(cfg.host, DEFAULT_HOST);
}

#[test]
fn from_lookup_rejects_bad_port() {
    for raw in ["abc", "0", "70000"] {
        let err = ServerConfig::from_lookup(lookup(&[("PORT", raw)])).unwrap_err();
        assert_eq!(err, ConfigError::InvalidPort { value: raw.to_owned() });
    }
}

#[test]
fn from_lookup_rejects_bad_host() {
    let err = ServerConfig::from_lookup(lookup(&[("HOST", "localhost")])).unwrap_err();
    assert_eq!(err, ConfigError::InvalidHost { value: "localhost".to_owned() });
    assert_eq!(err.to_string(), "invalid HOST \"localhost\": expected an IP address");
}

#[test]
fn from_env_reads_process_environment() {
    // # Safety
    // Only this test touches these variables.
    unsafe {
        std::env::set_var("PORT", "4100");
        std::env::remove_var("HOST");
    }
    let cfg = ServerConfig::from_env().unwrap();
    assert_eq!(cfg.port, 4100);
    unsafe { std::env::remove_var("PORT") };
}
