use std::path::PathBuf;
use std::time::Duration;

use hearth::config::Config;
use hearth::http::request::Method;

#[test]
fn test_config_defaults() {
    let cfg = Config::default();

    assert_eq!(cfg.listen_addr, "127.0.0.1:9999");
    assert_eq!(cfg.resource_root, PathBuf::from("./public"));
    assert_eq!(cfg.allowed_methods, vec![Method::GET, Method::POST]);
    assert_eq!(cfg.worker_pool_size, 64);
    assert_eq!(cfg.read_buffer_size, 4096);
    assert_eq!(cfg.request_timeout(), None);
    assert!(cfg.validate().is_ok());
}

#[test]
fn test_config_from_yaml_overrides_some_fields() {
    let cfg = Config::from_yaml_str(
        "listen_addr: 0.0.0.0:8080\n\
         resource_root: /srv/www\n\
         allowed_methods: [GET]\n\
         request_timeout_secs: 30\n",
    )
    .unwrap();

    assert_eq!(cfg.listen_addr, "0.0.0.0:8080");
    assert_eq!(cfg.resource_root, PathBuf::from("/srv/www"));
    assert_eq!(cfg.allowed_methods, vec![Method::GET]);
    assert_eq!(cfg.request_timeout(), Some(Duration::from_secs(30)));
    // untouched fields keep their defaults
    assert_eq!(cfg.worker_pool_size, 64);
}

#[test]
fn test_config_rejects_unknown_method() {
    assert!(Config::from_yaml_str("allowed_methods: [GET, BREW]\n").is_err());
}

#[test]
fn test_config_validation() {
    assert!(Config::from_yaml_str("worker_pool_size: 0\n").is_err());
    assert!(Config::from_yaml_str("read_buffer_size: 0\n").is_err());
    assert!(Config::from_yaml_str("allowed_methods: []\n").is_err());
}

#[test]
fn test_config_from_file() {
    let path = std::env::temp_dir().join(format!("hearth-config-{}.yaml", std::process::id()));
    std::fs::write(&path, "worker_pool_size: 8\n").unwrap();

    let cfg = Config::from_file(&path).unwrap();
    std::fs::remove_file(&path).unwrap();

    assert_eq!(cfg.worker_pool_size, 8);
    assert!(Config::from_file(&path).is_err());
}

#[test]
fn test_config_listen_env_override() {
    unsafe {
        std::env::remove_var("HEARTH_CONFIG");
        std::env::set_var("LISTEN", "0.0.0.0:3000");
    }
    let cfg = Config::load().unwrap();
    unsafe {
        std::env::remove_var("LISTEN");
    }

    assert_eq!(cfg.listen_addr, "0.0.0.0:3000");
}
