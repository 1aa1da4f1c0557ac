//! Configuration loading and installation

use figment::Jail;
use serial_test::serial;
use std::fs;
use tempfile::TempDir;
use tls_hash_core::{
    BackendKind, HashAlgorithm, HashConfig, HashState, is_certified_mode, set_certified_mode,
};

#[test]
fn test_missing_file_uses_defaults() {
    Jail::expect_with(|_| {
        let dir = TempDir::new().map_err(|e| e.to_string())?;
        let config = HashConfig::load_from(dir.path().join("missing.toml"))
            .map_err(|e| e.to_string())?;
        assert_eq!(config, HashConfig::default());
        Ok(())
    });
}

#[test]
fn test_load_from_toml_file() {
    Jail::expect_with(|_| {
        let dir = TempDir::new().map_err(|e| e.to_string())?;
        let path = dir.path().join("tls_hash.toml");
        fs::write(&path, "certified_mode = true\n").map_err(|e| e.to_string())?;

        let config = HashConfig::load_from(&path).map_err(|e| e.to_string())?;
        assert!(config.certified_mode);
        Ok(())
    });
}

#[test]
fn test_environment_variable_enables_certified_mode() {
    Jail::expect_with(|jail| {
        jail.set_env("TLS_HASH_CERTIFIED_MODE", "true");
        let config = HashConfig::load().map_err(|e| e.to_string())?;
        assert!(config.certified_mode);
        Ok(())
    });
}

#[test]
fn test_malformed_file_is_reported() {
    Jail::expect_with(|_| {
        let dir = TempDir::new().map_err(|e| e.to_string())?;
        let path = dir.path().join("tls_hash.toml");
        fs::write(&path, "certified_mode = [").map_err(|e| e.to_string())?;

        let err = HashConfig::load_from(&path).unwrap_err();
        assert!(err.to_string().contains("Invalid configuration"));
        Ok(())
    });
}

#[test]
#[serial(certified_mode)]
fn test_apply_installs_process_mode() {
    HashConfig::test().apply();
    assert!(is_certified_mode());

    let mut state = HashState::new().unwrap();
    assert_eq!(state.backend(), BackendKind::Handle);
    assert!(state.init(HashAlgorithm::MD5).is_err());

    HashConfig::default().apply();
    assert!(!is_certified_mode());
    state.init(HashAlgorithm::MD5).unwrap();
    assert_eq!(state.backend(), BackendKind::LowLevel);

    set_certified_mode(false);
}
