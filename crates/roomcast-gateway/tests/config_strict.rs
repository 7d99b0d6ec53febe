#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]
#![allow(clippy::panic)]

use roomcast_gateway::config;

#[test]
fn deny_unknown_fields_nested() {
    let bad = r#"
version: 1
gateway:
  listen: "0.0.0.0:8080"
room:
  max_name_byte: 32 # typo should fail
"#;

    let err = config::load_from_str(bad).expect_err("must fail");
    assert_eq!(err.client_code().as_str(), "BAD_REQUEST");
}

#[test]
fn ok_minimal_config() {
    let cfg = config::load_from_str("version: 1\n").expect("must parse");
    assert_eq!(cfg.version, 1);
    assert_eq!(cfg.gateway.listen, "0.0.0.0:8080");
    assert_eq!(cfg.gateway.outbound_queue, 1024);
    assert_eq!(cfg.room.max_name_bytes, 64);
    assert_eq!(cfg.room.max_frame_bytes, 8192);
}

#[test]
fn wrong_version_is_unsupported() {
    let err = config::load_from_str("version: 2\n").expect_err("must fail");
    assert_eq!(err.client_code().as_str(), "UNSUPPORTED_VERSION");
}

#[test]
fn ranges_are_enforced() {
    let cases = [
        "version: 1\ngateway:\n  ping_interval_ms: 100\n",
        "version: 1\ngateway:\n  ping_interval_ms: 30000\n  idle_timeout_ms: 20000\n",
        "version: 1\ngateway:\n  outbound_queue: 0\n",
        "version: 1\ngateway:\n  listen: \"localhost\"\n",
        "version: 1\nroom:\n  max_name_bytes: 0\n",
        "version: 1\nroom:\n  max_frame_bytes: 10\n",
    ];
    for yaml in cases {
        let err = config::load_from_str(yaml).expect_err(yaml);
        assert_eq!(err.client_code().as_str(), "BAD_REQUEST", "yaml={yaml}");
    }
}

#[test]
fn shipped_config_parses() {
    let s = std::fs::read_to_string(concat!(env!("CARGO_MANIFEST_DIR"), "/../../roomcast.yaml")).unwrap();
    config::load_from_str(&s).expect("shipped roomcast.yaml must be valid");
}
