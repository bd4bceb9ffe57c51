mod common;

use std::path::PathBuf;
use std::time::{SystemTime, UNIX_EPOCH};

use fbrt_runtime::{Resource, RuntimeConfig, RuntimeError};
use tracing::Level;

fn temp_config(contents: &str) -> PathBuf {
    let stamp = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("clock")
        .as_nanos();
    let path = std::env::temp_dir().join(format!("fbrt-config-{stamp}.toml"));
    std::fs::write(&path, contents).expect("write config");
    path
}

#[test]
fn loads_resource_and_types_from_file() {
    let path = temp_config(
        r#"
[resource]
name = "PLANT"

[log]
level = "debug"

[[types.struct]]
name = "SEGMENT"
members = [
    { name = "FROM", type = "POINT" },
    { name = "TO", type = "POINT" },
]

[[types.struct]]
name = "POINT"
members = [
    { name = "X", type = "LREAL" },
    { name = "Y", type = "LREAL" },
]

[[types.array]]
name = "PATH"
element = "SEGMENT"
lower = 0
upper = 7
"#,
    );
    let config = RuntimeConfig::load(&path).expect("load config");
    std::fs::remove_file(&path).ok();
    assert_eq!(config.resource_name, "PLANT");
    assert_eq!(config.log_level, Level::DEBUG);
    assert_eq!(config.structs.len(), 2);
    assert_eq!(config.arrays[0].upper, 7);

    let resource = Resource::from_config(&config).expect("resource");
    assert_eq!(resource.name(), "PLANT");
    let library = resource.library();
    assert!(library.resolve_type("SEGMENT").is_some());
    assert!(library.resolve_type("PATH").is_some());

    let mux = resource
        .create_fb("M", "STRUCT_MUX_1SEGMENT")
        .expect("segment mux");
    assert_eq!(mux.lock().di_type_name(1).as_deref(), Some("POINT"));
}

#[test]
fn log_level_defaults_to_info() {
    let config = RuntimeConfig::from_toml_str("[resource]\nname = \"RES\"\n").expect("config");
    assert_eq!(config.log_level, Level::INFO);
    assert!(config.structs.is_empty());
    assert!(config.arrays.is_empty());
}

#[test]
fn rejects_invalid_sections() {
    let cases = [
        "",
        "[resource]\nname = \"1RES\"\n",
        "[resource]\nname = \"RES\"\n[log]\nlevel = \"loud\"\n",
        "[resource]\nname = \"RES\"\n[[types.struct]]\nname = \"EMPTY\"\nmembers = []\n",
        "[resource]\nname = \"RES\"\n[[types.struct]]\nname = \"P\"\nmembers = [{ name = \"X\", type = \"INT\" }, { name = \"X\", type = \"INT\" }]\n",
        "[resource]\nname = \"RES\"\n[[types.array]]\nname = \"A\"\nelement = \"INT\"\nlower = 3\nupper = 1\n",
        "[resource]\nname = \"RES\"\n[[types.array]]\nname = \"BIG\"\nelement = \"INT\"\nlower = -9223372036854775808\nupper = 9223372036854775807\n",
        "[resource]\nname = \"RES\"\n[[types.array]]\nname = \"WIDE\"\nelement = \"INT\"\nlower = 0\nupper = 65536\n",
    ];
    for text in cases {
        assert!(
            matches!(
                RuntimeConfig::from_toml_str(text),
                Err(RuntimeError::InvalidConfig(_))
            ),
            "accepted: {text:?}"
        );
    }
}

#[test]
fn unresolved_member_types_are_reported() {
    let config = RuntimeConfig::from_toml_str(
        "[resource]\nname = \"RES\"\n[[types.struct]]\nname = \"P\"\nmembers = [{ name = \"X\", type = \"MISSING\" }]\n",
    )
    .expect("config");
    let library = common::library();
    assert_eq!(
        config.register_types(&library),
        Err(RuntimeError::UnknownType("MISSING".into()))
    );
}

#[test]
fn missing_file_is_an_invalid_config() {
    let path = std::env::temp_dir().join("fbrt-config-does-not-exist.toml");
    assert!(matches!(
        RuntimeConfig::load(&path),
        Err(RuntimeError::InvalidConfig(_))
    ));
}
