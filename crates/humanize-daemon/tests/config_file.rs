use humanize_daemon::config::{EmbedderBackend, GeneratorBackend};
use humanize_daemon::{build_registry, DaemonConfig};
use std::path::PathBuf;

fn write_config(name: &str, contents: &str) -> PathBuf {
    let path = std::env::temp_dir().join(format!("{}-{}.toml", name, std::process::id()));
    std::fs::write(&path, contents).unwrap();
    path
}

#[test]
fn file_overrides_defaults() {
    let path = write_config(
        "humanized-file",
        r#"
[server]
listen_addr = "0.0.0.0:9100"
enable_cors = false

[models.authenticity]
backend = "open_ai"
endpoint = "https://api.openai.com/v1"
model = "gpt-4o-mini"
max_concurrent = 4

[models.structural]
backend = "disabled"
model = "unused"

[pipeline]
step_delay_ms = 0
voice_seed = 7
"#,
    );

    let config = DaemonConfig::load(path.to_str()).unwrap();
    assert_eq!(config.server.listen_addr.port(), 9100);
    assert!(!config.server.enable_cors);
    assert_eq!(config.models.authenticity.backend, GeneratorBackend::OpenAi);
    assert_eq!(config.models.authenticity.max_concurrent, 4);
    assert_eq!(config.models.embedder.backend, EmbedderBackend::Hashing);
    assert_eq!(config.pipeline.voice_seed, Some(7));

    let registry = build_registry(&config.models).unwrap();
    assert!(registry.structural_generator().is_err());
    assert_eq!(registry.authenticity_generator().unwrap().name(), "gpt-4o-mini");

    std::fs::remove_file(path).ok();
}

#[test]
fn missing_file_falls_back_to_defaults() {
    let config = DaemonConfig::load(Some("/nonexistent/humanized")).unwrap();
    assert_eq!(config.server.listen_addr.port(), 8000);
    assert_eq!(config.pipeline.model_timeout_secs, 120);
}
