use std::env;
use std::fs;
use std::path::Path;

use toml::Value;
use visor_core::config::{resolve_config_path, AppConfig, ConfigOverrides};

use super::CommandResult;

pub fn run(
    config: &AppConfig,
    config_path: Option<&Path>,
    overrides: &ConfigOverrides,
) -> CommandResult {
    let config_file_path = resolve_config_path(config_path);
    let config_file_doc = load_config_file_doc(config_file_path.as_deref());
    let source = |key_path: &str, cli_flag: Option<&str>, env_keys: &[&str]| {
        if let Some(flag) = cli_flag {
            return format!("cli ({flag})");
        }
        field_source(key_path, env_keys, config_file_doc.as_ref(), config_file_path.as_deref())
    };

    let lines = [
        "effective config (source precedence: cli > env > file > default):".to_string(),
        render_line(
            "display.locale",
            config.display.locale.as_str(),
            source(
                "display.locale",
                overrides.locale.map(|_| "--locale"),
                &["VISOR_DISPLAY_LOCALE"],
            ),
        ),
        render_line(
            "logging.level",
            &config.logging.level,
            source(
                "logging.level",
                overrides.log_level.as_ref().map(|_| "--log-level"),
                &["VISOR_LOGGING_LEVEL", "VISOR_LOG_LEVEL"],
            ),
        ),
        render_line(
            "logging.format",
            &format!("{:?}", config.logging.format).to_ascii_lowercase(),
            source(
                "logging.format",
                overrides.log_format.map(|_| "--log-format"),
                &["VISOR_LOGGING_FORMAT", "VISOR_LOG_FORMAT"],
            ),
        ),
    ];

    CommandResult::rendered(lines.join("\n"))
}

fn load_config_file_doc(path: Option<&Path>) -> Option<Value> {
    let path = path?;
    let raw = fs::read_to_string(path).ok()?;
    raw.parse::<Value>().ok()
}

fn field_source(
    key_path: &str,
    env_keys: &[&str],
    config_file_doc: Option<&Value>,
    config_file_path: Option<&Path>,
) -> String {
    let set_env_key = env_keys
        .iter()
        .find(|key| env::var(key).is_ok_and(|value| !value.trim().is_empty()));
    if let Some(env_key) = set_env_key {
        return format!("env ({env_key})");
    }

    if let Some(doc) = config_file_doc {
        if contains_path(doc, key_path) {
            let file_path = config_file_path
                .map(|path| path.display().to_string())
                .unwrap_or_else(|| "config file".to_string());
            return format!("file ({file_path})");
        }
    }

    "default".to_string()
}

fn contains_path(root: &Value, key_path: &str) -> bool {
    let mut current = root;
    for key in key_path.split('.') {
        let Some(next) = current.get(key) else {
            return false;
        };
        current = next;
    }
    true
}

fn render_line(key: &str, value: &str, source: String) -> String {
    format!("- {key} = {value} (source: {source})")
}
