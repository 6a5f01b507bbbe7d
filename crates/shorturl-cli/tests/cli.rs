use std::process::{Command, Output};

use anyhow::Result;
use serde_json::json;
use shorturl_test_support::fixtures::{ConfigDir, customised_document};

fn short_url_config(args: &[&str]) -> Result<Output> {
    let output = Command::new(env!("CARGO_BIN_EXE_short-url-config"))
        .args(args)
        .env_remove("SHORT_URL_CONFIG")
        .env("RUST_LOG", "off")
        .output()?;
    Ok(output)
}

#[test]
fn check_accepts_a_valid_document() -> Result<()> {
    let dir = ConfigDir::new()?;
    let path = dir.write_json("short-url.json", &customised_document())?;
    let path = path.to_string_lossy();

    let output = short_url_config(&["check", "--file", &path])?;
    assert_eq!(output.status.code(), Some(0));
    assert_eq!(String::from_utf8(output.stdout)?.trim(), "ok");
    Ok(())
}

#[test]
fn check_exits_with_two_on_a_rule_violation() -> Result<()> {
    let dir = ConfigDir::new()?;
    let path = dir.write_json("short-url.json", &json!({ "key_length": "INVALID" }))?;
    let path = path.to_string_lossy();

    let output = short_url_config(&["check", "-f", &path])?;
    assert_eq!(output.status.code(), Some(2));
    assert_eq!(
        String::from_utf8(output.stderr)?.trim(),
        "error: The config URL length is not a valid integer."
    );
    Ok(())
}

#[test]
fn check_exits_with_three_on_unreadable_documents() -> Result<()> {
    let dir = ConfigDir::new()?;
    let path = dir.write("short-url.json", "{ not json")?;
    let path = path.to_string_lossy();

    let output = short_url_config(&["check", "-f", &path])?;
    assert_eq!(output.status.code(), Some(3));
    assert!(String::from_utf8(output.stderr)?.contains("failed to parse JSON configuration"));
    Ok(())
}

#[test]
fn check_without_a_file_is_a_usage_error_not_a_rule_violation() -> Result<()> {
    let output = short_url_config(&["check"])?;
    assert_eq!(output.status.code(), Some(64));
    assert!(String::from_utf8(output.stderr)?.contains("--file"));
    Ok(())
}

#[test]
fn help_exits_successfully() -> Result<()> {
    let output = short_url_config(&["--help"])?;
    assert_eq!(output.status.code(), Some(0));
    assert!(String::from_utf8(output.stdout)?.contains("Usage: short-url-config"));
    Ok(())
}

#[test]
fn show_renders_resolved_settings_as_json() -> Result<()> {
    let dir = ConfigDir::new()?;
    let path = dir.write("short-url.yml", "default_redirect_status_code: 308\n")?;
    let path = path.to_string_lossy();

    let output = short_url_config(&["show", "-f", &path, "--format", "json"])?;
    assert_eq!(output.status.code(), Some(0));
    let settings: serde_json::Value = serde_json::from_slice(&output.stdout)?;
    assert_eq!(settings["redirect_status"], json!(308));
    assert_eq!(settings["key_length"], json!(5));
    Ok(())
}

#[test]
fn defaults_print_as_yaml() -> Result<()> {
    let output = short_url_config(&["defaults"])?;
    assert_eq!(output.status.code(), Some(0));
    let text = String::from_utf8(output.stdout)?;
    assert!(text.contains("default_short_urls_table: short_urls"));
    Ok(())
}
