#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
use super::*;
use clap::Parser;

fn parse(args: &[&str]) -> Cli {
    Cli::parse_from(std::iter::once("vendorless").chain(args.iter().copied()))
}

#[test]
fn test_parse_tool_with_args() {
    let cli = parse(&["read_file", "--args", r#"{"path": "a.txt"}"#]);
    assert_eq!(cli.tool.as_deref(), Some("read_file"));
    assert_eq!(cli.args, r#"{"path": "a.txt"}"#);
}

#[test]
fn test_parse_defaults() {
    let cli = parse(&[]);
    assert!(cli.tool.is_none());
    assert_eq!(cli.args, "{}");
    assert!(!cli.list_tools);
}

#[test]
fn test_list_tools_output_is_sorted() {
    let cli = parse(&["--list-tools"]);
    let output = run(&cli).unwrap();
    let names: Vec<&str> = output.lines().collect();
    let mut sorted = names.clone();
    sorted.sort_unstable();
    assert_eq!(names, sorted);
    assert!(names.contains(&"azmcp_appconfig_kv_set"));
}

#[test]
fn test_describe_renders_manifest() {
    let cli = parse(&["--describe", "chat_get_membership"]);
    let output = run(&cli).unwrap();
    let manifest: serde_json::Value = serde_json::from_str(&output).unwrap();
    assert_eq!(manifest["name"], "chat_get_membership");
    assert_eq!(manifest["parameters"]["type"], "object");
}

#[test]
fn test_describe_unknown_tool() {
    let cli = parse(&["--describe", "bogus"]);
    let err = run(&cli).unwrap_err();
    assert_eq!(
        err,
        SimError::NotFound("Tool 'bogus' is not registered.".to_string())
    );
}

#[test]
fn test_missing_tool_is_an_error() {
    let err = run(&parse(&[])).unwrap_err();
    assert!(matches!(err, SimError::InvalidInput(_)));
}

#[test]
fn test_malformed_args_json() {
    let cli = parse(&["read_file", "--args", "{not json"]);
    let err = run(&cli).unwrap_err();
    assert!(matches!(err, SimError::InvalidInput(_)));
}

#[test]
fn test_non_object_args_rejected() {
    let cli = parse(&["read_file", "--args", "[1, 2]"]);
    let err = run(&cli).unwrap_err();
    assert_eq!(
        err,
        SimError::InvalidInput("--args must be a JSON object.".to_string())
    );
}
