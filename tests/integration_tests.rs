//! End-to-end tests driving the CLI executor through a project lifecycle

use better_env::{
    cli::{BetterEnvCli, CliExecutor},
    BetterEnvError, CONFIG_FILE_NAME,
};
use clap::Parser;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

/// Parse `args` like the binary would and run them from `cwd`
fn run(cwd: &Path, args: &[&str]) -> (better_env::Result<()>, String) {
    let cli = BetterEnvCli::try_parse_from(args).expect("arguments should parse");
    let mut executor = CliExecutor::new(Vec::new(), cli.json, cwd.to_path_buf());
    let result = executor.execute(cli.command);
    let output = String::from_utf8(executor.into_inner()).expect("output is utf-8");
    (result, output)
}

#[test]
fn test_init_then_list_lifecycle() {
    let project = TempDir::new().unwrap();

    let (result, output) = run(project.path(), &["bnv", "init"]);
    result.unwrap();
    assert_eq!(output, "Created empty .better-env file.\n");

    let manifest = project.path().join(CONFIG_FILE_NAME);
    assert_eq!(fs::metadata(&manifest).unwrap().len(), 0);

    let (result, output) = run(project.path(), &["bnv", "list"]);
    result.unwrap();
    assert!(output.is_empty());

    fs::write(&manifest, "# services\nAWS_API_KEY\n  GEMINI_API_KEY\n\nMONGODB_API_KEY\n").unwrap();

    let (result, output) = run(project.path(), &["bnv", "list"]);
    result.unwrap();
    assert_eq!(output, "AWS_API_KEY\nGEMINI_API_KEY\nMONGODB_API_KEY\n");

    let (result, output) = run(project.path(), &["bnv", "check"]);
    result.unwrap();
    assert!(output.contains("3 declaration(s), no problems found"));
}

#[test]
fn test_init_refuses_then_forces() {
    let project = TempDir::new().unwrap();
    let manifest = project.path().join(CONFIG_FILE_NAME);
    fs::write(&manifest, "API_KEY\n").unwrap();

    let (result, _) = run(project.path(), &["bnv", "init"]);
    let err = result.unwrap_err();
    assert!(err.to_string().contains("use --force to overwrite"));
    assert_eq!(fs::read_to_string(&manifest).unwrap(), "API_KEY\n");

    let (result, _) = run(project.path(), &["bnv", "init", "--force"]);
    result.unwrap();
    assert_eq!(fs::metadata(&manifest).unwrap().len(), 0);
}

#[test]
fn test_init_with_relative_path_option() {
    let root = TempDir::new().unwrap();

    let (result, output) = run(root.path(), &["bnv", "--json", "init", "-p", "nested/project"]);
    result.unwrap();

    let manifest = root.path().join("nested/project").join(CONFIG_FILE_NAME);
    assert!(manifest.is_file());

    let value: serde_json::Value = serde_json::from_str(&output).unwrap();
    assert!(value["created"].as_str().unwrap().ends_with(CONFIG_FILE_NAME));
}

#[test]
fn test_list_without_any_manifest() {
    let root = TempDir::new().unwrap();
    let project = root.path().join("project");
    fs::create_dir(&project).unwrap();

    let cli = BetterEnvCli::try_parse_from(["bnv", "list"]).unwrap();
    let mut executor = CliExecutor::new(Vec::new(), cli.json, project.clone())
        .with_search_ceiling(Some(root.path().to_path_buf()));
    let err = executor.execute(cli.command).unwrap_err();

    match err.downcast_ref::<BetterEnvError>() {
        Some(BetterEnvError::ConfigNotFound { start }) => assert_eq!(start, &project),
        other => panic!("expected ConfigNotFound, got {other:?}"),
    }
}
