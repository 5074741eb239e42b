//! Unit tests for CLI parsing

use crate::cli::{Cli, Commands};
use clap::Parser;
use std::path::PathBuf;

#[test]
fn test_generate_command_with_flags() {
    let cli = Cli::try_parse_from([
        "amock",
        "generate",
        "--description",
        "users with a name",
        "--dry-run",
        "--model",
        "gpt-4o-mini",
    ])
    .unwrap();

    match cli.command {
        Commands::Generate {
            description,
            dry_run,
            model,
        } => {
            assert_eq!(description, "users with a name");
            assert!(dry_run);
            assert_eq!(model.model.as_deref(), Some("gpt-4o-mini"));
        }
        _ => panic!("Expected Generate command"),
    }
}

#[test]
fn test_global_flags_after_subcommand() {
    let cli = Cli::try_parse_from(["amock", "list", "--data-dir", "/tmp/mocks"]).unwrap();
    assert!(matches!(cli.command, Commands::List));
    assert_eq!(cli.data_dir, Some(PathBuf::from("/tmp/mocks")));
}

#[test]
fn test_delete_requires_id() {
    assert!(Cli::try_parse_from(["amock", "delete"]).is_err());
    let cli = Cli::try_parse_from(["amock", "delete", "01J9Z3W6Q0Y4S8M1Y2T3V4W5X6"]).unwrap();
    match cli.command {
        Commands::Delete { id } => assert_eq!(id, "01J9Z3W6Q0Y4S8M1Y2T3V4W5X6"),
        _ => panic!("Expected Delete command"),
    }
}

#[test]
fn test_generate_requires_description() {
    assert!(Cli::try_parse_from(["amock", "generate"]).is_err());
}

#[test]
fn test_all_commands_parse() {
    let commands = vec![
        vec!["amock", "serve", "--addr", "127.0.0.1:0"],
        vec!["amock", "generate", "-d", "orders"],
        vec!["amock", "list"],
        vec!["amock", "--config", "amock.yaml", "delete", "x"],
    ];

    for args in commands {
        let cli = Cli::try_parse_from(&args);
        assert!(cli.is_ok(), "Failed to parse command: {:?}", args);
    }
}
