use clap::Parser;
use notekeeper::cli::args::{Args, Command};

#[test]
fn given_no_subcommand_when_parsing_then_fails() {
    // Arrange
    let args = vec!["notekeeper"];

    // Act & Assert
    let result = Args::try_parse_from(args);
    assert!(result.is_err(), "Should fail without subcommand");
}

#[test]
fn given_list_command_when_parsing_then_defaults_to_plain_output() {
    // Arrange
    let args = vec!["notekeeper", "list"];

    // Act
    let parsed = Args::try_parse_from(args).unwrap();

    // Assert
    match parsed.command {
        Command::List { json, open } => {
            assert!(!json);
            assert!(!open);
        }
        _ => panic!("Expected List command"),
    }
    assert_eq!(parsed.config, None);
}

#[test]
fn given_json_and_open_when_parsing_then_fails() {
    // Arrange
    let args = vec!["notekeeper", "list", "--json", "--open"];

    // Act & Assert
    assert!(Args::try_parse_from(args).is_err());
}

#[test]
fn given_create_command_with_image_when_parsing_then_succeeds() {
    // Arrange
    let args = vec![
        "notekeeper",
        "create",
        "--name",
        "Holiday",
        "-d",
        "Beach trip",
        "--image",
        "/tmp/beach.png",
    ];

    // Act
    let parsed = Args::try_parse_from(args).unwrap();

    // Assert
    match parsed.command {
        Command::Create {
            name,
            description,
            image,
        } => {
            assert_eq!(name, "Holiday");
            assert_eq!(description, "Beach trip");
            assert_eq!(image, Some(std::path::PathBuf::from("/tmp/beach.png")));
        }
        _ => panic!("Expected Create command"),
    }
}

#[test]
fn given_create_without_fields_when_parsing_then_fields_empty() {
    // Arrange
    let args = vec!["notekeeper", "create"];

    // Act
    let parsed = Args::try_parse_from(args).unwrap();

    // Assert
    match parsed.command {
        Command::Create {
            name,
            description,
            image,
        } => {
            assert_eq!(name, "");
            assert_eq!(description, "");
            assert_eq!(image, None);
        }
        _ => panic!("Expected Create command"),
    }
}

#[test]
fn given_delete_command_when_parsing_then_succeeds() {
    // Arrange
    let args = vec!["notekeeper", "delete", "a1b2-c3"];

    // Act
    let parsed = Args::try_parse_from(args).unwrap();

    // Assert
    match parsed.command {
        Command::Delete { note_id } => assert_eq!(note_id, "a1b2-c3"),
        _ => panic!("Expected Delete command"),
    }
}

#[test]
fn given_delete_without_id_when_parsing_then_fails() {
    // Arrange
    let args = vec!["notekeeper", "delete"];

    // Act & Assert
    assert!(Args::try_parse_from(args).is_err());
}

#[test]
fn given_sign_out_command_when_parsing_then_succeeds() {
    // Arrange
    let args = vec!["notekeeper", "sign-out"];

    // Act
    let parsed = Args::try_parse_from(args).unwrap();

    // Assert
    assert!(matches!(parsed.command, Command::SignOut));
}

#[test]
fn given_global_config_flag_after_subcommand_when_parsing_then_succeeds() {
    // Arrange - global flags work anywhere when marked as global
    let args = vec!["notekeeper", "list", "-c", "/etc/notekeeper.toml"];

    // Act
    let parsed = Args::try_parse_from(args).unwrap();

    // Assert
    assert_eq!(
        parsed.config,
        Some(std::path::PathBuf::from("/etc/notekeeper.toml"))
    );
}

#[test]
fn given_verbose_flag_when_parsing_then_increments_count() {
    // Arrange
    let args = vec!["notekeeper", "-vv", "list"];

    // Act
    let parsed = Args::try_parse_from(args).unwrap();

    // Assert
    assert_eq!(parsed.verbose, 2);
}
