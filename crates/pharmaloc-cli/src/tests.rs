use clap::Parser;
use pharmaloc_core::PharmacyStatus;

use super::*;

#[test]
fn no_command_is_none() {
    let cli = Cli::try_parse_from(["pharmaloc"]).expect("expected valid cli args");
    assert!(cli.command.is_none());
}

#[test]
fn parses_migrate_and_seed() {
    let migrate = Cli::try_parse_from(["pharmaloc", "migrate"]).expect("valid args");
    let seed = Cli::try_parse_from(["pharmaloc", "seed"]).expect("valid args");
    assert!(matches!(migrate.command, Some(Commands::Migrate)));
    assert!(matches!(seed.command, Some(Commands::Seed)));
}

#[test]
fn parses_search_with_filters() {
    let cli = Cli::try_parse_from([
        "pharmaloc",
        "search",
        "paracetamol",
        "--lat",
        "12.37",
        "--lng",
        "-1.52",
        "--status",
        "garde",
        "--limit",
        "5",
        "--available-only",
    ])
    .expect("valid args");

    let Some(Commands::Search(args)) = cli.command else {
        panic!("expected search command");
    };
    assert_eq!(args.term.as_deref(), Some("paracetamol"));
    assert_eq!(args.lat, Some(12.37));
    assert_eq!(args.lng, Some(-1.52));
    assert_eq!(args.status, Some(PharmacyStatus::OnDuty));
    assert_eq!(args.limit, Some(5));
    assert!(args.available_only);
    assert!(!args.interactive);
}

#[test]
fn search_without_term_lists_everything() {
    let cli = Cli::try_parse_from(["pharmaloc", "search"]).expect("valid args");
    let Some(Commands::Search(args)) = cli.command else {
        panic!("expected search command");
    };
    assert!(args.term.is_none());
}

#[test]
fn latitude_requires_longitude() {
    let result = Cli::try_parse_from(["pharmaloc", "search", "--lat", "12.0"]);
    assert!(result.is_err());
}

#[test]
fn unknown_status_is_rejected() {
    let result = Cli::try_parse_from(["pharmaloc", "search", "--status", "sometimes"]);
    assert!(result.is_err());
}

#[test]
fn interactive_conflicts_with_term() {
    let result = Cli::try_parse_from(["pharmaloc", "search", "aspirine", "--interactive"]);
    assert!(result.is_err());
}
