use super::*;
use clap::CommandFactory;

#[test]
fn verify_cli_args() {
    Cli::command().debug_assert();
}

#[test]
fn test_subcommand_names_match_procedures() {
    for procedure in Procedure::ALL {
        let cli = Cli::try_parse_from(["athar", procedure.name()]).unwrap();
        assert_eq!(cli.command.procedure(), procedure);
        assert!(!cli.global.verbose);
    }
}

#[test]
fn test_global_verbose_after_subcommand() {
    let cli = Cli::try_parse_from(["athar", "migrate", "--verbose"]).unwrap();
    assert_eq!(cli.command, Commands::Migrate);
    assert!(cli.global.verbose);
}

#[test]
fn test_subcommands_take_no_flags() {
    assert!(Cli::try_parse_from(["athar", "seed", "--force"]).is_err());
    assert!(Cli::try_parse_from(["athar"]).is_err());
}
