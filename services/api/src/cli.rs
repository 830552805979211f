use crate::server;
use clap::{Args, Parser, Subcommand};
use driver_onboarding::config::AppConfig;
use driver_onboarding::error::AppError;
use driver_onboarding::validation::{validate_email, validate_name, validate_phone, ValidatedField};
use serde::Serialize;

#[derive(Parser, Debug)]
#[command(
    name = "Driver Onboarding Validator",
    about = "Validate delivery-driver applicant data over HTTP or from the command line",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Start the HTTP service (default command)
    Serve(ServeArgs),
    /// Validate a single value and print the verdict as JSON
    Check {
        #[command(subcommand)]
        command: CheckCommand,
    },
}

#[derive(Subcommand, Debug)]
enum CheckCommand {
    /// SIRET format, reject list, checksum, and registry activity
    Siret { value: String },
    /// French national phone number
    Phone { value: String },
    /// Email syntax and disposable domains
    Email { value: String },
    /// First or last name
    Name { value: String },
}

#[derive(Args, Debug, Default)]
pub(crate) struct ServeArgs {
    /// Override the configured host for the HTTP server
    #[arg(long)]
    pub(crate) host: Option<String>,
    /// Override the configured port for the HTTP server
    #[arg(long)]
    pub(crate) port: Option<u16>,
}

pub(crate) async fn run() -> Result<(), AppError> {
    let cli = Cli::parse();
    let command = cli
        .command
        .unwrap_or_else(|| Command::Serve(ServeArgs::default()));

    match command {
        Command::Serve(args) => server::run(args).await,
        Command::Check { command } => run_check(command),
    }
}

fn run_check(command: CheckCommand) -> Result<(), AppError> {
    let config = AppConfig::load()?;
    let coordinator = server::build_coordinator(&config.validation)?;
    let reference = coordinator.reference().snapshot();

    match command {
        CheckCommand::Siret { value } => print_json(&coordinator.lookup_activity(&value)),
        CheckCommand::Phone { value } => print_json(&validate_phone(&value)),
        CheckCommand::Email { value } => print_json(&validate_email(&value, &reference)),
        CheckCommand::Name { value } => {
            print_json(&validate_name(&value, ValidatedField::Firstname))
        }
    }
}

fn print_json<T: Serialize>(value: &T) -> Result<(), AppError> {
    let rendered = serde_json::to_string_pretty(value).map_err(std::io::Error::from)?;
    println!("{rendered}");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serve_is_the_default_command() {
        let cli = Cli::try_parse_from(["driver-onboarding-api"]).expect("parses");
        assert!(cli.command.is_none());

        let cli = Cli::try_parse_from(["driver-onboarding-api", "serve", "--port", "8080"])
            .expect("parses");
        match cli.command {
            Some(Command::Serve(args)) => assert_eq!(args.port, Some(8080)),
            other => panic!("expected serve, got {other:?}"),
        }
    }

    #[test]
    fn check_takes_a_single_value() {
        let cli = Cli::try_parse_from(["driver-onboarding-api", "check", "phone", "0612345678"])
            .expect("parses");
        match cli.command {
            Some(Command::Check {
                command: CheckCommand::Phone { value },
            }) => assert_eq!(value, "0612345678"),
            other => panic!("expected phone check, got {other:?}"),
        }
    }
}
