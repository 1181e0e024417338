pub mod api;
pub mod logging;

use clap::{
    builder::{
        styling::{AnsiColor, Effects, Styles},
        PossibleValuesParser,
    },
    Arg, ColorChoice, Command,
};

pub const CMD_LOGIN: &str = "login";
pub const CMD_WHOAMI: &str = "whoami";
pub const CMD_LOGOUT: &str = "logout";
pub const CMD_REGISTER: &str = "register";
pub const CMD_REGISTRATION_OTP: &str = "registration-otp";
pub const CMD_PASSWORD_RESET: &str = "password-reset";
pub const CMD_LOOKUP: &str = "lookup";
pub const CMD_NAVIGATE: &str = "navigate";

pub const CMD_REQUEST: &str = "request";
pub const CMD_VALIDATE: &str = "validate";
pub const CMD_SET_NEW: &str = "set-new";

pub const LOOKUP_KINDS: [&str; 6] = ["drps", "polos", "eixos", "cursos", "pis", "tags"];

fn email_arg() -> Arg {
    Arg::new("email")
        .long("email")
        .help("Account email")
        .required(true)
}

fn otp_arg() -> Arg {
    Arg::new("otp")
        .long("otp")
        .help("One-time passcode received by email")
        .required(true)
}

fn text_arg(id: &'static str, help: &'static str) -> Arg {
    Arg::new(id).long(id).help(help).required(true)
}

fn register_command() -> Command {
    Command::new(CMD_REGISTER)
        .about("Create an account; the backend emails a verification passcode")
        .arg(email_arg())
        .arg(text_arg("password", "Account password"))
        .arg(text_arg("first-name", "First name"))
        .arg(text_arg("last-name", "Last name"))
        .arg(text_arg("polo", "Polo"))
        .arg(text_arg("curso", "Curso"))
        .arg(text_arg("projeto-integrador", "Projeto integrador"))
        .arg(text_arg("eixo", "Eixo"))
        .arg(text_arg("drp", "DRP"))
}

fn registration_otp_command() -> Command {
    Command::new(CMD_REGISTRATION_OTP)
        .about("Registration passcode flow")
        .subcommand_required(true)
        .subcommand(
            Command::new(CMD_REQUEST)
                .about("Send a new registration passcode")
                .arg(email_arg()),
        )
        .subcommand(
            Command::new(CMD_VALIDATE)
                .about("Confirm the registration passcode")
                .arg(email_arg())
                .arg(otp_arg()),
        )
}

fn password_reset_command() -> Command {
    Command::new(CMD_PASSWORD_RESET)
        .about("Password reset flow")
        .subcommand_required(true)
        .subcommand(
            Command::new(CMD_REQUEST)
                .about("Email a password reset passcode")
                .arg(email_arg()),
        )
        .subcommand(
            Command::new(CMD_VALIDATE)
                .about("Check a password reset passcode")
                .arg(email_arg())
                .arg(otp_arg()),
        )
        .subcommand(
            Command::new(CMD_SET_NEW)
                .about("Set a new password using a validated passcode")
                .arg(email_arg())
                .arg(otp_arg())
                .arg(text_arg("new-password", "New password")),
        )
}

#[must_use]
pub fn new() -> Command {
    let styles = Styles::styled()
        .header(AnsiColor::Yellow.on_default() | Effects::BOLD)
        .usage(AnsiColor::Green.on_default() | Effects::BOLD)
        .literal(AnsiColor::Blue.on_default() | Effects::BOLD)
        .placeholder(AnsiColor::Green.on_default());

    let long_version: &'static str = Box::leak(
        format!("{} - {}", env!("CARGO_PKG_VERSION"), crate::GIT_COMMIT_HASH).into_boxed_str(),
    );

    let command = Command::new("grupi")
        .about("GruPI session client")
        .version(env!("CARGO_PKG_VERSION"))
        .long_version(long_version)
        .color(ColorChoice::Auto)
        .styles(styles)
        .subcommand_required(true)
        .arg_required_else_help(true)
        .subcommand(
            Command::new(CMD_LOGIN)
                .about("Log in and print the current user")
                .arg(email_arg())
                .arg(text_arg("password", "Account password")),
        )
        .subcommand(Command::new(CMD_WHOAMI).about("Print the current user, if any"))
        .subcommand(Command::new(CMD_LOGOUT).about("End the current session"))
        .subcommand(register_command())
        .subcommand(registration_otp_command())
        .subcommand(password_reset_command())
        .subcommand(
            Command::new(CMD_LOOKUP)
                .about("Print a reference list used by the forms")
                .arg(
                    Arg::new("kind")
                        .help("Which list to fetch")
                        .required(true)
                        .value_parser(PossibleValuesParser::new(LOOKUP_KINDS)),
                ),
        )
        .subcommand(
            Command::new(CMD_NAVIGATE)
                .about("Run the navigation guard for a path and print where it lands")
                .arg(Arg::new("path").help("Route path, e.g. /dashboard").required(true)),
        );

    let command = api::with_args(command);
    logging::with_args(command)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new() {
        let command = new();

        assert_eq!(command.get_name(), "grupi");
        assert_eq!(
            command.get_about().map(ToString::to_string),
            Some("GruPI session client".to_string())
        );
        assert_eq!(
            command.get_version().map(ToString::to_string),
            Some(env!("CARGO_PKG_VERSION").to_string())
        );
    }

    #[test]
    fn test_command_is_consistent() {
        new().debug_assert();
    }

    #[test]
    fn test_defaults_without_env() {
        temp_env::with_vars(
            [
                ("GRUPI_API_BASE_URL", None::<&str>),
                ("GRUPI_API_BASE_URL_CSRF", None),
                ("GRUPI_API_TIMEOUT", None),
                ("GRUPI_LOG_LEVEL", None),
            ],
            || {
                let matches = new().get_matches_from(vec!["grupi", "whoami"]);
                assert_eq!(
                    matches.get_one::<String>(api::ARG_API_BASE_URL).map(String::as_str),
                    Some("http://127.0.0.1:8000/api/v1/")
                );
                assert_eq!(matches.get_one::<u64>(api::ARG_TIMEOUT_MS).copied(), Some(30_000));
                assert_eq!(matches.subcommand_name(), Some(CMD_WHOAMI));
            },
        );
    }

    #[test]
    fn test_check_env() {
        temp_env::with_vars(
            [
                ("GRUPI_API_BASE_URL", Some("https://grupi.dev/api/v1/")),
                ("GRUPI_API_BASE_URL_CSRF", Some("https://grupi.dev/")),
                ("GRUPI_API_TIMEOUT", Some("5000")),
                ("GRUPI_LOG_LEVEL", Some("info")),
            ],
            || {
                let matches = new().get_matches_from(vec!["grupi", "lookup", "drps"]);
                assert_eq!(
                    matches.get_one::<String>(api::ARG_API_BASE_URL).map(String::as_str),
                    Some("https://grupi.dev/api/v1/")
                );
                assert_eq!(
                    matches.get_one::<String>(api::ARG_CSRF_BASE_URL).map(String::as_str),
                    Some("https://grupi.dev/")
                );
                assert_eq!(matches.get_one::<u64>(api::ARG_TIMEOUT_MS).copied(), Some(5000));
                assert_eq!(matches.get_one::<u8>(logging::ARG_VERBOSITY).copied(), Some(2));
            },
        );
    }

    #[test]
    fn test_check_log_level_verbosity() {
        for index in 0..5_u8 {
            temp_env::with_vars([("GRUPI_LOG_LEVEL", None::<String>)], || {
                let mut args = vec!["grupi".to_string(), "whoami".to_string()];
                if index > 0 {
                    args.push(format!("-{}", "v".repeat(index as usize)));
                }

                let matches = new().get_matches_from(args);
                assert_eq!(
                    matches.get_one::<u8>(logging::ARG_VERBOSITY).copied(),
                    Some(index)
                );
            });
        }
    }

    #[test]
    fn test_lookup_rejects_unknown_kind() {
        let result = new().try_get_matches_from(vec!["grupi", "lookup", "groups"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_password_reset_requires_step() {
        let result = new().try_get_matches_from(vec!["grupi", "password-reset"]);
        assert!(result.is_err());

        let matches = new()
            .try_get_matches_from(vec![
                "grupi",
                "password-reset",
                "validate",
                "--email",
                "a@x.com",
                "--otp",
                "123456",
            ])
            .unwrap();
        let (name, sub) = matches.subcommand().unwrap();
        assert_eq!(name, CMD_PASSWORD_RESET);
        assert_eq!(sub.subcommand_name(), Some(CMD_VALIDATE));
    }

    #[test]
    fn test_login_email_requires_password() {
        temp_env::with_vars(
            [("GRUPI_EMAIL", None::<&str>), ("GRUPI_PASSWORD", None)],
            || {
                let result = new().try_get_matches_from(vec![
                    "grupi",
                    "--login-email",
                    "a@x.com",
                    "whoami",
                ]);
                assert!(result.is_err());
            },
        );
    }
}
