//! ttingchu - command-line front end for the community utilities
//!
//! Runs the same checks and formatting the site's pages use:
//! - Login and signup form validation
//! - Password strength scoring
//! - Category, platform, counter, rating and relative-time formatting
//! - Reading and writing the local key-value storage
//!
//! Validation commands exit with a non-zero status when the input is
//! rejected, so they can be used from scripts.

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use clap::{Parser, Subcommand};
use serde_json::Value;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;
use ttingchu::models::{Agreements, LoginCredentials, SignupCredentials};
use ttingchu::utils::formatting::{
    category_icon, category_name, format_number, format_relative_time, platform_color,
    platform_name, rating_stars, truncate_text,
};
use ttingchu::utils::validation::{
    check_password_strength, is_valid_email, validate_login, validate_signup, validate_username,
    FormErrors, ValidationError,
};
use ttingchu::{Config, Locale, LocalStorage, Platform, PostCategory, SystemClock};

/// Command-line arguments
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Message language (en or ko); overrides the config file
    #[arg(short, long, global = true)]
    locale: Option<Locale>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Check an email address shape
    Email { email: String },

    /// Check a username
    Username { username: String },

    /// Score a password
    Password { password: String },

    /// Validate the login form
    Login {
        #[arg(long, default_value = "")]
        email: String,
        #[arg(long, default_value = "")]
        password: String,
    },

    /// Validate the signup form
    Signup {
        #[arg(long, default_value = "")]
        username: String,
        #[arg(long, default_value = "")]
        email: String,
        #[arg(long, default_value = "")]
        password: String,
        #[arg(long, default_value = "")]
        confirm_password: String,
        #[arg(long)]
        accept_terms: bool,
        #[arg(long)]
        accept_privacy: bool,
    },

    /// Show a category's display name and icon
    Category { category: PostCategory },

    /// Show a platform's display name and color
    Platform { platform: Platform },

    /// Format an RFC 3339 timestamp relative to now
    Ago { timestamp: DateTime<Utc> },

    /// Abbreviate a counter
    Number { value: u64 },

    /// Render a rating as stars
    Stars {
        #[arg(allow_negative_numbers = true)]
        rating: f64,
    },

    /// Truncate text to a number of characters
    Truncate { text: String, max_len: usize },

    /// Read or write local storage
    Store {
        #[command(subcommand)]
        action: StoreCommand,
    },
}

#[derive(Subcommand, Debug)]
enum StoreCommand {
    /// Store a value; text that is not JSON is stored as a string
    Set { key: String, value: String },

    /// Print a stored value as JSON
    Get {
        key: String,
        /// JSON value printed when the key is absent
        #[arg(long)]
        default: Option<String>,
    },

    /// Delete a stored value
    Remove { key: String },
}

fn main() -> Result<ExitCode> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    let config = Config::load()?;
    let locale = args.locale.unwrap_or(config.locale);

    tracing::debug!(%locale, command = ?args.command, "running command");

    match args.command {
        Command::Email { email } => {
            if is_valid_email(&email) {
                println!("ok");
                Ok(ExitCode::SUCCESS)
            } else {
                println!("{}", ValidationError::InvalidEmail.message(locale));
                Ok(ExitCode::FAILURE)
            }
        }
        Command::Username { username } => match validate_username(&username) {
            Ok(()) => {
                println!("ok");
                Ok(ExitCode::SUCCESS)
            }
            Err(e) => {
                println!("{}", e.message(locale));
                Ok(ExitCode::FAILURE)
            }
        },
        Command::Password { password } => {
            let strength = check_password_strength(&password);
            println!("score: {}/5", strength.score);
            if !strength.missing.is_empty() {
                println!("missing: {}", strength.feedback(locale));
            }
            if strength.is_too_weak() {
                Ok(ExitCode::FAILURE)
            } else {
                Ok(ExitCode::SUCCESS)
            }
        }
        Command::Login { email, password } => {
            let errors = validate_login(&LoginCredentials { email, password });
            Ok(report(&errors, locale))
        }
        Command::Signup {
            username,
            email,
            password,
            confirm_password,
            accept_terms,
            accept_privacy,
        } => {
            let credentials = SignupCredentials {
                username,
                email,
                password,
                confirm_password,
            };
            let agreements = Agreements {
                terms_of_service: accept_terms,
                privacy_policy: accept_privacy,
            };
            Ok(report(&validate_signup(&credentials, &agreements), locale))
        }
        Command::Category { category } => {
            println!(
                "{} {}",
                category_icon(category),
                category_name(category, locale)
            );
            Ok(ExitCode::SUCCESS)
        }
        Command::Platform { platform } => {
            println!(
                "{} ({})",
                platform_name(platform, locale),
                platform_color(platform)
            );
            Ok(ExitCode::SUCCESS)
        }
        Command::Ago { timestamp } => {
            println!("{}", format_relative_time(timestamp, &SystemClock, locale));
            Ok(ExitCode::SUCCESS)
        }
        Command::Number { value } => {
            println!("{}", format_number(value));
            Ok(ExitCode::SUCCESS)
        }
        Command::Stars { rating } => {
            println!("{}", rating_stars(rating));
            Ok(ExitCode::SUCCESS)
        }
        Command::Truncate { text, max_len } => {
            println!("{}", truncate_text(&text, max_len));
            Ok(ExitCode::SUCCESS)
        }
        Command::Store { action } => {
            let storage = config.open_storage()?;
            run_store(&storage, action)?;
            Ok(ExitCode::SUCCESS)
        }
    }
}

fn report(errors: &FormErrors, locale: Locale) -> ExitCode {
    if errors.is_empty() {
        println!("ok");
        return ExitCode::SUCCESS;
    }

    for (field, error) in errors.iter() {
        println!("{}: {}", field, error.message(locale));
    }
    ExitCode::FAILURE
}

fn run_store(storage: &LocalStorage, action: StoreCommand) -> Result<()> {
    match action {
        StoreCommand::Set { key, value } => {
            let value = serde_json::from_str::<Value>(&value).unwrap_or(Value::String(value));
            storage
                .set_item(&key, &value)
                .with_context(|| format!("Failed to store '{}'", key))?;
        }
        StoreCommand::Get { key, default } => {
            let default = default
                .map(|text| serde_json::from_str::<Value>(&text))
                .transpose()
                .context("Default is not valid JSON")?;
            match storage.get_item::<Value>(&key, default)? {
                Some(value) => println!("{}", value),
                None => println!("null"),
            }
        }
        StoreCommand::Remove { key } => {
            storage
                .remove_item(&key)
                .with_context(|| format!("Failed to remove '{}'", key))?;
        }
    }
    Ok(())
}
