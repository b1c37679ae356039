//! `protect set-password`: store the account password in the keyring.

use secrecy::{ExposeSecret, SecretString};

use crate::cli::{GlobalOpts, SetPasswordArgs};
use crate::config;
use crate::error::CliError;

pub fn handle(args: &SetPasswordArgs, global: &GlobalOpts) -> Result<(), CliError> {
    let username = match args.username {
        Some(ref u) => u.clone(),
        None => config::load(global)?.username,
    };
    if username.is_empty() {
        return Err(CliError::Validation {
            field: "username".into(),
            reason: "pass --username or set username in the config file".into(),
            path: config::config_file(global).display().to_string(),
        });
    }

    let password = SecretString::from(rpassword::prompt_password(format!(
        "Password for {username}: "
    ))?);
    if password.expose_secret().is_empty() {
        return Err(CliError::Validation {
            field: "password".into(),
            reason: "must not be empty".into(),
            path: config::config_file(global).display().to_string(),
        });
    }

    protect_config::store_password(&username, password.expose_secret())?;
    if !global.quiet {
        eprintln!("Password stored in the system keyring for {username}");
    }
    Ok(())
}
