//! Interactive terminal form: credential setup and the tax ID search loop.
//!
//! dialoguer prompts block the calling thread, so async callers run them through
//! `tokio::task::spawn_blocking`.

use console::style;
use dialoguer::{Input, Password};
use laudos_core::{
    resolve_credentials, ConfigError, CredentialStore, Credentials, ReportClient,
};

use crate::{actions, render};

/// Checks that a base URL looks like an HTTP(S) endpoint.
pub fn validate_base_url(input: &str) -> Result<(), &'static str> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Err("Base URL is required");
    }
    if !(trimmed.starts_with("http://") || trimmed.starts_with("https://")) {
        return Err("Base URL must start with http:// or https://");
    }
    Ok(())
}

/// Checks credentials supplied without a prompt before they are saved.
pub fn validate_credentials(creds: &Credentials) -> Result<(), &'static str> {
    validate_base_url(&creds.base_url)?;
    if !creds.is_complete() {
        return Err("Client ID and client secret are required");
    }
    Ok(())
}

/// Prompts for the three credential values, prefilled from `existing`.
///
/// An empty secret keeps the existing one when there is one.
pub fn prompt_credentials(existing: &Credentials) -> dialoguer::Result<Credentials> {
    println!(
        "{}",
        style(" LAUDOS - Initial setup ").bold().white().on_blue()
    );
    println!("Please fill in the report service credentials.\n");

    let base_url = Input::<String>::new()
        .with_prompt("Base URL (e.g. http://localhost:8000)")
        .with_initial_text(existing.base_url.clone())
        .validate_with(|input: &String| validate_base_url(input))
        .interact_text()?;

    let client_id = Input::<String>::new()
        .with_prompt("Client ID")
        .with_initial_text(existing.client_id.clone())
        .validate_with(|input: &String| -> Result<(), &str> {
            if input.trim().is_empty() {
                Err("Client ID is required")
            } else {
                Ok(())
            }
        })
        .interact_text()?;

    let has_secret = !existing.client_secret.trim().is_empty();
    let secret_prompt = if has_secret {
        "Client secret (leave empty to keep current)"
    } else {
        "Client secret"
    };
    let mut client_secret = Password::new()
        .with_prompt(secret_prompt)
        .allow_empty_password(has_secret)
        .interact()?;
    if client_secret.is_empty() {
        client_secret = existing.client_secret.clone();
    }

    Ok(Credentials::new(
        base_url.trim(),
        client_id.trim(),
        client_secret,
    ))
}

/// Resolves credentials, running the setup prompt and saving the result when nothing is
/// configured yet.
pub fn load_or_prompt(
    store: &CredentialStore,
    from_env: Option<Credentials>,
) -> anyhow::Result<Credentials> {
    match resolve_credentials(from_env, store) {
        Ok(creds) => Ok(creds),
        Err(ConfigError::NotConfigured) => {
            println!(
                "{}",
                style("No configuration found or configuration incomplete.").yellow()
            );
            let creds = prompt_credentials(&store.load_partial())?;
            store.save(&creds)?;
            println!("Saved credentials to {}\n", store.path().display());
            Ok(creds)
        }
        Err(e) => Err(e.into()),
    }
}

async fn prompt_tax_id() -> anyhow::Result<String> {
    let input = tokio::task::spawn_blocking(|| {
        Input::<String>::new()
            .with_prompt("Tax ID (digits only, empty to quit)")
            .allow_empty(true)
            .interact_text()
    })
    .await??;
    Ok(input)
}

/// Prompts for tax IDs and prints their reports until an empty line is entered.
///
/// Failures of a single search are printed and the loop continues.
pub async fn run_interactive(client: &ReportClient, web_url: Option<&str>) -> anyhow::Result<()> {
    println!(
        "{}",
        style(" LAUDOS - Clinic report search ").bold().white().on_blue()
    );
    if let Some(url) = web_url {
        println!("Web front end running at: {}", style(url).magenta());
    }
    println!();

    loop {
        let input = prompt_tax_id().await?;
        if input.trim().is_empty() {
            break;
        }

        println!("{}", style("Searching reports... please wait.").magenta());
        match actions::search(client, &input).await {
            Ok(reports) => print!("{}", render::format_reports(&reports)),
            Err(e) => eprintln!("{}", style(format!("Search failed: {e:#}")).red()),
        }
        println!();
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_base_url() {
        assert!(validate_base_url("http://localhost:8000").is_ok());
        assert!(validate_base_url(" https://laudos.example.com ").is_ok());
        assert_eq!(validate_base_url(""), Err("Base URL is required"));
        assert!(validate_base_url("localhost:8000").is_err());
    }

    #[test]
    fn test_validate_credentials_rejects_blank_fields() {
        let complete = Credentials::new("http://localhost:8000", "client", "s3cret");
        assert!(validate_credentials(&complete).is_ok());

        let no_id = Credentials::new("http://localhost:8000", "", "s3cret");
        assert_eq!(
            validate_credentials(&no_id),
            Err("Client ID and client secret are required")
        );

        let no_secret = Credentials::new("http://localhost:8000", "client", "  ");
        assert!(validate_credentials(&no_secret).is_err());

        let bad_url = Credentials::new("localhost:8000", "client", "s3cret");
        assert_eq!(
            validate_credentials(&bad_url),
            Err("Base URL must start with http:// or https://")
        );
    }
}
