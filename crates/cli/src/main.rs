use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use laudos_cli::{actions, form, render};
use laudos_core::{
    config_path_from_env_value,
    constants::{BASE_URL_ENV, CLIENT_ID_ENV, CLIENT_SECRET_ENV, CONFIG_PATH_ENV},
    CredentialStore, Credentials, ReportClient,
};

#[derive(Parser)]
#[command(name = "laudos")]
#[command(about = "Clinic report retrieval CLI")]
struct Cli {
    /// Credential store path (overrides LAUDOS_CONFIG)
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Save report service credentials
    Configure {
        /// Base URL of the report service
        #[arg(long)]
        base_url: Option<String>,
        /// OAuth client ID
        #[arg(long)]
        client_id: Option<String>,
        /// OAuth client secret (prompted without echo when omitted)
        #[arg(long)]
        client_secret: Option<String>,
    },
    /// List the reports of a patient
    Search {
        /// Patient tax ID (CPF), with or without mask
        tax_id: String,
    },
    /// Save the PDF of one report
    Pdf {
        /// Patient tax ID (CPF), with or without mask
        tax_id: String,
        /// Accession number of the report
        accession: String,
        /// Output file (default: laudo_<accession>.pdf)
        #[arg(long, short)]
        output: Option<PathBuf>,
    },
    /// Search repeatedly until an empty tax ID is entered
    Interactive,
}

fn env_credentials() -> Option<Credentials> {
    Credentials::from_env_values(
        std::env::var(BASE_URL_ENV).ok(),
        std::env::var(CLIENT_ID_ENV).ok(),
        std::env::var(CLIENT_SECRET_ENV).ok(),
    )
}

async fn client_for(store: CredentialStore) -> anyhow::Result<ReportClient> {
    let from_env = env_credentials();
    let creds = tokio::task::spawn_blocking(move || form::load_or_prompt(&store, from_env)).await??;
    Ok(ReportClient::new(creds)?)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("laudos_core=warn".parse()?),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();
    let store = CredentialStore::new(
        cli.config
            .unwrap_or_else(|| config_path_from_env_value(std::env::var(CONFIG_PATH_ENV).ok())),
    );

    match cli.command {
        Some(Commands::Configure {
            base_url,
            client_id,
            client_secret,
        }) => {
            let mut creds = store.load_partial();
            let all_given = base_url.is_some() && client_id.is_some() && client_secret.is_some();
            if let Some(v) = base_url {
                creds.base_url = v;
            }
            if let Some(v) = client_id {
                creds.client_id = v;
            }
            if let Some(v) = client_secret {
                creds.client_secret = v;
            }

            if !all_given {
                creds = tokio::task::spawn_blocking(move || form::prompt_credentials(&creds))
                    .await??;
            } else if let Err(msg) = form::validate_credentials(&creds) {
                anyhow::bail!(msg);
            }

            store.save(&creds)?;
            println!("Saved credentials to {}", store.path().display());
        }
        Some(Commands::Search { tax_id }) => {
            let client = client_for(store).await?;
            let reports = actions::search(&client, &tax_id).await?;
            print!("{}", render::format_reports(&reports));
        }
        Some(Commands::Pdf {
            tax_id,
            accession,
            output,
        }) => {
            let client = client_for(store).await?;
            let path = actions::export_pdf(&client, &tax_id, &accession, output.as_deref()).await?;
            println!("Wrote {}", path.display());
        }
        Some(Commands::Interactive) | None => {
            let client = client_for(store).await?;
            form::run_interactive(&client, None).await?;
        }
    }

    Ok(())
}
