use std::process::ExitCode;

use tracing::{error, info};
use vault_cert_init::{
    config::load_request_specs, init_logging, pipeline, AppConfig, ObservabilityConfig, Result,
    SecretString, VaultClient, APP_NAME, VERSION,
};

fn install_rustls_provider() {
    use rustls::crypto::{ring, CryptoProvider};

    if CryptoProvider::get_default().is_none() {
        // Err only means another provider won the race
        let _ = ring::default_provider().install_default();
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    install_rustls_provider();

    // Load .env file if it exists (optional - won't fail if missing)
    if let Err(e) = dotenvy::dotenv() {
        if !e.not_found() {
            eprintln!("Warning: Error loading .env file: {}", e);
        }
    }

    let observability = ObservabilityConfig::from_env();
    if let Err(e) = init_logging(&observability) {
        eprintln!("Failed to initialise logging: {}", e);
        return ExitCode::FAILURE;
    }

    info!(app_name = APP_NAME, version = VERSION, "Starting Vault certificate init");

    match run().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!(kind = e.kind(), error = %e, "Certificate init failed");
            ExitCode::FAILURE
        }
    }
}

async fn run() -> Result<()> {
    let config = AppConfig::from_env()?;

    let service_account_token = SecretString::new(config.read_service_account_token()?);
    let requests = load_request_specs(&config.request_spec_path)?;
    info!(
        path = %config.request_spec_path.display(),
        requests = requests.len(),
        "Loaded certificate requests"
    );

    let client = VaultClient::new(&config, service_account_token)?;
    let summary = pipeline::run(&client, &requests, &config.keystore_password).await?;

    info!(
        requests_processed = summary.requests_processed,
        files_written = summary.files_written.len(),
        "Vault certificate init finished"
    );
    Ok(())
}
