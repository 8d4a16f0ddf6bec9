use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use ispconfig_ddns::config::DEFAULT_PROPAGATION_SECONDS;
use ispconfig_ddns::{Authenticator, AuthenticatorConfig, Dns01Challenge};

#[derive(Parser)]
#[command(name = "ispconfig-ddns")]
#[command(about = "ACME DNS-01 authenticator for ISPConfig domains using DDNS module tokens")]
#[command(version)]
struct Cli {
    /// Credentials TOML file with `endpoint` and `token`
    #[arg(long, global = true, env = "ISPCONFIG_DDNS_CREDENTIALS")]
    credentials: Option<PathBuf>,

    /// URL of the ISPConfig installation (overrides the credentials file)
    #[arg(long, global = true, env = "ISPCONFIG_DDNS_ENDPOINT")]
    endpoint: Option<String>,

    /// DDNS module token (overrides the credentials file)
    #[arg(long, global = true, env = "ISPCONFIG_DDNS_TOKEN", hide_env_values = true)]
    token: Option<String>,

    /// Seconds to wait for DNS propagation after publishing
    #[arg(
        long,
        global = true,
        env = "ISPCONFIG_DDNS_PROPAGATION_SECONDS",
        default_value_t = DEFAULT_PROPAGATION_SECONDS
    )]
    propagation_seconds: u64,

    /// Log level, overridden by RUST_LOG
    #[arg(long, global = true, default_value = "info")]
    log_level: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Publish the challenge TXT record (certbot --manual-auth-hook)
    Perform(ChallengeArgs),

    /// Remove the challenge TXT record (certbot --manual-cleanup-hook)
    Cleanup(ChallengeArgs),
}

#[derive(Args)]
struct ChallengeArgs {
    /// Domain being validated
    #[arg(long, env = "CERTBOT_DOMAIN")]
    domain: String,

    /// Validation string to publish
    #[arg(long, env = "CERTBOT_VALIDATION")]
    validation: String,
}

impl ChallengeArgs {
    fn into_challenge(self) -> Dns01Challenge {
        Dns01Challenge::new(self.domain, self.validation)
    }
}

fn init_logging(log_level: &str) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(log_level));

    // certbot hooks forward stdout, keep it clean
    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(&cli.log_level);

    let config = AuthenticatorConfig {
        credentials: cli.credentials,
        endpoint: cli.endpoint,
        token: cli.token,
        propagation_seconds: cli.propagation_seconds,
    };

    let mut authenticator =
        Authenticator::new(&config).context("Failed to set up ISPConfig DDNS credentials")?;

    match cli.command {
        Commands::Perform(args) => {
            let challenge = args.into_challenge();
            info!(domain = %challenge.domain(), "Performing DNS-01 challenge");
            authenticator
                .perform(std::slice::from_ref(&challenge))
                .await
                .context("Failed to publish challenge record")?;
        }

        Commands::Cleanup(args) => {
            let challenge = args.into_challenge();
            info!(domain = %challenge.domain(), "Cleaning up DNS-01 challenge");
            authenticator.arm_cleanup();
            authenticator
                .cleanup(std::slice::from_ref(&challenge))
                .await
                .context("Failed to remove challenge record")?;
        }
    }

    Ok(())
}
