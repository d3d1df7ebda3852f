//! Command-line tool for the Redsys gateway protocol
//!
//! Derives order keys, signs merchant parameters and evaluates the responses
//! the gateway sends back. Nothing is sent over the network.

use std::{
    fs,
    io::Read,
    path::{Path, PathBuf},
};

use anyhow::{Context, bail};
use clap::{Parser, Subcommand};
use redsys_core::{
    CatalogCode, Config, MerchantSecret, MessageCatalog, Notification, PaymentRequest,
    ProtocolDriver, codec, crypto,
};
use tracing::debug;
use tracing_subscriber::{EnvFilter, filter::LevelFilter};

mod display;

#[derive(Parser)]
#[command(version, about = "Sign and verify Redsys gateway messages")]
struct Cli {
    /// Base64 merchant secret
    #[arg(short, long, env = "REDSYS_MERCHANT_SECRET", hide_env_values = true)]
    secret: Option<String>,

    /// Gateway environment (test or live)
    #[arg(short, long, env = "REDSYS_ENVIRONMENT")]
    environment: Option<String>,

    /// Message catalog replacing the embedded one
    #[arg(short, long, env = "REDSYS_CATALOG")]
    catalog: Option<PathBuf>,

    /// Trace level output
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the signing key derived for an order
    DeriveKey {
        /// Order identifier
        #[arg(short, long)]
        order: String,
    },

    /// Sign a JSON object of merchant parameters
    Sign {
        /// Parameters as a JSON object, must include DS_MERCHANT_ORDER
        #[arg(short, long)]
        params: String,

        /// Print the SOAP request instead of the redirect form fields
        #[arg(long)]
        xml: bool,
    },

    /// Verify a notification posted by the gateway
    VerifyNotification {
        /// Ds_MerchantParameters as posted
        #[arg(short, long)]
        parameters: String,

        /// Ds_Signature as posted
        #[arg(long)]
        signature: String,
    },

    /// Evaluate an XML direct response
    EvaluateResponse {
        /// File holding the response, `-` for stdin
        #[arg(short, long)]
        file: PathBuf,
    },

    /// Describe a response code
    Lookup {
        /// Code to look up, e.g. 0190 or SIS0041
        code: String,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    setup_logging(cli.verbose);

    let mut config = Config::from_env()?;
    if let Some(environment) = &cli.environment {
        config = config.with_environment(environment.parse()?);
    }
    if let Some(path) = &cli.catalog {
        config = config.with_catalog_path(path);
    }
    debug!(?config, "Loaded configuration");

    let catalog = config.catalog();
    let driver = ProtocolDriver::new(&catalog);

    match cli.command {
        Commands::DeriveKey { order } => {
            let secret = secret(cli.secret.as_deref())?;
            let order = redsys_core::OrderId::new(&order)?;
            let key = crypto::derive_key(&order, &secret);
            println!(
                "{}",
                display::key_value_box(
                    "Derived key",
                    vec![
                        ("Order", order.to_string()),
                        ("Key", hex::encode(key.as_bytes())),
                    ],
                )
            );
        }
        Commands::Sign { params, xml } => {
            let secret = secret(cli.secret.as_deref())?;
            let parameters = codec::from_json(&params).context("Invalid parameters")?;
            let request = PaymentRequest::from_parameters(parameters)?;

            if xml {
                println!("{}", request.to_xml_request(&secret, &config)?);
            } else {
                let signed = request.sign(&secret, &config)?;
                println!("{}", serde_json::to_string_pretty(&signed)?);
                eprintln!(
                    "{}",
                    display::success(&format!("Post to {}", config.environment.redirect_url()))
                );
            }
        }
        Commands::VerifyNotification {
            parameters,
            signature,
        } => {
            let secret = secret(cli.secret.as_deref())?;
            let notification = Notification::new(parameters, signature);
            let result = driver.evaluate_notification(&notification, &secret)?;
            println!("{}", serde_json::to_string_pretty(&result)?);
            eprintln!("{}", display::outcome(&result));
        }
        Commands::EvaluateResponse { file } => {
            let secret = secret(cli.secret.as_deref())?;
            let response = read_input(&file)?;
            let result = driver.evaluate_direct_xml(&response, &secret)?;
            println!("{}", serde_json::to_string_pretty(&result)?);
            eprintln!("{}", display::outcome(&result));
        }
        Commands::Lookup { code } => match catalog.lookup(&CatalogCode::from(code.as_str())) {
            Some(entry) => println!(
                "{}",
                display::key_value_box(
                    "Response code",
                    vec![("Code", entry.code), ("Message", entry.message)],
                )
            ),
            None => println!("{}", display::warning(&format!("Unknown code {code}"))),
        },
    }

    Ok(())
}

fn secret(encoded: Option<&str>) -> anyhow::Result<MerchantSecret> {
    let Some(encoded) = encoded else {
        bail!("A merchant secret is required, pass --secret or set REDSYS_MERCHANT_SECRET");
    };
    Ok(MerchantSecret::from_base64(encoded)?)
}

fn read_input(path: &Path) -> anyhow::Result<String> {
    if path.as_os_str() == "-" {
        let mut input = String::new();
        std::io::stdin().read_to_string(&mut input)?;
        return Ok(input);
    }
    fs::read_to_string(path).with_context(|| format!("Failed to read {}", path.display()))
}

fn setup_logging(verbose: bool) {
    let level = if verbose {
        LevelFilter::TRACE
    } else {
        LevelFilter::WARN
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::builder()
                .with_default_directive(level.into())
                .from_env_lossy(),
        )
        .with_ansi(true)
        .with_writer(std::io::stderr)
        .init();
}
