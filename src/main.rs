use std::io::Read;
use std::sync::Arc;

use tracing::{error, info};

use birthday_skill::constants::{DATASET_ENDPOINT, LOG_DIRECTIVE};
use birthday_skill::services::{RemindersClient, Services, SettingsClient, WikidataClient};
use birthday_skill::{RequestEnvelope, Skill};

#[tokio::main]
async fn main() {
    // Load environment variables from .env file if present
    let _ = dotenvy::dotenv();

    // Initialize logging
    initialize_logging();

    // Load configuration from environment
    let config = match load_configuration() {
        Ok(config) => config,
        Err(e) => {
            error!("Failed to load configuration: {}", e);
            std::process::exit(1);
        }
    };

    let skill = build_skill(&config);

    // One envelope in on stdin, one response out on stdout; the hosting
    // runtime owns the listener lifecycle
    let mut input = String::new();
    if let Err(e) = std::io::stdin().read_to_string(&mut input) {
        error!("Failed to read request envelope: {}", e);
        std::process::exit(1);
    }
    let envelope: RequestEnvelope = match serde_json::from_str(&input) {
        Ok(envelope) => envelope,
        Err(e) => {
            error!("Malformed request envelope: {}", e);
            std::process::exit(1);
        }
    };

    let response = skill.handle(envelope).await;
    match serde_json::to_string_pretty(&response) {
        Ok(json) => println!("{}", json),
        Err(e) => {
            error!("Failed to serialize response: {}", e);
            std::process::exit(1);
        }
    }
}

/// Configuration loaded from environment variables
struct Config {
    api_base_url: String,
    api_token: String,
    dataset_endpoint: String,
}

/// Initialize the logging system
fn initialize_logging() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(LOG_DIRECTIVE.parse().expect("valid log directive")),
        )
        .with_writer(std::io::stderr)
        .init();
}

/// Load configuration from environment variables
fn load_configuration() -> Result<Config, Box<dyn std::error::Error>> {
    let api_base_url = std::env::var("SKILL_API_BASE_URL").map_err(|_| {
        "SKILL_API_BASE_URL environment variable not set. Set it to the settings/reminders API base URL"
    })?;

    let api_token = std::env::var("SKILL_API_TOKEN").map_err(|_| {
        "SKILL_API_TOKEN environment variable not set. Set it to the per-request API access token"
    })?;

    // Optional: point the dataset client somewhere else, e.g. a local mirror
    let dataset_endpoint =
        std::env::var("DATASET_ENDPOINT").unwrap_or_else(|_| DATASET_ENDPOINT.to_string());

    if dataset_endpoint != DATASET_ENDPOINT {
        info!("Using dataset endpoint override: {}", dataset_endpoint);
    }

    Ok(Config {
        api_base_url,
        api_token,
        dataset_endpoint,
    })
}

/// Wire the collaborator clients together into the skill
fn build_skill(config: &Config) -> Skill {
    let settings = Arc::new(SettingsClient::new(
        config.api_base_url.as_str(),
        config.api_token.as_str(),
    ));
    let services = Arc::new(Services {
        profile: settings.clone(),
        timezone: settings,
        reminders: Arc::new(RemindersClient::new(
            config.api_base_url.as_str(),
            config.api_token.as_str(),
        )),
        dataset: Arc::new(WikidataClient::new(config.dataset_endpoint.as_str())),
    });
    Skill::new(services)
}
