use crate::{
    config::ServiceConfig, server::run_server, services::OpenAIClient,
    types::deserialize_itinerary, TripPlanner, TripRequest,
};
use clap::{value_parser, Arg, ArgAction, ArgMatches, Command};
use std::{sync::Arc, time::Duration};
use tracing::{error, info, warn};

/// Command-line definition, separate from [`run`] so it can be tested
pub fn build_command() -> Command {
    Command::new("planning-service")
        .version(env!("CARGO_PKG_VERSION"))
        .about("AI-backed travel itinerary planning service")
        .arg(
            Arg::new("api-key")
                .short('k')
                .long("api-key")
                .value_name("KEY")
                .global(true)
                .help("Provider API key (or set OPENAI_API_KEY env var)"),
        )
        .arg(
            Arg::new("base-url")
                .short('u')
                .long("base-url")
                .value_name("URL")
                .global(true)
                .help("OpenAI-compatible base URL (or set OPENAI_BASE_URL env var)"),
        )
        .arg(
            Arg::new("model")
                .short('m')
                .long("model")
                .value_name("MODEL")
                .global(true)
                .help("Chat model to use (or set PLANNING_MODEL env var)"),
        )
        .arg(
            Arg::new("timeout")
                .short('t')
                .long("timeout")
                .value_name("SECONDS")
                .global(true)
                .value_parser(value_parser!(u64))
                .help("Provider request timeout in seconds"),
        )
        .arg(
            Arg::new("strict-schema")
                .long("strict-schema")
                .global(true)
                .action(ArgAction::SetTrue)
                .help("Reject completions that do not match the itinerary schema"),
        )
        .subcommand(
            Command::new("serve")
                .about("Run the HTTP API (default)")
                .arg(
                    Arg::new("host")
                        .long("host")
                        .value_name("HOST")
                        .help("Bind host (or set HOST env var)"),
                )
                .arg(
                    Arg::new("port")
                        .short('p')
                        .long("port")
                        .value_name("PORT")
                        .value_parser(value_parser!(u16))
                        .help("Bind port (or set PORT env var)"),
                ),
        )
        .subcommand(
            Command::new("generate")
                .about("Generate a single itinerary and print it")
                .arg(
                    Arg::new("destination")
                        .short('d')
                        .long("destination")
                        .value_name("PLACE")
                        .required(true),
                )
                .arg(
                    Arg::new("budget")
                        .short('b')
                        .long("budget")
                        .value_name("EUR")
                        .value_parser(value_parser!(i64))
                        .required(true),
                )
                .arg(
                    Arg::new("duration")
                        .short('n')
                        .long("duration")
                        .value_name("DAYS")
                        .value_parser(value_parser!(i64))
                        .required(true),
                )
                .arg(
                    Arg::new("interests")
                        .short('i')
                        .long("interests")
                        .value_name("TAGS")
                        .value_delimiter(',')
                        .action(ArgAction::Append)
                        .help("Comma-separated interests, e.g. culture,food"),
                )
                .arg(
                    Arg::new("json")
                        .long("json")
                        .action(ArgAction::SetTrue)
                        .help("Print the raw JSON itinerary"),
                ),
        )
}

/// Merge command-line overrides into the environment configuration
pub fn apply_overrides(config: &mut ServiceConfig, matches: &ArgMatches) {
    if let Some(api_key) = matches.get_one::<String>("api-key") {
        config.api_key = api_key.clone();
    }
    if let Some(base_url) = matches.get_one::<String>("base-url") {
        config.base_url = base_url.clone();
    }
    if let Some(model) = matches.get_one::<String>("model") {
        config.model = model.clone();
    }
    if let Some(seconds) = matches.get_one::<u64>("timeout") {
        config.request_timeout = Some(Duration::from_secs(*seconds));
    }
    if matches.get_flag("strict-schema") {
        config.strict_schema = true;
    }

    if let Some(("serve", serve)) = matches.subcommand() {
        if let Some(host) = serve.get_one::<String>("host") {
            config.host = host.clone();
        }
        if let Some(port) = serve.get_one::<u16>("port") {
            config.port = *port;
        }
    }
}

/// Build a trip request from `generate` arguments
pub fn trip_request_from_matches(matches: &ArgMatches) -> Option<TripRequest> {
    let destination = matches.get_one::<String>("destination")?;
    let budget = *matches.get_one::<i64>("budget")?;
    let duration = *matches.get_one::<i64>("duration")?;
    let interests = matches
        .get_many::<String>("interests")
        .map(|values| {
            values
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
                .collect()
        })
        .unwrap_or_default();

    Some(TripRequest::new(destination.clone(), budget, duration, interests))
}

/// CLI entry point
pub async fn run() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt::init();

    let matches = build_command().get_matches();

    // Key may come only from the command line, so seed the lookup with it
    let cli_key = matches.get_one::<String>("api-key").cloned();
    let mut config = ServiceConfig::from_lookup(|key| match key {
        "OPENAI_API_KEY" => cli_key.clone().or_else(|| std::env::var(key).ok()),
        _ => std::env::var(key).ok(),
    })?;
    apply_overrides(&mut config, &matches);

    let client = OpenAIClient::from_config(&config)?;
    let planner = TripPlanner::from_config(Arc::new(client), &config);

    match matches.subcommand() {
        Some(("generate", generate)) => {
            let request = trip_request_from_matches(generate)
                .ok_or("destination, budget and duration are required")?;
            info!("Generating {}-day plan for {}", request.duration, request.destination);

            let itinerary = match planner.generate(&request).await {
                Ok(itinerary) => itinerary,
                Err(e) => {
                    error!("Itinerary generation failed: {}", e);
                    return Err(e.into());
                }
            };

            if generate.get_flag("json") {
                println!("{}", serde_json::to_string_pretty(&itinerary)?);
            } else {
                match deserialize_itinerary(&itinerary) {
                    Ok(plan) => println!("\n{}", plan.render()),
                    Err(e) => {
                        warn!("Itinerary does not fit the typed shape: {}", e);
                        println!("{}", serde_json::to_string_pretty(&itinerary)?);
                    }
                }
            }
        }
        _ => {
            info!("Using model: {}", config.model);
            info!("Base URL: {}", config.base_url);
            run_server(&config, planner).await?;
        }
    }

    Ok(())
}
