// Builds a sample search request and prints the JSON-RPC call it produces.
// Point OPENBIS_SERVER__URL at a server and plug in an HTTP transport to run it for real.

use openbis_dto::api::RpcRequest;
use openbis_dto::{ClientConfig, SampleFetchOptions, SampleSearchCriteria, SearchCriteria};
use serde_json::Value;

fn main() -> anyhow::Result<()> {
    // Load environment variables from .env file if it exists
    dotenvy::dotenv().ok();

    // Initialize logging, with debug output for the client itself
    use env_logger::Builder;
    use log::LevelFilter;

    Builder::new()
        .filter_level(LevelFilter::Info)
        .filter_module("openbis_dto", LevelFilter::Debug)
        .init();

    let config = ClientConfig::load()?;
    println!("openBIS endpoint: {}", config.api_url());
    if let Some(user) = &config.session.user {
        println!("Session user: {}", user);
    }

    let mut criteria = SampleSearchCriteria::new();
    criteria.with_type().with_code().that_equals("PLATE");
    criteria.with_space().with_code().that_equals("LAB");
    criteria.with_registration_date().that_is_later_than("2024-01-01")?;
    criteria.with_parents().with_property("COLOR").that_contains("red");

    let mut fetch_options = SampleFetchOptions::new();
    fetch_options.with_type();
    fetch_options.with_properties();
    fetch_options.with_experiment().with_project();
    fetch_options.count(20).sort_by().registration_date().desc();

    let criteria: SearchCriteria = criteria.into();
    println!("Searching samples where {}", criteria);

    let request = RpcRequest::new(
        "searchSamples",
        vec![
            Value::from("<session token>"),
            serde_json::to_value(&criteria)?,
            serde_json::to_value(&fetch_options)?,
        ],
    );
    println!("{}", serde_json::to_string_pretty(&request)?);

    Ok(())
}
