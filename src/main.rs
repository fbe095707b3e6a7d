use clap::Parser;
use connector_hub::application::events::send_event;
use connector_hub::application::handler::LastResponseHandler;
use connector_hub::application::pipeline::Pipeline;
use connector_hub::domain::ports::{ConnectorClientRef, EventNotifierRef};
use connector_hub::infrastructure::in_memory::LogNotifier;
use connector_hub::interfaces::json::endpoint_catalog::{EndpointCatalog, EndpointConfig};
use connector_hub::interfaces::json::fixtures::load_fixtures;
use connector_hub::interfaces::json::request_reader::RequestReader;
use miette::{IntoDiagnostic, Result, miette};
use std::fs::File;
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Inbound request JSON file
    request: PathBuf,

    /// Endpoint to run, as named in the catalog
    #[arg(long)]
    endpoint: String,

    /// Endpoint catalog JSON file
    #[arg(long)]
    catalog: PathBuf,

    /// Canned connector fixtures JSON file
    #[arg(long)]
    fixtures: PathBuf,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let catalog = EndpointCatalog::from_reader(File::open(&cli.catalog).into_diagnostic()?)
        .into_diagnostic()?;
    let client = load_fixtures(File::open(&cli.fixtures).into_diagnostic()?).into_diagnostic()?;
    let request = RequestReader::new(File::open(&cli.request).into_diagnostic()?)
        .read()
        .into_diagnostic()?;

    let Some(endpoint) = catalog.get(&cli.endpoint) else {
        return Err(miette!(
            "unknown endpoint '{}'; the catalog defines: {}",
            cli.endpoint,
            catalog.names().join(", ")
        ));
    };

    let notifier: EventNotifierRef = Arc::new(LogNotifier::new());

    let response = match endpoint {
        EndpointConfig::Event => send_event(notifier.as_ref(), &request).await,
        EndpointConfig::Workflow(endpoint) => {
            let client: ConnectorClientRef = Arc::new(client);
            let pipeline = Pipeline::new(client).with_notifier(Arc::clone(&notifier));

            if let Some(chain) = &endpoint.chain {
                pipeline
                    .run_chained(
                        request,
                        endpoint.call.plan(),
                        chain.link.link(),
                        chain.spec(),
                        &LastResponseHandler,
                    )
                    .await
            } else if !endpoint.fan_out.is_empty() {
                pipeline
                    .run_fanout(request, endpoint.branch_plans(), &LastResponseHandler)
                    .await
            } else {
                pipeline
                    .run(request, endpoint.call.plan(), &LastResponseHandler)
                    .await
            }
        }
    };

    println!("{response}");
    Ok(())
}
