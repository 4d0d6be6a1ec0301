//! `pharmaloc search`: one-shot and live-typed interactive searches.

use clap::Args;
use futures::stream::{FuturesUnordered, StreamExt};
use pharmaloc_core::{AppConfig, Coordinate, PharmacyStatus};
use pharmaloc_search::{
    CandidateRetriever, GeolocationError, GeolocationProvider, HttpGeolocationProvider,
    LocationResolver, PgCatalogStore, PositionOptions, ReportedPosition, ResolveOptions,
    SearchConfig, SearchOutcome, SearchRequest, SearchService, SearchSession,
};
use tokio::io::{AsyncBufReadExt, BufReader};

const USER_AGENT: &str = concat!("pharmaloc-cli/", env!("CARGO_PKG_VERSION"));

#[derive(Debug, Args)]
pub struct SearchArgs {
    /// Medicine, pharmacy name, address or city; omit to list every pharmacy
    pub term: Option<String>,
    /// Origin latitude (requires --lng)
    #[arg(long, requires = "lng", allow_negative_numbers = true)]
    pub lat: Option<f64>,
    /// Origin longitude (requires --lat)
    #[arg(long, requires = "lat", allow_negative_numbers = true)]
    pub lng: Option<f64>,
    /// Only pharmacies with this status (open, closed, on-duty)
    #[arg(long)]
    pub status: Option<PharmacyStatus>,
    /// Drop results whose product is out of stock
    #[arg(long)]
    pub available_only: bool,
    /// Maximum number of results to show
    #[arg(long)]
    pub limit: Option<usize>,
    /// Read one search term per line from stdin, searching as lines arrive
    #[arg(long, conflicts_with = "term")]
    pub interactive: bool,
    /// Ignore any cached position fix
    #[arg(long)]
    pub refresh_location: bool,
    /// Print the raw outcome as JSON
    #[arg(long)]
    pub json: bool,
}

impl SearchArgs {
    fn request(&self, term: &str) -> SearchRequest {
        SearchRequest {
            term: term.to_string(),
            status: self.status,
            available_only: self.available_only,
            limit: self.limit,
        }
    }
}

/// Where the CLI gets its position: an explicit `--lat/--lng`, the configured
/// HTTP endpoint, or nothing (default coordinate).
enum CliProvider {
    Reported(ReportedPosition),
    Http(HttpGeolocationProvider),
}

impl GeolocationProvider for CliProvider {
    async fn current_position(
        &self,
        options: &PositionOptions,
    ) -> Result<Coordinate, GeolocationError> {
        match self {
            CliProvider::Reported(reported) => reported.current_position(options).await,
            CliProvider::Http(http) => http.current_position(options).await,
        }
    }
}

fn build_provider(config: &AppConfig, args: &SearchArgs) -> anyhow::Result<CliProvider> {
    if args.lat.is_some() || args.lng.is_some() {
        let reported = ReportedPosition::from_query(args.lat, args.lng, None)?;
        return Ok(CliProvider::Reported(reported));
    }
    match config.geo_url.as_deref() {
        Some(url) => Ok(CliProvider::Http(HttpGeolocationProvider::new(url, USER_AGENT)?)),
        None => Ok(CliProvider::Reported(ReportedPosition::Missing)),
    }
}

async fn build_service(config: &AppConfig) -> anyhow::Result<SearchService<PgCatalogStore>> {
    let dataset = pharmaloc_core::load_fallback_dataset(config.fallback_path.as_deref())?;
    let store = if config.store_enabled() {
        match pharmaloc_db::connect_from_app_config(config).await {
            Ok(pool) => Some(PgCatalogStore::new(pool)),
            Err(error) => {
                tracing::warn!(%error, "catalog store unreachable; using fallback dataset");
                None
            }
        }
    } else {
        None
    };
    let retriever = CandidateRetriever::new(store, SearchConfig::from_app_config(config, dataset));
    Ok(SearchService::new(retriever))
}

pub(crate) async fn run_search(config: &AppConfig, args: SearchArgs) -> anyhow::Result<()> {
    let service = build_service(config).await?;
    let resolver = LocationResolver::new(build_provider(config, &args)?, config.default_location);
    let mut options = ResolveOptions::from_app_config(config);
    if args.refresh_location {
        options = options.refreshed();
    }

    if args.interactive {
        return run_interactive(&service, &resolver, &options, &args).await;
    }

    let term = args.term.clone().unwrap_or_default();
    let outcome = service
        .search(&resolver, &options, &args.request(&term))
        .await;
    print_outcome(&term, &outcome, args.json)
}

/// Each line starts a search immediately, without waiting for earlier ones.
/// Only results that win the session's last-write-wins check are printed.
async fn run_interactive(
    service: &SearchService<PgCatalogStore>,
    resolver: &LocationResolver<CliProvider>,
    options: &ResolveOptions,
    args: &SearchArgs,
) -> anyhow::Result<()> {
    let session = SearchSession::new();
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut in_flight = FuturesUnordered::new();
    let mut stdin_open = true;

    eprintln!("type a search term per line; ctrl-d to quit");
    loop {
        tokio::select! {
            line = lines.next_line(), if stdin_open => {
                match line? {
                    Some(line) => {
                        let term = line.trim().to_string();
                        let ticket = session.begin();
                        let request = args.request(&term);
                        in_flight.push(async move {
                            let outcome = service.search(resolver, options, &request).await;
                            (ticket, term, outcome)
                        });
                    }
                    None => stdin_open = false,
                }
            }
            Some((ticket, term, outcome)) = in_flight.next(), if !in_flight.is_empty() => {
                if session.apply(ticket, term.clone()) {
                    print_outcome(&term, &outcome, args.json)?;
                }
            }
            else => break,
        }
    }

    Ok(())
}

fn print_outcome(term: &str, outcome: &SearchOutcome, json: bool) -> anyhow::Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(outcome)?);
        return Ok(());
    }

    let label = if term.is_empty() { "(all)" } else { term };
    println!(
        "{label}: {} result(s) from {:?} store, origin ({:.4}, {:.4}) [{:?}]",
        outcome.results.len(),
        outcome.source,
        outcome.location.coordinate.lat,
        outcome.location.coordinate.lng,
        outcome.location.status,
    );
    for (index, result) in outcome.results.iter().enumerate() {
        let pharmacy = &result.pharmacy;
        let distance = pharmacy.distance_km.unwrap_or_default();
        let product = result.product.as_ref().map_or_else(String::new, |p| {
            let stock = if p.available { "in stock" } else { "out of stock" };
            format!("  {} {} XOF ({stock})", p.name, p.unit_price)
        });
        println!(
            "{:>3}. {distance:>6.1} km  {} [{}]{product}",
            index + 1,
            pharmacy.name,
            pharmacy.status,
        );
    }
    Ok(())
}
