use tracing_subscriber::util::SubscriberInitExt;

mod backoff;
pub(crate) mod cache;
pub(crate) mod config;
pub(crate) mod hn_api;
pub(crate) mod page;
pub(crate) mod stories;

pub(crate) static CLIENT: std::sync::LazyLock<reqwest::Client> =
    std::sync::LazyLock::new(reqwest::Client::new);

#[derive(Debug, Clone, clap::Parser)]
#[command(version, about, long_about = None)]
struct Args {
    #[arg(short, long, default_value_t = 3000)]
    #[arg(help = "The port to start the web server on")]
    port: u16,

    #[arg(short, long, default_value_t = 30)]
    #[arg(help = "The number of top stories to display")]
    num_stories: usize,

    #[arg(short, long, default_value_t = 600)]
    #[arg(help = "Seconds a cached top list or item stays fresh")]
    cache_ttl_secs: u64,

    #[arg(long, default_value = "false")]
    #[arg(help = "Periodically re-fetch cached entries in the background")]
    background_refresh: bool,

    #[arg(short, long, default_value = "false")]
    #[arg(help = "Log to console")]
    log_to_console: bool,
}

#[derive(Clone)]
struct AppState {
    cache: std::sync::Arc<cache::Cache<hn_api::HnClient>>,
    num_stories: usize,
}

async fn front_page(
    axum::extract::State(state): axum::extract::State<AppState>,
) -> axum::response::Response {
    use axum::response::IntoResponse;

    let start = std::time::Instant::now();

    match stories::get_top_stories(
        &state.cache,
        state.num_stories,
        config::config().short_result,
    )
    .await
    {
        Ok(stories) => {
            let elapsed = start.elapsed();
            tracing::info!(
                num_stories = stories.len(),
                elapsed_ms = elapsed.as_millis() as u64,
                "Rendered front page"
            );
            axum::response::Html(page::render(stories, elapsed)).into_response()
        }
        Err(e) => {
            tracing::error!(error =? e, "Failed to fetch top stories");
            (
                axum::http::StatusCode::INTERNAL_SERVER_ERROR,
                "Failed to load stories",
            )
                .into_response()
        }
    }
}

async fn serve(args: Args) -> anyhow::Result<()> {
    let client = hn_api::HnClient::new(config::config().hn_api_base_url.clone());
    let cache = std::sync::Arc::new(cache::Cache::new(
        client,
        std::time::Duration::from_secs(args.cache_ttl_secs),
    ));

    let refresh_task = args
        .background_refresh
        .then(|| cache.spawn_refresh_loop());

    let state = AppState {
        cache,
        num_stories: args.num_stories,
    };

    let app = axum::Router::new()
        .route("/", axum::routing::get(front_page))
        .layer(tower_http::trace::TraceLayer::new_for_http())
        .with_state(state);

    let listener = tokio::net::TcpListener::bind(("0.0.0.0", args.port)).await?;
    tracing::info!(port = args.port, "Serving the front page");

    let result = axum::serve(listener, app).await;

    if let Some(task) = refresh_task {
        task.abort();
    }

    Ok(result?)
}

#[tokio::main]
async fn main() {
    use clap::Parser;
    use tracing_subscriber::layer::Layer;
    use tracing_subscriber::layer::SubscriberExt;

    let args = Args::parse();

    let file_appender = tracing_appender::rolling::daily("./log", "hn_front.log");
    let (non_blocking, _guard) = tracing_appender::non_blocking(file_appender);

    let file_layer = tracing_subscriber::fmt::layer();
    let file_layer = file_layer
        .with_writer(non_blocking)
        .json()
        .with_filter(tracing::level_filters::LevelFilter::INFO)
        .boxed();

    let pretty_layer = tracing_subscriber::fmt::layer()
        .with_file(true)
        .with_line_number(true)
        .with_writer(std::io::stdout)
        .with_filter(tracing::level_filters::LevelFilter::INFO)
        .boxed();

    let registry = tracing_subscriber::registry().with(file_layer);

    if args.log_to_console {
        registry.with(pretty_layer).init();
    } else {
        registry.init();
    };

    tracing::info!(
        config =? config::config(),
        args =? args,
        "Starting hn-front"
    );

    if let Err(e) = serve(args).await {
        tracing::error!(error =? e, "Server exited with an error");
        std::process::exit(1);
    }
}
