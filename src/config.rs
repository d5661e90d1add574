#[derive(Debug)]
pub(crate) struct Config {
    pub(crate) hn_api_base_url: String,
    pub(crate) short_result: crate::stories::ShortResult,
}

static CONFIG: std::sync::LazyLock<Config> = std::sync::LazyLock::new(|| {
    // A .env file is optional; everything has a default.
    let _ = dotenvy::dotenv();

    Config {
        hn_api_base_url: std::env::var("HN_API_BASE_URL")
            .unwrap_or_else(|_| "https://hacker-news.firebaseio.com/v0".to_string()),

        short_result: match std::env::var("REQUIRE_FULL_STORY_COUNT").as_deref() {
            Ok("true") | Ok("1") => crate::stories::ShortResult::Error,
            _ => crate::stories::ShortResult::Allow,
        },
    }
});

pub(crate) fn config() -> &'static Config {
    &CONFIG
}
