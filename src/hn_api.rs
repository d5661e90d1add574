//! Hacker News Firebase API client. One GET and one JSON decode per call,
//! no coordination. Everything above this sits behind the `ItemSource` trait
//! so the cache and fetcher can be tested without the network.

#[derive(Debug, Clone, Default, serde::Deserialize, serde::Serialize)]
pub(crate) struct Item {
    pub(crate) id: u64,

    #[serde(rename = "type", default)]
    pub(crate) item_type: String,

    #[serde(default)]
    pub(crate) title: String,

    pub(crate) url: Option<String>,

    #[serde(default)]
    pub(crate) score: i64,

    pub(crate) by: Option<String>,

    #[serde(default)]
    #[allow(unused)]
    pub(crate) time: i64,

    pub(crate) descendants: Option<i64>,

    #[serde(default)]
    #[allow(unused)]
    pub(crate) kids: Vec<u64>,
}

#[async_trait::async_trait]
pub(crate) trait ItemSource: Send + Sync {
    async fn top_ids(&self) -> anyhow::Result<Vec<u64>>;
    async fn item(&self, id: u64) -> anyhow::Result<Item>;
}

#[derive(Debug, Clone)]
pub(crate) struct HnClient {
    base_url: String,
}

impl HnClient {
    pub(crate) fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
        }
    }

    async fn get_json<T: serde::de::DeserializeOwned>(&self, url: String) -> anyhow::Result<T> {
        let response = backoff::future::retry(crate::backoff::backoff_default(), || async {
            let response = crate::CLIENT
                .get(&url)
                .send()
                .await
                .map_err(backoff::Error::transient)?;

            response
                .error_for_status()
                .map_err(backoff::Error::transient)
        })
        .await?;

        Ok(response.json::<T>().await?)
    }
}

#[async_trait::async_trait]
impl ItemSource for HnClient {
    async fn top_ids(&self) -> anyhow::Result<Vec<u64>> {
        self.get_json(format!("{}/topstories.json", self.base_url))
            .await
    }

    async fn item(&self, id: u64) -> anyhow::Result<Item> {
        // Unknown or deleted ids come back as a literal JSON null.
        let item: Option<Item> = self
            .get_json(format!("{}/item/{}.json", self.base_url, id))
            .await?;

        item.ok_or_else(|| anyhow::anyhow!("item {} not found", id))
    }
}
