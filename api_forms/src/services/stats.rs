use common::error::Res;
use common::http::ApiClient;
use models::models::stats::Stats;

/// Dashboard usage summary.
pub async fn fetch_stats(api: &ApiClient) -> Res<Stats> {
    api.get("/api/stats", "Failed to load dashboard data").await
}
