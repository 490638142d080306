// Security and traffic-proxy endpoints
//
// URL category filtering (parental control), the ad filter and SSL bypass.

use serde_json::json;
use tracing::debug;

use crate::device::DeviceClient;
use crate::device::models::{
    AdsCategoryChanges, AdsCategoryStates, AdsFilterStatus, CategoryChanges, CategoryStates,
    UrlFilterData,
};
use crate::error::Error;

impl DeviceClient {
    /// Current parental-control category states.
    ///
    /// `GET /api/security/getUrlFilterData`, unwrapping `categoryStates`.
    pub async fn get_url_filter_data(&self, cookie: &str) -> Result<CategoryStates, Error> {
        let data: UrlFilterData = self.get(cookie, "security/getUrlFilterData").await?;
        data.category_states
            .ok_or_else(|| Error::malformed("url filter data has no categoryStates"))
    }

    /// Submit the full category state plus per-category change flags.
    ///
    /// `POST /api/security/setCategoryStates`
    pub async fn set_category_states(
        &self,
        cookie: &str,
        states: &CategoryStates,
        changes: CategoryChanges,
    ) -> Result<(), Error> {
        debug!(?changes, "updating category states");
        self.post_ack(
            cookie,
            "security/setCategoryStates",
            &json!({
                "categoryStates": states,
                "pornStateChanged": changes.porn,
                "socialStateChanged": changes.social,
                "gameStateChanged": changes.game,
            }),
        )
        .await
    }

    /// `GET /api/security/getAdsFilter`
    pub async fn get_ads_filter(&self, cookie: &str) -> Result<AdsFilterStatus, Error> {
        self.get(cookie, "security/getAdsFilter").await
    }

    /// `POST /api/security/setAdsFilter` with `{"enable"}`
    pub async fn set_ads_filter(&self, cookie: &str, enable: bool) -> Result<(), Error> {
        debug!(enable, "setting ad filter");
        self.post_ack(cookie, "security/setAdsFilter", &json!({ "enable": enable }))
            .await
    }

    /// Submit ad-filter category states plus change flags.
    ///
    /// `POST /api/security/setAdsFilterCategories`
    pub async fn set_ads_filter_categories(
        &self,
        cookie: &str,
        states: &AdsCategoryStates,
        changes: AdsCategoryChanges,
    ) -> Result<(), Error> {
        debug!(?changes, "updating ad filter categories");
        self.post_ack(
            cookie,
            "security/setAdsFilterCategories",
            &json!({
                "categories": states,
                "adsChanged": changes.ads,
                "trackerChanged": changes.tracker,
                "maliciousChanged": changes.malicious,
            }),
        )
        .await
    }

    /// Allow TLS traffic to skip interception.
    ///
    /// `POST /api/tproxy/setSslBypass` with `{"enable"}`
    pub async fn set_ssl_bypass(&self, cookie: &str, enable: bool) -> Result<(), Error> {
        debug!(enable, "setting SSL bypass");
        self.post_ack(cookie, "tproxy/setSslBypass", &json!({ "enable": enable }))
            .await
    }
}
