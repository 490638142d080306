// App relocator endpoints

use serde_json::json;
use tracing::debug;

use crate::device::DeviceClient;
use crate::device::models::AppCategory;
use crate::error::Error;

const ALL_CATEGORIES: &str = "allCategories";
const ALL_COUNTRIES: &str = "allCountries";

impl DeviceClient {
    /// Names of every app the device can relocate.
    ///
    /// `GET /api/appRelocator/getAppList`, then the `allCategories` category,
    /// its `allCountries` subcategory, and each entry's `app`.
    pub async fn list_apps(&self, cookie: &str) -> Result<Vec<String>, Error> {
        let categories: Vec<AppCategory> = self.get(cookie, "appRelocator/getAppList").await?;
        extract_app_names(categories)
    }

    /// Route `app_name` through `tunnel_code` (`LL` means direct access).
    ///
    /// `POST /api/appRelocator/addApp`
    pub async fn add_app(&self, cookie: &str, app_name: &str, tunnel_code: &str) -> Result<(), Error> {
        debug!(app_name, tunnel_code, "adding app route");
        self.post_ack(
            cookie,
            "appRelocator/addApp",
            &json!({
                "appName": app_name,
                "tunnelCode": tunnel_code,
            }),
        )
        .await
    }
}

fn extract_app_names(categories: Vec<AppCategory>) -> Result<Vec<String>, Error> {
    let category = categories
        .into_iter()
        .find(|c| c.category.as_deref() == Some(ALL_CATEGORIES))
        .ok_or_else(|| Error::malformed(format!("app list has no `{ALL_CATEGORIES}` category")))?;

    let subcategories = category.apps_by_subcategory.ok_or_else(|| {
        Error::malformed(format!("`{ALL_CATEGORIES}` has no appsBySubcategory array"))
    })?;

    let apps = subcategories
        .into_iter()
        .find(|s| s.subcategory.as_deref() == Some(ALL_COUNTRIES))
        .and_then(|s| s.apps)
        .ok_or_else(|| {
            Error::malformed(format!("app list has no `{ALL_COUNTRIES}` apps array"))
        })?;

    Ok(apps.into_iter().filter_map(|entry| entry.app).collect())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use serde_json::json;

    use super::*;

    fn parse(value: serde_json::Value) -> Vec<AppCategory> {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn collects_names_from_all_countries() {
        let names = extract_app_names(parse(json!([
            { "category": "streaming", "appsBySubcategory": [] },
            {
                "category": "allCategories",
                "appsBySubcategory": [
                    { "subcategory": "US", "apps": [{ "app": "hulu" }] },
                    { "subcategory": "allCountries", "apps": [{ "app": "app1" }, { "app": "app2" }] }
                ]
            }
        ])))
        .unwrap();
        assert_eq!(names, vec!["app1", "app2"]);
    }

    #[test]
    fn missing_nesting_is_malformed() {
        let err = extract_app_names(parse(json!([{ "category": "allCategories" }]))).unwrap_err();
        assert!(matches!(err, Error::MalformedResponse { .. }));
        assert!(!err.to_string().is_empty());

        let err = extract_app_names(parse(json!([
            { "category": "allCategories", "appsBySubcategory": [{ "subcategory": "JP", "apps": [] }] }
        ])))
        .unwrap_err();
        assert!(matches!(err, Error::MalformedResponse { .. }));
    }
}
