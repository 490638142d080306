// Content filtering tools: parental control, ad filter, SSL bypass

use deeper_api::Prober;
use serde::Deserialize;
use serde_json::{Value, json};

use super::{ToolDispatcher, ToolResult, enabled_word, parse_args};
use crate::filters::{self, AdsCategoryRequest, ParentalRequest, changed_names};

fn category_state_schema(description: &str) -> Value {
    json!({
        "type": "integer",
        "enum": filters::CATEGORY_STATES,
        "description": description
    })
}

pub(super) fn definitions() -> Vec<Value> {
    vec![
        json!({
            "name": "setParentalControl",
            "description": "Set parental control filtering per category. Omitted categories are left unchanged. States: 0 (not block), 1 (block), 2/4/8 (unblock 2/4/8 hours).",
            "inputSchema": {
                "type": "object",
                "properties": {
                    "porn": category_state_schema("Adult content filter state."),
                    "social": category_state_schema("Social media filter state."),
                    "game": category_state_schema("Gaming filter state.")
                },
                "additionalProperties": false
            }
        }),
        json!({
            "name": "setAdsFilter",
            "description": "Enable or disable the ad filter.",
            "inputSchema": {
                "type": "object",
                "properties": {
                    "enabled": {
                        "type": "boolean",
                        "description": "true to enable the ad filter, false to disable it."
                    }
                },
                "required": ["enabled"],
                "additionalProperties": false
            }
        }),
        json!({
            "name": "setAdsFilterCategories",
            "description": "Choose which ad filter categories are blocked. Omitted categories are left unchanged.",
            "inputSchema": {
                "type": "object",
                "properties": {
                    "ads": { "type": "boolean", "description": "Block advertisements." },
                    "tracker": { "type": "boolean", "description": "Block trackers." },
                    "malicious": { "type": "boolean", "description": "Block malicious sites." }
                },
                "additionalProperties": false
            }
        }),
        json!({
            "name": "setSslBypass",
            "description": "Enable or disable SSL bypass. Enabling requires the ad filter to be on.",
            "inputSchema": {
                "type": "object",
                "properties": {
                    "enabled": {
                        "type": "boolean",
                        "description": "true to enable SSL bypass, false to disable it."
                    }
                },
                "required": ["enabled"],
                "additionalProperties": false
            }
        }),
    ]
}

#[derive(Deserialize)]
struct EnableArgs {
    enabled: bool,
}

impl<P: Prober + Send + Sync> ToolDispatcher<P> {
    pub(super) async fn set_parental_control(&mut self, args: Value) -> ToolResult {
        let cookie = self.cookie()?;
        let request: ParentalRequest = parse_args(args)?;
        let changes = filters::apply_parental(&self.client, &cookie, request).await?;
        Ok(format!(
            "Parental control updated. Changed: {}",
            changed_names(&[
                ("porn", changes.porn),
                ("social", changes.social),
                ("game", changes.game),
            ])
        ))
    }

    pub(super) async fn set_ads_filter(&mut self, args: Value) -> ToolResult {
        let cookie = self.cookie()?;
        let args: EnableArgs = parse_args(args)?;
        self.client.set_ads_filter(&cookie, args.enabled).await?;
        Ok(format!(
            "Ad filter has been {} successfully.",
            enabled_word(args.enabled)
        ))
    }

    pub(super) async fn set_ads_filter_categories(&mut self, args: Value) -> ToolResult {
        let cookie = self.cookie()?;
        let request: AdsCategoryRequest = parse_args(args)?;
        let changes = filters::apply_ads_categories(&self.client, &cookie, request).await?;
        Ok(format!(
            "Ad filter categories updated. Changed: {}",
            changed_names(&[
                ("ads", changes.ads),
                ("tracker", changes.tracker),
                ("malicious", changes.malicious),
            ])
        ))
    }

    pub(super) async fn set_ssl_bypass(&mut self, args: Value) -> ToolResult {
        let cookie = self.cookie()?;
        let args: EnableArgs = parse_args(args)?;
        filters::set_ssl_bypass(&self.client, &cookie, args.enabled).await?;
        Ok(format!(
            "SSL bypass has been {} successfully.",
            enabled_word(args.enabled)
        ))
    }
}
