// ── Content filter workflows ──
//
// Parental control and ad-filter categories are read-modify-write: fetch
// the current state, flag a category as changed only when the caller
// supplied a different value, and submit the full state with the flags.

use deeper_api::{
    AdsCategoryChanges, AdsCategoryStates, CategoryChanges, CategoryStates, DeviceClient,
};
use serde::Deserialize;
use tracing::debug;

use crate::error::CoreError;

/// Parental-control states accepted by the device.
pub const CATEGORY_STATES: [i64; 5] = [0, 1, 2, 4, 8];

/// Requested parental-control states; `None` leaves a category alone.
#[derive(Debug, Clone, Copy, Default, Deserialize)]
pub struct ParentalRequest {
    #[serde(default)]
    pub porn: Option<i64>,
    #[serde(default)]
    pub social: Option<i64>,
    #[serde(default)]
    pub game: Option<i64>,
}

impl ParentalRequest {
    fn validate(self) -> Result<Self, CoreError> {
        for (name, value) in [("porn", self.porn), ("social", self.social), ("game", self.game)] {
            if let Some(v) = value {
                if !CATEGORY_STATES.contains(&v) {
                    return Err(CoreError::invalid(format!(
                        "{name} state must be one of 0, 1, 2, 4, 8 (got {v})"
                    )));
                }
            }
        }
        Ok(self)
    }
}

/// Requested ad-filter categories; `None` leaves a category alone.
#[derive(Debug, Clone, Copy, Default, Deserialize)]
pub struct AdsCategoryRequest {
    #[serde(default)]
    pub ads: Option<bool>,
    #[serde(default)]
    pub tracker: Option<bool>,
    #[serde(default)]
    pub malicious: Option<bool>,
}

fn merge<T: PartialEq + Copy>(current: &mut T, requested: Option<T>) -> bool {
    match requested {
        Some(v) if v != *current => {
            *current = v;
            true
        }
        _ => false,
    }
}

/// Apply `request` to `current`, returning the merged state and which
/// categories differ from what the device had.
pub fn diff_categories(
    current: &CategoryStates,
    request: ParentalRequest,
) -> (CategoryStates, CategoryChanges) {
    let mut next = current.clone();
    let changes = CategoryChanges {
        porn: merge(&mut next.porn, request.porn),
        social: merge(&mut next.social, request.social),
        game: merge(&mut next.game, request.game),
    };
    (next, changes)
}

/// Ad-filter counterpart of [`diff_categories`].
pub fn diff_ads_categories(
    current: &AdsCategoryStates,
    request: AdsCategoryRequest,
) -> (AdsCategoryStates, AdsCategoryChanges) {
    let mut next = current.clone();
    let changes = AdsCategoryChanges {
        ads: merge(&mut next.ads, request.ads),
        tracker: merge(&mut next.tracker, request.tracker),
        malicious: merge(&mut next.malicious, request.malicious),
    };
    (next, changes)
}

/// Read, diff and submit parental-control states.
pub async fn apply_parental(
    client: &DeviceClient,
    cookie: &str,
    request: ParentalRequest,
) -> Result<CategoryChanges, CoreError> {
    let request = request.validate()?;
    let current = client.get_url_filter_data(cookie).await?;
    let (next, changes) = diff_categories(&current, request);
    debug!(?changes, "parental control diff");
    client.set_category_states(cookie, &next, changes).await?;
    Ok(changes)
}

/// Read, diff and submit ad-filter categories.
pub async fn apply_ads_categories(
    client: &DeviceClient,
    cookie: &str,
    request: AdsCategoryRequest,
) -> Result<AdsCategoryChanges, CoreError> {
    let status = client.get_ads_filter(cookie).await?;
    let current = status.categories.unwrap_or_default();
    let (next, changes) = diff_ads_categories(&current, request);
    debug!(?changes, "ad filter category diff");
    client.set_ads_filter_categories(cookie, &next, changes).await?;
    Ok(changes)
}

/// Toggle SSL bypass. Enabling requires the ad filter to be on; that is
/// checked first and nothing is written when it is off.
pub async fn set_ssl_bypass(
    client: &DeviceClient,
    cookie: &str,
    enable: bool,
) -> Result<(), CoreError> {
    if enable && !client.get_ads_filter(cookie).await?.enable {
        return Err(CoreError::AdsFilterDisabled);
    }
    client.set_ssl_bypass(cookie, enable).await?;
    Ok(())
}

/// Names of the flagged categories, e.g. `porn, game`, or `none`.
pub fn changed_names(flags: &[(&str, bool)]) -> String {
    let names: Vec<&str> = flags
        .iter()
        .filter(|(_, changed)| *changed)
        .map(|(name, _)| *name)
        .collect();
    if names.is_empty() {
        "none".to_owned()
    } else {
        names.join(", ")
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn states(porn: i64, social: i64, game: i64) -> CategoryStates {
        CategoryStates {
            porn,
            social,
            game,
            ..CategoryStates::default()
        }
    }

    #[test]
    fn only_supplied_and_different_values_are_flagged() {
        let current = states(1, 0, 0);
        let (next, changes) = diff_categories(
            &current,
            ParentalRequest {
                porn: Some(1),
                social: Some(4),
                game: None,
            },
        );
        assert_eq!(next, states(1, 4, 0));
        assert_eq!(
            changes,
            CategoryChanges {
                porn: false,
                social: true,
                game: false,
            }
        );
    }

    #[test]
    fn empty_request_changes_nothing() {
        let current = states(0, 1, 2);
        let (next, changes) = diff_categories(&current, ParentalRequest::default());
        assert_eq!(next, current);
        assert_eq!(changes, CategoryChanges::default());
    }

    #[test]
    fn ads_categories_diff() {
        let current = AdsCategoryStates {
            ads: true,
            tracker: false,
            malicious: false,
        };
        let (next, changes) = diff_ads_categories(
            &current,
            AdsCategoryRequest {
                ads: Some(true),
                tracker: Some(true),
                malicious: None,
            },
        );
        assert!(next.tracker);
        assert_eq!(
            changes,
            AdsCategoryChanges {
                ads: false,
                tracker: true,
                malicious: false,
            }
        );
    }

    #[test]
    fn out_of_range_state_is_rejected() {
        let request = ParentalRequest {
            game: Some(3),
            ..ParentalRequest::default()
        };
        assert!(matches!(
            request.validate(),
            Err(CoreError::InvalidArgument { .. })
        ));
    }

    #[test]
    fn changed_names_lists_flagged() {
        assert_eq!(changed_names(&[("porn", true), ("social", false), ("game", true)]), "porn, game");
        assert_eq!(changed_names(&[("porn", false)]), "none");
    }
}
