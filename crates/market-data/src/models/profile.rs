use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Company profile for one symbol, from the `/profile` endpoint.
///
/// Every field is optional: the service assembles profiles from more than
/// one upstream source and returns whatever it managed to collect.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct AssetProfile {
    /// Company name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    /// Logo URL
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub logo: Option<String>,

    /// Sector / industry classification
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sector: Option<String>,

    /// Market capitalization, in the listing currency
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub market_cap: Option<Decimal>,

    /// Business description
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Country of the home listing
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub country: Option<String>,

    /// Listing currency
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub currency: Option<String>,

    /// Company website
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub website: Option<String>,
}
