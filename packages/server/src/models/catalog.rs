use serde::{Deserialize, Serialize};
use tradepost_common::ListingType;

use crate::error::AppError;

use super::listing::ListingResponse;

/// Catalog sort keys accepted on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortKey {
    UploadDateAsc,
    UploadDateDesc,
    PriceAsc,
    PriceDesc,
}

impl SortKey {
    pub fn parse(s: &str) -> Result<Self, AppError> {
        match s {
            "uploadDateAsc" => Ok(Self::UploadDateAsc),
            "uploadDateDesc" => Ok(Self::UploadDateDesc),
            "priceAsc" => Ok(Self::PriceAsc),
            "priceDesc" => Ok(Self::PriceDesc),
            _ => Err(AppError::InvalidArgument(
                "sort must be one of: uploadDateAsc, uploadDateDesc, priceAsc, priceDesc".into(),
            )),
        }
    }
}

/// Raw catalog query parameters. List-valued parameters arrive
/// comma-separated.
#[derive(Debug, Default, Deserialize, utoipa::IntoParams)]
#[into_params(parameter_in = Query)]
pub struct CatalogQuery {
    /// Free-text search over title and description.
    #[serde(default)]
    pub search: Option<String>,
    /// One of uploadDateAsc, uploadDateDesc, priceAsc, priceDesc.
    #[serde(default)]
    pub sort: Option<String>,
    /// Comma-separated listing kinds (buy, rent, request).
    #[serde(default)]
    pub listing_types: Option<String>,
    #[serde(default)]
    pub min_price: Option<f64>,
    /// 0 (or absent) means unbounded.
    #[serde(default)]
    pub max_price: Option<f64>,
    /// Comma-separated category labels; `all` (or `none`) disables the filter.
    #[serde(default)]
    pub categories: Option<String>,
}

/// Validated, resolved form of a catalog query.
#[derive(Debug, Clone, PartialEq)]
pub struct CatalogFilters {
    pub search: String,
    pub sort: SortKey,
    pub types: Vec<ListingType>,
    pub min_price: f64,
    /// `f64::INFINITY` when unbounded.
    pub max_price: f64,
    /// `None` disables category filtering.
    pub categories: Option<Vec<String>>,
}

/// Sentinel category values meaning "no category filter".
fn is_category_sentinel(value: &str) -> bool {
    value.eq_ignore_ascii_case("all") || value.eq_ignore_ascii_case("none")
}

fn split_list(raw: &str) -> Vec<&str> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .collect()
}

impl CatalogFilters {
    /// Validates raw query parameters and resolves defaults. All failures
    /// are reported before any store query is built.
    pub fn resolve(query: &CatalogQuery) -> Result<Self, AppError> {
        let min_price = query.min_price.unwrap_or(0.0);
        if !min_price.is_finite() || min_price < 0.0 {
            return Err(AppError::InvalidArgument(
                "minimum price must be non-negative".into(),
            ));
        }

        let raw_max = query.max_price.unwrap_or(0.0);
        if !raw_max.is_finite() || raw_max < 0.0 {
            return Err(AppError::InvalidArgument(
                "maximum price must be non-negative".into(),
            ));
        }
        // A maximum of zero means "no upper bound".
        let max_price = if raw_max == 0.0 { f64::INFINITY } else { raw_max };
        if max_price < min_price {
            return Err(AppError::InvalidArgument(
                "maximum price must be greater than or equal to minimum price".into(),
            ));
        }

        let sort = match query.sort.as_deref() {
            None | Some("") => SortKey::UploadDateDesc,
            Some(s) => SortKey::parse(s)?,
        };

        let types = match query.listing_types.as_deref() {
            None | Some("") => ListingType::ALL.to_vec(),
            Some(raw) => {
                let parsed: Result<Vec<ListingType>, _> = split_list(raw)
                    .into_iter()
                    .map(|entry| {
                        entry
                            .parse::<ListingType>()
                            .map_err(|e| AppError::InvalidArgument(e.to_string()))
                    })
                    .collect();
                let parsed = parsed?;
                if parsed.is_empty() {
                    ListingType::ALL.to_vec()
                } else {
                    parsed
                }
            }
        };

        let categories = match query.categories.as_deref() {
            None | Some("") => None,
            Some(raw) => {
                let entries = split_list(raw);
                if entries.is_empty() || entries.iter().any(|e| is_category_sentinel(e)) {
                    None
                } else {
                    Some(entries.into_iter().map(String::from).collect())
                }
            }
        };

        Ok(Self {
            search: query.search.clone().unwrap_or_default(),
            sort,
            types,
            min_price,
            max_price,
            categories,
        })
    }
}

/// Case-insensitive substring match over a listing's title and description.
pub fn matches_search(title: &str, description: Option<&str>, term: &str) -> bool {
    let needle = term.to_lowercase();
    if title.to_lowercase().contains(&needle) {
        return true;
    }
    description
        .map(|d| d.to_lowercase().contains(&needle))
        .unwrap_or(false)
}

/// A catalog entry: the listing projection plus its display age.
#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct CatalogListingItem {
    #[serde(flatten)]
    pub listing: ListingResponse,
    /// Compact elapsed-time string, e.g. "5m", "2h", "1mo".
    pub time_since_listing: String,
}

#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct ListingsResponse {
    pub listings: Vec<CatalogListingItem>,
}

/// Seller contact handoff returned by the purchase endpoint.
#[derive(Serialize, utoipa::ToSchema)]
pub struct PurchaseContactResponse {
    pub display_name: String,
    pub email: String,
    pub location: String,
    pub phone_number: String,
}

#[derive(Deserialize, utoipa::IntoParams)]
#[into_params(parameter_in = Query)]
pub struct PurchaseQuery {
    pub listing_id: String,
}
