#[cfg(feature = "sea-orm")]
use sea_orm::prelude::StringLen;

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Kind of marketplace listing.
///
/// When the `sea-orm` feature is enabled, this enum can be used directly as a
/// column type in SeaORM entities.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize, utoipa::ToSchema)]
#[cfg_attr(
    feature = "sea-orm",
    derive(sea_orm::DeriveActiveEnum, sea_orm::EnumIter),
    sea_orm(rs_type = "String", db_type = "String(StringLen::None)")
)]
#[serde(rename_all = "lowercase")]
pub enum ListingType {
    /// An item or service offered for sale.
    #[cfg_attr(feature = "sea-orm", sea_orm(string_value = "buy"))]
    Buy,
    /// An item offered for rent over an availability window.
    #[cfg_attr(feature = "sea-orm", sea_orm(string_value = "rent"))]
    Rent,
    /// An item or service a user is looking for.
    #[cfg_attr(feature = "sea-orm", sea_orm(string_value = "request"))]
    Request,
}

impl ListingType {
    /// All possible listing kinds.
    pub const ALL: &'static [ListingType] = &[Self::Buy, Self::Rent, Self::Request];

    /// Returns the string representation (lowercase wire form).
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Buy => "buy",
            Self::Rent => "rent",
            Self::Request => "request",
        }
    }
}

impl fmt::Display for ListingType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error when parsing an invalid listing type string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseListingTypeError {
    invalid: String,
}

impl fmt::Display for ParseListingTypeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Invalid listing type '{}'. Valid values: {}",
            self.invalid,
            ListingType::ALL
                .iter()
                .map(|t| t.as_str())
                .collect::<Vec<_>>()
                .join(", ")
        )
    }
}

impl std::error::Error for ParseListingTypeError {}

impl FromStr for ListingType {
    type Err = ParseListingTypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "buy" => Ok(Self::Buy),
            "rent" => Ok(Self::Rent),
            "request" => Ok(Self::Request),
            _ => Err(ParseListingTypeError {
                invalid: s.to_string(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_serde_roundtrip() {
        for kind in ListingType::ALL {
            let json = serde_json::to_string(kind).unwrap();
            let parsed: ListingType = serde_json::from_str(&json).unwrap();
            assert_eq!(*kind, parsed);
        }
    }

    #[test]
    fn test_wire_form_is_lowercase() {
        assert_eq!(serde_json::to_string(&ListingType::Buy).unwrap(), "\"buy\"");
    }

    #[test]
    fn test_from_str() {
        assert_eq!("rent".parse::<ListingType>().unwrap(), ListingType::Rent);
        assert!("Rent".parse::<ListingType>().is_err());
        assert!("auction".parse::<ListingType>().is_err());
    }
}
