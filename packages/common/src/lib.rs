pub mod listing_type;

#[cfg(feature = "object-storage")]
pub mod storage;

pub use listing_type::ListingType;
