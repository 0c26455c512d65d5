//! Places Module
//!
//! The caller of the cache: a place lookup service over an origin API.

mod lookup;
mod origin;

pub use lookup::{details_key, search_key, LookupError, PlacesLookup};
pub use origin::{GooglePlacesOrigin, Origin, OriginError, PlacesApiConfig};
