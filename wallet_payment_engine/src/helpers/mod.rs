//! Support functions that don't touch the database.

mod content_hash;
mod msisdn;

pub use content_hash::content_hash;
pub use msisdn::normalize_msisdn;
