//! Single-permit lookup by identifier

use lazy_static::lazy_static;
use regex::Regex;

use crate::types::Permit;

lazy_static! {
    /// Hyphenated 8-4-4-4-12 hex UUID, either case
    static ref PERMIT_ID_PATTERN: Regex = Regex::new(
        r"^[0-9a-fA-F]{8}-[0-9a-fA-F]{4}-[0-9a-fA-F]{4}-[0-9a-fA-F]{4}-[0-9a-fA-F]{12}$"
    )
    .unwrap();
}

pub fn is_valid_permit_id(id: &str) -> bool {
    PERMIT_ID_PATTERN.is_match(id)
}

/// Exact, case-sensitive match over the unfiltered collection
pub fn find_permit<'a>(permits: &'a [Permit], id: &str) -> Option<&'a Permit> {
    permits.iter().find(|p| p.permit_id == id)
}
