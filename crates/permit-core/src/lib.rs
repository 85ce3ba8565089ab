//! Read-only permit catalogue: typed records, query validation, filtering and
//! pagination, plus the admission controls that sit in front of them.

pub mod error;
pub mod fault;
pub mod lookup;
pub mod paginate;
pub mod query;
pub mod rate_limit;
pub mod source;
pub mod types;

pub use error::SourceError;
pub use fault::{FaultInjector, FixedRandom, RandomSource, ThreadRandom};
pub use lookup::{find_permit, is_valid_permit_id};
pub use paginate::{paginate, PERMITS_PATH};
pub use query::PermitQuery;
pub use rate_limit::{Admission, Clock, ManualClock, RateLimiter, SystemClock};
pub use source::{InMemoryPermitSource, JsonFilePermitSource, PermitSource};
pub use types::{
    Document, ErrorCode, ErrorResponse, FieldError, PageLinks, PageMeta, PaginatedResponse,
    Permit, PermitStatus, PropertyAddress, SimplifiedPermit,
};
