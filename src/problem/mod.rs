// Start of file: /src/problem/mod.rs

/*
* RFC 7807 problem details: payload model, failures, content negotiation,
* JSON / XML encoding and the response builder.
*/

pub mod builder;
pub mod details;
pub mod failure;
pub mod json;
pub mod negotiation;
pub mod status;
pub mod xml;

pub use builder::{BodyFactory, ProblemError, ProblemResponseBuilder, DEFAULT_DETAIL_MESSAGE};
pub use details::{Problem, ProblemDetails, CORE_MEMBERS};
pub use failure::{Failure, FailureRecord, MISSING_RESPONSE_MESSAGE};
pub use json::JsonFlags;
pub use negotiation::{can_negotiate, negotiate_format, ProblemFormat};

// End of file: /src/problem/mod.rs
