// Start of file: /src/middlewares/mod.rs

/*
    * Middleware module entry file. Re-exports our custom middlewares:
    * - problem_details
*/

pub mod problem_details;

pub use problem_details::{problem_details_middleware, process, Outcome};

// End of file: /src/middlewares/mod.rs
