// Start of file: /src/utils/mod.rs

/*
    * Re-exports for utility modules.
*/

pub mod error_handler;

// End of file: /src/utils/mod.rs
