// Start of file: /src/features/demo/mod.rs

pub mod handler;
pub mod routes;

// End of file: /src/features/demo/mod.rs
