// Start of file: /src/features/not_found/mod.rs

pub mod handler;

// End of file: /src/features/not_found/mod.rs
