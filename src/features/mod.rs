// Start of file: /src/features/mod.rs

/*
    * Feature modules. Each one owns its handlers and the routes that expose them.
*/

pub mod demo;
pub mod not_found;

// End of file: /src/features/mod.rs
