// Start of file: /src/config/mod.rs

/*
* Configuration: environment variables (server and problem details settings)
* and the shared app state built from them.
*/

pub mod environment;
pub mod state;

// End of file: /src/config/mod.rs
