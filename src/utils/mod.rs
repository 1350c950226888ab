// Start of file: /src/utils/mod.rs

/*
    * Re-exports for all utility modules like error handling,
    * response formats, password hashing, shared utilities, etc.
*/

pub mod error_handler;
pub mod json;
pub mod password;
pub mod response_handler;

// End of file: /src/utils/mod.rs
