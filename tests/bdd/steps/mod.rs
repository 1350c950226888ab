//! Step definitions for the login feature
//!
//! This module contains all Given/When/Then step implementations.

pub mod given;
pub mod then;
pub mod when;
