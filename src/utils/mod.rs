//! Utility functions
//!
//! Pure functions for form validation and display formatting, called by the
//! login, signup and feed views.

pub mod formatting;
pub mod validation;
