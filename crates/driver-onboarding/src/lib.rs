//! Applicant data validation for the delivery-driver onboarding flow.
//!
//! The [`validation`] module holds the pure field checkers and the coordinator that composes
//! them per registration step. Configuration, telemetry, and the application error type back
//! the HTTP service that embeds the coordinator.

pub mod config;
pub mod error;
pub mod telemetry;
pub mod validation;
