//! Developer pool allocation: ranks candidates against a job requirement,
//! drives the interactive pool browser, and submits bulk proposals.

pub mod config;
pub mod error;
pub mod telemetry;
pub mod workflows;
