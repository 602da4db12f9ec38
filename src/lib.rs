// ABOUTME: Main library entry point for the Athletica training-plan platform
// ABOUTME: Survey-driven AI plan generation with dashboard completion tracking
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Athletica

#![deny(unsafe_code)]

//! # Athletica
//!
//! A running training-plan service: a survey captures the athlete's profile
//! and personal records, an AI provider generates a 10-week plan of 70 day
//! descriptors, and the plan is materialized atomically into SQLite. The
//! dashboard tracks per-day completion with optimistic local updates.
//!
//! ## Architecture
//!
//! - **models**: domain types with constructor-level invariant checks
//! - **database**: SQLite managers for profiles, records, plans, and days
//! - **materializer**: single-transaction persistence of a generated plan
//! - **llm**: the `PlanGenerator` trait and the OpenRouter provider
//! - **stats**: derived completion statistics, never persisted
//! - **routes**: REST API over axum with JWT bearer authentication
//! - **client**: UI-agnostic dashboard state machines
//!
//! ## Example Usage
//!
//! ```rust,no_run
//! use athletica::config::ServerConfig;
//! use athletica::errors::AppResult;
//!
//! fn main() -> AppResult<()> {
//!     let config = ServerConfig::from_env()?;
//!     println!("Athletica server configured with port: HTTP={}", config.http_port);
//!     Ok(())
//! }
//! ```

pub mod auth;
pub mod client;
pub mod config;
pub mod database;
pub mod errors;
pub mod llm;
pub mod logging;
pub mod materializer;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod stats;
