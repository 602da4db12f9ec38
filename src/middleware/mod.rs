// ABOUTME: HTTP middleware layers shared across the API router
// ABOUTME: CORS configuration for browser clients
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Athletica

pub mod cors;

pub use cors::setup_cors;
