// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Strava-Calendar-Sync: mirror Strava activities onto a calendar
//!
//! This crate provides the token manager and sync engine behind a
//! periodically scheduled job that turns each new Strava activity into
//! exactly one calendar event.

pub mod config;
pub mod db;
pub mod error;
pub mod models;
pub mod services;
pub mod time_utils;
