// Copyright (c) EventEye Team
// SPDX-License-Identifier: Apache-2.0

pub mod api;
pub mod auth;
pub mod config;
pub mod db;
pub mod discovery;
pub mod error;
pub mod models;
pub mod schema;
