// Copyright (c) EventEye Team
// SPDX-License-Identifier: Apache-2.0

pub mod auth;
pub mod events;
pub mod health;
pub mod interests;
pub mod messages;
pub mod profiles;
