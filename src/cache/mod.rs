// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! In-memory caching layer.

pub mod query;

pub use query::{KeyPart, QueryCache, QueryKey, QueryPolicy};
