// Copyright 2026 Pagemirror Contributors
// SPDX-License-Identifier: Apache-2.0

//! Pagemirror library — capture a rendered web page and its static assets
//! into a local offline mirror.
//!
//! The pipeline is strictly sequential: the [`renderer`] drives a headless
//! Chromium to network quiescence and yields the serialized DOM plus the
//! asset references it found; the [`capture`] engine then writes the root
//! document and fetches each asset through a session-aware HTTP client.
//! The optional [`deploy`] step uploads the resulting directory to Vercel.

pub mod capture;
pub mod cli;
pub mod deploy;
pub mod error;
pub mod events;
pub mod fetch;
pub mod renderer;
