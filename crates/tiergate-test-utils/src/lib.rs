// SPDX-FileCopyrightText: 2026 Tiergate Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Test utilities for tiergate integration tests.
//!
//! Provides a scripted HTTP caller and a harness that assembles a full router
//! without network access.
//!
//! # Components
//!
//! - [`MockHttpCaller`] - HTTP caller replaying queued replies and recording requests
//! - [`TestHarness`] - Router, session store, and mock caller wired together

pub mod harness;
pub mod mock_http;

pub use harness::{TestHarness, TestHarnessBuilder};
pub use mock_http::{MockHttpCaller, chat_completion};
