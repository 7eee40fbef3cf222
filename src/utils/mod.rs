// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 vessel contributors

//! Utility modules
//!
//! Common utilities for the vessel CLI.

pub mod colors;

pub use colors::*;
