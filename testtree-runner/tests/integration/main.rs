// Copyright (c) The nextest Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! End-to-end tests: raw names and result batches in, trees and outcomes out.

mod fixtures;
mod properties;
mod scenarios;
