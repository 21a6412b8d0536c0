// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Coordinate text parsing.
//!
//! [`format`] is the strict parser for typed input, [`tagged`] the lenient
//! extractor for OCR output.

pub mod format;
pub mod tagged;
