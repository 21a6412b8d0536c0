// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Data model: coordinates, maps and the annotation session.

pub mod coordinate;
pub mod map;
pub mod session;
