// SPDX-FileCopyrightText: Copyright © 2020-2025 Serpent OS Developers
//
// SPDX-License-Identifier: MPL-2.0

//! Keeps a CMake file listing and header stubs in sync with a source tree
//!
//! [`manifest`] renders a `SOURCES`/`HEADERS` fragment from the source and
//! header roots, while [`stub`] creates a one-line implementation file for
//! every header that lacks one.

pub use self::config::Config;

pub mod config;
pub mod manifest;
pub mod path;
pub mod stub;
pub mod walk;
