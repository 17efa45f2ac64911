// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use yare::parameterized;

#[parameterized(
    quiet = { 0, "warn" },
    info = { 1, "info" },
    debug = { 2, "debug" },
    trace = { 3, "trace" },
    saturates = { 9, "trace" },
)]
fn verbosity_levels(verbosity: u8, expected: &str) {
    assert_eq!(default_directive(verbosity), expected);
}

#[test]
fn init_twice_is_harmless() {
    init(0);
    init(2);
}
