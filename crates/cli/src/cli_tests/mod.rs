// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

// CLI parsing tests, split by command.

use super::*;

mod init_tests;
mod new_tests;
mod sync_tests;
