// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Shared argument structs for CLI commands.

use clap::Args;
use fr_core::{Category, ReportPayload};

use super::non_empty_string;

/// Fields of a new incident report.
#[derive(Args, Clone, Debug)]
pub struct ReportArgs {
    /// Name of the person filing the report
    #[arg(long, short = 'n', value_parser = non_empty_string)]
    pub name: String,

    /// GPS coordinates or a landmark
    #[arg(long, short = 'l', value_parser = non_empty_string)]
    pub location: String,

    /// Incident category (emergency, food, medical, shelter)
    #[arg(long, short = 'c')]
    pub category: Category,

    /// What is happening
    #[arg(long, short = 'd', value_parser = non_empty_string)]
    pub description: String,

    /// The report carries a photo attachment
    #[arg(long, short = 'a')]
    pub attachment: bool,
}

impl ReportArgs {
    pub fn payload(&self) -> ReportPayload {
        ReportPayload::new(
            self.name.trim(),
            self.location.trim(),
            self.category,
            self.description.trim(),
        )
    }
}
