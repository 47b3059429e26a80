//! Per-identity report rendering
//!
//! The report block goes through the `report` tracing target, which the
//! terminal formatter passes through verbatim so the colorized lines render
//! as a clean console block.

use crate::campaign::{Activity, CheckinStatus};
use crate::titles::localized_title;
use colored::Colorize;
use core_logic::{format_countdown, short_address};
use std::io::Write;
use tracing::info;

const RULE: &str =
    "===========================================================================";
const SECTION_RULE: &str =
    "--------------------------------------------------------------------------";

pub fn print_header(
    display_name: &str,
    address: &str,
    points: u64,
    checkin: CheckinStatus,
    proxy: Option<&str>,
) {
    info!(target: "report", "{}", RULE.magenta());
    info!(target: "report", "{}", "                              Account".bright_blue().bold());
    info!(target: "report", "{}", RULE.magenta());
    info!(target: "report", "{}", format!("User          : {}", display_name).bright_cyan());
    info!(target: "report", "{}", format!("Wallet        : {}", short_address(address)).bright_cyan());
    info!(target: "report", "{}", format!("Points        : {}", points).bright_cyan());
    info!(target: "report", "{}", format!("Daily check-in: {}", checkin).bright_cyan());
    info!(target: "report", "{}", format!("Proxy         : {}", proxy.unwrap_or("none")).bright_cyan());
    info!(target: "report", "{}", RULE.magenta());
}

pub fn print_claimed(tasks: &[Activity]) {
    info!(target: "report", "{}", "\n------------------------------ completed tasks ------------------------------\n".magenta());
    if tasks.is_empty() {
        info!(target: "report", "{}", "(none)".red());
    } else {
        for task in tasks {
            info!(target: "report", "{}", format!("[done] {}", localized_title(task.title_str())).green());
        }
    }
    info!(target: "report", "{}", SECTION_RULE.magenta());
}

pub fn print_unclaimed_open() {
    info!(target: "report", "{}", "\n----------------------------- incomplete tasks ------------------------------\n".magenta());
}

pub fn print_no_unclaimed() {
    info!(target: "report", "{}", "(none)".red());
}

pub fn print_task_result(title: &str, done: bool) {
    if done {
        info!(target: "report", "{}", format!("[done] {}", localized_title(title)).green());
    } else {
        info!(target: "report", "{}", format!("[not done] {}", localized_title(title)).red());
    }
}

pub fn print_section_close() {
    info!(target: "report", "{}", SECTION_RULE.magenta());
}

/// Redraws the inter-cycle countdown on the current console line.
pub fn render_countdown(remaining_ms: u64) {
    print!(
        "\r{}",
        format!("Next cycle in {} ...", format_countdown(remaining_ms)).yellow()
    );
    std::io::stdout().flush().ok();
}

/// Ends the countdown line before normal logging resumes.
pub fn finish_countdown() {
    println!();
}
