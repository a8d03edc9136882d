//! CLI progress display utilities
//!
//! Step lines with emoji markers and a progress bar driven by
//! [`AtlasProgress`] callbacks.

use std::time::Duration;

use console::{Emoji, style};
use indicatif::{HumanDuration, ProgressBar, ProgressStyle};

use crate::ops::AtlasProgress;

/// Magnifying glass - for reading/scanning operations
pub static LOOKING_GLASS: Emoji<'_, '_> = Emoji("🔍 ", "");
/// Package - for export operations
pub static PACKAGE: Emoji<'_, '_> = Emoji("📦 ", "");
/// Floppy disk - for writing/saving operations
pub static DISK: Emoji<'_, '_> = Emoji("💾 ", "");
/// Scissors - for cutting sprites out of the atlas
pub static SCISSORS: Emoji<'_, '_> = Emoji("✂️  ", "");
/// Picture - for compositing
pub static PICTURE: Emoji<'_, '_> = Emoji("🖼️  ", "");
/// Sparkles - for completion
pub static SPARKLE: Emoji<'_, '_> = Emoji("✨ ", "");

/// Print a step indicator: `[1/3] 📦 Message...`
pub fn print_step(current: usize, total: usize, emoji: Emoji, msg: &str) {
    let counter = style(format!("[{current}/{total}]")).bold().dim();
    println!("{counter} {emoji}{msg}");
}

/// Print completion message: `✨ Done in 2s`
pub fn print_done(elapsed: Duration) {
    println!("{SPARKLE} Done in {}", HumanDuration(elapsed));
}

/// Progress bar style for determinate progress
///
/// Format: `Extracting sprites [████████░░░░░░░░] 50/100 walk_3`
///
/// # Panics
/// Panics if the template string is invalid (this is a compile-time constant).
#[must_use]
pub fn bar_style() -> ProgressStyle {
    ProgressStyle::default_bar()
        .template("{prefix} [{bar:40.cyan/blue}] {pos}/{len} {wide_msg}")
        .expect("valid template")
}

/// Create a progress bar, hidden when `quiet` is set
#[must_use]
pub fn atlas_bar(quiet: bool) -> ProgressBar {
    if quiet {
        return ProgressBar::hidden();
    }
    let pb = ProgressBar::new(0);
    pb.set_style(bar_style());
    pb
}

/// Mirror an [`AtlasProgress`] update onto a progress bar
pub fn update_bar(pb: &ProgressBar, progress: &AtlasProgress) {
    pb.set_prefix(progress.phase.as_str());
    pb.set_length(progress.total as u64);
    pb.set_position(progress.current as u64);
    pb.set_message(progress.current_item.clone().unwrap_or_default());
}
