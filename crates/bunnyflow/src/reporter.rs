//! Console output for a running deployment

use bunnyflow_cloud::{ActionType, DeployReporter, ProvisionStep, StepOutcome, SyncStage};
use bunnyflow_core::{ResourceIdentity, SyncSummary};
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};
use std::sync::Mutex;

/// Colored step lines plus a progress bar per sync stage
#[derive(Default)]
pub struct ConsoleReporter {
    progress: Mutex<Option<ProgressBar>>,
}

impl ConsoleReporter {
    pub fn new() -> Self {
        Self::default()
    }

    fn with_progress(&self, f: impl FnOnce(&ProgressBar)) {
        if let Ok(guard) = self.progress.lock()
            && let Some(bar) = guard.as_ref()
        {
            f(bar);
        }
    }
}

fn action_label(action: ActionType) -> colored::ColoredString {
    match action {
        ActionType::Create => "created".green(),
        ActionType::Update => "updated".yellow(),
        ActionType::NoOp => "unchanged".dimmed(),
    }
}

impl DeployReporter for ConsoleReporter {
    fn identity_resolved(&self, identity: &ResourceIdentity) {
        println!(
            "  Target:  {} (zone {})",
            identity.deployment_name.cyan().bold(),
            identity.resource_name.cyan()
        );
        println!();
    }

    fn step_finished(&self, outcome: &StepOutcome) {
        println!(
            "{} {:<16} {} {}",
            format!("[{}/{}]", outcome.step.number(), ProvisionStep::ALL.len()).dimmed(),
            outcome.step.to_string().bold(),
            action_label(outcome.action),
            outcome.message
        );
    }

    fn sync_planned(&self, summary: &SyncSummary) {
        println!("      {}", summary.to_string().dimmed());
    }

    fn stage_started(&self, stage: SyncStage, files: usize) {
        let bar = ProgressBar::new(files as u64);
        if let Ok(style) =
            ProgressStyle::with_template("      {msg:<8} [{bar:30.cyan/blue}] {pos}/{len}")
        {
            bar.set_style(style.progress_chars("=> "));
        }
        bar.set_message(stage.to_string());

        if let Ok(mut guard) = self.progress.lock() {
            *guard = Some(bar);
        }
    }

    fn file_done(&self, _stage: SyncStage, _relative_path: &str) {
        self.with_progress(|bar| bar.inc(1));
    }

    fn stage_finished(&self, stage: SyncStage) {
        self.with_progress(|bar| bar.finish_with_message(format!("{} ✓", stage)));
        if let Ok(mut guard) = self.progress.lock() {
            guard.take();
        }
    }
}
