use std::collections::HashMap;
use std::time::Duration;

use console::style;
use indicatif::{MultiProgress, ProgressBar, ProgressStyle};

use crate::harness::HarnessEvent;
use crate::utils::formatting::{format_duration, format_percent};

/// Manages indicatif progress bars while agents run.
pub struct RunProgress {
    multi: MultiProgress,
    run_bar: Option<ProgressBar>,
    agent_bars: HashMap<String, ProgressBar>,
}

impl RunProgress {
    pub fn new() -> Self {
        Self {
            multi: MultiProgress::new(),
            run_bar: None,
            agent_bars: HashMap::new(),
        }
    }

    /// Handle a harness event and update progress bars accordingly.
    pub fn handle_event(&mut self, event: &HarnessEvent) {
        match event {
            HarnessEvent::RunStarted { codebase, known_bugs, agents } => {
                let bar = self.multi.add(ProgressBar::new(*agents as u64));
                bar.set_style(
                    ProgressStyle::default_bar()
                        .template("  {bar:30.cyan/dark_gray} {pos}/{len} agents | {msg}")
                        .expect("valid progress template")
                        .progress_chars("█▓░")
                );
                bar.set_message(format!("{} ({} known bugs)", codebase, known_bugs));
                self.run_bar = Some(bar);
            }
            HarnessEvent::AgentStarted { framework } => {
                let bar = self.multi.add(ProgressBar::new_spinner());
                bar.set_style(
                    ProgressStyle::default_spinner()
                        .template("    {spinner:.yellow} {msg}")
                        .expect("valid spinner template")
                );
                bar.set_message(framework.clone());
                bar.enable_steady_tick(Duration::from_millis(100));
                self.agent_bars.insert(framework.clone(), bar);
            }
            HarnessEvent::AgentRetrying { framework, attempt } => {
                if let Some(bar) = self.agent_bars.get(framework) {
                    bar.set_message(format!("{} (attempt {})", framework, attempt));
                }
            }
            HarnessEvent::AgentCompleted { framework, duration_ms } => {
                self.finish_agent(framework);
                self.println(&format!(
                    "  {} {} answered in {}",
                    style("✓").green(), framework, format_duration(*duration_ms)
                ));
            }
            HarnessEvent::AgentFailed { framework, error } => {
                self.finish_agent(framework);
                self.println(&format!("  {} {}: {}", style("✗").red(), framework, error));
            }
            HarnessEvent::AgentScored { framework, unique_bugs_found, total_known_bugs, recall } => {
                self.println(&format!(
                    "  {} {}: {} / {} bugs ({})",
                    style("•").cyan(), framework, unique_bugs_found, total_known_bugs, format_percent(*recall)
                ));
            }
            HarnessEvent::RunCompleted { frameworks, duration_ms } => {
                for (_, bar) in self.agent_bars.drain() {
                    bar.finish_and_clear();
                }
                if let Some(bar) = self.run_bar.take() {
                    bar.finish_with_message(format!(
                        "{} frameworks scored in {}",
                        frameworks,
                        format_duration(*duration_ms)
                    ));
                }
            }
        }
    }

    fn finish_agent(&mut self, framework: &str) {
        if let Some(bar) = self.agent_bars.remove(framework) {
            bar.finish_and_clear();
        }
        if let Some(bar) = &self.run_bar {
            bar.inc(1);
        }
    }

    /// Print a line through the multi-progress (won't interfere with bars).
    pub fn println(&self, msg: &str) {
        let _ = self.multi.println(msg);
    }
}

impl Default for RunProgress {
    fn default() -> Self {
        Self::new()
    }
}
