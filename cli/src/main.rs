//! adk CLI — the command-line entry point for agentdeck.
//!
//! # Usage
//!
//! ```text
//! adk status
//! adk watch
//! adk approve work:1 2
//! adk approve-all
//! ```

use std::process;

use agentdeck_core::cli::parse_args;
use agentdeck_core::command::Command;
use agentdeck_core::data::settings::load_or_default;
use agentdeck_core::dispatch::Approval;
use agentdeck_core::help::help_text;
use agentdeck_core::infrastructure::{Multiplexer, ShellRunner, TmuxMultiplexer};
use agentdeck_core::monitor::{PollBatch, Supervisor};
use agentdeck_core::types::health::HealthRecord;

fn main() {
    let args: Vec<String> = std::env::args().collect();
    let arg_refs: Vec<&str> = args[1..].iter().map(|s| s.as_str()).collect();

    let cmd = match parse_args(&arg_refs) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("adk: {}", e);
            process::exit(1);
        }
    };

    if let Err(e) = run(cmd) {
        eprintln!("adk: {}", e);
        process::exit(1);
    }
}

fn run(cmd: Command) -> Result<(), String> {
    let settings = load_or_default();

    match cmd {
        Command::Help { topic } => {
            print!("{}", help_text(topic.as_deref()));
            Ok(())
        }
        Command::Sessions => {
            let mux = TmuxMultiplexer::new(ShellRunner);
            for session in mux.list_sessions()? {
                if !session.starts_with(&settings.session_prefix) {
                    continue;
                }
                println!("{}", session);
                for w in mux.list_windows(&session)? {
                    println!("  {}: {} ({} pane{})", w.index, w.name, w.pane_count,
                        if w.pane_count == 1 { "" } else { "s" });
                }
            }
            Ok(())
        }
        Command::Status { format } => {
            let mut sup = supervisor(settings);
            let batch = sup.poll()?;
            if format.as_deref() == Some("json") {
                let json = serde_json::to_string_pretty(&batch.records)
                    .map_err(|e| format!("Failed to serialize records: {}", e))?;
                println!("{}", json);
            } else {
                print_table(&batch.records);
            }
            Ok(())
        }
        Command::Monitor => {
            let mut sup = supervisor(settings);
            sup.run(print_transitions)
        }
        Command::Watch => {
            let mut tui = adk_tui::tui::Tui::new(supervisor(settings))?;
            tui.run()
        }
        Command::Approve {
            target,
            option,
            text,
        } => {
            let mut sup = supervisor(settings);
            let batch = sup.poll()?;
            let approval = match (option, text) {
                (Some(n), None) => Approval::Option(n - 1),
                (None, Some(t)) => Approval::Text(t),
                (None, None) => default_approval(&batch.records, &target)?,
                (Some(_), Some(_)) => {
                    return Err("Pass either an option number or --text, not both".into())
                }
            };
            let done = sup.approve(&target, &approval)?;
            println!("sent '{}' to {}", done.sent, done.target.key());
            Ok(())
        }
        Command::ApproveAll => {
            let mut sup = supervisor(settings);
            sup.poll()?;
            let outcome = sup.approve_all();
            for done in &outcome.approved {
                println!("approved {} (sent '{}')", done.target.key(), done.sent);
            }
            for (target, reason) in &outcome.skipped {
                println!("skipped {} ({})", target.key(), reason);
            }
            if outcome.approved.is_empty() && outcome.skipped.is_empty() {
                println!("nothing waiting");
            }
            Ok(())
        }
    }
}

fn supervisor(settings: agentdeck_core::types::config::Settings) -> Supervisor {
    Supervisor::new(Box::new(TmuxMultiplexer::new(ShellRunner)), settings)
}

/// With no option given, accept whatever the prompt has selected, or a
/// bare "y" when the target waits without a numbered menu.
fn default_approval(records: &[HealthRecord], target: &str) -> Result<Approval, String> {
    let record = records
        .iter()
        .find(|r| r.target.key() == target)
        .ok_or_else(|| format!("target '{}' was not seen in the last poll", target))?;
    Ok(match &record.prompt {
        Some(prompt) => Approval::Option(prompt.selected_index),
        None => Approval::Text("y".into()),
    })
}

fn print_table(records: &[HealthRecord]) {
    if records.is_empty() {
        println!("no monitored targets");
        return;
    }
    for r in records {
        let warn = if r.warnings.is_empty() {
            String::new()
        } else {
            format!("  [{}]", r.warnings.join("; "))
        };
        println!(
            "{} {:<20} {:<8} {:>4}s  {}{}",
            r.health.icon(),
            r.target.key(),
            r.health.label(),
            r.last_output_age,
            r.summary,
            warn
        );
    }
}

fn print_transitions(batch: &PollBatch) {
    for e in &batch.events {
        println!(
            "{} {} {} -> {}  {}",
            e.new_health.icon(),
            e.target.key(),
            e.previous_health.label(),
            e.new_health.label(),
            e.summary
        );
    }
}
