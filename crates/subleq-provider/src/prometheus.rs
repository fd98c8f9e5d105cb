//! Prometheus text exposition format.
//!
//! Renders per-application program state for scraping, so the progress of
//! each program can be followed alongside the replica counts it drives.

use std::fmt::Write;

use crate::store::AppSnapshot;
use crate::translate::desired_pods;

/// Render application snapshots into Prometheus text format.
///
/// Produces GAUGE and COUNTER metrics with `app` labels.
pub fn render_prometheus(snapshots: &[AppSnapshot]) -> String {
    let mut out = String::new();

    family(
        &mut out,
        "subleq_program_steps_total",
        "Instructions executed by the application's program.",
        "counter",
        snapshots,
        |s| s.step.to_string(),
    );
    family(
        &mut out,
        "subleq_program_last_output",
        "Output of the most recent instruction (-1 once halted).",
        "gauge",
        snapshots,
        |s| s.last_output.to_string(),
    );
    family(
        &mut out,
        "subleq_program_halted",
        "1 if the program has halted, 0 otherwise.",
        "gauge",
        snapshots,
        |s| u8::from(s.halted).to_string(),
    );
    family(
        &mut out,
        "subleq_desired_pods",
        "Pod count requested by the most recent output.",
        "gauge",
        snapshots,
        |s| desired_pods(s.last_output).to_string(),
    );
    family(
        &mut out,
        "subleq_current_pods",
        "Pods matching the application at the last poll.",
        "gauge",
        snapshots,
        |s| s.current_pods.to_string(),
    );

    out
}

fn family(
    out: &mut String,
    name: &str,
    help: &str,
    kind: &str,
    snapshots: &[AppSnapshot],
    value: impl Fn(&AppSnapshot) -> String,
) {
    let _ = writeln!(out, "# HELP {name} {help}");
    let _ = writeln!(out, "# TYPE {name} {kind}");
    for s in snapshots {
        let _ = writeln!(out, "{name}{{app=\"{}\"}} {}", escape_label(&s.app), value(s));
    }
}

fn escape_label(value: &str) -> String {
    value
        .replace('\\', "\\\\")
        .replace('"', "\\\"")
        .replace('\n', "\\n")
}
