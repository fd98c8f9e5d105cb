//! `subleqd run` — execute a program locally and show what it would
//! drive the autoscaler to.

use serde::Serialize;

use subleq_provider::desired_pods;

#[derive(Debug, Serialize)]
pub struct RunReport {
    pub memory_len: usize,
    pub steps: u64,
    pub halted: bool,
    pub outputs: Vec<i64>,
    /// Positive outputs decoded as characters.
    pub text: String,
}

pub fn execute(program_text: &str, max_steps: u64) -> RunReport {
    let mut program = subleq_vm::parse(program_text);
    let memory_len = program.memory().len();
    let outputs = program.run(max_steps);

    let text = outputs
        .iter()
        .filter(|&&v| v > 0)
        .filter_map(|&v| u32::try_from(v).ok().and_then(char::from_u32))
        .collect();

    RunReport {
        memory_len,
        steps: program.step(),
        halted: program.is_halted(),
        outputs,
        text,
    }
}

pub fn format_report(report: &RunReport) -> String {
    let mut out = String::new();
    for (i, output) in report.outputs.iter().enumerate() {
        out.push_str(&format!(
            "step {:>6}  output {:>6}  desired pods {:>6}\n",
            i + 1,
            output,
            desired_pods(*output)
        ));
    }
    let status = if report.halted { "halted" } else { "still running" };
    out.push_str(&format!(
        "{} after {} steps ({} memory cells)\n",
        status, report.steps, report.memory_len
    ));
    out.push_str(&format!("text: {:?}\n", report.text));
    out
}

pub fn run(program_text: &str, max_steps: u64, format: &str) -> anyhow::Result<()> {
    let report = execute(program_text, max_steps);
    match format {
        "json" => println!("{}", serde_json::to_string_pretty(&report)?),
        "text" => print!("{}", format_report(&report)),
        other => anyhow::bail!("unknown output format: {other} (expected text or json)"),
    }
    Ok(())
}
