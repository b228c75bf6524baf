use std::{fs, path::Path};

use colored::*;
use log::warn;

use crate::{
    error::Result,
    shell::{
        command::{execute_command, Session},
        parse::parse_command,
    },
};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ScriptSummary {
    pub succeeded: usize,
    pub failed: usize,
    pub skipped: usize,
}

/// Runs every MKDISK/FDISK/REP line of the script at `path`. A failing line
/// is reported and the script goes on; other commands are skipped.
pub fn run_script(path: &Path, session: &mut Session) -> Result<ScriptSummary> {
    let content = fs::read_to_string(path)?;
    println!("📜 Reading script {}", path.display().to_string().cyan());
    Ok(run_lines(&content, session))
}

pub fn run_lines(content: &str, session: &mut Session) -> ScriptSummary {
    let mut summary = ScriptSummary::default();

    // CRLF -> LF
    let content = content.replace("\r\n", "\n");
    for (number, line) in content.lines().enumerate() {
        let number = number + 1;

        let command = match parse_command(line) {
            Ok(Some(command)) => command,
            Ok(None) => continue,
            Err(e) => {
                println!("{} line {}: {}", "❌ Error:".red().bold(), number, e);
                summary.failed += 1;
                continue;
            }
        };

        if !command.allowed_in_script() {
            warn!("line {}: '{}' is not allowed in scripts, skipped", number, line.trim());
            summary.skipped += 1;
            continue;
        }

        println!("{} {}", format!("[{}]", number).bright_black(), line.trim());
        match execute_command(&command, session) {
            Ok(_) => summary.succeeded += 1,
            Err(e) => {
                println!("{} line {}: {}", "❌ Error:".red().bold(), number, e);
                summary.failed += 1;
            }
        }
    }

    summary
}
