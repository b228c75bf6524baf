pub mod command;
pub mod parse;
pub mod script;

use crate::{
    config::{Config, HISTORY_FILE, HISTORY_SIZE},
    shell::{
        command::{execute_command, Flow, Session},
        parse::parse_command,
    },
};
use colored::*;
use crossterm::{
    cursor, execute,
    style::{Color, Print, ResetColor, SetForegroundColor},
    terminal::{Clear, ClearType},
};
use log::warn;
use reedline::{
    DefaultCompleter, DefaultPrompt, DefaultPromptSegment, FileBackedHistory, Reedline, Signal,
};
use std::{io::stdout, path::PathBuf};

const COMMANDS: [&str; 7] = ["MKDISK", "FDISK", "REP", "EXECUTE", "CLEAR", "HELP", "EXIT"];

pub fn start_shell(config: Config) {
    banner();

    let username = whoami::username();
    let hostname = whoami::fallible::hostname().unwrap_or_else(|_| "localhost".to_string());
    let mut session = Session::new(config);

    let state = if session.disk.exists() {
        "".normal()
    } else {
        "(not created yet, run MKDISK)".yellow()
    };
    println!(
        "{} {} {}",
        "Active disk:".bright_black(),
        session.disk.path().display().to_string().cyan(),
        state
    );
    println!(
        "{}",
        "Type 'HELP' for available commands, 'EXECUTE ->path=<file>' to run a script.\n"
            .bright_black()
    );

    let mut line_editor = Reedline::create();

    // 历史记录保存在用户目录
    let history_path = dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(HISTORY_FILE);
    match FileBackedHistory::with_file(HISTORY_SIZE, history_path) {
        Ok(history) => line_editor = line_editor.with_history(Box::new(history)),
        Err(e) => warn!("command history disabled: {}", e),
    }

    // 命令补全
    let words: Vec<String> = COMMANDS.iter().map(|c| c.to_string()).collect();
    let completer = DefaultCompleter::new_with_wordlen(words, 2);
    line_editor = line_editor.with_completer(Box::new(completer));

    loop {
        let prompt = DefaultPrompt::new(
            DefaultPromptSegment::Basic(format!("{}@{}", username, hostname)),
            DefaultPromptSegment::Basic("mini-fdisk".to_string()),
        );

        match line_editor.read_line(&prompt) {
            Ok(Signal::Success(buffer)) => {
                let command = match parse_command(&buffer) {
                    Ok(Some(command)) => command,
                    Ok(None) => continue,
                    Err(e) => {
                        println!("{} {}", "❌ Error:".red().bold(), e);
                        continue;
                    }
                };

                match execute_command(&command, &mut session) {
                    Ok(Flow::Exit) => break,
                    Ok(Flow::Continue) => {}
                    Err(e) => println!("{} {}", "❌ Error:".red().bold(), e),
                }
            }
            Ok(Signal::CtrlC) => {
                println!();
                continue;
            }
            Ok(Signal::CtrlD) => {
                println!("{}", "Exiting mini-fdisk...".yellow());
                break;
            }
            #[allow(unreachable_patterns)]
            Ok(_) => continue,
            Err(e) => {
                println!("Error reading line: {}", e);
                break;
            }
        }
    }

    println!("{}", "GoodBye!".bright_yellow());
}

/// Clears the console and prints the title.
fn banner() {
    let mut stdout = stdout();
    let _ = execute!(
        stdout,
        Clear(ClearType::All),
        cursor::MoveTo(0, 0),
        SetForegroundColor(Color::Cyan),
        Print(format!("mini-fdisk v{}\n", env!("CARGO_PKG_VERSION"))),
        ResetColor
    );
    println!("{}", "=".repeat(60).bright_black());
    println!("{}", "MBR disk image partitioner".bright_yellow().bold());
    println!("{}", "=".repeat(60).bright_black());
}
