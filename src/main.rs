use std::{path::PathBuf, process::ExitCode};

use colored::*;
use mini_fdisk::{
    config::Config,
    logger,
    shell::{
        command::Session,
        script::run_script,
        start_shell,
    },
};

fn main() -> ExitCode {
    let config = Config::from_env();
    logger::init(config.log_level);

    // mini-fdisk <script>：执行脚本后退出
    match std::env::args_os().nth(1).map(PathBuf::from) {
        Some(script) => {
            let mut session = Session::new(config);
            match run_script(&script, &mut session) {
                Ok(summary) if summary.failed == 0 => ExitCode::SUCCESS,
                Ok(_) => ExitCode::FAILURE,
                Err(e) => {
                    eprintln!("{} {}", "❌ Error:".red().bold(), e);
                    ExitCode::FAILURE
                }
            }
        }
        None => {
            start_shell(config);
            ExitCode::SUCCESS
        }
    }
}
