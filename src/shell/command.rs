use std::{io::stdout, path::PathBuf, time::Duration};

use colored::*;
use crossterm::{
    cursor, execute,
    terminal::{Clear, ClearType},
};
use indicatif::{ProgressBar, ProgressStyle};
use log::warn;

use crate::{
    config::Config,
    disk::{create_disk, DiskImage, MbrDevice, SizeUnit},
    error::Result,
    partition::{fdisk, PartitionRequest},
    report::{self, format_table, Rendered},
    shell::script::run_script,
    utils::human_size,
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MkdiskParams {
    pub size: i64,
    pub unit: SizeUnit,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FdiskParams {
    pub size: i64,
    pub unit: SizeUnit,
    pub letter: char,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Help,
    Clear,
    Execute(PathBuf),
    Mkdisk(MkdiskParams),
    Fdisk(FdiskParams),
    Rep,
    Exit,
}

impl Command {
    /// Commands honored inside a script.
    pub fn allowed_in_script(&self) -> bool {
        matches!(self, Command::Mkdisk(_) | Command::Fdisk(_) | Command::Rep)
    }
}

/// State shared by every command of one run: the active disk and settings.
#[derive(Debug, Clone)]
pub struct Session {
    pub disk: DiskImage,
    pub config: Config,
    /// Suppresses spinners and console clearing (scripts, tests).
    pub quiet: bool,
}

impl Session {
    pub fn new(config: Config) -> Self {
        Self {
            disk: DiskImage::new(config.disk_path.clone()),
            config,
            quiet: false,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Exit,
}

pub fn execute_command(cmd: &Command, session: &mut Session) -> Result<Flow> {
    match cmd {
        Command::Help => print_help(),
        Command::Clear => {
            execute!(stdout(), Clear(ClearType::All), cursor::MoveTo(0, 0))?;
        }
        Command::Execute(path) => {
            let summary = run_script(path, session)?;
            println!(
                "{} {} ok, {} failed, {} skipped",
                "📜 Script finished:".bright_cyan(),
                summary.succeeded.to_string().green(),
                summary.failed.to_string().red(),
                summary.skipped.to_string().yellow()
            );
        }
        Command::Mkdisk(params) => {
            let mbr = create_disk(&session.disk, params.size, params.unit)?;
            println!(
                "💾 Disk {} created: {} bytes ({}), image file is {} bytes",
                session.disk.path().display().to_string().cyan(),
                mbr.total_size,
                human_size(mbr.total_size),
                session.disk.file_len()?
            );
        }
        Command::Fdisk(params) => {
            let request =
                PartitionRequest::new(params.size, params.unit, params.letter, params.name.clone());
            let (slot, entry) = fdisk(&session.disk, &request)?;
            println!(
                "✅ Partition {} created in slot {} (start {}, {} bytes)",
                entry.name().green(),
                slot + 1,
                entry.start,
                entry.size
            );
        }
        Command::Rep => rep(session)?,
        Command::Exit => println!("{}", "👋 Exiting mini-fdisk...".yellow().bold()),
    }

    Ok(match cmd {
        Command::Exit => Flow::Exit,
        _ => Flow::Continue,
    })
}

fn rep(session: &Session) -> Result<()> {
    let spinner = if session.quiet {
        ProgressBar::hidden()
    } else {
        let pb = ProgressBar::new_spinner();
        if let Ok(style) = ProgressStyle::with_template("{spinner:.cyan} {msg}") {
            pb.set_style(style);
        }
        pb.enable_steady_tick(Duration::from_millis(80));
        pb
    };
    spinner.set_message("Rendering disk report...");

    let outcome = report::generate_report(&session.disk, &session.config);
    spinner.finish_and_clear();

    match outcome? {
        Rendered::Image(image) => {
            println!("📊 Report written to {}", image.display().to_string().cyan());
            if session.config.open_report && !session.quiet {
                println!("Opening report...");
                if let Err(e) = report::render::open_report(&image) {
                    warn!("{}", e);
                }
            }
        }
        Rendered::SourceOnly(dot) => {
            println!(
                "{} {}",
                "⚠️  Graphviz not available, DOT source kept at".yellow(),
                dot.display()
            );
            print!("{}", format_table(&session.disk.read_mbr()?));
        }
    }
    Ok(())
}

fn print_help() {
    println!("{}", "📘 mini-fdisk Commands".bright_cyan().bold());
    println!(
        "{}",
        "
  MKDISK ->size=N [->unit=K|M]                     Create the disk image (default unit M)
  FDISK ->size=N [->unit=B|K|M] ->letter=X ->name=NAME
                                                   Add a primary partition (default unit K)
  REP                                              Render the partition diagram
  EXECUTE ->path=FILE                              Run a script of MKDISK/FDISK/REP lines
  CLEAR                                            Clear the console
  HELP                                             Show this help message
  EXIT                                             Quit the shell
"
        .bright_black()
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::DiskError;

    fn session_in(dir: &tempfile::TempDir) -> Session {
        let config = Config {
            disk_path: dir.path().join("disk.dsk"),
            report_dir: dir.path().to_path_buf(),
            open_report: false,
            graphviz_bin: "mini-fdisk-missing-graphviz".to_string(),
            ..Config::default()
        };
        let mut session = Session::new(config);
        session.quiet = true;
        session
    }

    #[test]
    fn mkdisk_then_fdisk_updates_the_image() {
        let dir = tempfile::tempdir().unwrap();
        let mut session = session_in(&dir);

        let mkdisk = Command::Mkdisk(MkdiskParams {
            size: 1,
            unit: SizeUnit::Megabytes,
        });
        assert_eq!(execute_command(&mkdisk, &mut session).unwrap(), Flow::Continue);
        assert!(session.disk.exists());
        assert_eq!(session.disk.file_len().unwrap(), 1024 * 1024);

        let fdisk = Command::Fdisk(FdiskParams {
            size: 64,
            unit: SizeUnit::Kilobytes,
            letter: 'A',
            name: "data".to_string(),
        });
        execute_command(&fdisk, &mut session).unwrap();

        let mbr = session.disk.read_mbr().unwrap();
        assert_eq!(mbr.partitions[0].name(), "data");
        assert_eq!(mbr.partitions[0].size, 64 * 1024);
        assert!(matches!(
            execute_command(&fdisk, &mut session),
            Err(DiskError::DuplicateName(_))
        ));
    }

    #[test]
    fn fdisk_without_disk_is_an_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let mut session = session_in(&dir);
        let fdisk = Command::Fdisk(FdiskParams {
            size: 1,
            unit: SizeUnit::Bytes,
            letter: 'A',
            name: "x".to_string(),
        });
        assert!(matches!(
            execute_command(&fdisk, &mut session),
            Err(DiskError::Io(_))
        ));
    }

    #[test]
    fn exit_stops_the_loop() {
        let dir = tempfile::tempdir().unwrap();
        let mut session = session_in(&dir);
        assert_eq!(execute_command(&Command::Exit, &mut session).unwrap(), Flow::Exit);
    }

    #[test]
    fn rep_without_graphviz_keeps_dot_source() {
        let dir = tempfile::tempdir().unwrap();
        let mut session = session_in(&dir);
        create_disk(&session.disk, 1, SizeUnit::Kilobytes).unwrap();

        assert_eq!(
            execute_command(&Command::Rep, &mut session).unwrap(),
            Flow::Continue
        );
        let dot = std::fs::read_to_string(session.config.report_dot_path()).unwrap();
        assert!(dot.contains("MBR"));
        assert!(!session.config.report_image_path().exists());
    }

    #[cfg(unix)]
    #[test]
    fn rep_surfaces_graphviz_failures() {
        let dir = tempfile::tempdir().unwrap();
        let mut session = session_in(&dir);
        session.config.graphviz_bin = "false".to_string();
        create_disk(&session.disk, 1, SizeUnit::Kilobytes).unwrap();

        assert!(matches!(
            execute_command(&Command::Rep, &mut session),
            Err(DiskError::Report(_))
        ));
    }
}
