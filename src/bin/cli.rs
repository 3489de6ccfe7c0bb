#![cfg(not(tarpaulin_include))]

use attendance::config::Config;
use attendance::console::{Command, Input, parse_line};
use attendance::downloader::{EXPORT_FILE_NAME, save_xlsx, to_csv};
use attendance::notification::{NotificationCenter, Severity};
use attendance::session::{Outcome, ScanSession};
use std::env;
use std::fs;
use std::io::{self, BufRead, Write};
use std::time::Instant;

// Terminal front end for keyboard-wedge scanners: the scanner "types" the
// decoded text followed by Enter. See `attendance::console` for dispatch.
fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let config = Config::from_args(env::args().skip(1));
    let mut session = ScanSession::with_notifications(NotificationCenter::new(
        config.notification_timeout,
        config.expiry,
    ));

    print_help();
    let stdin = io::stdin();
    let mut lines = stdin.lock().lines();

    loop {
        session.notifications_mut().fire_due(Instant::now());

        let status = if session.is_scanning() { "scanning" } else { "stopped" };
        print!("({}, {} recorded) > ", status, session.len());
        io::stdout().flush()?;

        let Some(line) = lines.next() else {
            break;
        };
        let line = line?;
        let line = line.trim_end_matches(['\r', '\n']);

        match parse_line(line, session.is_scanning()) {
            Input::Scan(text) => {
                if session.submit_scan(text) != Outcome::Ignored {
                    let banner = session.notifications().current();
                    let tag = match banner.severity {
                        Some(Severity::Error) => "!!",
                        _ => "ok",
                    };
                    println!("[{}] {}", tag, banner.message);
                }
            }
            Input::StopScanning => session.stop_scanning(),
            Input::NotScanning => println!("scanner is stopped, type `:start` first"),
            Input::Blank => {}
            Input::Command(Command::Quit) => break,
            Input::Command(Command::Help) => print_help(),
            Input::Command(Command::Start) => session.start_scanning(),
            Input::Command(Command::Stop) => session.stop_scanning(),
            Input::Command(Command::Reset) => session.reset(),
            Input::Command(Command::List) => {
                println!("{:<24}{}", "Kehadiran", "Nama");
                for record in session.records() {
                    println!("{:<24}{}", record.captured_at(), record.subject());
                }
            }
            Input::Command(Command::Export(path)) => match session.export_records() {
                Ok(records) => {
                    let path = path.unwrap_or(EXPORT_FILE_NAME);
                    save_xlsx(records, path)?;
                    println!("wrote {} rows to {}", records.len(), path);
                }
                Err(e) => println!("{}", e),
            },
            Input::Command(Command::Csv(path)) => match session.export_records() {
                Ok(records) => {
                    let path = path.unwrap_or("ScanResults.csv");
                    fs::write(path, to_csv(records))?;
                    println!("wrote {} rows to {}", records.len(), path);
                }
                Err(e) => println!("{}", e),
            },
            Input::Command(Command::Unknown(other)) => {
                println!("unknown command {}, try `:help`", other)
            }
        }
    }

    Ok(())
}

fn print_help() {
    println!("Commands (while stopped):");
    println!("  :start: Enable scanning (each scan stops it again)");
    println!("  :stop: Disable scanning");
    println!("  :list: Show recorded attendance");
    println!("  :export [file]: Write XLSX (default {})", EXPORT_FILE_NAME);
    println!("  :csv [file]: Write CSV (default ScanResults.csv)");
    println!("  :reset: Drop all records");
    println!("  :q: Quit");
    println!("While scanning every line is decoded QR text; an empty line stops.");
}
