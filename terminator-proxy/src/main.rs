//! Short-lived helper that attaches to a foreign console to broadcast a
//! Ctrl+C/Ctrl+Break event or inject a line of text, then exits. Built
//! without its own console window: it only ever touches consoles it
//! attaches to.
#![cfg_attr(windows, windows_subsystem = "windows")]

mod attach;
mod codes;
#[cfg(windows)]
mod message_mode;
#[cfg(windows)]
mod signal_mode;

use clap::Parser;

#[derive(Parser)]
#[command(name = "terminator-proxy")]
struct Args {
    /// "signal" or "message"
    #[arg(long)]
    mode: Option<String>,
    /// PID of the console-owning process to attach to. -1 is never valid.
    #[arg(long, default_value_t = -1)]
    pid: i64,
    /// CTRL_C_EVENT (0) or CTRL_BREAK_EVENT (1), signal mode only.
    #[arg(long)]
    sig: Option<u32>,
    /// Text to feed to the target's console input, message mode only.
    #[arg(long)]
    msg: Option<String>,
}

fn main() {
    let args = Args::parse();

    if args.pid == -1 {
        std::process::exit(codes::WRONG_PID);
    }

    #[cfg(windows)]
    {
        match args.mode.as_deref() {
            Some("signal") => {
                let sig = match args.sig {
                    Some(s) => s,
                    None => std::process::exit(codes::WRONG_SIG),
                };
                signal_mode::run(args.pid, sig);
            }
            Some("message") => {
                let msg = match args.msg {
                    Some(m) if !m.is_empty() => m,
                    _ => std::process::exit(codes::NO_MESSAGE),
                };
                message_mode::run(args.pid, &msg);
            }
            _ => std::process::exit(codes::WRONG_MODE),
        }
    }

    #[cfg(not(windows))]
    {
        let _ = args;
        eprintln!("terminator-proxy only runs on Windows");
        std::process::exit(codes::WRONG_MODE);
    }
}
