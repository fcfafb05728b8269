//! Talkflow CLI
//!
//! Usage:
//!   talkflow --capture "What's your hobby? Reading; Sports"   # Single-shot capture
//!   talkflow --interactive                                    # Capture transcript from stdin
//!   talkflow --validate talk.json                             # Validate a talk document
//!   talkflow --serve                                          # HTTP API server
//!   talkflow --capture "..." --json                           # JSON output

use clap::Parser;
use colored::Colorize;
use std::io::{self, BufRead, Write};

use talkflow::core::{run_server, LinearCapture, RuleChecker};
use talkflow::types::Talk;
use talkflow::VERSION;

#[derive(Parser, Debug)]
#[command(
    name = "talkflow",
    version = VERSION,
    about = "Talkflow - validate talk graphs and capture them from transcripts",
    long_about = "Talkflow is the structural engine for conversational Talks.\n\n\
                  A Talk is a DAG of questions and answers. The engine validates\n\
                  field contracts and acyclicity, and synthesizes linear talks\n\
                  from chat transcripts following the convention:\n\n  \
                  Question? Answer1; Answer2; AnswerN\n\n\
                  Modes:\n  \
                  --capture      Single-shot capture from arguments\n  \
                  --interactive  Capture transcript lines from stdin\n  \
                  --validate     Validate a talk JSON document\n  \
                  --serve        HTTP API server mode"
)]
struct Args {
    /// Transcript line to capture (repeatable)
    #[arg(short, long)]
    capture: Vec<String>,

    /// Interactive mode - read transcript lines from stdin
    #[arg(short, long)]
    interactive: bool,

    /// Validate a talk JSON document from disk
    #[arg(long, value_name = "FILE")]
    validate: Option<String>,

    /// Run as HTTP API server
    #[arg(short, long)]
    serve: bool,

    /// Server address (default: 127.0.0.1:3000)
    #[arg(long, default_value = "127.0.0.1:3000")]
    addr: String,

    /// Author id recorded on captured talks
    #[arg(long, default_value = "local")]
    author: String,

    /// Tag attached to captured talks (repeatable)
    #[arg(long)]
    tag: Vec<String>,

    /// Output as JSON
    #[arg(long)]
    json: bool,

    /// Disable colors in output
    #[arg(long)]
    no_color: bool,
}

#[tokio::main]
async fn main() {
    let args = Args::parse();

    if args.no_color {
        colored::control::set_override(false);
    }

    if args.serve {
        run_serve(&args).await;
    } else if let Some(ref path) = args.validate {
        run_validate(path, &args);
    } else if !args.capture.is_empty() {
        run_capture(&args.capture, &args);
    } else {
        run_interactive(&args);
    }
}

/// Capture a talk from command-line transcript lines
fn run_capture(lines: &[String], args: &Args) {
    match LinearCapture::create_linear_talk(&args.author, lines, &args.tag) {
        Ok(talk) => print_talk(&talk, args),
        Err(err) => {
            if err.is_internal() {
                eprintln!("{} {}", "capture defect:".red().bold(), err);
            } else {
                eprintln!("{} {}", "capture failed:".red(), err);
            }
            std::process::exit(1);
        }
    }
}

/// Validate a talk JSON document from disk
fn run_validate(path: &str, args: &Args) {
    let raw = match std::fs::read_to_string(path) {
        Ok(raw) => raw,
        Err(err) => {
            eprintln!("{} cannot read {}: {}", "error:".red(), path, err);
            std::process::exit(1);
        }
    };

    let talk: Talk = match serde_json::from_str(&raw) {
        Ok(talk) => talk,
        Err(err) => {
            eprintln!("{} {} is not a talk document: {}", "error:".red(), path, err);
            std::process::exit(1);
        }
    };

    match RuleChecker::validate_talk(&talk) {
        Ok(()) => {
            if args.json {
                println!(r#"{{"valid":true,"talkId":"{}"}}"#, talk.id);
            } else {
                println!(
                    "{} {} ({} questions)",
                    "VALID".green().bold(),
                    talk.id,
                    talk.questions.len()
                );
            }
        }
        Err(err) => {
            if args.json {
                println!(
                    "{}",
                    serde_json::json!({ "valid": false, "code": err.code(), "error": err.to_string() })
                );
            } else {
                println!("{} {} [{}]", "INVALID".red().bold(), err, err.code());
            }
            std::process::exit(1);
        }
    }
}

/// Interactive capture - accumulate transcript lines from stdin
fn run_interactive(args: &Args) {
    println!("{}", "=== Talkflow Interactive Capture ===".bold());
    println!("Type transcript lines. Lines shaped 'Question? Answer1; Answer2' become questions.");
    println!("Type 'done' to build the talk, 'quit' to abort.");
    println!();

    let stdin = io::stdin();
    let mut stdout = io::stdout();
    let mut lines: Vec<String> = Vec::new();
    let mut captured = 0usize;

    loop {
        print!("talk> ");
        stdout.flush().ok();

        let mut line = String::new();
        match stdin.lock().read_line(&mut line) {
            Ok(0) => break,
            Ok(_) => {}
            Err(_) => break,
        }

        let line = line.trim();
        if line.eq_ignore_ascii_case("quit") || line.eq_ignore_ascii_case("exit") {
            println!("Aborted, nothing captured.");
            return;
        }
        if line.eq_ignore_ascii_case("done") {
            break;
        }
        if line.is_empty() {
            continue;
        }

        match LinearCapture::parse_line(line) {
            Some(parsed) => {
                println!(
                    "  {} q_{}: {} ({} answers)",
                    "+".green(),
                    captured,
                    parsed.question,
                    parsed.answers.len()
                );
                captured += 1;
            }
            None => {
                println!("  {} skipped (not a capturable prompt)", "-".yellow());
            }
        }
        lines.push(line.to_string());
    }

    match LinearCapture::create_linear_talk(&args.author, &lines, &args.tag) {
        Ok(talk) => print_talk(&talk, args),
        Err(err) => {
            if err.is_internal() {
                eprintln!("{} {}", "capture defect:".red().bold(), err);
            } else {
                eprintln!("{} {}", "capture failed:".red(), err);
            }
            std::process::exit(1);
        }
    }
}

/// Run the HTTP API server
async fn run_serve(args: &Args) {
    if let Err(err) = run_server(&args.addr).await {
        eprintln!("{} {}", "server error:".red(), err);
        std::process::exit(1);
    }
}

/// Print a captured talk, JSON or human summary
fn print_talk(talk: &Talk, args: &Args) {
    if args.json {
        match serde_json::to_string_pretty(talk) {
            Ok(json) => println!("{}", json),
            Err(err) => {
                eprintln!("{} {}", "error:".red(), err);
                std::process::exit(1);
            }
        }
        return;
    }

    println!();
    println!(
        "{} {} ({} questions)",
        "Captured".green().bold(),
        talk.id,
        talk.questions.len()
    );
    for question in &talk.questions {
        println!("  {} {}", question.id.cyan(), question.text);
        for answer in &question.answers {
            let marker = if answer.is_match {
                " [match]".magenta().to_string()
            } else if answer.is_ignore {
                " [ignore]".yellow().to_string()
            } else if let Some(ref next) = answer.next_question_id {
                format!(" -> {}", next).normal().to_string()
            } else {
                String::new()
            };
            println!("      - {}{}", answer.text, marker);
        }
    }
}
