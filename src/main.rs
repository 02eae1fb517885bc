//! Contest checker for based programs.
//!
//! # Usage
//! ```text
//! based-checker <input> <output> <answer>
//! ```
//!
//! # Arguments
//! - `input`: file holding the task id (1 to 4)
//! - `output`: the participant's program
//! - `answer`: the jury's reference program
//!
//! # Exit status
//! - `0`: accepted
//! - `1`: rejected (wrong answer, time limit, runtime or compile error, "based")
//! - `3`: the checker failed, including a rejected jury solution

use based::checker::judge_files;
use based::utils::log;
use based::{error, info, warn};
use std::env;
use std::path::Path;
use std::process;

const EXIT_ACCEPTED: i32 = 0;
const EXIT_REJECTED: i32 = 1;
const EXIT_CHECKER_FAILED: i32 = 3;

fn main() {
    log::plain();
    let args: Vec<String> = env::args().collect();

    if args.len() == 2 && (args[1] == "--help" || args[1] == "-h") {
        print_usage(&args[0]);
        process::exit(EXIT_ACCEPTED);
    }

    let [_, input, output, answer] = args.as_slice() else {
        error!("CHECKER ERROR author made the oopsie: expected 3 arguments\n");
        print_usage(args.first().map(String::as_str).unwrap_or("based-checker"));
        process::exit(EXIT_CHECKER_FAILED);
    };

    match judge_files(Path::new(input), Path::new(output), Path::new(answer)) {
        Ok(verdict) if verdict.is_correct() => {
            info!("{verdict}");
            process::exit(EXIT_ACCEPTED);
        }
        Ok(verdict) => {
            warn!("{verdict}");
            process::exit(EXIT_REJECTED);
        }
        Err(err) => {
            error!("CHECKER ERROR author made the oopsie: {err}");
            process::exit(EXIT_CHECKER_FAILED);
        }
    }
}

const USAGE: &str = "\
based checker

USAGE:
    {program} <input> <output> <answer>

ARGS:
    <input>     File containing the task id (1-4)
    <output>    Participant's program
    <answer>    Jury's program

OPTIONS:
    -h, --help  Print this help message
";

fn print_usage(program: &str) {
    info!("{}", USAGE.replace("{program}", program));
}
