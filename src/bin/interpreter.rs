//! Runs a based program and prints what it yeets.
//!
//! # Usage
//! ```text
//! interpreter [FILE] [OPTIONS]
//! ```
//!
//! # Arguments
//! - `FILE`: program source (reads stdin when omitted)
//!
//! # Options
//! - `-i, --input <value>`: queue a scalar (`7`) or an array (`1,2,3`, `[]`); repeatable
//! - `-b, --budget <cost>`: cost budget (defaults to 1,000,000)
//! - `-p, --profile`: print the cost spent per instruction kind
//!
//! Without `--input`, the queue holds `5`, `[1, -1, 2, -3, 5]` and `3`.

use based::virtual_machine::assembler::render_diagnostic;
use based::virtual_machine::program::Program;
use based::virtual_machine::vm::{VM, Value};
use based::{error, info};
use std::env;
use std::fs;
use std::io::{self, Read};
use std::process;
use std::sync::Arc;

const DEFAULT_BUDGET: u64 = 1_000_000;

fn default_inputs() -> Vec<Value> {
    vec![
        Value::Scalar(5),
        Value::Array(vec![1, -1, 2, -3, 5]),
        Value::Scalar(3),
    ]
}

/// Parses `7`, `1,2,3`, `[1,2,3]` or `[]`.
fn parse_value(text: &str) -> Result<Value, String> {
    let trimmed = text.trim();
    let bracketed = trimmed
        .strip_prefix('[')
        .and_then(|rest| rest.strip_suffix(']'));
    if bracketed.is_none() && !trimmed.contains(',') {
        return trimmed
            .parse::<i64>()
            .map(Value::Scalar)
            .map_err(|_| format!("'{text}' is not an integer"));
    }
    let body = bracketed.unwrap_or(trimmed).trim();
    if body.is_empty() {
        return Ok(Value::Array(Vec::new()));
    }
    body.split(',')
        .map(|item| {
            item.trim()
                .parse::<i64>()
                .map_err(|_| format!("'{}' in '{text}' is not an integer", item.trim()))
        })
        .collect::<Result<Vec<_>, _>>()
        .map(Value::Array)
}

fn main() {
    let args: Vec<String> = env::args().collect();

    let mut file: Option<String> = None;
    let mut inputs: Vec<Value> = Vec::new();
    let mut budget = DEFAULT_BUDGET;
    let mut profile = false;

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--help" | "-h" => {
                print_usage(&args[0]);
                process::exit(0);
            }
            k @ ("--input" | "-i") => {
                i += 1;
                let Some(text) = args.get(i) else {
                    error!("{k} requires an argument");
                    process::exit(1);
                };
                inputs.push(parse_value(text).unwrap_or_else(|e| {
                    error!("Invalid input: {e}");
                    process::exit(1);
                }));
            }
            k @ ("--budget" | "-b") => {
                i += 1;
                let Some(text) = args.get(i) else {
                    error!("{k} requires an argument");
                    process::exit(1);
                };
                budget = text.replace(['_', ','], "").parse::<u64>().unwrap_or_else(|_| {
                    error!("Invalid budget: '{}' is not a valid number", text);
                    process::exit(1);
                });
            }
            "--profile" | "-p" => profile = true,
            path if file.is_none() && !path.starts_with('-') => file = Some(path.to_string()),
            other => {
                error!("Unexpected argument: {}\n", other);
                print_usage(&args[0]);
                process::exit(1);
            }
        }
        i += 1;
    }

    let (name, source) = match &file {
        Some(path) => match fs::read_to_string(path) {
            Ok(source) => (path.clone(), source),
            Err(e) => {
                error!("Failed to read {}: {}", path, e);
                process::exit(1);
            }
        },
        None => {
            let mut source = String::new();
            if let Err(e) = io::stdin().read_to_string(&mut source) {
                error!("Failed to read stdin: {}", e);
                process::exit(1);
            }
            ("<stdin>".to_string(), source)
        }
    };

    let program = match Program::from_source(&source) {
        Ok(program) => Arc::new(program),
        Err(e) => {
            eprintln!("{}", render_diagnostic(&name, &source, &e));
            process::exit(1);
        }
    };

    if inputs.is_empty() {
        inputs = default_inputs();
    }

    let mut vm = VM::new(program);
    for input in inputs {
        vm.add_input(input);
    }
    let result = vm.run(budget);

    while let Some(value) = vm.fetch_output() {
        println!("{value}");
    }

    if profile {
        print_profile(&vm);
    }

    match result {
        Ok(()) => info!(
            "Halted after {} cost ({} lines)",
            format_with_commas(vm.cost()),
            vm.program().len()
        ),
        Err(e) => {
            error!("{e}");
            process::exit(1);
        }
    }
}

fn print_profile(vm: &VM) {
    let profile = vm.cost_profile();
    let total_u = profile.total();
    let total = total_u as f64;

    let name_w = 2 + profile
        .iter()
        .map(|(opcode, _)| opcode.mnemonic().chars().count())
        .max()
        .unwrap_or(0)
        .max("total".chars().count());

    let amt_w = profile
        .iter()
        .map(|(_, amount)| format_with_commas(amount).chars().count())
        .max()
        .unwrap_or(0)
        .max(format_with_commas(total_u).chars().count());

    let dash_w = name_w + 1 + amt_w + 2 + "( 100.0%)".len();

    println!("Cost Profile:");
    println!("{}", "-".repeat(dash_w));

    for (opcode, amount) in profile.iter() {
        if amount == 0 {
            continue;
        }
        let percent = if total > 0.0 {
            (amount as f64 / total) * 100.0
        } else {
            0.0
        };
        let label = match opcode.mnemonic() {
            "" => "(empty line)",
            mnemonic => mnemonic,
        };
        println!(
            "{:<name_w$} {:>amt_w$} ({:>5.1}%)",
            label,
            format_with_commas(amount),
            percent,
        );
    }

    println!("{}", "-".repeat(dash_w));
    println!(
        "{:<name_w$} {:>amt_w$} ({:>5.1}%)",
        "total",
        format_with_commas(total_u),
        100.0,
    );
}

fn format_with_commas(n: u64) -> String {
    let s = n.to_string();
    let mut result = String::with_capacity(s.len() + s.len() / 3);
    for (i, c) in s.chars().enumerate() {
        if i > 0 && (s.len() - i).is_multiple_of(3) {
            result.push(',');
        }
        result.push(c);
    }
    result
}

const USAGE: &str = "\
based interpreter

USAGE:
    {program} [FILE] [OPTIONS]

ARGS:
    [FILE]    Program source (reads stdin when omitted)

OPTIONS:
    -i, --input <value>    Queue an input: 7, 1,2,3 or [] (repeatable)
    -b, --budget <cost>    Cost budget (defaults to 1,000,000)
    -p, --profile          Print the cost spent per instruction kind
    -h, --help             Print this help message

EXAMPLES:
    # Run with the default inputs 5, [1, -1, 2, -3, 5], 3
    {program} sum.txt

    # Feed your own inputs
    {program} sum.txt -i 3 -i 4,5,6

    # Read from stdin with a tighter budget and a profile
    cat sum.txt | {program} -b 10000 -p
";

fn print_usage(program: &str) {
    info!("{}", USAGE.replace("{program}", program));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_value_forms() {
        assert_eq!(parse_value("7"), Ok(Value::Scalar(7)));
        assert_eq!(parse_value(" -3 "), Ok(Value::Scalar(-3)));
        assert_eq!(parse_value("1,2, 3"), Ok(Value::Array(vec![1, 2, 3])));
        assert_eq!(parse_value("[4]"), Ok(Value::Array(vec![4])));
        assert_eq!(parse_value("[]"), Ok(Value::Array(vec![])));
    }

    #[test]
    fn parse_value_rejects_garbage() {
        assert!(parse_value("x").is_err());
        assert!(parse_value("1,,2").is_err());
        assert!(parse_value("[1,y]").is_err());
    }

    #[test]
    fn commas_group_thousands() {
        assert_eq!(format_with_commas(0), "0");
        assert_eq!(format_with_commas(999), "999");
        assert_eq!(format_with_commas(1_000_000), "1,000,000");
    }
}
