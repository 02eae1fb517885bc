//! Contest checker.
//!
//! Grades a submission by compiling it once and running it against a fixed,
//! seeded series of test cases for one of four tasks. The jury's reference
//! solution is graded first; if it is not accepted the checker itself fails.
//!
//! # Modules
//!
//! - [`rng`]: seeded PCG generator behind `rand_core::RngCore`
//! - [`tasks`]: task definitions, budgets and trial schedules

pub mod rng;
pub mod tasks;

use crate::checker::rng::Pcg128;
use crate::checker::tasks::TaskSpec;
use crate::virtual_machine::errors::ProgramError;
use crate::virtual_machine::program::Program;
use based_derive::Error;
use std::fmt;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::num::ParseIntError;
use std::path::Path;
use std::sync::Arc;

/// Outcome of judging one submission.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Verdict {
    Correct,
    WrongAnswer(String),
    TimeLimitExceeded,
    /// 1-based line and reason.
    RuntimeError(i64, String),
    /// 1-based line and reason.
    CompileError(i64, String),
    /// The submission contains the forbidden word.
    Based,
    /// The submission could not even be read.
    OtherError(String),
}

impl Verdict {
    pub fn is_correct(&self) -> bool {
        matches!(self, Verdict::Correct)
    }
}

impl From<ProgramError> for Verdict {
    fn from(err: ProgramError) -> Self {
        match err {
            ProgramError::Compile { line, text } => Verdict::CompileError(
                i64::try_from(line).unwrap_or(i64::MAX),
                format!("unknown expression: '{text}'"),
            ),
            ProgramError::Runtime { line, fault } => Verdict::RuntimeError(line, fault.to_string()),
            ProgramError::TimeLimitExceeded { .. } => Verdict::TimeLimitExceeded,
            other => Verdict::OtherError(other.to_string()),
        }
    }
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Verdict::Correct => write!(f, "ur the GOAT of based code!!1!"),
            Verdict::WrongAnswer(message) => write!(f, "this ain't it, chief, {message}"),
            Verdict::TimeLimitExceeded => write!(f, "you have skill issue on speed smh"),
            Verdict::RuntimeError(line, message) => {
                write!(f, "ya code got L + ratioed on line {line} because {message}")
            }
            Verdict::CompileError(line, message) => {
                write!(f, "jesse, what are you talking about on line {line}? {message}")
            }
            Verdict::Based => write!(
                f,
                "\"Based\"? Are you kidding me? I spent a decent portion of my life preparing \
                 this problem and your submission to it is \"Based\"? What do I have to say to \
                 you? Absolutely nothing. I couldn't be bothered to respond to such meaningless \
                 attempt at writing code. Do you want \"Based\" on your Codeforces profile?"
            ),
            Verdict::OtherError(message) => {
                write!(f, "unexpected error in participant output: {message}")
            }
        }
    }
}

/// Failures of the checker itself, as opposed to verdicts on a submission.
#[derive(Debug, Error)]
pub enum CheckerError {
    #[error("cannot read file: {0}")]
    Io(#[from] std::io::Error),

    #[error("task id is not a number: {0}")]
    TaskId(#[from] ParseIntError),

    #[error("unknown task id {0}")]
    UnknownTask(u32),

    #[error("jury's solution failed with verdict {verdict:?}")]
    JuryFailed { verdict: Verdict },
}

/// Word that gets a submission rejected on sight, matched case-insensitively.
const FORBIDDEN_WORD: &str = "based";

fn mentions_forbidden_word(line: &str) -> bool {
    line.to_lowercase().contains(FORBIDDEN_WORD)
}

/// Judges a submission given as source lines.
///
/// Lines are screened for the forbidden word in order while compiling, so a
/// compile fault on an earlier line wins over the word on a later one. Every
/// test case runs on a fresh VM; the first verdict that is not
/// [`Verdict::Correct`] is returned.
pub fn judge<S: AsRef<str>>(task_id: u32, lines: &[S]) -> Result<Verdict, CheckerError> {
    let spec = TaskSpec::for_id(task_id).ok_or(CheckerError::UnknownTask(task_id))?;

    let forbidden = lines
        .iter()
        .position(|line| mentions_forbidden_word(line.as_ref()));
    let program = match Program::compile(&lines[..forbidden.unwrap_or(lines.len())]) {
        Ok(_) if forbidden.is_some() => return Ok(Verdict::Based),
        Ok(program) => Arc::new(program),
        Err(err) => return Ok(Verdict::from(err)),
    };

    let mut rng = Pcg128::default();
    for trial in spec.trials() {
        let verdict = trial.run_and_check(Arc::clone(&program), &mut rng, spec.budget);
        if !verdict.is_correct() {
            return Ok(verdict);
        }
    }
    Ok(Verdict::Correct)
}

/// Reads a submission file line by line and judges it.
pub fn judge_file(task_id: u32, path: &Path) -> Result<Verdict, CheckerError> {
    let reader = BufReader::new(File::open(path)?);
    let lines = reader.lines().collect::<Result<Vec<_>, _>>()?;
    judge(task_id, &lines)
}

/// Runs the checker protocol: `input` holds the task id, `output` the
/// participant's program and `answer` the jury's program.
///
/// An unreadable participant program is a verdict; anything wrong on the jury's
/// side is a [`CheckerError`].
pub fn judge_files(input: &Path, output: &Path, answer: &Path) -> Result<Verdict, CheckerError> {
    let task_id = std::fs::read_to_string(input)?.trim().parse::<u32>()?;

    let jury = judge_file(task_id, answer)?;
    if !jury.is_correct() {
        return Err(CheckerError::JuryFailed { verdict: jury });
    }

    Ok(judge_file(task_id, output).unwrap_or_else(|err| Verdict::OtherError(err.to_string())))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::test_utils::utils::{
        A_PLUS_B, ABS_VALUE, ARRAY_MAX, ARRAY_SUM, KTH_LARGEST, lines,
    };
    use std::path::PathBuf;

    fn judge_source(task_id: u32, source: &str) -> Verdict {
        judge(task_id, &lines(source)).expect("checker failed")
    }

    #[test]
    fn reference_solutions_are_accepted() {
        assert_eq!(judge_source(1, A_PLUS_B), Verdict::Correct);
        assert_eq!(judge_source(2, ABS_VALUE), Verdict::Correct);
        assert_eq!(judge_source(3, ARRAY_MAX), Verdict::Correct);
        assert_eq!(judge_source(4, KTH_LARGEST), Verdict::Correct);
    }

    #[test]
    fn wrong_solutions_are_rejected() {
        assert_eq!(
            judge_source(3, ARRAY_SUM),
            Verdict::WrongAnswer("git gud".into())
        );
        assert_eq!(
            judge_source(2, A_PLUS_B),
            Verdict::RuntimeError(2, "you're reading from nothing".into())
        );
        assert_eq!(judge_source(1, "simp for 1"), Verdict::TimeLimitExceeded);
    }

    #[test]
    fn task_three_budget_is_enforced() {
        // Trailing whitespace still costs; pad the loop's back edge.
        let padding = " ".repeat(5_000);
        let slow = ARRAY_MAX.replace("simp for 5", &format!("simp for 5{padding}"));
        assert_eq!(judge_source(3, &slow), Verdict::TimeLimitExceeded);
    }

    #[test]
    fn compile_errors_report_the_line() {
        let verdict = judge_source(1, "yoink a\nyoink b\nadd them");
        assert_eq!(
            verdict,
            Verdict::CompileError(3, "unknown expression: 'add them'".into())
        );
        assert_eq!(
            verdict.to_string(),
            "jesse, what are you talking about on line 3? unknown expression: 'add them'"
        );
    }

    #[test]
    fn forbidden_word_is_case_insensitive() {
        let source = format!("{A_PLUS_B}\nyeet BaSeD");
        assert_eq!(judge_source(1, &source), Verdict::Based);
        assert_eq!(judge_source(1, "based"), Verdict::Based);
    }

    #[test]
    fn earlier_compile_error_beats_forbidden_word() {
        assert!(matches!(
            judge_source(1, "nonsense here\nbased"),
            Verdict::CompileError(1, _)
        ));
    }

    #[test]
    fn unknown_task_is_a_checker_error() {
        assert!(matches!(
            judge(9, &lines(A_PLUS_B)),
            Err(CheckerError::UnknownTask(9))
        ));
    }

    #[test]
    fn verdict_messages() {
        assert_eq!(
            Verdict::WrongAnswer("git gud".into()).to_string(),
            "this ain't it, chief, git gud"
        );
        assert_eq!(
            Verdict::RuntimeError(4, "you're printing nothing".into()).to_string(),
            "ya code got L + ratioed on line 4 because you're printing nothing"
        );
        assert!(Verdict::Based.to_string().starts_with("\"Based\"? Are you kidding me?"));
    }

    struct Scratch(PathBuf);

    impl Scratch {
        fn new(name: &str) -> Self {
            let dir = std::env::temp_dir().join(format!(
                "based-checker-{}-{name}",
                std::process::id()
            ));
            std::fs::create_dir_all(&dir).unwrap();
            Scratch(dir)
        }

        fn file(&self, name: &str, contents: &str) -> PathBuf {
            let path = self.0.join(name);
            std::fs::write(&path, contents).unwrap();
            path
        }
    }

    impl Drop for Scratch {
        fn drop(&mut self) {
            let _ = std::fs::remove_dir_all(&self.0);
        }
    }

    #[test]
    fn judge_files_protocol() {
        let scratch = Scratch::new("protocol");
        let input = scratch.file("input", "1\n");
        let answer = scratch.file("answer", A_PLUS_B);
        let good = scratch.file("good", A_PLUS_B);
        let bad = scratch.file("bad", "yeet 0\ngo touch some grass\n");

        assert_eq!(judge_files(&input, &good, &answer).unwrap(), Verdict::Correct);
        assert_eq!(
            judge_files(&input, &bad, &answer).unwrap(),
            Verdict::WrongAnswer("git gud".into())
        );
    }

    #[test]
    fn judge_files_failures() {
        let scratch = Scratch::new("failures");
        let input = scratch.file("input", "2");
        let answer = scratch.file("answer", ABS_VALUE);
        let missing = scratch.0.join("missing");

        assert!(matches!(
            judge_files(&input, &missing, &answer).unwrap(),
            Verdict::OtherError(_)
        ));
        assert!(matches!(
            judge_files(&input, &answer, &missing),
            Err(CheckerError::Io(_))
        ));

        let wrong_jury = scratch.file("wrong_jury", A_PLUS_B);
        assert!(matches!(
            judge_files(&input, &answer, &wrong_jury),
            Err(CheckerError::JuryFailed { .. })
        ));

        let garbage = scratch.file("garbage", "two");
        assert!(matches!(
            judge_files(&garbage, &answer, &answer),
            Err(CheckerError::TaskId(_))
        ));
    }
}
