// tests/session_tests.rs

use std::io::Cursor;

use recdesc::cli::output::{JsonReporter, OutputBuffer, TextReporter};
use recdesc::repl::run_repl;
use recdesc::session::{
    run_session, ArgsSource, Candidate, InputSource, LineSource, SessionOptions,
    SessionSummary,
};
use termcolor::NoColor;

fn args(inputs: &[&str]) -> ArgsSource {
    ArgsSource::new(inputs.iter().map(|s| s.to_string()).collect())
}

fn drain(source: &mut dyn InputSource) -> Vec<Candidate> {
    let mut all = Vec::new();
    while let Some(candidate) = source.next_candidate().unwrap() {
        all.push(candidate);
    }
    all
}

// ---
// Input sources
// ---

#[test]
fn test_args_source_names_candidates_by_index() {
    let candidates = drain(&mut args(&["d", "", "x"]));
    assert_eq!(
        candidates,
        vec![
            Candidate::new("<arg:1>", "d"),
            Candidate::new("<arg:2>", ""),
            Candidate::new("<arg:3>", "x"),
        ]
    );
}

#[test]
fn test_line_source_strips_only_line_terminators() {
    let input = "d\r\n aacd\n\n\tbcd \nlast";
    let mut source = LineSource::new(Cursor::new(input), "inputs.txt");
    let candidates = drain(&mut source);

    let inputs: Vec<&str> = candidates.iter().map(|c| c.input.as_str()).collect();
    assert_eq!(inputs, vec!["d", " aacd", "", "\tbcd ", "last"]);
    assert_eq!(candidates[0].name, "inputs.txt:1");
    assert_eq!(candidates[4].name, "inputs.txt:5");
    assert_eq!(source.line_number(), 5);
    assert_eq!(source.name(), "inputs.txt");
}

#[test]
fn test_line_source_rejects_invalid_utf8_line_without_ending_session() {
    let input: &[u8] = b"d\n\xffd\r\ncd\n";
    let mut source = LineSource::new(Cursor::new(input), "bytes.txt");
    let mut reporter = OutputBuffer::new();
    let summary = run_session(&mut source, &mut reporter, SessionOptions::default()).unwrap();

    assert_eq!(summary, SessionSummary { accepted: 2, rejected: 1 });
    assert_eq!(
        reporter.lines[1],
        "Syntax error in '\u{FFFD}d': Position 0, found '\u{FFFD}', expected: a, b, c, d"
    );
    assert_eq!(reporter.lines[2], "'cd' accepted!");
}

#[test]
fn test_line_source_on_empty_reader_yields_nothing() {
    let mut source = LineSource::new(Cursor::new(""), "<stdin>");
    assert!(source.next_candidate().unwrap().is_none());
}

// ---
// Sessions
// ---

#[test]
fn test_session_reports_every_candidate() {
    let mut reporter = OutputBuffer::new();
    let summary = run_session(
        &mut args(&["d", "aacd", "", "dd"]),
        &mut reporter,
        SessionOptions::default(),
    )
    .unwrap();

    assert_eq!(summary, SessionSummary { accepted: 2, rejected: 2 });
    assert_eq!(summary.total(), 4);
    assert!(!summary.all_accepted());
    assert_eq!(
        reporter.lines,
        vec![
            "'d' accepted!".to_string(),
            "'aacd' accepted!".to_string(),
            r"Syntax error in '': Position 0, found '\0', expected: a, b, c, d".to_string(),
            r"Syntax error in 'dd': Position 1, found 'd', expected: \0".to_string(),
        ]
    );
}

#[test]
fn test_fail_fast_stops_after_first_rejection() {
    let mut reporter = OutputBuffer::new();
    let summary = run_session(
        &mut args(&["d", "x", "aacd"]),
        &mut reporter,
        SessionOptions { fail_fast: true },
    )
    .unwrap();

    assert_eq!(summary, SessionSummary { accepted: 1, rejected: 1 });
    assert_eq!(reporter.lines.len(), 2);
}

#[test]
fn test_empty_session_is_all_accepted() {
    let mut reporter = OutputBuffer::new();
    let summary =
        run_session(&mut args(&[]), &mut reporter, SessionOptions::default()).unwrap();
    assert_eq!(summary.total(), 0);
    assert!(summary.all_accepted());
    assert_eq!(reporter.as_text(), "");
}

// ---
// Reporters
// ---

#[test]
fn test_text_reporter_writes_one_line_per_candidate() {
    let mut reporter = TextReporter::new(NoColor::new(Vec::new()));
    run_session(&mut args(&["cd", "ab"]), &mut reporter, SessionOptions::default()).unwrap();

    let text = String::from_utf8(reporter.into_inner().into_inner()).unwrap();
    assert_eq!(
        text,
        "'cd' accepted!\nSyntax error in 'ab': Position 2, found '\\0', expected: c\n"
    );
}

#[test]
fn test_json_reporter_writes_json_lines() {
    let mut reporter = JsonReporter::new(Vec::new());
    run_session(&mut args(&["d", "dd", ""]), &mut reporter, SessionOptions::default()).unwrap();

    let out = String::from_utf8(reporter.into_inner()).unwrap();
    let lines: Vec<serde_json::Value> = out
        .lines()
        .map(|l| serde_json::from_str(l).unwrap())
        .collect();
    assert_eq!(lines.len(), 3);

    assert_eq!(lines[0]["name"], "<arg:1>");
    assert_eq!(lines[0]["accepted"], true);
    assert!(lines[0].get("error").is_none());

    let error = &lines[1]["error"];
    assert_eq!(lines[1]["accepted"], false);
    assert_eq!(error["position"], 1);
    assert_eq!(error["found"], "d");
    assert_eq!(error["expected"], serde_json::json!([null]));
    assert_eq!(error["message"], r"Position 1, found 'd', expected: \0");

    assert_eq!(lines[2]["error"]["found"], serde_json::Value::Null);
    assert_eq!(
        lines[2]["error"]["expected"],
        serde_json::json!(["a", "b", "c", "d"])
    );
}

// ---
// REPL
// ---

fn repl_with(input: &str, options: SessionOptions) -> (SessionSummary, String, Vec<String>) {
    let mut out = Vec::new();
    let mut reporter = OutputBuffer::new();
    let summary = run_repl(
        Cursor::new(input.to_string()),
        &mut out,
        &mut reporter,
        options,
    )
    .unwrap();
    (summary, String::from_utf8(out).unwrap(), reporter.lines)
}

fn repl(input: &str) -> (SessionSummary, String, Vec<String>) {
    repl_with(input, SessionOptions::default())
}

#[test]
fn test_repl_checks_each_line_until_end_of_input() {
    let (summary, out, lines) = repl("d\naabcd\nx\n");

    assert_eq!(summary, SessionSummary { accepted: 2, rejected: 1 });
    assert!(out.starts_with("recdesc v"));
    assert_eq!(out.matches("input> ").count(), 4);
    assert_eq!(lines[0], "'d' accepted!");
    assert_eq!(lines[1], "'aabcd' accepted!");
    assert!(lines[2].starts_with("Syntax error in 'x': Position 0"));
}

#[test]
fn test_repl_quit_stops_reading() {
    let (summary, _, lines) = repl("d\n:quit\nd\n");
    assert_eq!(summary.total(), 1);
    assert_eq!(lines.len(), 1);

    let (summary, _, _) = repl(":q\n");
    assert_eq!(summary.total(), 0);
}

#[test]
fn test_repl_help_is_not_recognized_as_input() {
    let (summary, out, lines) = repl(":help\n");
    assert_eq!(summary.total(), 0);
    assert!(lines.is_empty());
    assert!(out.contains("S -> A S | d"));
    assert!(out.contains("B -> <empty> | b"));
}

#[test]
fn test_repl_recognizes_empty_lines_and_unknown_commands() {
    let (summary, _, lines) = repl("\n:foo\n");
    assert_eq!(summary, SessionSummary { accepted: 0, rejected: 2 });
    assert!(lines[0].starts_with("Syntax error in '': Position 0"));
    assert!(lines[1].starts_with("Syntax error in ':foo': Position 0, found ':'"));
}

#[test]
fn test_repl_fail_fast_stops_at_first_rejected_line() {
    let (summary, _, lines) = repl_with("d\nx\naacd\n", SessionOptions { fail_fast: true });
    assert_eq!(summary, SessionSummary { accepted: 1, rejected: 1 });
    assert_eq!(lines.len(), 2);

    let (summary, _, _) = repl("d\nx\naacd\n");
    assert_eq!(summary, SessionSummary { accepted: 2, rejected: 1 });
}
