//! Program file loading.
//!
//! A program file names its instructions on the first line and lists one
//! dependency pair per following line:
//!
//! ```text
//! a b c d e f
//! b a
//! e d
//! ```
//!
//! `b a` reads "b depends on the result of a". Only the first character of
//! each token is significant, so `a, b, c` and `add bne cmp` name the same
//! three instructions. Rejected tokens and pairs become [`Diagnostic`]s and
//! never abort the load.

use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use pipeline_core::{DependencyGraph, GraphError, InstructionId, MAX_INSTRUCTIONS};
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::errors::LoadError;

/// Directory searched when the requested file is unusable, relative to the
/// working directory.
pub const FALLBACK_DIR: &str = "Data";

/// A non-fatal problem found while parsing a program.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Diagnostic {
    /// 1-indexed line number.
    pub line: usize,
    /// What was rejected and why.
    pub message: String,
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "line {}: {}", self.line, self.message)
    }
}

/// A parsed program together with everything that was skipped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Loaded {
    /// Instructions and their dependencies.
    pub graph: DependencyGraph,
    /// Rejected tokens and pairs, in file order.
    pub diagnostics: Vec<Diagnostic>,
    /// File the program came from, when loaded from disk.
    pub source: Option<PathBuf>,
}

impl Loaded {
    const fn is_empty(&self) -> bool {
        self.graph.node_count() == 0
    }
}

struct DiagnosticLog(Vec<Diagnostic>);

impl DiagnosticLog {
    fn push(&mut self, line: usize, message: String) {
        warn!(line, "{message}");
        self.0.push(Diagnostic { line, message });
    }

    /// Repeated inserts are recorded like any rejection but only logged at
    /// debug level.
    fn reject(&mut self, line: usize, message: String, error: GraphError) {
        if error.is_duplicate() {
            debug!(line, "{message}");
            self.0.push(Diagnostic { line, message });
        } else {
            self.push(line, message);
        }
    }
}

/// Parses program text into a graph of at most `capacity` slots.
#[must_use]
pub fn parse_program(text: &str, capacity: usize) -> Loaded {
    let mut graph = DependencyGraph::with_capacity(capacity);
    let mut log = DiagnosticLog(Vec::new());
    let mut lines = text.lines().enumerate().map(|(index, line)| (index + 1, line));

    if let Some((line_no, line)) = lines.next() {
        parse_instruction_line(&mut graph, &mut log, line_no, line);
    }

    for (line_no, line) in lines {
        if line.trim().is_empty() {
            continue;
        }
        parse_dependency_line(&mut graph, &mut log, line_no, line);
    }

    debug!(
        instructions = graph.node_count(),
        dependencies = graph.edge_count(),
        rejected = log.0.len(),
        "program parsed"
    );

    Loaded {
        graph,
        diagnostics: log.0,
        source: None,
    }
}

fn parse_instruction_line(
    graph: &mut DependencyGraph,
    log: &mut DiagnosticLog,
    line_no: usize,
    line: &str,
) {
    let mut tokens = line.split_whitespace();

    for token in tokens.by_ref().take(MAX_INSTRUCTIONS) {
        let Some(symbol) = token.chars().next() else {
            continue;
        };
        let added = InstructionId::new(symbol).and_then(|id| graph.try_add_node(id));
        if let Err(error) = added {
            log.reject(line_no, format!("instruction `{token}` skipped: {error}"), error);
        }
    }

    let ignored = tokens.count();
    if ignored > 0 {
        log.push(
            line_no,
            format!("{ignored} instruction(s) past the first {MAX_INSTRUCTIONS} ignored"),
        );
    }
}

fn parse_dependency_line(
    graph: &mut DependencyGraph,
    log: &mut DiagnosticLog,
    line_no: usize,
    line: &str,
) {
    let mut symbols = line.split_whitespace().filter_map(|token| token.chars().next());
    let (Some(dependent), Some(dependency)) = (symbols.next(), symbols.next()) else {
        log.push(line_no, format!("expected `<dependent> <dependency>`, found `{}`", line.trim()));
        return;
    };
    if symbols.next().is_some() {
        log.push(line_no, "extra tokens after dependency pair ignored".to_string());
    }

    if let Err(error) = add_dependency(graph, dependent, dependency) {
        log.reject(
            line_no,
            format!("dependency {dependent} -> {dependency} skipped: {error}"),
            error,
        );
    }
}

fn add_dependency(
    graph: &mut DependencyGraph,
    dependent: char,
    dependency: char,
) -> Result<(), GraphError> {
    let from = InstructionId::new(dependent)?;
    let to = InstructionId::new(dependency)?;
    graph.try_add_edge(from, to, from.distance_from(to))
}

/// Reads and parses the program at `path`.
///
/// # Errors
///
/// Returns [`LoadError::Io`] when the file cannot be read and
/// [`LoadError::Empty`] when it names no valid instruction.
pub fn load_file(path: &Path, capacity: usize) -> Result<Loaded, LoadError> {
    let text = fs::read_to_string(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    let mut loaded = parse_program(&text, capacity);
    if loaded.is_empty() {
        return Err(LoadError::Empty {
            path: path.to_path_buf(),
        });
    }

    info!(
        path = %path.display(),
        instructions = loaded.graph.node_count(),
        dependencies = loaded.graph.edge_count(),
        "program loaded"
    );
    loaded.source = Some(path.to_path_buf());
    Ok(loaded)
}

/// Alternate location for `path`: `../Data/<file name>`.
#[must_use]
pub fn fallback_path(path: &Path) -> Option<PathBuf> {
    path.file_name()
        .map(|name| Path::new("..").join(FALLBACK_DIR).join(name))
}

/// Loads `path`, retrying [`fallback_path`] when the first attempt fails.
///
/// # Errors
///
/// Returns the error of the first attempt when the fallback fails too.
pub fn load_with_fallback(path: &Path, capacity: usize) -> Result<Loaded, LoadError> {
    let primary = match load_file(path, capacity) {
        Ok(loaded) => return Ok(loaded),
        Err(error) => error,
    };

    let Some(fallback) = fallback_path(path).filter(|candidate| candidate.as_path() != path) else {
        return Err(primary);
    };
    debug!(%primary, fallback = %fallback.display(), "retrying program load");

    load_file(&fallback, capacity).map_err(|_| primary)
}

#[cfg(test)]
mod tests {
    use super::{fallback_path, load_file, load_with_fallback, parse_program};
    use crate::errors::LoadError;
    use pipeline_core::{InstructionId, MAX_INSTRUCTIONS};
    use std::fs;
    use std::path::{Path, PathBuf};

    fn id(symbol: char) -> InstructionId {
        InstructionId::new(symbol).expect("test symbol inside alphabet")
    }

    #[test]
    fn parses_instructions_and_dependencies() {
        let loaded = parse_program("a b c d e f\nb a\ne d\n", MAX_INSTRUCTIONS);

        assert!(loaded.diagnostics.is_empty());
        assert_eq!(loaded.graph.node_count(), 6);
        assert_eq!(loaded.graph.edge_count(), 2);
        assert!(loaded.graph.depends_on_predecessor(id('b')));
        assert!(loaded.graph.depends_on_predecessor(id('e')));
        assert_eq!(
            loaded.graph.node(id('b')).and_then(|node| node.edge_weight(id('a'))),
            Some(1)
        );
    }

    #[test]
    fn only_first_character_of_each_token_counts() {
        let loaded = parse_program("add, Bne cmp\n", MAX_INSTRUCTIONS);

        let ids: Vec<_> = loaded.graph.ids().map(InstructionId::symbol).collect();
        assert_eq!(ids, vec!['a', 'b', 'c']);
    }

    #[test]
    fn rejected_tokens_become_diagnostics() {
        let loaded = parse_program("a b b z k\nb a\nb a\nq a\nc\n", 10);

        assert_eq!(loaded.graph.node_count(), 2);
        assert_eq!(loaded.graph.edge_count(), 1);
        let lines: Vec<_> = loaded.diagnostics.iter().map(|d| d.line).collect();
        // duplicate b, unknown z, k beyond capacity 10, duplicate edge,
        // edge from unregistered q, malformed pair
        assert_eq!(lines, vec![1, 1, 1, 3, 4, 5]);
        assert!(loaded.diagnostics[0].message.contains("`b`"));
        assert!(loaded.diagnostics[4].to_string().starts_with("line 4:"));
    }

    #[test]
    fn extra_tokens_after_pair_are_reported_but_pair_is_kept() {
        let loaded = parse_program("a b\nb a c\n", MAX_INSTRUCTIONS);

        assert_eq!(loaded.diagnostics.len(), 1);
        assert_eq!(loaded.diagnostics[0].line, 2);
        assert!(loaded.diagnostics[0].message.contains("extra tokens"));
        assert!(loaded.graph.has_edge_from(id('b'), id('a')));
        assert_eq!(loaded.graph.edge_count(), 1);
    }

    #[test]
    fn duplicates_are_still_recorded_as_diagnostics() {
        let loaded = parse_program("a a b\nb a\nb a\n", MAX_INSTRUCTIONS);

        let lines: Vec<_> = loaded.diagnostics.iter().map(|d| d.line).collect();
        assert_eq!(lines, vec![1, 3]);
        assert!(loaded.diagnostics[1].message.contains("already recorded"));
    }

    #[test]
    fn blank_dependency_lines_are_skipped() {
        let loaded = parse_program("a b\n\n   \nb a\n", MAX_INSTRUCTIONS);

        assert!(loaded.diagnostics.is_empty());
        assert_eq!(loaded.graph.edge_count(), 1);
    }

    #[test]
    fn reads_at_most_the_full_alphabet() {
        let line: Vec<String> = ('a'..='y')
            .chain(['a', 'b'])
            .map(String::from)
            .collect();
        let loaded = parse_program(&line.join(" "), MAX_INSTRUCTIONS);

        assert_eq!(loaded.graph.node_count(), MAX_INSTRUCTIONS);
        assert_eq!(loaded.diagnostics.len(), 1);
        assert!(loaded.diagnostics[0].message.contains("2 instruction(s)"));
    }

    #[test]
    fn fallback_points_into_sibling_data_directory() {
        assert_eq!(
            fallback_path(Path::new("some/dir/input.txt")),
            Some(PathBuf::from("../Data/input.txt"))
        );
    }

    #[test]
    fn load_file_reports_missing_and_empty_inputs() {
        let dir = tempfile::tempdir().expect("tempdir");
        let missing = dir.path().join("missing.txt");
        assert!(matches!(
            load_file(&missing, MAX_INSTRUCTIONS),
            Err(LoadError::Io { .. })
        ));

        let blank = dir.path().join("blank.txt");
        fs::write(&blank, "\nb a\n").expect("write input");
        assert!(matches!(
            load_file(&blank, MAX_INSTRUCTIONS),
            Err(LoadError::Empty { .. })
        ));
    }

    #[test]
    fn load_with_fallback_keeps_primary_error() {
        let dir = tempfile::tempdir().expect("tempdir");
        let missing = dir.path().join("no-such-program-file.txt");

        let error = load_with_fallback(&missing, MAX_INSTRUCTIONS).expect_err("nothing to load");
        assert_eq!(error.path(), missing.as_path());
    }

    #[test]
    fn load_file_records_source_path() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("program.txt");
        fs::write(&path, "a b c\n").expect("write input");

        let loaded = load_with_fallback(&path, MAX_INSTRUCTIONS).expect("program loads");
        assert_eq!(loaded.source.as_deref(), Some(path.as_path()));
        assert_eq!(loaded.graph.node_count(), 3);
    }
}
