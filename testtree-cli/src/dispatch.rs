// Copyright (c) The nextest Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

use crate::{
    errors::{ExpectedError, InputPath, Result},
    output::{OutputContext, OutputOpts, OutputWriter, StdoutStyles},
};
use camino::{Utf8Path, Utf8PathBuf};
use clap::{Args, Parser, Subcommand, ValueEnum};
use owo_colors::OwoColorize;
use serde::Serialize;
use std::{
    collections::BTreeMap,
    io::{Read, Write},
};
use swrite::{SWrite, swrite, swriteln};
use testtree_metadata::{TestResultBatch, TestTreeExitCode, TreeMode};
use testtree_runner::{
    config::TestTreeConfig,
    diagnostics::DiagnosticCounts,
    discovery::DiscoveryBatch,
    explorer::ExplorerState,
    reconcile::{NodeOutcome, RunSummary},
    tree::{ConcreteTree, NodeIndex},
};
use tracing::{debug, warn};

/// Build namespace trees from dotnet-style test names, and reconcile them with test results.
#[derive(Debug, Parser)]
#[command(
    version,
    name = "testtree",
    styles = crate::output::clap_styles::style(),
    max_term_width = 100
)]
pub struct TestTreeApp {
    #[clap(flatten)]
    output: OutputOpts,

    #[clap(flatten)]
    config_opts: ConfigOpts,

    #[clap(subcommand)]
    command: Command,
}

impl TestTreeApp {
    /// Initializes the output context.
    pub fn init_output(&self) -> OutputContext {
        self.output.init()
    }

    /// Executes the app, returning the exit code.
    pub fn exec(self, output: OutputContext, output_writer: &mut OutputWriter) -> Result<i32> {
        let config = self.config_opts.make_config()?;
        match self.command {
            Command::List(opts) => opts.exec(&config, output, output_writer),
            Command::Reconcile(opts) => opts.exec(&config, output, output_writer),
        }
    }
}

#[derive(Debug, Args)]
#[command(next_help_heading = "Config options")]
struct ConfigOpts {
    /// Config file [default: workspace-root/.config/testtree.toml]
    #[arg(long, global = true, value_name = "PATH")]
    config_file: Option<Utf8PathBuf>,

    /// Workspace root [default: current directory]
    #[arg(long, global = true, value_name = "PATH")]
    workspace_root: Option<Utf8PathBuf>,
}

impl ConfigOpts {
    fn make_config(&self) -> Result<TestTreeConfig> {
        let workspace_root = self
            .workspace_root
            .clone()
            .unwrap_or_else(|| Utf8PathBuf::from("."));
        let config = TestTreeConfig::from_sources(workspace_root, self.config_file.as_deref())?;
        debug!(
            tree_mode = %config.tree_mode(),
            "loaded config for workspace root `{}`",
            config.workspace_root(),
        );
        Ok(config)
    }
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Print the tree built from a list of test names
    ///
    /// Names are read one per line, as printed by `dotnet test --list-tests`. Blank lines are
    /// ignored, and malformed names are skipped with a warning.
    List(ListOpts),

    /// Match a batch of test results against discovered tests
    ///
    /// Results are read as JSON, in the form
    /// `{"clearPreviousTestResults": bool, "testResults": [{"fullName": ..., "outcome": ...}]}`.
    Reconcile(ReconcileOpts),
}

#[derive(Debug, Args)]
struct TreeOpts {
    /// Tree shape [default: from config]
    #[arg(long, value_name = "MODE", env = "TESTTREE_TREE_MODE")]
    tree_mode: Option<TreeMode>,

    /// Output format
    #[arg(
        short = 'T',
        long,
        value_enum,
        default_value_t,
        help_heading = "Output options",
        value_name = "FMT"
    )]
    message_format: MessageFormatOpts,
}

impl TreeOpts {
    fn tree_mode(&self, config: &TestTreeConfig) -> TreeMode {
        self.tree_mode.unwrap_or_else(|| config.tree_mode())
    }
}

#[derive(Copy, Clone, Debug, Default, ValueEnum)]
enum MessageFormatOpts {
    /// A human-readable tree.
    #[default]
    Human,
    /// JSON with no whitespace.
    Json,
    /// JSON, prettified.
    JsonPretty,
}

impl MessageFormatOpts {
    fn write_json(
        self,
        value: &impl Serialize,
        writer: &mut impl Write,
    ) -> Result<(), ExpectedError> {
        let res = match self {
            Self::Json => serde_json::to_writer(&mut *writer, value),
            Self::JsonPretty | Self::Human => serde_json::to_writer_pretty(&mut *writer, value),
        };
        res.map_err(|err| ExpectedError::SerializeError { err })?;
        writeln!(writer).map_err(ExpectedError::write_output_error)
    }
}

#[derive(Debug, Args)]
struct ListOpts {
    /// File with test names, one per line (`-` for standard input)
    #[arg(long, value_name = "FILE", default_value = "-")]
    names: Utf8PathBuf,

    #[clap(flatten)]
    tree_opts: TreeOpts,

    /// Exit with an error if any name is malformed
    #[arg(long)]
    strict: bool,
}

impl ListOpts {
    fn exec(
        self,
        config: &TestTreeConfig,
        output: OutputContext,
        output_writer: &mut OutputWriter,
    ) -> Result<i32> {
        let listing = read_input(InputPath::new(self.names))?;

        let mut state = ExplorerState::new(self.tree_opts.tree_mode(config));
        let diagnostics = state.on_discovery_finished([DiscoveryBatch::from_lines(&listing)]);
        let counts = diagnostics.counts();
        if counts.malformed_names > 0 {
            warn!(
                "skipped {} malformed test name{}",
                counts.malformed_names,
                plural(counts.malformed_names),
            );
        }

        let mut writer = output_writer.stdout_writer();
        match self.tree_opts.message_format {
            MessageFormatOpts::Human => {
                let styles = output.stdout_styles();
                let rendered = render_tree(state.tree(), output.verbose, &styles);
                writer
                    .write_all(rendered.as_bytes())
                    .map_err(ExpectedError::write_output_error)?;
            }
            format => {
                format.write_json(&state.tree().to_summary(), &mut writer)?;
            }
        }
        writer.flush().map_err(ExpectedError::write_output_error)?;

        if self.strict && counts.malformed_names > 0 {
            return Err(ExpectedError::MalformedNames {
                count: counts.malformed_names,
            });
        }
        Ok(TestTreeExitCode::OK)
    }
}

#[derive(Debug, Args)]
struct ReconcileOpts {
    /// File with discovered test names, one per line (`-` for standard input)
    #[arg(long, value_name = "FILE")]
    discovered: Utf8PathBuf,

    /// JSON file with test results (`-` for standard input)
    #[arg(long, value_name = "FILE")]
    results: Utf8PathBuf,

    /// Replace the discovered tests with the tests in the results
    ///
    /// This is implied if the results set `clearPreviousTestResults`.
    #[arg(long)]
    replace: bool,

    #[clap(flatten)]
    tree_opts: TreeOpts,
}

impl ReconcileOpts {
    fn exec(
        self,
        config: &TestTreeConfig,
        output: OutputContext,
        output_writer: &mut OutputWriter,
    ) -> Result<i32> {
        let listing = read_input(InputPath::new(self.discovered))?;
        let results_path = InputPath::new(self.results);
        let results = read_input(results_path.clone())?;
        let mut batch: TestResultBatch = serde_json::from_str(&results)
            .map_err(|err| ExpectedError::results_parse_error(results_path, err))?;
        batch.clear_previous_test_results |= self.replace;

        let mut state = ExplorerState::new(self.tree_opts.tree_mode(config));
        let mut diagnostics = state.on_discovery_finished([DiscoveryBatch::from_lines(&listing)]);
        if !batch.clear_previous_test_results {
            // Incremental results are meaningless without a discovered set to add to.
            state
                .discovered()
                .require_non_empty("reconciling incremental results")?;
        }

        let update = state.on_results(&batch);
        diagnostics.extend(update.report.diagnostics.clone());

        let report = ReconcileReport {
            rebuild_required: update.rebuilt,
            outcomes: &update.report.outcomes,
            summary: update.report.summary,
            diagnostics: diagnostics.counts(),
        };

        let mut writer = output_writer.stdout_writer();
        match self.tree_opts.message_format {
            MessageFormatOpts::Human => {
                let styles = output.stdout_styles();
                let rendered = render_report(&report, state.tree(), output.verbose, &styles);
                writer
                    .write_all(rendered.as_bytes())
                    .map_err(ExpectedError::write_output_error)?;
            }
            format => {
                format.write_json(&report, &mut writer)?;
            }
        }
        writer.flush().map_err(ExpectedError::write_output_error)?;

        Ok(TestTreeExitCode::OK)
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ReconcileReport<'a> {
    rebuild_required: bool,
    outcomes: &'a BTreeMap<String, NodeOutcome>,
    summary: RunSummary,
    diagnostics: DiagnosticCounts,
}

fn read_input(path: InputPath) -> Result<String> {
    let res = match &path {
        InputPath::Stdin => {
            let mut buf = String::new();
            std::io::stdin().read_to_string(&mut buf).map(|_| buf)
        }
        InputPath::File(file) => read_file(file),
    };
    res.map_err(|err| ExpectedError::input_read_error(path, err))
}

fn read_file(path: &Utf8Path) -> std::io::Result<String> {
    std::fs::read_to_string(path)
}

fn plural(count: usize) -> &'static str {
    if count == 1 { "" } else { "s" }
}

/// Renders the tree as indented labels. Groups end with `/`.
fn render_tree(tree: &ConcreteTree, verbose: bool, styles: &StdoutStyles) -> String {
    let mut out = String::new();
    let mut stack: Vec<_> = tree
        .children(NodeIndex::ROOT)
        .rev()
        .map(|(index, _)| (index, 0_usize))
        .collect();

    while let Some((index, depth)) = stack.pop() {
        let node = tree.node(index);
        swrite!(out, "{:width$}", "", width = depth * 2);
        if node.is_test() {
            swrite!(out, "{}", node.name().style(styles.test));
        } else {
            swrite!(out, "{}/", node.name().style(styles.group));
        }
        if verbose && node.name() != node.full_name() {
            swrite!(out, " {}", node.full_name().style(styles.full_name));
        }
        out.push('\n');
        stack.extend(
            tree.children(index)
                .rev()
                .map(|(child, _)| (child, depth + 1)),
        );
    }

    swriteln!(
        out,
        "{} test{} ({} mode)",
        tree.test_count().style(styles.count),
        plural(tree.test_count()),
        tree.tree_mode(),
    );
    out
}

fn render_report(
    report: &ReconcileReport<'_>,
    tree: &ConcreteTree,
    verbose: bool,
    styles: &StdoutStyles,
) -> String {
    let mut out = String::new();
    swriteln!(
        out,
        "rebuild required: {}",
        if report.rebuild_required { "yes" } else { "no" }
    );

    // Outcomes are listed in display order so that they line up with `testtree list`. A group can
    // share its full name with a test, so only test nodes are considered.
    for index in tree.descendants(NodeIndex::ROOT) {
        let node = tree.node(index);
        if !node.is_test() {
            continue;
        }
        let Some(outcome) = report.outcomes.get(node.full_name()) else {
            continue;
        };
        match outcome {
            NodeOutcome::Passed => {
                swriteln!(out, "{:>6} {}", "PASS".style(styles.pass), node.full_name());
            }
            NodeOutcome::Failed { message } => {
                swriteln!(out, "{:>6} {}", "FAIL".style(styles.fail), node.full_name());
                if let Some(message) = message.as_deref().filter(|_| verbose) {
                    for line in message.lines() {
                        swriteln!(out, "         {line}");
                    }
                }
            }
            NodeOutcome::Skipped => {
                swriteln!(out, "{:>6} {}", "SKIP".style(styles.skip), node.full_name());
            }
        }
    }

    let RunSummary {
        discovered,
        passed,
        failed,
        skipped,
        unrecognized,
    } = report.summary;
    swriteln!(
        out,
        "{} discovered, {} passed, {} failed, {} skipped, {} unrecognized",
        discovered.style(styles.count),
        passed.style(styles.count),
        failed.style(styles.count),
        skipped.style(styles.count),
        unrecognized.style(styles.count),
    );

    let counts = &report.diagnostics;
    if counts.total() > 0 {
        swriteln!(
            out,
            "diagnostics: {} malformed name{}, {} unmatched outcome{}, {} unrecognized outcome{}",
            counts.malformed_names,
            plural(counts.malformed_names),
            counts.unmatched_outcomes,
            plural(counts.unmatched_outcomes),
            counts.unrecognized_outcomes,
            plural(counts.unrecognized_outcomes),
        );
    }
    out
}
