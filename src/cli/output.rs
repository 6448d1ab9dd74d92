//! Report rendering.
//!
//! Provides terminal, JSON, and JUnit XML formatters over a [`ResultTree`].
//! Every formatter renders failed organizations and networks alongside the
//! completed ones, and produces valid output for an empty tree.

use serde::Serialize;

use crate::cli::args::OutputFormat;
use crate::engine::result::{EntityResult, NetworkReport, ResultSummary, ResultTree};
use crate::{CheckResult, Severity};

const RULE: &str = "--------------------------------------------------------------------------------";

/// Trait for output formatters
pub trait OutputFormatter {
    /// Render a result tree into a string
    fn format(&self, tree: &ResultTree) -> String;
}

/// Terminal (human-readable) formatter
pub struct TerminalFormatter {
    color: bool,
    verbose: bool,
    quiet: bool,
}

impl TerminalFormatter {
    pub fn new(color: bool, verbose: bool, quiet: bool) -> Self {
        TerminalFormatter {
            color,
            verbose,
            quiet,
        }
    }

    fn colorize(&self, text: &str, color_code: &str) -> String {
        if self.color {
            format!("\x1b[{}m{}\x1b[0m", color_code, text)
        } else {
            text.to_string()
        }
    }

    fn green(&self, text: &str) -> String {
        self.colorize(text, "32")
    }

    fn yellow(&self, text: &str) -> String {
        self.colorize(text, "33")
    }

    fn red(&self, text: &str) -> String {
        self.colorize(text, "31")
    }

    fn bold(&self, text: &str) -> String {
        self.colorize(text, "1")
    }

    fn status(&self, result: &CheckResult) -> String {
        match result.worst_severity() {
            None => self.green("[PASS]"),
            Some(Severity::Low) => self.yellow("[WARN]"),
            Some(_) => self.red("[FAIL]"),
        }
    }

    fn write_check(&self, output: &mut String, indent: &str, label: &str, result: &CheckResult) {
        if self.quiet && result.is_ok() {
            return;
        }

        output.push_str(&format!("{}{} {}\n", indent, self.status(result), label));
        for issue in result.issues() {
            output.push_str(&format!("{}       {}\n", indent, issue));
        }
        if self.verbose {
            if let Ok(details) = serde_json::to_string(result.details()) {
                output.push_str(&format!("{}       details: {}\n", indent, details));
            }
        }
    }

    fn write_network(
        &self,
        output: &mut String,
        network_id: &str,
        network: &EntityResult<NetworkReport>,
    ) {
        match network {
            EntityResult::Failed { error } => {
                output.push_str(&format!("  Network {}\n", self.bold(network_id)));
                output.push_str(&format!("    {} {}\n", self.red("[ERROR]"), error));
            }
            EntityResult::Completed(report) => {
                let switch_results = report.switch_checks.results();
                let all_ok = report.network_checks.values().all(CheckResult::is_ok)
                    && switch_results.iter().all(|(_, r)| r.is_ok());
                if self.quiet && all_ok {
                    return;
                }

                let products = if report.product_types.is_empty() {
                    String::new()
                } else {
                    format!(" [{}]", report.product_types.join(", "))
                };
                output.push_str(&format!(
                    "  Network {} ({}){}\n",
                    self.bold(network_id),
                    report.name,
                    products
                ));
                for (name, result) in &report.network_checks {
                    self.write_check(output, "    ", name, result);
                }
                for (label, result) in switch_results {
                    self.write_check(output, "    ", &label, result);
                }
            }
        }
    }
}

impl OutputFormatter for TerminalFormatter {
    fn format(&self, tree: &ResultTree) -> String {
        let mut output = String::new();

        // Header
        output.push_str(RULE);
        output.push('\n');
        output.push_str("meraki-health-check report\n");
        output.push_str(&format!("Timestamp: {}\n", tree.timestamp.format("%Y-%m-%dT%H:%M:%SZ")));
        output.push_str(RULE);
        output.push_str("\n\n");

        for (org_id, org) in &tree.organizations {
            output.push_str(&format!("ORGANIZATION {}\n", self.bold(org_id)));
            match org {
                EntityResult::Failed { error } => {
                    output.push_str(&format!("  {} {}\n", self.red("[ERROR]"), error));
                }
                EntityResult::Completed(report) => {
                    for (name, result) in &report.org_checks {
                        self.write_check(&mut output, "  ", name, result);
                    }
                    for (network_id, network) in &report.networks {
                        self.write_network(&mut output, network_id, network);
                    }
                }
            }
            output.push('\n');
        }

        // Summary
        let summary = tree.summary();
        output.push_str(RULE);
        output.push('\n');
        output.push_str(&format!(
            "SUMMARY: {} organizations, {} networks, {} passed, {} failed, {} errors\n",
            summary.organizations,
            summary.networks,
            summary.checks_passed,
            summary.checks_failed,
            summary.failed_organizations + summary.failed_networks
        ));
        output.push_str(&format!(
            "Issues: {} high, {} medium, {} low\n",
            summary.issues_high, summary.issues_medium, summary.issues_low
        ));
        output.push_str(&format!(
            "Total time: {:.1}s\n",
            tree.total_duration_ms as f64 / 1000.0
        ));

        let exit_desc = match summary.exit_code() {
            1 => "failures detected",
            2 => "warnings detected",
            _ => "all checks passed",
        };
        output.push_str(&format!("Exit code: {} ({})\n", summary.exit_code(), exit_desc));
        output.push_str(RULE);

        output
    }
}

/// JSON formatter
pub struct JsonFormatter {
    pretty: bool,
}

#[derive(Serialize)]
struct JsonReport<'a> {
    summary: ResultSummary,
    #[serde(flatten)]
    tree: &'a ResultTree,
}

impl JsonFormatter {
    pub fn new(pretty: bool) -> Self {
        JsonFormatter { pretty }
    }
}

impl OutputFormatter for JsonFormatter {
    fn format(&self, tree: &ResultTree) -> String {
        let report = JsonReport {
            summary: tree.summary(),
            tree,
        };
        let rendered = if self.pretty {
            serde_json::to_string_pretty(&report)
        } else {
            serde_json::to_string(&report)
        };
        rendered.unwrap_or_else(|e| serde_json::json!({ "error": e.to_string() }).to_string())
    }
}

/// JUnit XML formatter
///
/// One test suite per organization. Each check result is a test case; a
/// check with issues is a failure, a failed organization or network is an
/// error.
pub struct JunitFormatter;

impl JunitFormatter {
    pub fn new() -> Self {
        JunitFormatter
    }

    fn escape_xml(s: &str) -> String {
        let mut result = String::with_capacity(s.len());
        for c in s.chars() {
            match c {
                '&' => result.push_str("&amp;"),
                '<' => result.push_str("&lt;"),
                '>' => result.push_str("&gt;"),
                '"' => result.push_str("&quot;"),
                '\'' => result.push_str("&apos;"),
                c => result.push(c),
            }
        }
        result
    }

    fn testcase(output: &mut String, classname: &str, name: &str, result: &CheckResult) {
        output.push_str(&format!(
            "    <testcase name=\"{}\" classname=\"{}\"",
            Self::escape_xml(name),
            Self::escape_xml(classname)
        ));
        if result.is_ok() {
            output.push_str(" />\n");
            return;
        }

        let body: Vec<String> = result.issues().iter().map(|i| i.to_string()).collect();
        output.push_str(">\n");
        output.push_str(&format!(
            "      <failure message=\"{} issue(s)\">{}</failure>\n",
            result.issues().len(),
            Self::escape_xml(&body.join("\n"))
        ));
        output.push_str("    </testcase>\n");
    }

    fn error_case(output: &mut String, classname: &str, name: &str, error: &str) {
        output.push_str(&format!(
            "    <testcase name=\"{}\" classname=\"{}\">\n",
            Self::escape_xml(name),
            Self::escape_xml(classname)
        ));
        output.push_str(&format!(
            "      <error message=\"{}\" />\n",
            Self::escape_xml(error)
        ));
        output.push_str("    </testcase>\n");
    }
}

impl Default for JunitFormatter {
    fn default() -> Self {
        Self::new()
    }
}

impl OutputFormatter for JunitFormatter {
    fn format(&self, tree: &ResultTree) -> String {
        let mut output = String::new();
        output.push_str("<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n");

        let summary = tree.summary();
        let errors = summary.failed_organizations + summary.failed_networks;
        output.push_str(&format!(
            "<testsuites tests=\"{}\" failures=\"{}\" errors=\"{}\" time=\"{:.3}\">\n",
            summary.checks_run + errors,
            summary.checks_failed,
            errors,
            tree.total_duration_ms as f64 / 1000.0
        ));

        let entries = tree.check_entries();
        let failed = tree.failed_entities();

        for org_id in tree.organizations.keys() {
            let org_entries: Vec<_> = entries.iter().filter(|(_, e)| e.org_id == org_id.as_str()).collect();
            let org_failed: Vec<_> = failed.iter().filter(|f| f.org_id == org_id.as_str()).collect();
            let suite_failures = org_entries.iter().filter(|(_, e)| !e.result.is_ok()).count();

            output.push_str(&format!(
                "  <testsuite name=\"organization.{}\" tests=\"{}\" failures=\"{}\" errors=\"{}\">\n",
                Self::escape_xml(org_id),
                org_entries.len() + org_failed.len(),
                suite_failures,
                org_failed.len()
            ));

            for (label, entry) in org_entries {
                let classname = match entry.network_id {
                    Some(network_id) => format!("meraki-health-check.{}.{}", org_id, network_id),
                    None => format!("meraki-health-check.{}", org_id),
                };
                Self::testcase(&mut output, &classname, label, entry.result);
            }

            for entity in org_failed {
                match entity.network_id {
                    Some(network_id) => Self::error_case(
                        &mut output,
                        &format!("meraki-health-check.{}", org_id),
                        &format!("network {}", network_id),
                        entity.error,
                    ),
                    None => Self::error_case(
                        &mut output,
                        "meraki-health-check",
                        &format!("organization {}", org_id),
                        entity.error,
                    ),
                }
            }

            output.push_str("  </testsuite>\n");
        }

        output.push_str("</testsuites>");
        output
    }
}

/// Get a formatter based on the output format
pub fn get_formatter(
    format: OutputFormat,
    color: bool,
    verbose: bool,
    quiet: bool,
) -> Box<dyn OutputFormatter> {
    match format {
        OutputFormat::Text => Box::new(TerminalFormatter::new(color, verbose, quiet)),
        OutputFormat::Json => Box::new(JsonFormatter::new(true)),
        OutputFormat::Junit => Box::new(JunitFormatter::new()),
    }
}
