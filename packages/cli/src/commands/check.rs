use crate::snapshot::{load_document, load_operations};
use anyhow::{anyhow, Result};
use clap::Args;
use colored::Colorize;
use folio_editor::{Document, Operation, OperationError};
use folio_model::Element;
use serde_json::Value;
use std::path::PathBuf;

#[derive(Debug, Args)]
pub struct CheckArgs {
    /// Document snapshot to start from
    pub document: PathBuf,

    /// JSON array of operations to check in order
    pub operations: PathBuf,
}

/// Outcome of checking one operation
#[derive(Debug, PartialEq)]
pub enum CheckStatus {
    /// Applied, and its reverse restored every root
    Invertible,
    /// Applied, but applying the reverse left a root different
    NotInvertible,
    /// The reverse itself was rejected
    ReverseRejected(&'static str),
    /// The operation could not be decoded or applied
    Rejected(&'static str),
}

#[derive(Debug)]
pub struct CheckReport {
    pub index: usize,
    pub variant: Option<&'static str>,
    pub status: CheckStatus,
}

impl CheckReport {
    pub fn passed(&self) -> bool {
        self.status == CheckStatus::Invertible
    }
}

pub fn check(args: CheckArgs, cwd: &str) -> Result<()> {
    let mut document = load_document(&args.document, cwd)?;
    let operations = load_operations(&args.operations)?;

    println!(
        "{}",
        format!("🔍 Checking {} operations...", operations.len())
            .bright_blue()
            .bold()
    );

    let reports = check_all(&mut document, &operations);

    for report in &reports {
        let variant = report.variant.unwrap_or("?");
        match &report.status {
            CheckStatus::Invertible => {
                println!("  {} #{} {}", "✓".green(), report.index, variant)
            }
            CheckStatus::NotInvertible => println!(
                "  {} #{} {} reverse did not restore the document",
                "✗".red(),
                report.index,
                variant
            ),
            CheckStatus::ReverseRejected(code) => println!(
                "  {} #{} {} reverse rejected [{}]",
                "✗".red(),
                report.index,
                variant,
                code.yellow()
            ),
            CheckStatus::Rejected(code) => println!(
                "  {} #{} {} rejected [{}]",
                "✗".red(),
                report.index,
                variant,
                code.yellow()
            ),
        }
    }

    let failed = reports.iter().filter(|report| !report.passed()).count();
    println!();

    if failed > 0 {
        return Err(anyhow!("{failed} of {} operations failed", reports.len()));
    }

    println!("{}", "✅ All operations are invertible".green().bold());
    Ok(())
}

/// Check each operation in turn. For every operation, a copy of the document
/// gets the operation and then its reverse; the copy's roots must equal the
/// document's roots before the operation. The operation is then applied to
/// `document` itself so the next one sees the expected version. Checking
/// stops after the first operation that cannot be applied.
pub fn check_all(document: &mut Document, operations: &[Value]) -> Vec<CheckReport> {
    let mut reports = Vec::with_capacity(operations.len());

    for (index, value) in operations.iter().enumerate() {
        let operation = match Operation::from_json(value, document) {
            Ok(operation) => operation,
            Err(err) => {
                reports.push(CheckReport {
                    index,
                    variant: None,
                    status: CheckStatus::Rejected(err.code()),
                });
                break;
            }
        };

        let variant = Some(operation.variant_name());
        let status = probe(document, &operation);

        if let Err(err) = document.apply_operation(operation) {
            reports.push(CheckReport {
                index,
                variant,
                status: CheckStatus::Rejected(err.code()),
            });
            break;
        }

        reports.push(CheckReport {
            index,
            variant,
            status,
        });
    }

    reports
}

fn probe(document: &Document, operation: &Operation) -> CheckStatus {
    let before = roots_of(document);
    let mut copy = document.clone();

    let result: Result<(), OperationError> = copy
        .apply_operation(operation.clone())
        .and_then(|_| copy.apply_operation(operation.reverse()).map(|_| ()));

    match result {
        Err(err) if copy.version() == document.version() => CheckStatus::Rejected(err.code()),
        Err(err) => CheckStatus::ReverseRejected(err.code()),
        Ok(()) if roots_of(&copy) == before => CheckStatus::Invertible,
        Ok(()) => CheckStatus::NotInvertible,
    }
}

fn roots_of(document: &Document) -> Vec<(String, Element)> {
    document
        .root_names()
        .filter_map(|name| document.root(name).map(|root| (name.to_string(), root.clone())))
        .collect()
}
