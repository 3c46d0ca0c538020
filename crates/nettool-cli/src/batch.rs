//! Parallel batch subnetting using Rayon
//!
//! Each input line is either `a.b.c.d/p` or `a.b.c.d p`. Blank lines and
//! `#` comments are skipped. A bad line yields an error entry and does not
//! stop the batch.

use anyhow::{Context, Result};
use nettool_subnet::{SubnetInput, SubnetResult};
use rayon::prelude::*;
use serde::Serialize;
use std::io::{BufRead, BufReader, Read};
use std::sync::atomic::{AtomicUsize, Ordering};

/// Batch processing result
#[derive(Debug, Clone, Serialize)]
pub struct BatchResult {
    pub input: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<SubnetResult>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Batch processor with parallel execution
pub struct BatchProcessor {
    thread_pool: rayon::ThreadPool,
}

impl BatchProcessor {
    /// Create a new batch processor
    ///
    /// # Arguments
    ///
    /// * `num_threads` - Number of threads (default: CPU cores)
    pub fn new(num_threads: Option<usize>) -> Result<Self> {
        let num_threads = num_threads.unwrap_or_else(num_cpus::get).max(1);

        let thread_pool = rayon::ThreadPoolBuilder::new()
            .num_threads(num_threads)
            .build()?;

        Ok(Self { thread_pool })
    }

    /// Calculate every line in parallel, keeping input order
    pub fn process(&self, lines: Vec<String>) -> Vec<BatchResult> {
        let total = lines.len();
        let processed = AtomicUsize::new(0);

        self.thread_pool.install(|| {
            lines
                .into_par_iter()
                .map(|line| {
                    let outcome = parse_line(&line).map(|input| input.calculate());

                    let count = processed.fetch_add(1, Ordering::Relaxed) + 1;
                    if count % 1000 == 0 || count == total {
                        tracing::info!("Processed {}/{} subnets", count, total);
                    }

                    match outcome {
                        Ok(result) => BatchResult {
                            input: line,
                            result: Some(result),
                            error: None,
                        },
                        Err(e) => BatchResult {
                            input: line,
                            result: None,
                            error: Some(e.to_string()),
                        },
                    }
                })
                .collect()
        })
    }

    /// Get thread pool info
    pub fn thread_count(&self) -> usize {
        self.thread_pool.current_num_threads()
    }
}

/// Accept both `a.b.c.d/p` and `a.b.c.d p`
fn parse_line(line: &str) -> nettool_subnet::Result<SubnetInput> {
    let fields: Vec<&str> = line.split_whitespace().collect();
    match fields.as_slice() {
        [address, prefix] => SubnetInput::parse(address, prefix),
        _ => line.trim().parse(),
    }
}

/// Read batch lines from a file, or stdin for `None` / `-`
pub fn read_inputs(file: Option<&str>) -> Result<Vec<String>> {
    let reader: Box<dyn Read> = match file {
        None | Some("-") => Box::new(std::io::stdin()),
        Some(path) => Box::new(
            std::fs::File::open(path).with_context(|| format!("cannot open {}", path))?,
        ),
    };
    collect_lines(BufReader::new(reader))
}

fn collect_lines<R: BufRead>(reader: R) -> Result<Vec<String>> {
    let mut lines = Vec::new();
    for line in reader.lines() {
        let line = line?;
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }
        lines.push(trimmed.to_string());
    }
    Ok(lines)
}
