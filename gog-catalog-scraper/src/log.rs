use std::path::Path;

use crate::resolve::ReferenceStats;

/// Outcome of one listing product.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LogEntry {
    Created {
        title: String,
        slug: String,
        images_uploaded: usize,
        warnings: Vec<String>,
    },
    /// Created without rating or descriptions because the detail page failed.
    DetailMissing {
        title: String,
        slug: String,
        reason: String,
        images_uploaded: usize,
        warnings: Vec<String>,
    },
    /// A game with the same name already existed.
    Skipped { title: String },
    Failed { title: String, message: String },
}

/// Collects per-product outcomes of a populate run.
#[derive(Debug, Default)]
pub struct PopulateLog {
    entries: Vec<LogEntry>,
    references: ReferenceStats,
}

impl PopulateLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, entry: LogEntry) {
        self.entries.push(entry);
    }

    pub fn entries(&self) -> &[LogEntry] {
        &self.entries
    }

    pub fn set_references(&mut self, stats: ReferenceStats) {
        self.references = stats;
    }

    pub fn references(&self) -> &ReferenceStats {
        &self.references
    }

    pub fn summary(&self) -> LogSummary {
        let mut summary = LogSummary {
            references_created: self.references.total_created(),
            references_existing: self.references.total_existing(),
            ..LogSummary::default()
        };
        for entry in &self.entries {
            match entry {
                LogEntry::Created {
                    images_uploaded,
                    warnings,
                    ..
                } => {
                    summary.created += 1;
                    summary.images_uploaded += images_uploaded;
                    summary.image_warnings += warnings.len();
                }
                LogEntry::DetailMissing {
                    images_uploaded,
                    warnings,
                    ..
                } => {
                    summary.detail_missing += 1;
                    summary.images_uploaded += images_uploaded;
                    summary.image_warnings += warnings.len();
                }
                LogEntry::Skipped { .. } => summary.skipped += 1,
                LogEntry::Failed { .. } => summary.failed += 1,
            }
        }
        summary
    }

    /// Write the log to a file.
    pub fn write_to_file(&self, path: &Path) -> std::io::Result<()> {
        use std::io::Write;

        let mut file = std::fs::File::create(path)?;
        let summary = self.summary();

        writeln!(file, "=== Populate Log ===")?;
        writeln!(
            file,
            "Date: {}",
            chrono::Local::now().format("%Y-%m-%d %H:%M:%S")
        )?;
        writeln!(file)?;
        writeln!(file, "--- Summary ---")?;
        writeln!(
            file,
            "References: {} created, {} existing",
            summary.references_created, summary.references_existing
        )?;
        writeln!(file, "Created: {}", summary.created)?;
        writeln!(file, "Detail missing: {}", summary.detail_missing)?;
        writeln!(file, "Skipped: {}", summary.skipped)?;
        writeln!(file, "Failed: {}", summary.failed)?;
        writeln!(file, "Images uploaded: {}", summary.images_uploaded)?;
        writeln!(file, "Image warnings: {}", summary.image_warnings)?;
        writeln!(file)?;
        writeln!(file, "--- Details ---")?;
        writeln!(file)?;

        for entry in &self.entries {
            match entry {
                LogEntry::Created {
                    title,
                    slug,
                    images_uploaded,
                    warnings,
                } => {
                    writeln!(
                        file,
                        "[OK] \"{}\" ({}), {} image(s)",
                        title, slug, images_uploaded
                    )?;
                    for w in warnings {
                        writeln!(file, "     Warning: {}", w)?;
                    }
                }
                LogEntry::DetailMissing {
                    title,
                    slug,
                    reason,
                    images_uploaded,
                    warnings,
                } => {
                    writeln!(
                        file,
                        "[NO DETAIL] \"{}\" ({}), {} image(s)",
                        title, slug, images_uploaded
                    )?;
                    writeln!(file, "     Reason: {}", reason)?;
                    for w in warnings {
                        writeln!(file, "     Warning: {}", w)?;
                    }
                }
                LogEntry::Skipped { title } => {
                    writeln!(file, "[SKIPPED] \"{}\" already exists", title)?;
                }
                LogEntry::Failed { title, message } => {
                    writeln!(file, "[ERROR] \"{}\": {}", title, message)?;
                }
            }
        }

        Ok(())
    }
}

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct LogSummary {
    pub created: usize,
    pub detail_missing: usize,
    pub skipped: usize,
    pub failed: usize,
    pub images_uploaded: usize,
    pub image_warnings: usize,
    pub references_created: usize,
    pub references_existing: usize,
}

impl LogSummary {
    /// Games written to the host in this run.
    pub fn games_created(&self) -> usize {
        self.created + self.detail_missing
    }
}
