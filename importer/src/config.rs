//! Import configuration and report.

use std::fmt;

use crate::error::ImportError;

/// Rows per batch when none is given.
pub const DEFAULT_BATCH_SIZE: usize = 1000;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ImportConfig {
    /// Classify rows without writing to the target.
    pub dry_run: bool,
    /// Rows per transactional batch.
    pub batch_size: usize,
}

impl Default for ImportConfig {
    fn default() -> Self {
        Self {
            dry_run: false,
            batch_size: DEFAULT_BATCH_SIZE,
        }
    }
}

impl ImportConfig {
    pub fn validate(&self) -> Result<(), ImportError> {
        if self.batch_size == 0 {
            return Err(ImportError::InvalidBatchSize);
        }
        Ok(())
    }
}

/// Outcome of comparing the target's row count before and after a live run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verification {
    /// Dry run; nothing to verify.
    Skipped,
    Matched,
    /// The target grew by `actual` rows while `expected` were reported imported.
    Mismatch { expected: u64, actual: u64 },
}

/// Counts for one run. Dry runs fill the same fields as live runs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportReport {
    pub total_source: u64,
    pub imported: u64,
    pub skipped_duplicate: u64,
    /// Rows missing a required field.
    pub skipped_invalid: u64,
    pub warnings: Vec<String>,
    pub target_before: u64,
    pub dry_run: bool,
    pub verification: Verification,
}

impl ImportReport {
    pub(crate) fn new(total_source: u64, target_before: u64, dry_run: bool) -> Self {
        Self {
            total_source,
            imported: 0,
            skipped_duplicate: 0,
            skipped_invalid: 0,
            warnings: Vec::new(),
            target_before,
            dry_run,
            verification: Verification::Skipped,
        }
    }

    pub fn is_anomalous(&self) -> bool {
        matches!(self.verification, Verification::Mismatch { .. })
    }
}

impl fmt::Display for ImportReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mode = if self.dry_run { "DRY RUN" } else { "LIVE" };
        writeln!(f, "Import summary ({mode})")?;
        writeln!(f, "  Source quotes:      {}", self.total_source)?;
        writeln!(f, "  Target before:      {}", self.target_before)?;
        if self.dry_run {
            writeln!(f, "  Would import:       {}", self.imported)?;
        } else {
            writeln!(f, "  Imported:           {}", self.imported)?;
        }
        writeln!(f, "  Skipped duplicates: {}", self.skipped_duplicate)?;
        writeln!(f, "  Skipped invalid:    {}", self.skipped_invalid)?;
        writeln!(f, "  Warnings:           {}", self.warnings.len())?;
        match self.verification {
            Verification::Skipped => write!(f, "  Verification:       skipped"),
            Verification::Matched => write!(
                f,
                "  Verification:       ok (target now {})",
                self.target_before + self.imported
            ),
            Verification::Mismatch { expected, actual } => write!(
                f,
                "  Verification:       MISMATCH (expected +{expected}, target grew by {actual})"
            ),
        }
    }
}
