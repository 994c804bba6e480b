// CSV export for sampling reports and season schedules, JSON for draws.

use std::fs::File;
use std::io::Write;
use std::path::Path;

use tracing::info;

use crate::lottery::session::{DrawRecord, SamplingReport};
use crate::schedule::builder::Schedule;

// ---------------------------------------------------------------------------
// Error types
// ---------------------------------------------------------------------------

#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    #[error("failed to create file {path}: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },

    #[error("CSV error writing {path}: {source}")]
    Csv { path: String, source: csv::Error },

    #[error("JSON error writing {path}: {source}")]
    Json {
        path: String,
        source: serde_json::Error,
    },
}

// ---------------------------------------------------------------------------
// Writer-based exports (usable with stdout or an in-memory buffer)
// ---------------------------------------------------------------------------

/// One row per seed: `seed` (1-indexed), `chances`, then the frequency of
/// landing on each draft position. Position columns are headed by the team
/// name at that seed index.
pub fn write_sampling_csv<W: Write>(report: &SamplingReport, out: W) -> Result<(), csv::Error> {
    let mut writer = csv::Writer::from_writer(out);

    let mut header = vec!["seed".to_string(), "chances".to_string()];
    header.extend(report.position_labels().iter().cloned());
    writer.write_record(&header)?;

    for (seed, row) in report.frequencies.iter().enumerate() {
        let mut record = vec![(seed + 1).to_string(), report.chances[seed].to_string()];
        record.extend(row.iter().map(|f| f.to_string()));
        writer.write_record(&record)?;
    }

    writer.flush()?;
    Ok(())
}

/// Opponent grid: a `Week` column, then one column per team. Idle cells
/// are left empty.
pub fn write_schedule_csv<W: Write>(schedule: &Schedule, out: W) -> Result<(), csv::Error> {
    let mut writer = csv::Writer::from_writer(out);

    let mut header = vec!["Week".to_string()];
    header.extend(schedule.teams.iter().cloned());
    writer.write_record(&header)?;

    for (week, row) in schedule.weeks.iter().zip(schedule.opponent_grid()) {
        let mut record = vec![format!("Week {}", week.number)];
        record.extend(row);
        writer.write_record(&record)?;
    }

    writer.flush()?;
    Ok(())
}

/// Pretty-printed draw record followed by a newline.
pub fn write_draw_json<W: Write>(record: &DrawRecord, mut out: W) -> Result<(), serde_json::Error> {
    serde_json::to_writer_pretty(&mut out, record)?;
    writeln!(out).map_err(serde_json::Error::io)
}

// ---------------------------------------------------------------------------
// Path-based exports
// ---------------------------------------------------------------------------

pub fn save_sampling_csv(report: &SamplingReport, path: &Path) -> Result<(), ExportError> {
    let file = create(path)?;
    write_sampling_csv(report, file).map_err(|e| ExportError::Csv {
        path: path.display().to_string(),
        source: e,
    })?;
    info!(path = %path.display(), seeds = report.frequencies.len(), "sampling report saved");
    Ok(())
}

pub fn save_schedule_csv(schedule: &Schedule, path: &Path) -> Result<(), ExportError> {
    let file = create(path)?;
    write_schedule_csv(schedule, file).map_err(|e| ExportError::Csv {
        path: path.display().to_string(),
        source: e,
    })?;
    info!(path = %path.display(), weeks = schedule.weeks.len(), "schedule saved");
    Ok(())
}

pub fn save_draw_json(record: &DrawRecord, path: &Path) -> Result<(), ExportError> {
    let file = create(path)?;
    write_draw_json(record, file).map_err(|e| ExportError::Json {
        path: path.display().to_string(),
        source: e,
    })?;
    info!(path = %path.display(), picks = record.order.len(), "draw saved");
    Ok(())
}

fn create(path: &Path) -> Result<File, ExportError> {
    File::create(path).map_err(|e| ExportError::Io {
        path: path.display().to_string(),
        source: e,
    })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
