// The removal workflow: search, confirm, deregister, delete, log. Each step
// runs once, in order. Errors are returned to the caller, which owns the
// exit code.

use crate::api::{ApiClient, DateRange};
use crate::report;
use crate::ui::{self, Operator};
use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use log::info;
use std::path::{Path, PathBuf};

/// How a run ended when no error occurred.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// Devices were deregistered, deleted and logged.
    Completed { removed: usize, log_file: PathBuf },
    /// The search found nothing older than the cutoff.
    NothingToDo,
    /// The operator did not confirm. No changes were made.
    Declined,
}

impl Outcome {
    /// Only a completed removal exits successfully.
    pub fn exit_code(&self) -> u8 {
        match self {
            Outcome::Completed { .. } => 0,
            Outcome::NothingToDo | Outcome::Declined => 1,
        }
    }
}

/// Run one removal pass for sensors silent for `days` days as of `now`.
/// The CSV log is written to `output_dir`.
pub fn run<O: Operator>(
    api: &ApiClient,
    operator: &mut O,
    days: u32,
    output_dir: &Path,
    now: DateTime<Utc>,
) -> Result<Outcome> {
    let range = DateRange::days_before(now, days)
        .with_context(|| format!("{days} days before now is outside the supported date range"))?;
    info!("searching for devices last seen between {} and {}", range.start, range.end);

    let pb = ui::spinner("Searching for devices...")?;
    let found = api.search(&range);
    pb.finish_and_clear();
    let devices = found.context("API request failed, exiting without making any changes")?;

    println!(
        "Found {} that are older than {} days and still active.",
        devices.len(),
        days
    );
    if devices.is_empty() {
        println!("Nothing to do, exiting");
        return Ok(Outcome::NothingToDo);
    }

    println!("The following devices will be set to deregistered and then deleted:");
    for d in &devices {
        println!("    Name = {}, Device_ID = {}", d.name, d.id);
    }

    let answer = operator.answer("Continue? (y/n)")?;
    if !ui::is_confirmation(&answer) {
        println!("Exiting without making changes");
        return Ok(Outcome::Declined);
    }

    println!("Deregistering Sensors...");
    api.deregister(&devices).context("Exiting without making any changes")?;
    info!("deregistered {} sensors", devices.len());

    println!("Deleting Sensors...");
    api.delete(&devices).context("Sensors were deregistered but not deleted")?;
    info!("deleted {} sensors", devices.len());

    let log_file = report::write_log(output_dir, now.timestamp(), &devices)?;
    println!("Done! List of devices removed saved to {}", log_file.display());
    Ok(Outcome::Completed {
        removed: devices.len(),
        log_file,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exit_codes() {
        let done = Outcome::Completed {
            removed: 1,
            log_file: PathBuf::from("deletions_1_log.csv"),
        };
        assert_eq!(done.exit_code(), 0);
        assert_eq!(Outcome::NothingToDo.exit_code(), 1);
        assert_eq!(Outcome::Declined.exit_code(), 1);
    }
}
