//! Add today's entry to the diary.

use super::DiaryContext;
use crate::errors::{AppError, AppResult};
use crate::journal_core::{compose, contains_entry, date_stamp, Composition};
use chrono::{DateTime, TimeZone};
use std::fmt::Display;
use std::fs;
use tracing::{debug, info};
use zeroize::Zeroizing;

/// Prepends a dated entry for `now` and stores the diary.
///
/// # Flow
///
/// 1. Compute the date stamp from `DateFormat`
/// 2. Acquire the staging session (decrypting if `Encrypt` is set)
/// 3. Stop if the diary already mentions the stamp
/// 4. Read `template.md` and compose the new content into the working copy
/// 5. Commit
///
/// # Errors
///
/// Returns an error if:
/// - `DateFormat` is invalid
/// - The diary cannot be read or decrypted
/// - The diary already contains today's stamp (`AppError::EntryAlreadyExists`)
/// - The template cannot be read or is malformed
/// - The diary cannot be encrypted or stored
///
/// The durable diary is unchanged in every error case.
pub fn add_entry<Tz>(ctx: &DiaryContext<'_>, now: &DateTime<Tz>) -> AppResult<()>
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    let stamp = date_stamp(&ctx.settings.date_format, now)?;

    let session = ctx.acquire()?;
    let existing = session.working_copy().read_to_string()?;

    if contains_entry(&existing, &stamp) {
        debug!("Date stamp {} already present, not adding", stamp);
        session.discard();
        return Err(AppError::EntryAlreadyExists { date: stamp });
    }

    let template = read_template(ctx)?;
    let content = match compose(&existing, &stamp, &template)? {
        Composition::Added(content) => Zeroizing::new(content),
        Composition::AlreadyPresent => return Err(AppError::EntryAlreadyExists { date: stamp }),
    };

    session.working_copy().write(content.as_bytes())?;
    session.commit()?;
    info!("Added entry for {}", stamp);
    Ok(())
}

fn read_template(ctx: &DiaryContext<'_>) -> AppResult<String> {
    let path = &ctx.paths.template_file;
    fs::read_to_string(path).map_err(|e| {
        AppError::Config(format!(
            "Unable to read template {}: {}",
            path.display(),
            e
        ))
    })
}
