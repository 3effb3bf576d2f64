//! Open the whole diary in the configured editor.

use super::DiaryContext;
use crate::editor::Editor;
use crate::errors::AppResult;
use tracing::{debug, info};

/// Hands the decrypted diary to `editor` and stores whatever it leaves behind.
///
/// The edited content is not interpreted. If the editor fails (not found,
/// non-zero exit) nothing is saved and the working copy is removed.
///
/// # Errors
///
/// Returns an error if:
/// - The diary cannot be read or decrypted
/// - The editor fails to launch or exits with a non-zero status
/// - The diary cannot be encrypted or stored
pub fn edit_diary(ctx: &DiaryContext<'_>, editor: &dyn Editor) -> AppResult<()> {
    let session = ctx.acquire()?;

    debug!("Opening working copy in editor");
    editor.edit(session.working_copy().path())?;

    session.commit()?;
    info!("Diary saved after edit");
    Ok(())
}
