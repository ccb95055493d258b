//! Paths command handler.

use anyhow::Result;

use crate::bootstrap::CliContext;

/// Print every resolved path in `key = value` form.
pub fn execute(ctx: &CliContext) -> Result<()> {
    println!("{}", ctx.paths());
    Ok(())
}
