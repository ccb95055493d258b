//! Permissions command handler.
//!
//! `status` prints the onboarding state. `grant` goes through the
//! onboarding request flow so first-launch completion is recorded once
//! every grant is held. `revoke` clears a grant flag.

use anyhow::Result;

use appshelf_core::{OnboardingState, Permission};

use crate::bootstrap::CliContext;
use crate::commands::PermissionsCommand;
use crate::error::CliError;

/// Execute a permissions subcommand; `None` means `status`.
pub async fn execute(ctx: &CliContext, command: Option<PermissionsCommand>) -> Result<()> {
    let state = match command.unwrap_or(PermissionsCommand::Status) {
        PermissionsCommand::Status => ctx.onboarding().check().map_err(CliError::from)?,
        PermissionsCommand::Grant { permission } => {
            let state = ctx
                .onboarding()
                .request(permission)
                .await
                .map_err(CliError::from)?;
            println!("✓ {permission} permission granted");
            state
        }
        PermissionsCommand::Revoke { permission } => {
            ctx.permissions
                .set_granted(permission, false)
                .map_err(CliError::from)?;
            println!("✓ {permission} permission revoked");
            ctx.onboarding().refresh().map_err(CliError::from)?
        }
    };

    print_state(&state);
    Ok(())
}

fn print_state(state: &OnboardingState) {
    println!("Permissions:");
    for permission in Permission::ALL {
        let mark = if state.is_granted(permission) { "granted" } else { "missing" };
        println!("  {:<22} {mark}", permission.label());
    }
    if state.show_permission_screen {
        println!("\nSetup incomplete. Grant the missing permissions with:");
        println!("  appshelf permissions grant <install|background|notifications>");
    } else {
        println!("\nSetup complete.");
    }
}
