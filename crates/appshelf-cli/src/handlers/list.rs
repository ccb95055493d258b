//! List command handler.
//!
//! Prints the catalog as a table. Packages whose artifact already exists in
//! the download directory are marked as downloaded.

use anyhow::Result;

use appshelf_core::CatalogView;

use crate::bootstrap::CliContext;
use crate::error::CliError;
use crate::presentation::{format_size, print_separator, truncate_string};

/// Execute the list command.
pub async fn execute(ctx: &CliContext) -> Result<()> {
    let view = ctx.catalog().load().await;
    if let Some(err) = CliError::from_catalog(&view) {
        return Err(err.into());
    }

    if view.items.is_empty() {
        println!("No apps found in the catalog.");
        println!("Catalog file: {}", ctx.paths().catalog_path.display());
        return Ok(());
    }

    print_table(ctx, &view);
    Ok(())
}

fn print_table(ctx: &CliContext, view: &CatalogView) {
    println!("Found {} app(s):\n", view.items.len());
    println!(
        "{:<32} {:<24} {:<12} {:>9}  Status",
        "Key", "Name", "Version", "Size"
    );
    print_separator(90);

    for item in &view.items {
        let size = item
            .expected_size_hint
            .map_or_else(|| "--".to_string(), format_size);
        let status = if ctx.downloads().destination_for(item).is_file() {
            "downloaded"
        } else {
            ""
        };
        println!(
            "{:<32} {:<24} {:<12} {:>9}  {}",
            truncate_string(&item.key, 31),
            truncate_string(&item.display_name, 23),
            truncate_string(&item.version, 11),
            size,
            status
        );
    }
}
