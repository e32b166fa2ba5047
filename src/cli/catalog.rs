use std::io::Write;

use clap::Args;
use harvest::receipt;

use super::CliStore;

#[derive(Debug, Args)]
pub(crate) struct CatalogArgs {
    /// Only show products in this category (case-insensitive)
    #[arg(long)]
    category: Option<String>,
}

pub(crate) fn run(store: &CliStore, args: &CatalogArgs, out: &mut impl Write) -> Result<(), String> {
    let catalog = store.catalog();

    let result = match &args.category {
        Some(category) => receipt::write_catalog(&mut *out, catalog.in_category(category)),
        None => receipt::write_catalog(&mut *out, catalog.iter()),
    };

    result.map_err(|error| format!("failed to write catalog: {error}"))?;

    if args.category.is_none() {
        super::write_line(
            out,
            &format!("Categories: {}", catalog.categories().join(", ")),
        )?;
    }

    Ok(())
}
