//! packsize update - Change the size of a catalog entry

use clap::Args;

use crate::app::AppContext;
use crate::catalog::{parse_package_id, validate_size};
use crate::error::Result;

#[derive(Args, Debug)]
pub struct UpdateArgs {
    /// Package id as printed by `packsize list`
    pub id: String,

    /// New package size
    #[arg(allow_negative_numbers = true)]
    pub size: i64,
}

pub fn run(ctx: &AppContext, args: &UpdateArgs) -> Result<()> {
    let id = parse_package_id(&args.id)?;
    let size = validate_size(args.size)?;
    let entry = ctx.catalog.update(id, size)?;
    super::emit_entry(ctx, "updated", &entry)
}
