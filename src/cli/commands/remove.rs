//! packsize remove - Remove a catalog entry

use clap::Args;

use crate::app::AppContext;
use crate::catalog::parse_package_id;
use crate::error::Result;

#[derive(Args, Debug)]
pub struct RemoveArgs {
    /// Package id as printed by `packsize list`
    pub id: String,
}

pub fn run(ctx: &AppContext, args: &RemoveArgs) -> Result<()> {
    let entry = ctx.catalog.delete(parse_package_id(&args.id)?)?;
    super::emit_entry(ctx, "removed", &entry)
}
