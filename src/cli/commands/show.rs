//! packsize show - Show one catalog entry

use clap::Args;

use crate::app::AppContext;
use crate::catalog::parse_package_id;
use crate::error::Result;

#[derive(Args, Debug)]
pub struct ShowArgs {
    /// Package id as printed by `packsize list`
    pub id: String,
}

pub fn run(ctx: &AppContext, args: &ShowArgs) -> Result<()> {
    let entry = ctx.catalog.get(parse_package_id(&args.id)?)?;
    super::emit_entry(ctx, "found", &entry)
}
