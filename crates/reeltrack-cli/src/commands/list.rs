use super::{resolve_id, AppContext};
use crate::output::Output;
use crate::render;
use color_eyre::eyre::eyre;
use color_eyre::Result;
use media_list_models::WatchStatus;

pub fn run_list(ctx: &AppContext, tab: WatchStatus, filter: &str, output: &Output) -> Result<()> {
    let manager = ctx.open_manager()?;
    let view = manager.derived_view(tab, filter);
    output.data(&view, render::view_table);
    Ok(())
}

pub fn run_show(ctx: &AppContext, id: &str, output: &Output) -> Result<()> {
    let manager = ctx.open_manager()?;
    let id = resolve_id(&manager.items(), id)?;
    let item = manager
        .get(&id)
        .ok_or_else(|| eyre!("No item with id '{}'", id))?;
    output.data(&item, render::item_card);
    Ok(())
}
