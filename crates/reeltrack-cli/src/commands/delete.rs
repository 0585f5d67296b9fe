use super::{prompts, resolve_id, AppContext};
use crate::output::Output;
use color_eyre::eyre::eyre;
use color_eyre::Result;

pub fn run_delete(ctx: &AppContext, id: &str, yes: bool, output: &Output) -> Result<()> {
    let manager = ctx.open_manager()?;
    let id = resolve_id(&manager.items(), id)?;

    if !manager.request_delete(&id) {
        return Err(eyre!("No item with id '{}'", id));
    }
    let item = manager
        .pending_delete()
        .ok_or_else(|| eyre!("No item with id '{}'", id))?;

    let confirmed = yes
        || prompts::confirm(
            &format!("Remove \"{}\" ({}) from your list?", item.title, item.year),
            false,
        )?;

    if !confirmed {
        manager.cancel_delete();
        output.info("Kept it.");
        return Ok(());
    }

    match manager.confirm_delete() {
        Some(_) => {
            if let Some(notice) = manager.take_notice() {
                output.notice(&notice);
            }
            Ok(())
        }
        None => Err(eyre!("'{}' was already removed", item.title)),
    }
}
