use super::{resolve_id, AppContext};
use crate::output::Output;
use color_eyre::eyre::eyre;
use color_eyre::Result;
use media_list_models::WatchStatus;

pub fn run_set_status(ctx: &AppContext, id: &str, status: WatchStatus, output: &Output) -> Result<()> {
    let manager = ctx.open_manager()?;
    let id = resolve_id(&manager.items(), id)?;

    if !manager.set_status(&id, status) {
        return Err(eyre!("No item with id '{}'", id));
    }
    if let Some(notice) = manager.take_notice() {
        output.notice(&notice);
    }
    Ok(())
}

pub fn run_rate(ctx: &AppContext, id: &str, rating: u8, output: &Output) -> Result<()> {
    let manager = ctx.open_manager()?;
    let id = resolve_id(&manager.items(), id)?;

    if !manager.set_rating(&id, rating)? {
        return Err(eyre!("No item with id '{}'", id));
    }
    if let Some(item) = manager.get(&id) {
        let stars = item.user_rating.map(|r| r.stars()).unwrap_or_default();
        output.success(format!("Rated {}: {}", item.title, stars));
    }
    Ok(())
}
