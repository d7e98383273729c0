use anyhow::Result;
use invite_core::{FileUnlockStore, InviteConfig, UnlockStore};

pub fn run(config: &InviteConfig, slug: &str) -> Result<()> {
    let mut store = FileUnlockStore::open(config.unlock_store_path()?);

    if !store.is_unlocked(slug) {
        println!("'{}' is already locked", slug);
        return Ok(());
    }

    store.clear(slug)?;
    println!("Locked '{}'", slug);
    Ok(())
}
