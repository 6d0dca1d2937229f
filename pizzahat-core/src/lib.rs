use pizzahat_database::Database;
use pizzahat_ledger::WarnService;

pub type Error = anyhow::Error;

#[derive(Clone, Debug)]
pub struct Data {
    pub db: Database,
}

impl Data {
    /// Warn ledger backed by the shared Postgres handle.
    pub fn warn_service(&self, bot_user_id: u64) -> WarnService<Database> {
        WarnService::new(self.db.clone(), bot_user_id)
    }
}

pub type Context<'a> = poise::Context<'a, Data, Error>;
