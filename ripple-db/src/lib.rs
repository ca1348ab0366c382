pub mod client;
mod feeds;
mod follows;
mod likes;
mod record;

pub use follows::ToggleFollow;
pub use likes::ToggleLike;

pub static MIGRATOR: sqlx::migrate::Migrator = sqlx::migrate!();
