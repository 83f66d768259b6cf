pub mod metrics;
pub mod providers;
pub mod user_store;

pub use metrics::{get_metrics, init_metrics};
pub use providers::TextGenerator;
pub use user_store::{InMemoryUserStore, PgUserStore, StoreError, UserStore};
