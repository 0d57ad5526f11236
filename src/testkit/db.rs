//! SQLite pools for store tests.

use crate::adapter::outbound::sqlite::database::connection::{create_pool, run_migrations, DbPool};

/// A migrated in-memory database.
///
/// The pool holds a single connection, since every `:memory:` connection
/// is its own database.
pub fn memory_pool() -> DbPool {
    let pool = create_pool(":memory:").expect("in-memory sqlite pool should initialize");
    run_migrations(&pool).expect("migrations should apply");
    pool
}
