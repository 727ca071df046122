//! Database layer: connection pool, migrations, and the restrictive-delete
//! registry.

pub mod integrity;
pub mod migrations;
pub mod pool;
