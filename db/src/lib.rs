#[macro_use]
extern crate diesel;
#[macro_use]
extern crate log;

use std::env;

use diesel::pg::PgConnection;
use diesel::r2d2::{ConnectionManager, Pool, PooledConnection};
use r2d2::Error;

pub type PgPool = Pool<ConnectionManager<PgConnection>>;
pub type Connection = PooledConnection<ConnectionManager<PgConnection>>;
pub mod models;
pub mod schema;
pub mod utils;

const DEFAULT_POOL_SIZE: u32 = 10;

pub fn get_conn(pool: &PgPool) -> Result<Connection, Error> {
    pool.get().map_err(|err| {
        error!("Failed to get connection - {}", err.to_string());
        err.into()
    })
}

pub fn new_pool() -> PgPool {
    let database_url = env::var("DATABASE_URL").expect("DATABASE_URL must be set");
    let pool_size = env::var("DATABASE_POOL_SIZE")
        .ok()
        .and_then(|size| size.parse::<u32>().ok())
        .unwrap_or(DEFAULT_POOL_SIZE);
    let manager = ConnectionManager::<PgConnection>::new(database_url);

    Pool::builder()
        .max_size(pool_size)
        .build(manager)
        .expect("failed to create db pool")
}
