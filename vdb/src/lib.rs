pub mod error;

pub mod config;

pub mod catalog {
    pub mod column;

    pub mod registry;

    pub mod table_schema;

    pub mod ty;
}

pub mod exec {
    pub mod aggregate;

    pub mod predicate;

    pub mod query;

    pub mod tuple;

    pub mod value;
}

pub mod io {
    pub mod cache;

    pub mod memory;
}

mod db;
pub use db::Db;
