//! Infrastructure layer - database connection, state assembly and error mapping.

pub mod db;
pub mod db_errors;
pub mod state;
