pub mod crypto;
pub mod db;
pub mod events;
pub mod gateway;
