pub mod ai;
pub mod arcade;
pub mod combat;
pub mod compute;
pub mod config;
pub mod contacts;
pub mod entities;
pub mod input;
pub mod level;
pub mod progression;
pub mod schedule;
