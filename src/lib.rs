pub mod app;
pub mod collections;
pub mod core;
pub mod dispatch;
pub mod fsm;
pub mod journal;
pub mod model;
pub mod persist;

include!(concat!(env!("OUT_DIR"), "/version.rs"));
