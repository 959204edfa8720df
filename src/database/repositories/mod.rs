pub mod availability;
pub mod catalog;
pub mod fixture;
pub mod join_request;
pub mod standings;
pub mod team;
pub mod teamsheet;
pub mod user;
