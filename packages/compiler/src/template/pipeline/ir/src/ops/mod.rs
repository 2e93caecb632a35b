pub mod create;
pub mod update;
