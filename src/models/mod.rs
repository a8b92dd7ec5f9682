pub mod account;
pub mod playground;
pub mod template;
