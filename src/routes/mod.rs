pub mod system_hook;
pub mod webhook_handler;
