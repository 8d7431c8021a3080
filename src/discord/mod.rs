mod bot;
pub mod commands;
mod embeds;
mod guild;
mod notifier;

pub use bot::{build_client, create_framework};
