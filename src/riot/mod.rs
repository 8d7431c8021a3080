mod client;
mod endpoints {
    mod account;
    mod league;
}
mod region;
mod types;

pub use client::RiotClient;
pub use region::Platform;
pub use types::LeagueEntryDto;
