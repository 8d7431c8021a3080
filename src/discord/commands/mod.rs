mod debug;
mod rank;
mod ranking;
mod register;
mod unregister;

pub use debug::{debug_modify_rank, debug_rank_all_iron, debug_sync};
pub use rank::rank;
pub use ranking::ranking;
pub use register::{register, register_by_other};
pub use unregister::unregister;
