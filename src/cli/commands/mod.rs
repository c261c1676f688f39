mod recent;
mod search;

pub use recent::cmd_recent;
pub use search::cmd_search;
