pub mod roster;
pub mod settings;

pub use roster::get_roster;
