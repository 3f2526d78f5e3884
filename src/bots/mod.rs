pub mod computer;
pub mod human;
pub mod random;
pub mod registry;

pub use computer::ComputerBot;
pub use human::HumanBot;
pub use random::RandomBot;
