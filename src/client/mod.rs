pub mod card;
pub mod history;
pub mod session;

pub use card::WordCard;
