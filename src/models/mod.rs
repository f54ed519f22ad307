pub mod token;
pub mod track;

pub use token::TokenResponse;
pub use track::{AlbumImage, Track};
