pub mod config;
pub mod dump;
pub mod utils;
pub mod version;

pub mod filter {
    pub mod comments;
    pub mod source;
}
