pub mod codec;
pub mod level;
pub mod save;
