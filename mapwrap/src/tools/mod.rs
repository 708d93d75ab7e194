pub mod assets;
pub mod serve;
