pub mod download;
pub mod series;
