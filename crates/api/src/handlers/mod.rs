pub mod events;
pub mod pages;
pub mod seed;
