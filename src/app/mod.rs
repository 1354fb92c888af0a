pub mod screens;
pub mod views;
