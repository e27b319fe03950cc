pub mod app;
pub mod auth;
pub mod config;
pub mod error;
pub mod flash;
pub mod home;
pub mod movies;
pub mod playlists;
pub mod state;
pub mod users;
pub mod views;
