//! Food menu REST API: CRUD and ranking queries over a restaurant's food items.

pub mod config;
pub mod db;
pub mod dto;
pub mod entity;
pub mod error;
pub mod extract;
pub mod messages;
pub mod models;
pub mod response;
pub mod routes;
pub mod services;
pub mod state;
