pub mod controller;
pub mod index;
pub mod likes;
pub mod model;
pub mod service;
pub mod store;
pub mod thread;
pub mod view;
