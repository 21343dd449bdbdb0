pub mod assets;
pub mod camera;
pub mod core;
pub mod loading;
pub mod picking;
pub mod presentation;
pub mod scene;
