pub mod collaborators;
pub mod headless;
pub mod input;
pub mod session;
