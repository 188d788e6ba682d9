pub mod derive;
pub mod refresh;
