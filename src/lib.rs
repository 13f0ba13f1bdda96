pub mod auto_solve;
pub mod board;
pub mod constants;
pub mod generator;
pub mod rng;
pub mod session;
pub mod types;
