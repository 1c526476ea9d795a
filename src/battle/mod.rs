pub mod ai;
pub mod engine;
pub mod mode;
pub mod observer;
pub mod runner;
pub mod state;

#[cfg(test)]
mod tests;
