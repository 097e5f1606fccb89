pub mod knapsack;
pub use knapsack::solve;
