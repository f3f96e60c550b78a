//! Simulated Annealing over closed tours.
//!
//! Starting from a given tour (normally the greedy one), each iteration swaps
//! two random positions and keeps the result according to the Metropolis
//! criterion. Worse tours are accepted with a probability that shrinks as the
//! temperature decays geometrically, letting the search leave local optima
//! early and settle later.
//!
//! # References
//!
//! - Kirkpatrick, Gelatt & Vecchi (1983), "Optimization by Simulated Annealing"
//! - Cerny (1985), "Thermodynamical Approach to the Travelling Salesman Problem"

mod config;
mod runner;
mod types;

pub use config::AnnealConfig;
pub use runner::{AnnealRunner, AnnealSearch};
pub use types::{acceptance_probability, AnnealResult, AnnealStep};
