//! Energy Dash: an endless runner where the collected energy lights up the
//! city behind you.
//!
//! The library holds the simulation (`compute` and the modules it drives)
//! and the state machine around it (`session`).  Drawing and input live in
//! the terminal front end.

pub mod collision;
pub mod compute;
pub mod config;
pub mod entities;
pub mod leaderboard;
pub mod lighting;
pub mod physics;
pub mod session;
pub mod spawn;
