//! Shared test harness modules for the tour guide CLI.

use super::*;

mod helpers;
mod rewards_steps;
mod unit;
