//! Warfront - battle resolution and garrison reconciliation for a city strategy game

pub mod army;
pub mod battle;
pub mod city;
pub mod core;
pub mod stats;
pub mod store;
