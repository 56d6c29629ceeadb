//! Settlement Planner - discrete-step simulation of municipal facility
//! build-out across settlements

pub mod city;
pub mod command;
pub mod core;
pub mod planning;
pub mod simulation;
