//! Hardware driver implementations
//!
//! This crate provides concrete implementations of the traits defined
//! in camwatch-core for the watch hardware:
//!
//! - Vibration motor pattern sequencer
//! - Sharp memory LCD line driver

#![cfg_attr(not(test), no_std)]
#![deny(unsafe_code)]

pub mod display;
pub mod haptic;
