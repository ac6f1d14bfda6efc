#![allow(dead_code)]

pub mod speckle;
pub mod synthetic_fundus;

pub fn init_logger() {
    let _ = env_logger::builder().is_test(true).try_init();
}
