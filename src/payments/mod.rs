mod monobank;

pub use monobank::*;
