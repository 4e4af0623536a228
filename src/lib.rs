#[allow(non_snake_case)]
pub mod AmrGrid;
#[allow(non_snake_case)]
pub mod Examples;
#[allow(non_snake_case)]
pub mod LowMach;
#[allow(non_snake_case)]
pub mod Thermodynamics;
#[allow(non_snake_case)]
pub mod Utils;
pub mod settings;
