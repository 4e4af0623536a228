/// terminal logging set up from the verbosity of the run
pub mod logger;
