/// heated closed chamber and an enclosed embedded-boundary cavity
pub mod closed_chamber_examples;
