pub mod analytics;
pub mod correlate;
pub mod feed;
pub mod generator;
pub mod model;
pub mod output;
pub mod palette;
pub mod random;
pub mod viewport;
