// spamcheck: spam / not-spam text classification served over HTTP.
//
// This is the library root. Each module corresponds to one stage of the
// train -> persist -> load -> predict lifecycle.

pub mod config;
pub mod dataset;
pub mod inference;
pub mod metrics;
pub mod model;
pub mod output;
pub mod text;
pub mod web;
