mod config;
mod review_flow;
mod sync;
