pub mod catalog;
pub mod config;
pub mod extractor;
pub mod fetcher;
pub mod matcher;
pub mod model;
pub mod normalizer;
pub mod service;
pub mod storage;
pub mod utils;
pub mod view;
