pub mod split_logger;
