pub mod channels;
pub mod config;
pub mod history;
pub mod ingest;
pub mod record;
pub mod replies;
pub mod rewrite;
