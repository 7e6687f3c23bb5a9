pub mod channels;
pub mod output_router;
pub mod protocol;
pub mod web_server;
