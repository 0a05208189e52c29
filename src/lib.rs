pub mod anim;
pub mod http_client;
pub mod snapshot_feed;
pub mod snapshot_fetch;
pub mod state;
