pub mod update_client;
