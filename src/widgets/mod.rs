pub mod brief;
pub mod controls;
pub mod debug;
pub mod filter_bar;
pub mod offer_table;
pub mod placards;
pub mod search_input;
