pub mod enriched_game;
pub mod game_record;
pub mod opportunity;
