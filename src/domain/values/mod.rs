pub mod confidence;
pub mod edge;
pub mod injury;
pub mod points;
pub mod schedule;
pub mod strength;
pub mod team;
pub mod tier;
pub mod weather;
