//! League standings, under/over tables, team form and season-outcome
//! detection over a flat table of football match results.

pub mod achievements;
pub mod fake_season;
pub mod match_dataset;
pub mod standings;
pub mod team_form;
pub mod under_over;
