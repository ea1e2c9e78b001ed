pub mod app;
pub mod audio_controls;
pub mod feedback_panel;
pub mod game_controls;
pub mod game_over_overlay;
pub mod map_view;
pub mod phase_overlays;
pub mod score_display;
