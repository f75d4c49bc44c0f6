pub mod begin_drawing_shape;
pub mod cancel_drawing;
pub mod close_drawing_session;
pub mod complete_drawing_shape;
pub mod configure_drawing;
pub mod confirm_drawing;
pub mod get_drawing_session;
pub mod select_drawing_tool;
pub mod start_drawing_session;
