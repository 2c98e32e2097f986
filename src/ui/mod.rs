pub mod editor;
pub mod preview;
pub mod review;
pub mod title_bar;
pub mod viewport;
