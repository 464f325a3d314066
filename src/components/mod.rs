pub mod event_detail;
pub mod event_form;
pub mod legend;
pub mod popup;
pub mod status_bar;
pub mod team_form;
pub mod week_view;

pub use event_form::EventForm;
pub use legend::Legend;
pub use status_bar::StatusBar;
pub use team_form::TeamForm;
pub use week_view::WeekView;
