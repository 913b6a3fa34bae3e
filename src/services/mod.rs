pub mod answer_store;
pub mod attempt_session;
pub mod countdown_timer;
pub mod http_helpers;
pub mod question_navigator;
pub mod submission_formatter;
pub mod violation_monitor;
