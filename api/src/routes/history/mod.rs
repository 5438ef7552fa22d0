pub mod clear_history_response;
pub mod history_route;
