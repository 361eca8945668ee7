pub mod audit_loans_cmd;
pub mod create_loan_cmd;
pub mod dashboard_cmd;
pub mod list_loans_cmd;
pub mod member_history_cmd;
pub mod member_loans_cmd;
pub mod return_loan_cmd;
