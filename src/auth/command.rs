pub mod delete_account_cmd;
pub mod login_cmd;
pub mod register_cmd;
pub mod update_profile_cmd;
