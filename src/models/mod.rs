pub mod question;
pub mod quiz_type;
