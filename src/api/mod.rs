pub mod resolver;
pub mod submission;
pub mod validator;
