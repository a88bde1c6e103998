//! 登录命令

use quill_cqrs_core::Command;

use crate::application::dto::IssuedCredentials;
use crate::domain::value_objects::{Email, IpAddress, UserAgent};

/// 登录命令
///
/// 字段在 HTTP 边界处已构造为值对象
#[derive(Debug, Clone)]
pub struct LoginCommand {
    pub email: Email,
    pub password: String,
    pub user_agent: UserAgent,
    pub ip_address: IpAddress,
}

impl Command for LoginCommand {
    type Result = IssuedCredentials;
}
