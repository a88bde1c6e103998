//! 刷新命令

use quill_common::SessionId;
use quill_cqrs_core::Command;

use crate::application::dto::RotatedCredentials;

/// 刷新命令
///
/// refresh_token 是调用方提交的裸令牌字符串，处理器负责验签
#[derive(Debug, Clone)]
pub struct RefreshCommand {
    pub session_id: SessionId,
    pub refresh_token: String,
}

impl Command for RefreshCommand {
    type Result = RotatedCredentials;
}
